//! Integer division with rounding, for the fixed-point scalings.

/// `num / den` with exact halves rounded up. Used by the command encoder.
pub(crate) const fn div_half_up(num: u32, den: u32) -> u32 {
    (num + den / 2) / den
}

/// `num / den` with exact halves rounded to the even quotient. Used by the
/// sensor decoder.
pub(crate) const fn div_half_even(num: u32, den: u32) -> u32 {
    let quotient = num / den;
    let twice_rem = 2 * (num % den);
    if twice_rem > den || (twice_rem == den && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}
