//! Sensor poll frame and reading conversions.
//!
//! Scaled readings round exact halves to even.

use crate::rounding::div_half_even;

/// Bytes clocked out to sample the sensor ports and the battery.
///
/// The first four probes request sensor 1, 2, 3 and the battery. The board
/// answers each probe a fixed number of exchanges later, so the two trailing
/// probes exist to clock sensors 1 and 2 back out. Every read sends the whole
/// frame, whichever value the caller wants.
pub const POLL_FRAME: [u8; POLL_LEN] = [0xCC, 0x66, 0x77, 0x88, 0x55, 0x66];

/// Number of exchanges in a poll.
pub const POLL_LEN: usize = 6;

/// Response slot of each sensor port (1-3), in port order.
const SENSOR_SLOTS: [usize; 3] = [4, 5, 2];
/// Response slot carrying the battery level.
const BATTERY_SLOT: usize = 3;

/// What is plugged into a sensor port. Determines how a raw reading scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorKind {
    /// 0-100, no unit.
    Light,
    /// 0-100 over the usable rotation range.
    Dial,
    /// Centimeters.
    Distance,
    /// 0-200, no unit.
    Sound,
    /// Anything else; 0-100, no unit.
    #[default]
    Other,
}

impl SensorKind {
    /// Scale a raw reading for this kind of sensor.
    pub fn scale(self, raw: u8) -> u16 {
        let raw = u32::from(raw);
        let scaled = match self {
            Self::Light | Self::Other => div_half_even(raw * 100, 255),
            // The dial never reaches full scale on its own, so 230 already
            // reads as 100.
            Self::Dial => div_half_even(raw * 100, 230).min(100),
            Self::Distance => div_half_even(raw * 117, 100),
            Self::Sound => div_half_even(raw * 200, 255),
        };
        scaled as u16
    }
}

/// Numeric sensor ids: 1 light, 2 dial, 3 distance, 4 sound, anything
/// else is treated as "other".
impl From<u8> for SensorKind {
    fn from(id: u8) -> Self {
        match id {
            1 => Self::Light,
            2 => Self::Dial,
            3 => Self::Distance,
            4 => Self::Sound,
            _ => Self::Other,
        }
    }
}

/// Battery level in millivolts from its raw reading.
pub fn battery_millivolts(raw: u8) -> u16 {
    div_half_even(u32::from(raw) * 406, 10) as u16
}

/// Bytes received while clocking out [`POLL_FRAME`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollResponse([u8; POLL_LEN]);

impl PollResponse {
    pub const fn new(bytes: [u8; POLL_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw reading of sensor `port`; the port must already be validated.
    pub fn sensor_raw(&self, port: u8) -> u8 {
        self.0[SENSOR_SLOTS[usize::from(port - 1)]]
    }

    pub fn battery_raw(&self) -> u8 {
        self.0[BATTERY_SLOT]
    }

    pub fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            raw: [self.sensor_raw(1), self.sensor_raw(2), self.sensor_raw(3)],
            battery_mv: battery_millivolts(self.battery_raw()),
        }
    }
}

/// Everything a single poll returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSnapshot {
    /// Raw readings of sensor ports 1-3.
    pub raw: [u8; 3],
    /// Battery level in millivolts.
    pub battery_mv: u16,
}

impl SensorSnapshot {
    /// Scaled reading of sensor `port` (1-3), or `None` for any other port.
    pub fn reading(&self, kind: SensorKind, port: u8) -> Option<u16> {
        let raw = *self.raw.get(usize::from(port).checked_sub(1)?)?;
        Some(kind.scale(raw))
    }
}
