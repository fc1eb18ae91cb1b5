use embassy_time::Timer;
use embedded_hal_async::delay::DelayNs;

/// Core clock of the nRF52833.
const CPU_HZ: u64 = 64_000_000;

/// Waits shorter than this are spun on the CPU. The RTC ticks at 32.768 kHz,
/// which is too coarse for the frame gaps.
const SPIN_LIMIT_NS: u32 = 1_000_000;

/// Async delay that spins for sub-millisecond waits and yields to the
/// executor for everything longer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridDelay;

impl DelayNs for HybridDelay {
    async fn delay_ns(&mut self, ns: u32) {
        if ns < SPIN_LIMIT_NS {
            let cycles = (u64::from(ns) * CPU_HZ).div_ceil(1_000_000_000);
            cortex_m::asm::delay(cycles as u32);
        } else {
            Timer::after_nanos(u64::from(ns)).await;
        }
    }
}
