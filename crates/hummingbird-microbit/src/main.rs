#![no_std]
#![no_main]

// Must come first so the logging macros are visible to later modules.
mod fmt;

mod delay;
mod led;

use embassy_executor::Spawner;
use embassy_nrf::gpio::{Level, Output, OutputDrive};
use embassy_nrf::interrupt::{self, InterruptExt};
use embassy_nrf::{bind_interrupts, peripherals, spim};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Timer;
use hummingbird_bit::{Config, Hummingbird, SensorKind};
use static_cell::StaticCell;

#[cfg(feature = "defmt")]
use defmt_rtt as _;
#[cfg(feature = "defmt")]
use panic_probe as _;
#[cfg(not(feature = "defmt"))]
use panic_reset as _;

use crate::delay::HybridDelay;
use crate::led::LocalLed;

pub const FW_VERSION: &str = env!("FW_VERSION");

type Board = Hummingbird<
    CriticalSectionRawMutex,
    spim::Spim<'static>,
    Output<'static>,
    HybridDelay,
    LocalLed<'static>,
>;

static BOARD: StaticCell<Board> = StaticCell::new();

bind_interrupts!(struct SpiIrq {
    SPI2 => spim::InterruptHandler<peripherals::SPI2>;
});

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Hummingbird bit firmware {}", FW_VERSION);
    let p = embassy_nrf::init(Default::default());

    // Edge pins 13 (SCK), 14 (MISO) and 15 (MOSI).
    let mut config = spim::Config::default();
    config.mode = spim::MODE_0;
    config.frequency = spim::Frequency::M1;
    interrupt::SPI2.set_priority(interrupt::Priority::P3);
    let spi =
        spim::Spim::new(p.SPI2, SpiIrq, p.P0_17, p.P0_01, p.P0_13, config);

    // Edge pin 16. Idles high between frames.
    let strobe = Output::new(p.P1_02, Level::High, OutputDrive::Standard);

    // Edge pins 2 and 8 carry LED ports 2 and 3.
    let leds = [
        LocalLed::new(p.PWM0, p.P0_04),
        LocalLed::new(p.PWM1, p.P0_10),
    ];

    let board = BOARD.init(Hummingbird::new(
        spi,
        strobe,
        HybridDelay,
        leds,
        Config::default(),
    ));

    if let Err(e) = board.initialize().await {
        error!("Board bring-up failed: {}", e);
        return;
    }

    spawner.must_spawn(sensor_monitor(board));
    spawner.must_spawn(actuator_sweep(board));
}

/// Logs every sensor port and the battery twice a second.
#[embassy_executor::task]
async fn sensor_monitor(board: &'static Board) {
    const KINDS: [SensorKind; 3] =
        [SensorKind::Light, SensorKind::Dial, SensorKind::Distance];

    loop {
        match board.read_all().await {
            Ok(snapshot) => {
                for (port, kind) in (1u8..).zip(KINDS) {
                    if let Some(value) = snapshot.reading(kind, port) {
                        info!("sensor {}: {}", port, value);
                    }
                }
                info!("battery: {} mV", snapshot.battery_mv);
            }
            Err(e) => warn!("Sensor poll failed: {}", e),
        }
        Timer::after_millis(500).await;
    }
}

/// Sweeps the position servos back and forth and fades the LEDs along.
#[embassy_executor::task]
async fn actuator_sweep(board: &'static Board) {
    let mut angle: i16 = 0;
    let mut step: i16 = 10;

    loop {
        let level = angle * 100 / 180;
        for port in 1..=4 {
            if let Err(e) = board.set_position_servo(port, angle).await {
                warn!("Servo {} failed: {}", port, e);
            }
        }
        if let Err(e) = board.set_tri_led(1, level, 0, 100 - level).await {
            warn!("Tri-color LED failed: {}", e);
        }
        for port in 1..=3 {
            if let Err(e) = board.set_led(port, level).await {
                warn!("LED {} failed: {}", port, e);
            }
        }

        if !(0..=180).contains(&(angle + step)) {
            step = -step;
        }
        angle += step;
        Timer::after_millis(100).await;
    }
}
