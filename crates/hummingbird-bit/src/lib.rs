#![no_std]
//! Driver for the BirdBrain Hummingbird bit expansion board.
//!
//! The board controller listens on an SPI bus framed by a strobe line.
//! Actuators take fixed 4-byte command frames; sensors and the battery are
//! sampled together by a 6-exchange poll. [`Hummingbird`] owns the bus,
//! strobe, delay and the two local LED outputs behind a
//! [`ReadinessGate`], so every operation takes `&self` and a single driver
//! can be shared between tasks while frames never interleave.

// Must come first so the logging macros are visible to later modules.
mod fmt;

pub mod command;
pub mod config;
pub mod error;
pub mod port;
mod rounding;
pub mod sensor;
pub mod transport;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::{self, SetDutyCycle};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::SpiBus;
use readiness_gate::{GateGuard, ReadinessGate};

pub use crate::command::Command;
pub use crate::config::{Config, FailureMode, Timing};
pub use crate::error::Error;
pub use crate::port::{DeviceClass, InvalidPort};
pub use crate::sensor::{SensorKind, SensorSnapshot};
pub use crate::transport::{FrameProfile, Transport};
pub use readiness_gate::{GateError, PollBudget};

use crate::command::{local_led_duty, LOCAL_LED_MAX_DUTY};
use crate::sensor::{battery_millivolts, PollResponse, POLL_FRAME};

/// Everything the gate protects: the framed bus and the local LED outputs
/// for LED ports 2 and 3.
pub struct Hardware<SPI, CS, D, P> {
    pub transport: Transport<SPI, CS, D>,
    pub leds: [P; 2],
}

pub struct Hummingbird<M: RawMutex, SPI, CS, D, P> {
    gate: ReadinessGate<M, Hardware<SPI, CS, D, P>>,
    /// Used for coarse gate polling, outside the lock.
    delay: D,
    config: Config,
}

impl<M, SPI, CS, D, P> Hummingbird<M, SPI, CS, D, P>
where
    M: RawMutex,
    SPI: SpiBus<u8>,
    CS: OutputPin,
    D: DelayNs + Clone,
    P: SetDutyCycle,
{
    /// Take ownership of the board wiring. The driver refuses every
    /// operation until [`initialize`](Self::initialize) has run.
    pub fn new(
        spi: SPI,
        strobe: CS,
        delay: D,
        leds: [P; 2],
        config: Config,
    ) -> Self {
        let transport =
            Transport::new(spi, strobe, delay.clone(), config.timing);
        Self {
            gate: ReadinessGate::new(Hardware { transport, leds }),
            delay,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// `true` once initialized and while no transaction is in flight.
    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    /// Bring the board up: wait out its power-on time, send the handshake
    /// frame, switch the local LEDs off and admit other operations.
    pub async fn initialize(&self) -> Result<(), Error<SPI::Error>> {
        let mut hw = self.gate.acquire_unchecked().await;

        hw.transport.power_on().await?;
        hw.transport
            .transact(FrameProfile::Command, Command::StopAll.into())
            .await?;
        for led in hw.leds.iter_mut() {
            led.set_duty_cycle_fully_off().map_err(output_error)?;
        }

        drop(hw);
        self.gate.open();
        info!("Hummingbird ready");
        Ok(())
    }

    /// Set the brightness (0-100 %) of LED port 1-3.
    ///
    /// Port 1 is driven by the board; ports 2 and 3 are local PWM outputs.
    pub async fn set_led(
        &self,
        port: u8,
        intensity: i16,
    ) -> Result<(), Error<SPI::Error>> {
        let result: Result<(), Error<SPI::Error>> = async {
            let port = DeviceClass::Led.validate(port)?;
            if port == 1 {
                return self.send(Command::SingleLed { intensity }).await;
            }
            let mut hw = self.lock().await?;
            hw.leds[usize::from(port - 2)]
                .set_duty_cycle_fraction(
                    local_led_duty(intensity),
                    LOCAL_LED_MAX_DUTY,
                )
                .map_err(output_error)
        }
        .await;
        self.settle(result)
    }

    /// Set the color of tri-color LED port 1-2, each channel 0-100 %.
    pub async fn set_tri_led(
        &self,
        port: u8,
        red: i16,
        green: i16,
        blue: i16,
    ) -> Result<(), Error<SPI::Error>> {
        let result: Result<(), Error<SPI::Error>> = async {
            let port = DeviceClass::TriColorLed.validate(port)?;
            self.send(Command::TriColorLed { port, red, green, blue }).await
        }
        .await;
        self.settle(result)
    }

    /// Move the position servo on port 1-4 to `angle` degrees (0-180).
    pub async fn set_position_servo(
        &self,
        port: u8,
        angle: i16,
    ) -> Result<(), Error<SPI::Error>> {
        let result: Result<(), Error<SPI::Error>> = async {
            let port = DeviceClass::Servo.validate(port)?;
            self.send(Command::PositionServo { port, angle }).await
        }
        .await;
        self.settle(result)
    }

    /// Spin the rotation servo on port 1-4 at `speed` percent (-100-100).
    /// Speeds close to zero stop it.
    pub async fn set_rotation_servo(
        &self,
        port: u8,
        speed: i16,
    ) -> Result<(), Error<SPI::Error>> {
        let result: Result<(), Error<SPI::Error>> = async {
            let port = DeviceClass::Servo.validate(port)?;
            self.send(Command::RotationServo { port, speed }).await
        }
        .await;
        self.settle(result)
    }

    /// Stop every actuator driven by the board.
    pub async fn stop_all(&self) -> Result<(), Error<SPI::Error>> {
        let result = self.send(Command::StopAll).await;
        self.settle(result)
    }

    /// Read the sensor on port 1-3, scaled for `kind`.
    pub async fn read_sensor(
        &self,
        kind: SensorKind,
        port: u8,
    ) -> Result<u16, Error<SPI::Error>> {
        let result: Result<u16, Error<SPI::Error>> = async {
            let port = DeviceClass::Sensor.validate(port)?;
            let response = self.poll().await?;
            Ok(kind.scale(response.sensor_raw(port)))
        }
        .await;
        self.settle(result)
    }

    /// Battery level in millivolts.
    pub async fn read_battery(&self) -> Result<u16, Error<SPI::Error>> {
        let result: Result<u16, Error<SPI::Error>> = async {
            let response = self.poll().await?;
            Ok(battery_millivolts(response.battery_raw()))
        }
        .await;
        self.settle(result)
    }

    /// All three raw sensor readings and the battery level from one poll.
    pub async fn read_all(&self) -> Result<SensorSnapshot, Error<SPI::Error>> {
        let result = self.poll().await.map(|response| response.snapshot());
        self.settle(result)
    }

    /// Give the wiring back.
    pub fn release(self) -> (SPI, CS, D, [P; 2]) {
        let Hardware { transport, leds } = self.gate.into_inner();
        let (spi, strobe, delay) = transport.release();
        (spi, strobe, delay, leds)
    }

    async fn lock(
        &self,
    ) -> Result<GateGuard<'_, M, Hardware<SPI, CS, D, P>>, Error<SPI::Error>>
    {
        let mut delay = self.delay.clone();
        let guard = self
            .gate
            .acquire(&mut delay, self.config.timing.poll_budget())
            .await?;
        Ok(guard)
    }

    async fn send(&self, command: Command) -> Result<(), Error<SPI::Error>> {
        let mut hw = self.lock().await?;
        trace!("sending {}", command);
        hw.transport.transact(FrameProfile::Command, command.into()).await?;
        Ok(())
    }

    async fn poll(&self) -> Result<PollResponse, Error<SPI::Error>> {
        let mut hw = self.lock().await?;
        let bytes =
            hw.transport.transact(FrameProfile::SensorPoll, POLL_FRAME).await?;
        let response = PollResponse::new(bytes);
        trace!("poll response {}", response);
        Ok(response)
    }

    /// Apply the configured [`FailureMode`].
    fn settle<T: Default>(
        &self,
        result: Result<T, Error<SPI::Error>>,
    ) -> Result<T, Error<SPI::Error>> {
        match result {
            Err(err)
                if err.is_soft()
                    && self.config.failure_mode == FailureMode::Silent =>
            {
                debug!("operation skipped");
                Ok(T::default())
            }
            Err(err) => {
                if err.is_soft() {
                    warn!("operation rejected");
                }
                Err(err)
            }
            ok => ok,
        }
    }
}

fn output_error<E: pwm::Error, SpiE>(err: E) -> Error<SpiE> {
    Error::Output(err.kind())
}
