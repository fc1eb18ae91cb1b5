use core::convert::Infallible;

use embassy_nrf::gpio::Pin;
use embassy_nrf::pwm::{DutyCycle, Instance, SimpleConfig, SimplePwm};
use embassy_nrf::Peri;
use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use hummingbird_bit::command::LOCAL_LED_MAX_DUTY;

/// Single-channel PWM output driving one of the edge-connector LED ports.
pub struct LocalLed<'d> {
    pwm: SimplePwm<'d>,
}

impl<'d> LocalLed<'d> {
    pub fn new<T: Instance>(pwm: Peri<'d, T>, pin: Peri<'d, impl Pin>) -> Self {
        let mut config = SimpleConfig::default();
        config.max_duty = LOCAL_LED_MAX_DUTY;
        let mut pwm = SimplePwm::new_1ch(pwm, pin, &config);
        pwm.set_duty(0, DutyCycle::normal(0));
        Self { pwm }
    }
}

impl ErrorType for LocalLed<'_> {
    type Error = Infallible;
}

impl SetDutyCycle for LocalLed<'_> {
    fn max_duty_cycle(&self) -> u16 {
        self.pwm.max_duty()
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        self.pwm.set_duty(0, DutyCycle::normal(duty));
        Ok(())
    }
}
