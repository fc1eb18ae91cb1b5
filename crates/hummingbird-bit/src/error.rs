use embedded_hal::{digital, pwm};
use readiness_gate::GateError;

use crate::port::InvalidPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<SpiE> {
    /// The bus failed during a transaction.
    Spi(SpiE),
    /// The strobe line could not be driven.
    Strobe(digital::ErrorKind),
    /// A local LED output rejected its duty cycle.
    Output(pwm::ErrorKind),
    InvalidPort(InvalidPort),
    /// Another transaction held the bus for the whole polling budget.
    GateTimeout,
    /// `initialize` has not completed.
    NotInitialized,
}

impl<SpiE> Error<SpiE> {
    /// Errors that `FailureMode::Silent` turns into a no-op.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            Error::InvalidPort(_) | Error::GateTimeout | Error::NotInitialized
        )
    }
}

impl<E: core::fmt::Display> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Spi(err) => write!(f, "SPI communication error: {}", err),
            Error::Strobe(kind) => write!(f, "Strobe pin error: {:?}", kind),
            Error::Output(kind) => write!(f, "LED output error: {:?}", kind),
            Error::InvalidPort(invalid) => write!(f, "{}", invalid),
            Error::GateTimeout => write!(f, "Bus busy, gave up waiting"),
            Error::NotInitialized => write!(f, "Board not initialized"),
        }
    }
}

impl<SpiE> From<InvalidPort> for Error<SpiE> {
    fn from(e: InvalidPort) -> Self {
        Error::InvalidPort(e)
    }
}

impl<SpiE> From<GateError> for Error<SpiE> {
    fn from(e: GateError) -> Self {
        match e {
            GateError::Timeout { .. } => Error::GateTimeout,
            GateError::Closed => Error::NotInitialized,
        }
    }
}
