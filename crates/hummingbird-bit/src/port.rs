//! Per-class port ranges.

use core::ops::RangeInclusive;

/// Kind of connector a port number refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceClass {
    /// Single-color LED ports.
    Led,
    /// Tri-color (RGB) LED ports.
    TriColorLed,
    /// Position and rotation servo ports.
    Servo,
    /// Analog sensor ports.
    Sensor,
}

impl DeviceClass {
    /// Valid port numbers for this class.
    pub const fn ports(self) -> RangeInclusive<u8> {
        match self {
            Self::Led => 1..=3,
            Self::TriColorLed => 1..=2,
            Self::Servo => 1..=4,
            Self::Sensor => 1..=3,
        }
    }

    /// Check `port` against this class and hand it back if it is in range.
    pub fn validate(self, port: u8) -> Result<u8, InvalidPort> {
        if self.ports().contains(&port) {
            Ok(port)
        } else {
            Err(InvalidPort { class: self, port })
        }
    }
}

/// A port number outside the range of its device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidPort {
    pub class: DeviceClass,
    pub port: u8,
}

impl core::fmt::Display for InvalidPort {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let range = self.class.ports();
        write!(
            f,
            "port {} is not a valid {:?} port ({}-{})",
            self.port,
            self.class,
            range.start(),
            range.end()
        )
    }
}
