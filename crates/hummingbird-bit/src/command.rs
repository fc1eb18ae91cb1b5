//! Actuator command frames.
//!
//! Every actuator command is a fixed 4-byte frame: an opcode selecting the
//! device and port, followed by up to three parameter bytes. Unused
//! parameter slots are padded with [`PAD`].

use crate::rounding::div_half_up;

/// Filler for unused parameter slots.
pub const PAD: u8 = 0xFF;

/// Opcode of the single LED wired to the board controller.
pub const OP_SINGLE_LED: u8 = 0xC0;
/// Tri-color LED opcodes are `OP_TRI_LED_BASE + port`.
pub const OP_TRI_LED_BASE: u8 = 0xC3;
/// Servo opcodes are `OP_SERVO_BASE + port`.
pub const OP_SERVO_BASE: u8 = 0xC5;
/// Stop every actuator. Also sent as the bring-up handshake.
pub const OP_STOP_ALL: u8 = 0xCB;

/// Rotation servo byte that stops the motor.
pub const ROTATION_STOP: u8 = 255;
/// Speeds with a magnitude below this are sent as [`ROTATION_STOP`].
pub const ROTATION_DEADBAND: i16 = 10;

/// Length of every command frame.
pub const FRAME_LEN: usize = 4;

/// An actuator command. Parameters are taken as given and clamped when the
/// frame is built; ports are expected to be validated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Brightness in percent of the LED on port 1.
    SingleLed { intensity: i16 },
    /// Per-channel brightness in percent.
    TriColorLed { port: u8, red: i16, green: i16, blue: i16 },
    /// Angle in degrees, 0-180.
    PositionServo { port: u8, angle: i16 },
    /// Speed in percent, -100-100.
    RotationServo { port: u8, speed: i16 },
    StopAll,
}

impl From<Command> for [u8; FRAME_LEN] {
    fn from(val: Command) -> Self {
        match val {
            Command::SingleLed { intensity } => {
                [OP_SINGLE_LED, percent_to_byte(intensity), PAD, PAD]
            }
            Command::TriColorLed { port, red, green, blue } => [
                OP_TRI_LED_BASE + port,
                percent_to_byte(red),
                percent_to_byte(green),
                percent_to_byte(blue),
            ],
            Command::PositionServo { port, angle } => {
                [OP_SERVO_BASE + port, angle_to_byte(angle), PAD, PAD]
            }
            Command::RotationServo { port, speed } => {
                [OP_SERVO_BASE + port, speed_to_byte(speed), PAD, PAD]
            }
            Command::StopAll => [OP_STOP_ALL, PAD, PAD, PAD],
        }
    }
}

fn clamp(value: i16, min: i16, max: i16) -> u32 {
    (value.clamp(min, max) - min) as u32
}

/// `round(percent * 255 / 100)` with `percent` clamped to 0-100.
pub fn percent_to_byte(percent: i16) -> u8 {
    div_half_up(clamp(percent, 0, 100) * 255, 100) as u8
}

/// `round(angle * 254 / 180)` with `angle` clamped to 0-180.
pub fn angle_to_byte(angle: i16) -> u8 {
    div_half_up(clamp(angle, 0, 180) * 254, 180) as u8
}

/// Map a speed in percent onto the rotation servo command band.
///
/// Speeds inside the deadband stop the servo, everything else is
/// `round(speed * 23 / 100 + 122)` with `speed` clamped to -100-100.
pub fn speed_to_byte(speed: i16) -> u8 {
    let speed = speed.clamp(-100, 100);
    if speed.abs() < ROTATION_DEADBAND {
        return ROTATION_STOP;
    }
    // Offset by +100 so the arithmetic stays unsigned.
    let shifted = clamp(speed, -100, 100);
    div_half_up(shifted * 23 + (122 * 100 - 100 * 23), 100) as u8
}

/// PWM duty for the local LED outputs, out of [`LOCAL_LED_MAX_DUTY`].
pub fn local_led_duty(percent: i16) -> u16 {
    u16::from(percent_to_byte(percent)) * 4
}

/// Full scale of [`local_led_duty`].
pub const LOCAL_LED_MAX_DUTY: u16 = 1023;
