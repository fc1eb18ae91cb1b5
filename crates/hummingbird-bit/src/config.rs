use readiness_gate::PollBudget;

/// Hardware timing of the board protocol.
///
/// These values are dictated by the board controller's sampling window and
/// must not be tuned casually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Wait after power-up before the handshake, in milliseconds.
    pub power_on_ms: u32,
    /// Idle time before the strobe is asserted, in microseconds.
    pub frame_settle_us: u32,
    /// Gap after asserting the strobe and at the frame edges.
    pub short_gap_us: u32,
    /// Gap between interior bytes of a frame.
    pub long_gap_us: u32,
    /// Coarse gate polling interval, in milliseconds.
    pub poll_step_ms: u32,
    /// Coarse gate polling budget, in milliseconds.
    pub poll_budget_ms: u32,
}

impl Timing {
    pub const fn poll_budget(&self) -> PollBudget {
        PollBudget::new(self.poll_step_ms, self.poll_budget_ms)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            power_on_ms: 2000,
            frame_settle_us: 500,
            short_gap_us: 4,
            long_gap_us: 100,
            poll_step_ms: 10,
            poll_budget_ms: 250,
        }
    }
}

/// How operations report an invalid port or an unavailable gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FailureMode {
    /// Return the error to the caller.
    #[default]
    Report,
    /// Turn the operation into a no-op: actuators return `Ok(())`, sensor
    /// and battery reads return `Ok(0)`. Bus and pin failures are still
    /// returned.
    Silent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub timing: Timing,
    pub failure_mode: FailureMode,
}

impl Config {
    pub fn with_failure_mode(mut self, failure_mode: FailureMode) -> Self {
        self.failure_mode = failure_mode;
        self
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }
}
