/// Errors that can occur while acquiring the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateError {
    /// The gate stayed busy for the whole coarse polling budget.
    Timeout { waited_ms: u32 },
    /// The gate was never opened; bring-up has not completed.
    Closed,
}

impl core::fmt::Display for GateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GateError::Timeout { waited_ms } => {
                write!(f, "gate still busy after {} ms", waited_ms)
            }
            GateError::Closed => write!(f, "gate has not been opened"),
        }
    }
}
