//! Firing actuator seam.
//!
//! A servo pushes a dart from the magazine into the flywheels and
//! retracts. The pulse sequencing (extend, dwell, retract) lives behind
//! this trait in the platform layer.

/// Firing actuator error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerError {
    /// Servo output hardware failed.
    HardwareFault,
}

impl core::fmt::Display for TriggerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TriggerError::HardwareFault => write!(f, "fire actuator hardware fault"),
        }
    }
}

impl core::error::Error for TriggerError {}

/// One push-then-retract firing pulse.
///
/// `fire` blocks for the full dwell between extend and retract, stalling
/// every other task for its duration.
// TODO: sequence the pulse from the scheduler tick instead of blocking, so
// axis regulation keeps running during the dwell.
pub trait FireTrigger {
    fn fire(&mut self) -> Result<(), TriggerError>;
}
