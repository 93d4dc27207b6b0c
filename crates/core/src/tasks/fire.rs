//! Fire control task.

use crate::scheduler::{StepOutcome, Task, TaskError};
use crate::share::TurretShares;
use crate::trigger::FireTrigger;

/// Pulses the actuator once whenever the aim is on target.
///
/// Clearing `on_target` immediately after the pulse is the only
/// double-fire protection; there is no retry path.
pub struct FireTask<T: FireTrigger> {
    trigger: T,
}

impl<T: FireTrigger> FireTask<T> {
    pub fn new(trigger: T) -> Self {
        Self { trigger }
    }
}

impl<T: FireTrigger> Task for FireTask<T> {
    fn step(&mut self, shares: &TurretShares) -> Result<StepOutcome, TaskError> {
        if shares.on_target.get() {
            self.trigger.fire()?;
            shares.on_target.put(false);
            shares.fired.put(true);
        }
        Ok(StepOutcome::Yield)
    }
}
