//! Startup task.

use crate::config::{DEFAULT_DESIRED_PITCH_DEG, DEFAULT_DESIRED_YAW_DEG};
use crate::scheduler::{StepOutcome, Task, TaskError};
use crate::share::TurretShares;

/// Seeds every share to its startup value, then terminates.
///
/// Registered at the highest priority so the seeding step completes
/// before any periodic task reads a share.
pub struct InitTask;

impl Task for InitTask {
    fn step(&mut self, shares: &TurretShares) -> Result<StepOutcome, TaskError> {
        // Button line idles high; the IRQ fires on the falling edge.
        shares.button_pushed.put(true);
        shares.yaw_pos.put(0.0);
        shares.yaw_vel.put(0.0);
        shares.pitch_pos.put(0.0);
        shares.pitch_vel.put(0.0);
        shares.desired_yaw.put(DEFAULT_DESIRED_YAW_DEG);
        shares.desired_pitch.put(DEFAULT_DESIRED_PITCH_DEG);
        shares.on_target.put(false);
        shares.fired.put(false);
        Ok(StepOutcome::Done)
    }
}
