//! Simulated motor driver.

use turret_core::motor::{MotorDriver, MotorError};

use crate::platform::axis::SharedAxis;

/// Drives one simulated axis through the real driver seam.
///
/// Clamping and the stop-on-invalid rule live in the axis model, exactly
/// where the H-bridge would apply them.
pub struct SimMotor {
    axis: SharedAxis,
}

impl SimMotor {
    pub fn new(axis: SharedAxis) -> Self {
        Self { axis }
    }
}

impl MotorDriver for SimMotor {
    fn set_duty_cycle(&mut self, percent: f32) -> Result<(), MotorError> {
        self.axis.borrow_mut().set_duty(percent);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::axis::{shared, SimAxisConfig};

    #[test]
    fn duty_reaches_the_axis_model() {
        let axis = shared(SimAxisConfig::yaw());
        let mut motor = SimMotor::new(axis.clone());
        motor.set_duty_cycle(42.0).unwrap();
        assert_eq!(axis.borrow().duty(), 42.0);
    }

    #[test]
    fn out_of_range_request_is_clamped_not_rejected() {
        let axis = shared(SimAxisConfig::yaw());
        let mut motor = SimMotor::new(axis.clone());
        motor.set_duty_cycle(-400.0).unwrap();
        assert_eq!(axis.borrow().duty(), -100.0);
    }
}
