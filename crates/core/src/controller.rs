//! Proportional controller.
//!
//! The only control law the turret uses: output is the position error
//! scaled by a single gain. No integral or derivative term, and no output
//! clamping here; saturation belongs to the motor driver.

/// Proportional controller with a replaceable gain and setpoint.
///
/// `output` is a pure function of the two stored fields and the current
/// measurement. For the axis tasks the measurement is an encoder tick
/// position and the output is interpreted as a signed duty cycle.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PController {
    gain: f32,
    setpoint: f32,
}

impl PController {
    pub fn new(gain: f32, setpoint: f32) -> Self {
        Self { gain, setpoint }
    }

    /// `gain * (setpoint - measurement)`.
    pub fn output(&self, measurement: f32) -> f32 {
        self.gain * (self.setpoint - measurement)
    }

    /// Replace the setpoint immediately.
    pub fn set_setpoint(&mut self, setpoint: f32) {
        self.setpoint = setpoint;
    }

    /// Replace the gain immediately.
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn setpoint(&self) -> f32 {
        self.setpoint
    }
}
