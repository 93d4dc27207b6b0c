//! Axis control task.
//!
//! One instance regulates one rotational axis: sample the encoder, fold
//! the count into a continuous position, run the proportional controller
//! against the commanded angle and apply the result to the motor as a
//! signed duty cycle. Measured angle and per-cycle velocity go back out
//! through the shares.

use crate::config::AxisConfig;
use crate::controller::PController;
use crate::encoder::{EncoderCounter, PositionTracker};
use crate::motor::MotorDriver;
use crate::scheduler::{StepOutcome, Task, TaskError};
use crate::share::{Axis, TurretShares};

/// Axis control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisState {
    /// Track the shared commanded angle.
    Slew,
    /// Regulate at the angle frozen when the aim went on target; shared
    /// commands are ignored until `on_target` clears.
    Hold,
    /// Inert placeholder: the acquisition task owns the commanded angle,
    /// the axis just keeps tracking it. Never entered by the current
    /// transition policy.
    Aim,
}

/// Closed-loop position control for one axis.
pub struct AxisTask<M: MotorDriver, E: EncoderCounter> {
    axis: Axis,
    cfg: AxisConfig,
    motor: M,
    encoder: E,
    tracker: PositionTracker,
    controller: PController,
    state: AxisState,
    hold_deg: f32,
}

impl<M: MotorDriver, E: EncoderCounter> AxisTask<M, E> {
    pub fn new(axis: Axis, cfg: AxisConfig, motor: M, encoder: E) -> Self {
        Self {
            axis,
            cfg,
            motor,
            encoder,
            tracker: PositionTracker::new(),
            controller: PController::new(cfg.gain, 0.0),
            state: AxisState::Slew,
            hold_deg: 0.0,
        }
    }

    pub fn state(&self) -> AxisState {
        self.state
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }
}

impl<M: MotorDriver, E: EncoderCounter> Task for AxisTask<M, E> {
    fn step(&mut self, shares: &TurretShares) -> Result<StepOutcome, TaskError> {
        let raw = self.encoder.count();
        let sample = self.tracker.sample(raw);
        let measured_deg = self.cfg.geometry.degrees_from_ticks(sample.position as f32);

        let target_deg = if shares.on_target.get() {
            if self.state != AxisState::Hold {
                self.hold_deg = measured_deg;
                self.state = AxisState::Hold;
            }
            self.hold_deg
        } else {
            self.state = AxisState::Slew;
            shares.desired(self.axis)
        };

        self.controller
            .set_setpoint(self.cfg.geometry.ticks_from_degrees(target_deg));
        let duty = self.controller.output(sample.position as f32);
        self.motor.set_duty_cycle(duty)?;

        // While holding, the published angle stays frozen so downstream
        // readers see the committed aim point, not servo dither.
        if self.state != AxisState::Hold {
            shares.set_measured(self.axis, measured_deg);
            shares.set_velocity(
                self.axis,
                self.cfg.geometry.degrees_from_ticks(sample.delta as f32),
            );
        }

        Ok(StepOutcome::Yield)
    }
}
