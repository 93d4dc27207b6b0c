//! Target acquisition task.
//!
//! Watches the two axes settle onto the commanded position, then images
//! the scene and walks the commanded position onto the hottest cell.
//! When the detected offset is small enough it declares the aim on
//! target, freezes the command at the measured position and leaves the
//! rest to the fire task.

use libm::fabsf;

use crate::config::AcquisitionConfig;
use crate::scheduler::{StepOutcome, Task, TaskError};
use crate::share::{Axis, TurretShares};
use crate::thermal::{pixel_offsets, ThermalCamera};

/// Acquisition state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquireState {
    /// Counting consecutive settled cycles.
    Idle,
    /// Settled long enough; capture a frame this step.
    Capture,
}

/// Offset-corrected commanded position, clamped to the mount's travel.
///
/// Yaw moves against the detected offset, pitch with it (the imager is
/// mounted inverted on the pitch axis). Returns `(yaw, pitch)` in degrees.
pub fn corrected_desired(
    cfg: &AcquisitionConfig,
    measured_yaw: f32,
    measured_pitch: f32,
    yaw_off: f32,
    pitch_off: f32,
) -> (f32, f32) {
    let yaw = (measured_yaw - yaw_off).clamp(cfg.yaw_min_deg, cfg.yaw_max_deg);
    let pitch = (measured_pitch + pitch_off).clamp(cfg.pitch_min_deg, cfg.pitch_max_deg);
    (yaw, pitch)
}

/// Settle-then-capture aim refinement.
pub struct TargetAcquisitionTask<C: ThermalCamera> {
    cfg: AcquisitionConfig,
    camera: C,
    state: AcquireState,
    settle_count: u32,
}

impl<C: ThermalCamera> TargetAcquisitionTask<C> {
    pub fn new(cfg: AcquisitionConfig, camera: C) -> Self {
        Self {
            cfg,
            camera,
            state: AcquireState::Idle,
            settle_count: 0,
        }
    }

    pub fn state(&self) -> AcquireState {
        self.state
    }

    pub fn settle_count(&self) -> u32 {
        self.settle_count
    }

    fn settled(&self, shares: &TurretShares, axis: Axis) -> bool {
        fabsf(shares.measured(axis) - shares.desired(axis)) < self.cfg.settle_tolerance_deg
    }
}

impl<C: ThermalCamera> Task for TargetAcquisitionTask<C> {
    fn step(&mut self, shares: &TurretShares) -> Result<StepOutcome, TaskError> {
        if self.state == AcquireState::Idle {
            if self.settled(shares, Axis::Yaw) && self.settled(shares, Axis::Pitch) {
                self.settle_count += 1;
            } else {
                self.settle_count = 0;
            }
            if self.settle_count == self.cfg.settle_cycles {
                self.state = AcquireState::Capture;
                self.settle_count = 0;
            }
        }

        // Deliberately not an else: the 10th settled cycle captures in the
        // same step.
        if self.state == AcquireState::Capture {
            if shares.on_target.get() {
                self.state = AcquireState::Idle;
                return Ok(StepOutcome::Yield);
            }

            let frame = self.camera.capture_frame()?;
            let (row, col) = frame.hottest();
            let (yaw_off, pitch_off) = pixel_offsets(row, col, self.cfg.pixel_pitch_deg);

            if fabsf(yaw_off) < self.cfg.accept_window_deg
                && fabsf(pitch_off) < self.cfg.accept_window_deg
            {
                shares.on_target.put(true);
                // Commit the aim exactly where the axes sit now.
                shares.desired_yaw.put(shares.yaw_pos.get());
                shares.desired_pitch.put(shares.pitch_pos.get());
            } else {
                let (yaw, pitch) = corrected_desired(
                    &self.cfg,
                    shares.yaw_pos.get(),
                    shares.pitch_pos.get(),
                    yaw_off,
                    pitch_off,
                );
                shares.desired_yaw.put(yaw);
                shares.desired_pitch.put(pitch);
            }
            self.state = AcquireState::Idle;
        }

        Ok(StepOutcome::Yield)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    use crate::thermal::{CameraError, ThermalFrame, FRAME_WIDTH};

    /// Serves a fixed frame and counts captures.
    struct MockCamera<'a> {
        frame: ThermalFrame,
        captures: &'a Cell<u32>,
    }

    impl ThermalCamera for MockCamera<'_> {
        fn capture_frame(&mut self) -> Result<ThermalFrame, CameraError> {
            self.captures.set(self.captures.get() + 1);
            Ok(self.frame.clone())
        }
    }

    fn hot_frame(row: usize, col: usize) -> ThermalFrame {
        let mut frame = ThermalFrame::new();
        frame.set_pixel(row, col, 500);
        frame
    }

    /// Park both axes exactly on the commanded position.
    fn settle_shares() -> TurretShares {
        let shares = TurretShares::new();
        shares.desired_yaw.put(180.0);
        shares.desired_pitch.put(0.0);
        shares.yaw_pos.put(180.0);
        shares.pitch_pos.put(0.0);
        shares
    }

    #[test]
    fn captures_on_the_tenth_consecutive_settled_cycle() {
        let shares = settle_shares();
        let captures = Cell::new(0);
        let camera = MockCamera {
            frame: hot_frame(12, 15), // centre: goes straight on target
            captures: &captures,
        };
        let mut task = TargetAcquisitionTask::new(AcquisitionConfig::default(), camera);

        for cycle in 1..=9 {
            task.step(&shares).unwrap();
            assert_eq!(task.settle_count(), cycle);
            assert_eq!(captures.get(), 0);
        }
        task.step(&shares).unwrap();
        assert_eq!(captures.get(), 1);
        assert_eq!(task.state(), AcquireState::Idle);
    }

    #[test]
    fn unsettled_cycle_resets_the_counter() {
        let shares = settle_shares();
        let captures = Cell::new(0);
        let camera = MockCamera {
            frame: hot_frame(12, 15),
            captures: &captures,
        };
        let mut task = TargetAcquisitionTask::new(AcquisitionConfig::default(), camera);

        for _ in 0..9 {
            task.step(&shares).unwrap();
        }
        // Nudge yaw out of the +/-2 degree band for one cycle.
        shares.yaw_pos.put(183.0);
        task.step(&shares).unwrap();
        assert_eq!(task.settle_count(), 0);
        shares.yaw_pos.put(180.0);

        // Nine more settled cycles still are not enough.
        for _ in 0..9 {
            task.step(&shares).unwrap();
        }
        assert_eq!(captures.get(), 0);
        task.step(&shares).unwrap();
        assert_eq!(captures.get(), 1);
    }

    #[test]
    fn centred_hotspot_freezes_aim_and_sets_on_target() {
        let shares = settle_shares();
        let captures = Cell::new(0);
        let camera = MockCamera {
            frame: hot_frame(12, 15),
            captures: &captures,
        };
        let mut task = TargetAcquisitionTask::new(AcquisitionConfig::default(), camera);

        for _ in 0..10 {
            task.step(&shares).unwrap();
        }

        assert!(shares.on_target.get());
        assert_eq!(shares.desired_yaw.get(), shares.yaw_pos.get());
        assert_eq!(shares.desired_pitch.get(), shares.pitch_pos.get());
        assert_eq!(task.state(), AcquireState::Idle);
    }

    #[test]
    fn off_centre_hotspot_republishes_corrected_command() {
        let shares = settle_shares();
        let captures = Cell::new(0);
        // Rightmost column: yaw offset is -16 px * 1.2566, outside the
        // +/-10 degree acceptance window.
        let camera = MockCamera {
            frame: hot_frame(12, FRAME_WIDTH - 1),
            captures: &captures,
        };
        let cfg = AcquisitionConfig::default();
        let mut task = TargetAcquisitionTask::new(cfg, camera);

        for _ in 0..10 {
            task.step(&shares).unwrap();
        }

        assert!(!shares.on_target.get());
        let expected_yaw = 180.0 + 16.0 * cfg.pixel_pitch_deg;
        assert!((shares.desired_yaw.get() - expected_yaw).abs() < 1e-3);
        assert_eq!(task.state(), AcquireState::Idle);
    }

    #[test]
    fn capture_is_skipped_while_already_on_target() {
        let shares = settle_shares();
        shares.on_target.put(true);
        let captures = Cell::new(0);
        let camera = MockCamera {
            frame: hot_frame(0, 0),
            captures: &captures,
        };
        let mut task = TargetAcquisitionTask::new(AcquisitionConfig::default(), camera);

        for _ in 0..10 {
            task.step(&shares).unwrap();
        }
        assert_eq!(captures.get(), 0);
        assert_eq!(task.state(), AcquireState::Idle);
    }

    #[test]
    fn correction_inside_travel_publishes_unclamped() {
        let cfg = AcquisitionConfig::default();
        // Measured 95 degrees with a -55 degree detected offset lands at
        // 150, inside the travel, so it passes through untouched.
        let (yaw, _) = corrected_desired(&cfg, 95.0, 0.0, -55.0, 0.0);
        assert_eq!(yaw, 150.0);
    }

    #[test]
    fn correction_clamps_to_mount_travel() {
        let cfg = AcquisitionConfig::default();
        let (yaw, _) = corrected_desired(&cfg, 265.0, 0.0, -15.0, 0.0);
        assert_eq!(yaw, 270.0);
        let (yaw, _) = corrected_desired(&cfg, 95.0, 0.0, 15.0, 0.0);
        assert_eq!(yaw, 90.0);
        let (_, pitch) = corrected_desired(&cfg, 180.0, 14.0, 0.0, 8.0);
        assert_eq!(pitch, 15.0);
        let (_, pitch) = corrected_desired(&cfg, 180.0, -3.0, 0.0, -8.0);
        assert_eq!(pitch, -5.0);
    }
}
