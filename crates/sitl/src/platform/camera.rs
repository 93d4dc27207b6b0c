//! Simulated thermal imager.
//!
//! Synthesizes a 32x24 intensity frame from the geometric offset between
//! the current aim (read off the two axis models) and a configured hot
//! target. The hot cell is placed by inverting the control side's
//! pixel-to-angle equations, so a capture-correct-settle loop walks the
//! aim onto the target exactly as the bench does. Ambient cells carry
//! optional seeded uniform noise for less sterile frames.

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use turret_core::thermal::{
    CameraError, ThermalCamera, ThermalFrame, FRAME_HEIGHT, FRAME_WIDTH,
};

use crate::platform::axis::SharedAxis;

/// Configuration for the simulated imager.
#[derive(Debug, Clone, Copy)]
pub struct SimCameraConfig {
    /// Angular increment per pixel; must match the control side's value
    /// for the correction loop to converge in one or two captures.
    pub pixel_pitch_deg: f32,
    /// Intensity of the hot cell.
    pub hot_value: u16,
    /// Base intensity of every other cell.
    pub ambient_value: u16,
    /// Peak uniform noise added to ambient cells. 0 disables the RNG.
    pub noise_counts: u16,
    /// RNG seed for deterministic frames.
    pub seed: u64,
    /// Readiness-poll delay per capture. Blocks the whole loop, exactly
    /// like the real sensor's subframe wait. 0 in tests.
    pub readiness_delay_ms: u64,
}

impl Default for SimCameraConfig {
    fn default() -> Self {
        Self {
            pixel_pitch_deg: 1.2566,
            hot_value: 480,
            ambient_value: 110,
            noise_counts: 8,
            seed: 7,
            readiness_delay_ms: 0,
        }
    }
}

struct CameraState {
    cfg: SimCameraConfig,
    target_yaw_deg: f32,
    target_pitch_deg: f32,
    rng: StdRng,
    captures: u32,
}

/// Cloneable handle onto one simulated imager.
///
/// The acquisition task owns one clone; the rig keeps another to move the
/// hot target and read the capture count.
#[derive(Clone)]
pub struct SimThermalCamera {
    inner: Rc<RefCell<CameraState>>,
    yaw_axis: SharedAxis,
    pitch_axis: SharedAxis,
}

impl SimThermalCamera {
    pub fn new(
        cfg: SimCameraConfig,
        yaw_axis: SharedAxis,
        pitch_axis: SharedAxis,
        target_yaw_deg: f32,
        target_pitch_deg: f32,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(CameraState {
                rng: StdRng::seed_from_u64(cfg.seed),
                cfg,
                target_yaw_deg,
                target_pitch_deg,
                captures: 0,
            })),
            yaw_axis,
            pitch_axis,
        }
    }

    /// Move the simulated hot source.
    pub fn set_target(&self, yaw_deg: f32, pitch_deg: f32) {
        let mut state = self.inner.borrow_mut();
        state.target_yaw_deg = yaw_deg;
        state.target_pitch_deg = pitch_deg;
    }

    /// Frames captured so far.
    pub fn captures(&self) -> u32 {
        self.inner.borrow().captures
    }
}

impl ThermalCamera for SimThermalCamera {
    fn capture_frame(&mut self) -> Result<ThermalFrame, CameraError> {
        let mut state = self.inner.borrow_mut();
        if state.cfg.readiness_delay_ms > 0 {
            // Subframe readiness poll; stalls every task, as on hardware.
            thread::sleep(Duration::from_millis(state.cfg.readiness_delay_ms));
        }

        let aim_yaw = self.yaw_axis.borrow().angle_deg();
        let aim_pitch = self.pitch_axis.borrow().angle_deg();
        let px = state.cfg.pixel_pitch_deg;

        // Inverse of the control side's pixel_offsets: place the hot cell
        // so the computed correction points at the target. A target
        // outside the field of view pins to the frame edge, which still
        // drives the aim the right way.
        let col = (FRAME_WIDTH as f32 / 2.0 - 1.0
            + (state.target_yaw_deg - aim_yaw) / px)
            .round() as i32;
        let row = (FRAME_HEIGHT as f32 / 2.0 - (state.target_pitch_deg - aim_pitch) / px)
            .round() as i32;
        let col = col.clamp(0, FRAME_WIDTH as i32 - 1) as usize;
        let row = row.clamp(0, FRAME_HEIGHT as i32 - 1) as usize;

        let SimCameraConfig {
            ambient_value,
            noise_counts,
            hot_value,
            ..
        } = state.cfg;

        let mut frame = ThermalFrame::new();
        for r in 0..FRAME_HEIGHT {
            for c in 0..FRAME_WIDTH {
                let ambient = if noise_counts > 0 {
                    ambient_value + state.rng.gen_range(0..=noise_counts)
                } else {
                    ambient_value
                };
                frame.set_pixel(r, c, ambient);
            }
        }
        frame.set_pixel(row, col, hot_value);

        state.captures += 1;
        Ok(frame)
    }
}
