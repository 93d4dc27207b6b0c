//! Tuned configuration.
//!
//! Every empirically tuned constant of the rig lives here as a named,
//! overridable field: the mechanical gear ratios, the proportional gain,
//! the imager's per-pixel angular increment and the acquisition windows.
//! They were tuned on the bench, not derived; treat them as data.

use crate::scheduler::TaskConfig;

/// Angle/tick conversion for one axis.
///
/// `ticks = degrees * counts_per_rev / 360 * gear_ratio`.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisGeometry {
    /// Encoder counts per motor revolution.
    pub counts_per_rev: f32,
    /// Motor revolutions per turret revolution.
    pub gear_ratio: f32,
}

impl AxisGeometry {
    pub const fn new(counts_per_rev: f32, gear_ratio: f32) -> Self {
        Self {
            counts_per_rev,
            gear_ratio,
        }
    }

    /// Turret degrees to encoder ticks.
    pub fn ticks_from_degrees(&self, degrees: f32) -> f32 {
        degrees * self.counts_per_rev / 360.0 * self.gear_ratio
    }

    /// Encoder ticks to turret degrees.
    pub fn degrees_from_ticks(&self, ticks: f32) -> f32 {
        ticks * 360.0 / self.counts_per_rev / self.gear_ratio
    }
}

/// One axis-control task's configuration.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisConfig {
    pub geometry: AxisGeometry,
    /// Proportional gain, duty percent per tick of error.
    pub gain: f32,
}

impl AxisConfig {
    /// Yaw axis as built: 16384-count encoder through a 5.8:1 ring gear.
    pub const fn yaw() -> Self {
        Self {
            geometry: AxisGeometry::new(16_384.0, 5.8),
            gain: 0.1,
        }
    }

    /// Pitch axis as built: same encoder through a 4.2:1 gear.
    pub const fn pitch() -> Self {
        Self {
            geometry: AxisGeometry::new(16_384.0, 4.2),
            gain: 0.1,
        }
    }
}

/// Target acquisition tuning.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AcquisitionConfig {
    /// Both axes must sit within this band of the desired position for a
    /// cycle to count as settled.
    pub settle_tolerance_deg: f32,
    /// Consecutive settled cycles required before capturing a frame.
    pub settle_cycles: u32,
    /// Detected offsets inside this window (both axes) mean on target.
    pub accept_window_deg: f32,
    /// Angular increment per imager pixel. Bench-tuned.
    pub pixel_pitch_deg: f32,
    /// Yaw travel limits of the mount.
    pub yaw_min_deg: f32,
    pub yaw_max_deg: f32,
    /// Pitch travel limits of the mount.
    pub pitch_min_deg: f32,
    pub pitch_max_deg: f32,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            settle_tolerance_deg: 2.0,
            settle_cycles: 10,
            accept_window_deg: 10.0,
            pixel_pitch_deg: 1.2566,
            yaw_min_deg: 90.0,
            yaw_max_deg: 270.0,
            pitch_min_deg: -5.0,
            pitch_max_deg: 15.0,
        }
    }
}

impl AcquisitionConfig {
    /// Tighter acceptance window for short-range shots.
    pub fn strict() -> Self {
        Self {
            accept_window_deg: 5.0,
            ..Self::default()
        }
    }
}

/// Startup values the init task seeds into the shares.
///
/// `button_pushed` seeds true: the button line idles high and the
/// interrupt fires on the falling edge.
pub const DEFAULT_DESIRED_YAW_DEG: f32 = 180.0;
pub const DEFAULT_DESIRED_PITCH_DEG: f32 = 0.0;

/// Task table of the rig, in registration order.
///
/// Periods are scheduler ticks (milliseconds on the bench rig).
pub const INIT_TASK: TaskConfig = TaskConfig::continuous("init", 100);
pub const YAW_TASK: TaskConfig = TaskConfig::periodic("yaw", 11, 10);
pub const ACQUIRE_TASK: TaskConfig = TaskConfig::periodic("acquire", 9, 100);
pub const PITCH_TASK: TaskConfig = TaskConfig::periodic("pitch", 10, 10);
pub const FIRE_TASK: TaskConfig = TaskConfig::periodic("fire", 12, 50);
