//! Inter-task shared variables.
//!
//! A [`Share`] is a named single-slot mailbox: `put` overwrites the stored
//! value, `get` returns the most recently completed `put`. There is no
//! queuing and no history. Under the cooperative scheduler all accesses
//! happen between suspension points, but put/get run inside a critical
//! section so the no-torn-value contract also holds if a port introduces
//! real threads or interrupt-context writers (the button line does exactly
//! that on hardware).
//!
//! [`TurretShares`] bundles every signal the tasks exchange into one named
//! struct that is passed by reference to each task.

use core::cell::Cell;

use critical_section::Mutex;

/// One independently controlled rotational degree of freedom.
///
/// Keys the per-axis signals in [`TurretShares`] so the yaw and pitch
/// control tasks share a single code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    Yaw,
    Pitch,
}

/// Single-slot, atomically updated shared variable.
///
/// Holds exactly one value of a `Copy` type. Reads return the
/// type-appropriate zero value (`T::default()`) until the first write.
pub struct Share<T: Copy> {
    name: &'static str,
    value: Mutex<Cell<T>>,
}

impl<T: Copy + Default> Share<T> {
    /// Create a share holding `T::default()`.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            value: Mutex::new(Cell::new(T::default())),
        }
    }
}

impl<T: Copy> Share<T> {
    /// Overwrite the stored value.
    pub fn put(&self, value: T) {
        critical_section::with(|cs| self.value.borrow(cs).set(value));
    }

    /// Read the most recently stored value.
    pub fn get(&self) -> T {
        critical_section::with(|cs| self.value.borrow(cs).get())
    }

    /// Name used for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Every signal the turret tasks exchange, one [`Share`] per field.
///
/// Each field has exactly one writer task per control cycle (by
/// convention) and any number of readers:
///
/// | field           | writer              |
/// |-----------------|---------------------|
/// | `button_pushed` | button event source |
/// | `yaw_pos/vel`   | yaw axis task       |
/// | `pitch_pos/vel` | pitch axis task     |
/// | `desired_yaw`   | acquisition task    |
/// | `desired_pitch` | acquisition task    |
/// | `on_target`     | acquisition (set) / fire (clear) |
/// | `fired`         | fire task           |
pub struct TurretShares {
    pub button_pushed: Share<bool>,
    pub yaw_pos: Share<f32>,
    pub yaw_vel: Share<f32>,
    pub pitch_pos: Share<f32>,
    pub pitch_vel: Share<f32>,
    pub desired_yaw: Share<f32>,
    pub desired_pitch: Share<f32>,
    pub on_target: Share<bool>,
    pub fired: Share<bool>,
}

impl TurretShares {
    pub fn new() -> Self {
        Self {
            button_pushed: Share::new("button_pushed"),
            yaw_pos: Share::new("yaw_pos"),
            yaw_vel: Share::new("yaw_vel"),
            pitch_pos: Share::new("pitch_pos"),
            pitch_vel: Share::new("pitch_vel"),
            desired_yaw: Share::new("desired_yaw"),
            desired_pitch: Share::new("desired_pitch"),
            on_target: Share::new("on_target"),
            fired: Share::new("fired"),
        }
    }

    /// Measured angle of `axis` in degrees.
    pub fn measured(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Yaw => self.yaw_pos.get(),
            Axis::Pitch => self.pitch_pos.get(),
        }
    }

    /// Publish the measured angle of `axis` in degrees.
    pub fn set_measured(&self, axis: Axis, degrees: f32) {
        match axis {
            Axis::Yaw => self.yaw_pos.put(degrees),
            Axis::Pitch => self.pitch_pos.put(degrees),
        }
    }

    /// Commanded angle for `axis` in degrees.
    pub fn desired(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Yaw => self.desired_yaw.get(),
            Axis::Pitch => self.desired_pitch.get(),
        }
    }

    /// Publish the commanded angle for `axis` in degrees.
    pub fn set_desired(&self, axis: Axis, degrees: f32) {
        match axis {
            Axis::Yaw => self.desired_yaw.put(degrees),
            Axis::Pitch => self.desired_pitch.put(degrees),
        }
    }

    /// Publish the per-cycle velocity of `axis` in degrees.
    pub fn set_velocity(&self, axis: Axis, degrees_per_cycle: f32) {
        match axis {
            Axis::Yaw => self.yaw_vel.put(degrees_per_cycle),
            Axis::Pitch => self.pitch_vel.put(degrees_per_cycle),
        }
    }
}

impl Default for TurretShares {
    fn default() -> Self {
        Self::new()
    }
}
