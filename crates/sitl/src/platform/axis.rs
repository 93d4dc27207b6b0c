//! First-order axis physics.
//!
//! One [`SimAxis`] models a geared motor stage: the applied duty cycle
//! maps linearly to angular rate, the angle integrates over time, and the
//! quadrature counter is derived from the angle modulo the 16-bit
//! hardware range (so wraparound happens exactly where it would on the
//! bench). The sim motor and encoder share one axis via [`SharedAxis`].

use std::cell::RefCell;
use std::rc::Rc;

use turret_core::config::{AxisConfig, AxisGeometry};
use turret_core::encoder::COUNTER_RANGE;
use turret_core::motor::clamp_duty;

/// Configuration for one simulated axis.
#[derive(Debug, Clone, Copy)]
pub struct SimAxisConfig {
    /// Angle/tick conversion, shared with the control side.
    pub geometry: AxisGeometry,
    /// Angular rate per percent of duty, degrees per second.
    ///
    /// 0.35 keeps the 0.1-gain position loop discretely stable at the
    /// 10 ms axis period while still slewing 35 deg/s at full duty.
    pub deg_per_s_per_duty: f32,
    /// Shaft angle at power-on, degrees.
    pub initial_deg: f32,
}

impl SimAxisConfig {
    pub fn yaw() -> Self {
        Self {
            geometry: AxisConfig::yaw().geometry,
            deg_per_s_per_duty: 0.35,
            initial_deg: 0.0,
        }
    }

    pub fn pitch() -> Self {
        Self {
            geometry: AxisConfig::pitch().geometry,
            deg_per_s_per_duty: 0.35,
            initial_deg: 0.0,
        }
    }
}

/// One simulated motor stage.
#[derive(Debug)]
pub struct SimAxis {
    cfg: SimAxisConfig,
    angle_deg: f32,
    duty: f32,
}

impl SimAxis {
    pub fn new(cfg: SimAxisConfig) -> Self {
        Self {
            angle_deg: cfg.initial_deg,
            duty: 0.0,
            cfg,
        }
    }

    /// Apply a duty cycle; clamps like the real driver.
    pub fn set_duty(&mut self, percent: f32) {
        self.duty = clamp_duty(percent);
    }

    pub fn duty(&self) -> f32 {
        self.duty
    }

    /// Advance the physics by `dt_s` seconds at the applied duty.
    pub fn integrate(&mut self, dt_s: f32) {
        self.angle_deg += self.duty * self.cfg.deg_per_s_per_duty * dt_s;
    }

    /// Current shaft angle in degrees.
    pub fn angle_deg(&self) -> f32 {
        self.angle_deg
    }

    /// Free-running quadrature counter reading.
    pub fn counter(&self) -> u16 {
        let ticks = self.cfg.geometry.ticks_from_degrees(self.angle_deg).round() as i64;
        ticks.rem_euclid(COUNTER_RANGE as i64) as u16
    }
}

/// Handle shared between the sim motor, the sim encoder and the rig.
pub type SharedAxis = Rc<RefCell<SimAxis>>;

/// Build a shareable axis.
pub fn shared(cfg: SimAxisConfig) -> SharedAxis {
    Rc::new(RefCell::new(SimAxis::new(cfg)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duty_drives_angle_at_configured_rate() {
        let mut axis = SimAxis::new(SimAxisConfig::yaw());
        axis.set_duty(100.0);
        // One second at full duty.
        for _ in 0..1000 {
            axis.integrate(0.001);
        }
        assert!((axis.angle_deg() - 35.0).abs() < 0.1);
    }

    #[test]
    fn duty_is_clamped_like_the_real_driver() {
        let mut axis = SimAxis::new(SimAxisConfig::yaw());
        axis.set_duty(500.0);
        assert_eq!(axis.duty(), 100.0);
        axis.set_duty(f32::NAN);
        assert_eq!(axis.duty(), 0.0);
    }

    #[test]
    fn counter_tracks_geometry() {
        let mut axis = SimAxis::new(SimAxisConfig::pitch());
        axis.set_duty(100.0);
        for _ in 0..100 {
            axis.integrate(0.001);
        }
        let expected = AxisConfig::pitch()
            .geometry
            .ticks_from_degrees(axis.angle_deg())
            .round() as i64;
        assert_eq!(axis.counter() as i64, expected.rem_euclid(65_536));
    }

    #[test]
    fn counter_wraps_at_sixteen_bits() {
        // Yaw reaches 65536 ticks at about 248 degrees, so a large swing
        // must wrap the counter.
        let mut axis = SimAxis::new(SimAxisConfig {
            initial_deg: 247.0,
            ..SimAxisConfig::yaw()
        });
        let before = axis.counter();
        axis.set_duty(100.0);
        // 100 ms at 35 deg/s pushes the angle past the 248.3 degree wrap
        // point of the yaw gearing.
        for _ in 0..100 {
            axis.integrate(0.001);
        }
        let after = axis.counter();
        // Angle advanced but the raw counter wrapped back below.
        assert!(axis.angle_deg() > 248.5);
        assert!(after < before);
    }

    #[test]
    fn negative_angles_read_back_modulo_range() {
        let mut axis = SimAxis::new(SimAxisConfig::yaw());
        axis.set_duty(-100.0);
        for _ in 0..1000 {
            axis.integrate(0.001);
        }
        assert!(axis.angle_deg() < 0.0);
        // Counter stays in u16 range, near the top.
        assert!(axis.counter() > 32_768);
    }
}
