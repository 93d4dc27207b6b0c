//! turret_sitl - Software-in-the-loop bench for the turret controller.
//!
//! Runs the unmodified `turret_core` runtime against simulated hardware:
//! first-order motor/encoder physics per axis, a synthesized thermal
//! frame derived from the geometric offset between the current aim and a
//! configured hot target, and a firing actuator with the real (blocking)
//! dwell. Deterministic when seeded, so the closed loop is testable in CI.

pub mod error;
pub mod platform;
pub mod rig;

pub use error::SimError;
pub use platform::axis::{SimAxis, SimAxisConfig, SharedAxis};
pub use platform::button::spawn_button_listener;
pub use platform::camera::{SimCameraConfig, SimThermalCamera};
pub use platform::encoder::SimEncoder;
pub use platform::motor::SimMotor;
pub use platform::trigger::{SimTrigger, SimTriggerConfig};
pub use rig::{RigConfig, RigStatus, TurretRig};
