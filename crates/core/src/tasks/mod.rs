//! Task bodies.
//!
//! Each task is a struct implementing [`crate::scheduler::Task`]: state
//! held between suspensions lives in explicit fields, and one `step` call
//! performs one unit of work. Registration data (priority, period) stays
//! with the scheduler; see [`crate::config`] for the rig task table.
//!
//! - [`init`]: seeds the shares, then goes permanently inactive
//! - [`axis`]: closed-loop position control, one instance per axis
//! - [`acquire`]: settles, images, and walks the aim onto the hotspot
//! - [`fire`]: pulses the actuator once whenever the aim is on target

pub mod acquire;
pub mod axis;
pub mod fire;
pub mod init;

pub use acquire::{AcquireState, TargetAcquisitionTask};
pub use axis::{AxisState, AxisTask};
pub use fire::FireTask;
pub use init::InitTask;
