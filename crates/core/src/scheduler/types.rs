//! Core types for the cooperative scheduler.
//!
//! - Task registration data (name, priority, optional period)
//! - The resumable task body trait and its step outcome
//! - The error type a failing step propagates

use crate::motor::MotorError;
use crate::share::TurretShares;
use crate::thermal::CameraError;
use crate::trigger::TriggerError;

/// Registration data for one task.
///
/// Plain configuration, not behavior: the scheduler reads it, the task
/// body never does.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskConfig {
    /// Human-readable task name for diagnostics.
    pub name: &'static str,
    /// Higher value runs first among eligible tasks (0-255).
    pub priority: u8,
    /// Minimum ticks between runs. `None` means eligible every cycle.
    pub period: Option<u32>,
}

impl TaskConfig {
    /// Task gated to run at most once per `period` ticks.
    pub const fn periodic(name: &'static str, priority: u8, period: u32) -> Self {
        Self {
            name,
            priority,
            period: Some(period),
        }
    }

    /// Task eligible on every dispatch cycle.
    pub const fn continuous(name: &'static str, priority: u8) -> Self {
        Self {
            name,
            priority,
            period: None,
        }
    }
}

/// What a task step asks the scheduler to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOutcome {
    /// Suspend; resume on a later eligible cycle.
    Yield,
    /// Body has terminated; never run this task again.
    Done,
}

/// Collaborator failure escaping a task step.
///
/// None of these are handled by the core: a task error aborts the dispatch
/// cycle and propagates to the process, which terminates. No retry, no
/// degraded mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskError {
    Motor(MotorError),
    Camera(CameraError),
    Trigger(TriggerError),
}

impl core::fmt::Display for TaskError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TaskError::Motor(e) => write!(f, "{e}"),
            TaskError::Camera(e) => write!(f, "{e}"),
            TaskError::Trigger(e) => write!(f, "{e}"),
        }
    }
}

impl core::error::Error for TaskError {}

impl From<MotorError> for TaskError {
    fn from(e: MotorError) -> Self {
        TaskError::Motor(e)
    }
}

impl From<CameraError> for TaskError {
    fn from(e: CameraError) -> Self {
        TaskError::Camera(e)
    }
}

impl From<TriggerError> for TaskError {
    fn from(e: TriggerError) -> Self {
        TaskError::Trigger(e)
    }
}

/// Resumable task body.
///
/// `step` performs one logical unit of work and returns; any state held
/// between suspensions lives in explicit fields on the implementing type.
/// Tasks communicate only through the shared signal bundle passed in.
pub trait Task {
    fn step(&mut self, shares: &TurretShares) -> Result<StepOutcome, TaskError>;
}
