use turret_core::scheduler::TaskError;

/// Errors that can occur while running the simulated rig.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A task step hit a (simulated) collaborator fault. Fatal: the rig
    /// does not retry or degrade.
    #[error("task step failed: {0}")]
    Task(#[from] TaskError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
