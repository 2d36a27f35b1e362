//! Engine error types.
//!
//! Validation and simulation failures are returned to the orchestration
//! layer, which marks the job as error. Stale updates are not errors and
//! never show up here.

use thiserror::Error;

/// Failure of the simulated processing step itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// No tokio runtime on the calling thread, so no timer can be scheduled.
    #[error("no timer available: simulation must run inside a tokio runtime")]
    NoRuntime,
}

/// Errors surfaced by the segment scheduling engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Duration was not a positive finite number of seconds.
    #[error("invalid video duration: {0} (must be a positive, finite number of seconds)")]
    InvalidDuration(f64),

    /// Segment length was not a positive finite number of seconds.
    #[error("invalid segment length: {0} (must be a positive, finite number of seconds)")]
    InvalidSegmentLength(f64),

    /// Partition would produce more segments than the engine schedules.
    #[error("too many segments: {count} (max {max}); use a longer segment length")]
    TooManySegments { count: usize, max: usize },

    /// A configuration value would make the engine misbehave.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("simulation failed: {0}")]
    Simulation(#[from] SimulationError),

    /// A parallel segment task panicked or was cancelled.
    #[error("segment task join: {0}")]
    TaskJoin(String),

    /// `run` was called with no job loaded.
    #[error("no job loaded")]
    NoJob,

    /// `run` was called while the job is already running.
    #[error("job {0} is already running")]
    JobBusy(u64),
}
