//! In-memory job state: identity, segments with live status, and final stats.

mod progress;
mod store;
mod types;

pub use progress::JobProgress;
pub use store::{JobStore, UpdateOutcome};
pub use types::{Job, JobId, JobStatus};
