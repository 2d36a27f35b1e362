//! Segment scheduling policies.
//!
//! Drives the simulator over a job's segments, either strictly one after
//! another or all at once with a staggered start, and streams every segment
//! state change as a [`SegmentUpdate`] to the job store.

mod mode;
mod parallel;
mod sequential;
mod update;

use std::sync::Arc;

use crate::config::SegsimConfig;
use crate::error::EngineError;
use crate::job::JobId;
use crate::segmenter::Segment;
use crate::simulator::Simulator;

pub use mode::ProcessingMode;
pub use parallel::run_parallel;
pub use sequential::run_sequential;
pub use update::{SegmentUpdate, UpdateSender};

/// Runs the policy selected by `mode` and returns per-segment times (ms) in id order.
pub async fn run_policy(
    mode: ProcessingMode,
    sim: Arc<Simulator>,
    cfg: &SegsimConfig,
    job_id: JobId,
    segments: &[Segment],
    cost_modifier: f64,
    updates: &UpdateSender,
) -> Result<Vec<f64>, EngineError> {
    tracing::debug!(
        job_id,
        %mode,
        segment_count = segments.len(),
        cost_modifier,
        "starting scheduling policy"
    );
    match mode {
        ProcessingMode::Sequential => {
            run_sequential(&sim, job_id, segments, cost_modifier, updates).await
        }
        ProcessingMode::Parallel => {
            run_parallel(sim, job_id, segments, cost_modifier, cfg.stagger(), updates).await
        }
    }
}
