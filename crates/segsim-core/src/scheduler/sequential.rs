//! Sequential policy: strict serial barrier between segments.

use crate::error::EngineError;
use crate::job::JobId;
use crate::segmenter::Segment;
use crate::simulator::Simulator;

use super::update::{process_segment, UpdateSender};

/// Processes segments one after another in id order; segment i+1 starts only
/// after segment i has completed. Returns per-segment times (ms) in id order.
/// Stops at the first failure.
pub async fn run_sequential(
    sim: &Simulator,
    job_id: JobId,
    segments: &[Segment],
    cost_modifier: f64,
    updates: &UpdateSender,
) -> Result<Vec<f64>, EngineError> {
    let mut ordered: Vec<&Segment> = segments.iter().collect();
    ordered.sort_by_key(|s| s.id);

    let mut times = Vec::with_capacity(ordered.len());
    for segment in ordered {
        let ms = process_segment(sim, job_id, segment, cost_modifier, updates).await?;
        times.push(ms);
    }
    Ok(times)
}
