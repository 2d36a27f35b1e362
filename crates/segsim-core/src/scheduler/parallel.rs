//! Parallel policy: fan out one task per segment, join on all of them.
//!
//! Every segment waits `stagger × id` before starting, then runs independently.
//! Tasks are interleaved on the current runtime; on a current-thread runtime
//! this is cooperative concurrency, not multi-core work.

use std::sync::Arc;
use std::time::Duration;

use crate::error::EngineError;
use crate::job::JobId;
use crate::segmenter::Segment;
use crate::simulator::{ensure_timer, Simulator};

use super::update::{process_segment, UpdateSender};

fn stagger_for(stagger: Duration, segment_id: usize) -> Duration {
    stagger.saturating_mul(u32::try_from(segment_id).unwrap_or(u32::MAX))
}

/// Runs all segments concurrently and returns per-segment times (ms) in id
/// order, regardless of completion order. The first failure aborts the
/// remaining tasks and is returned.
pub async fn run_parallel(
    sim: Arc<Simulator>,
    job_id: JobId,
    segments: &[Segment],
    cost_modifier: f64,
    stagger: Duration,
    updates: &UpdateSender,
) -> Result<Vec<f64>, EngineError> {
    ensure_timer()?;

    let mut ordered = segments.to_vec();
    ordered.sort_by_key(|s| s.id);

    let mut times = vec![0.0; ordered.len()];
    let mut join_set = tokio::task::JoinSet::new();

    for (slot, segment) in ordered.into_iter().enumerate() {
        let sim = Arc::clone(&sim);
        let tx = updates.clone();
        let delay = stagger_for(stagger, segment.id);
        join_set.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let ms = process_segment(&sim, job_id, &segment, cost_modifier, &tx).await?;
            Ok::<_, EngineError>((slot, ms))
        });
    }

    while let Some(res) = join_set.join_next().await {
        match res {
            Ok(Ok((slot, ms))) => times[slot] = ms,
            Ok(Err(e)) => {
                join_set.abort_all();
                return Err(e);
            }
            Err(e) => {
                join_set.abort_all();
                return Err(EngineError::TaskJoin(e.to_string()));
            }
        }
    }

    Ok(times)
}
