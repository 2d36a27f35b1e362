//! Segment update events and the per-segment processing sequence both policies share.

use tokio::sync::mpsc;

use crate::error::EngineError;
use crate::job::JobId;
use crate::segmenter::{Segment, SegmentStatus};
use crate::simulator::Simulator;

/// One state change of one segment, tagged with the job it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentUpdate {
    pub job_id: JobId,
    pub segment_id: usize,
    pub status: SegmentStatus,
    pub progress: f64,
    pub processing_time_ms: Option<f64>,
}

impl SegmentUpdate {
    pub fn processing(job_id: JobId, segment_id: usize, progress: f64) -> Self {
        Self {
            job_id,
            segment_id,
            status: SegmentStatus::Processing,
            progress,
            processing_time_ms: None,
        }
    }

    pub fn completed(job_id: JobId, segment_id: usize, processing_time_ms: f64) -> Self {
        Self {
            job_id,
            segment_id,
            status: SegmentStatus::Completed,
            progress: 100.0,
            processing_time_ms: Some(processing_time_ms),
        }
    }

    pub fn failed(job_id: JobId, segment_id: usize) -> Self {
        Self {
            job_id,
            segment_id,
            status: SegmentStatus::Error,
            progress: 0.0,
            processing_time_ms: None,
        }
    }
}

/// Sink for segment updates. Unbounded: every update must reach the job store.
pub type UpdateSender = mpsc::UnboundedSender<SegmentUpdate>;

/// Sends `update`; a closed receiver means the job is gone and is not an error.
pub(crate) fn emit(tx: &UpdateSender, update: SegmentUpdate) {
    if tx.send(update).is_err() {
        tracing::trace!("segment update dropped: receiver closed");
    }
}

/// pending → processing(0) → ticks → completed. Returns the elapsed time in ms.
pub(crate) async fn process_segment(
    sim: &Simulator,
    job_id: JobId,
    segment: &Segment,
    cost_modifier: f64,
    tx: &UpdateSender,
) -> Result<f64, EngineError> {
    emit(tx, SegmentUpdate::processing(job_id, segment.id, 0.0));

    let result = sim
        .simulate(segment, cost_modifier, |percent| {
            emit(tx, SegmentUpdate::processing(job_id, segment.id, percent));
        })
        .await;

    match result {
        Ok(elapsed) => {
            let ms = elapsed.as_secs_f64() * 1000.0;
            emit(tx, SegmentUpdate::completed(job_id, segment.id, ms));
            tracing::trace!(job_id, segment = segment.id, ms, "segment completed");
            Ok(ms)
        }
        Err(e) => {
            emit(tx, SegmentUpdate::failed(job_id, segment.id));
            Err(e.into())
        }
    }
}
