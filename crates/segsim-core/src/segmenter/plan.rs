//! Segment type and time-range planning.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Upper bound on segments per job; beyond this the demo is meaningless.
pub const MAX_SEGMENTS: usize = 10_000;

/// Lifecycle of one segment within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Error,
}

impl SegmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SegmentStatus::Pending => "pending",
            SegmentStatus::Processing => "processing",
            SegmentStatus::Completed => "completed",
            SegmentStatus::Error => "error",
        }
    }

    fn rank(self) -> u8 {
        match self {
            SegmentStatus::Pending => 0,
            SegmentStatus::Processing => 1,
            SegmentStatus::Completed | SegmentStatus::Error => 2,
        }
    }

    /// True if moving from `self` to `next` goes forward (or stays) in the lifecycle.
    /// Any state may move to `Error`; `Completed` and `Error` are terminal.
    pub fn can_move_to(self, next: SegmentStatus) -> bool {
        if next == SegmentStatus::Error {
            return self != SegmentStatus::Completed;
        }
        match self {
            SegmentStatus::Completed | SegmentStatus::Error => false,
            _ => next.rank() >= self.rank(),
        }
    }
}

/// A single segment: time range [start_time, end_time) in seconds (half-open).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// 0-based partition order, unique within a job.
    pub id: usize,
    pub status: SegmentStatus,
    /// Percent complete in [0, 100].
    pub progress: f64,
    /// Start offset in seconds (inclusive).
    pub start_time: f64,
    /// End offset in seconds (exclusive).
    pub end_time: f64,
    /// Simulated processing time in milliseconds, set once completed.
    pub processing_time_ms: Option<f64>,
}

impl Segment {
    pub fn new(id: usize, start_time: f64, end_time: f64) -> Self {
        Self {
            id,
            status: SegmentStatus::Pending,
            progress: 0.0,
            start_time,
            end_time,
            processing_time_ms: None,
        }
    }

    /// Length of this segment in seconds.
    pub fn span(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }

    /// Back to the initial pending state, keeping the time range.
    pub fn reset(&mut self) {
        self.status = SegmentStatus::Pending;
        self.progress = 0.0;
        self.processing_time_ms = None;
    }
}

fn segment_count(duration: f64, segment_length: f64) -> usize {
    let mut n = (duration / segment_length).ceil() as usize;
    // Float division can land just above an integer; drop a trailing empty segment.
    while n > 0 && (n - 1) as f64 * segment_length >= duration {
        n -= 1;
    }
    n
}

/// Builds the segment plan for a video of `duration` seconds cut every `segment_length` seconds.
///
/// Count is ceil(duration / segment_length); the last segment may be shorter.
/// Returns an empty vec if either input is non-positive or non-finite.
pub fn plan_segments(duration: f64, segment_length: f64) -> Vec<Segment> {
    if !duration.is_finite() || !segment_length.is_finite() {
        return Vec::new();
    }
    if duration <= 0.0 || segment_length <= 0.0 {
        return Vec::new();
    }

    let count = segment_count(duration, segment_length);
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let start = i as f64 * segment_length;
        let end = if i + 1 == count {
            duration
        } else {
            ((i + 1) as f64 * segment_length).min(duration)
        };
        out.push(Segment::new(i, start, end));
    }

    out
}

/// Validating entry point: rejects bad input instead of returning an empty plan.
pub fn partition(duration: f64, segment_length: f64) -> Result<Vec<Segment>, EngineError> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(EngineError::InvalidDuration(duration));
    }
    if !segment_length.is_finite() || segment_length <= 0.0 {
        return Err(EngineError::InvalidSegmentLength(segment_length));
    }
    let count = segment_count(duration, segment_length);
    if count > MAX_SEGMENTS {
        return Err(EngineError::TooManySegments {
            count,
            max: MAX_SEGMENTS,
        });
    }
    Ok(plan_segments(duration, segment_length))
}
