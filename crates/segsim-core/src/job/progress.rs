//! Progress snapshot of the current job (CLI-friendly).
//!
//! Consumers can compute ETA from `elapsed_secs` and `fraction()`.

use super::types::{JobId, JobStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct JobProgress {
    pub job_id: JobId,
    pub status: JobStatus,
    /// Number of segments completed.
    pub segments_done: usize,
    /// Number of segments currently processing.
    pub segments_active: usize,
    /// Total number of segments.
    pub segment_count: usize,
    /// Mean segment progress in [0, 100].
    pub percent: f64,
    /// Elapsed time since the run started (seconds); 0 when not tracked.
    pub elapsed_secs: f64,
}

impl JobProgress {
    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.segment_count == 0 {
            return 1.0;
        }
        (self.percent / 100.0).clamp(0.0, 1.0)
    }

    pub fn is_done(&self) -> bool {
        self.segments_done == self.segment_count
    }

    /// Estimated seconds remaining (None until some progress has been made).
    pub fn eta_secs(&self) -> Option<f64> {
        let f = self.fraction();
        if f >= 1.0 {
            return Some(0.0);
        }
        if f <= 0.0 || self.elapsed_secs <= 0.0 {
            return None;
        }
        Some(self.elapsed_secs * (1.0 - f) / f)
    }
}
