//! Job record and lifecycle status.

use serde::{Deserialize, Serialize};

use crate::scheduler::ProcessingMode;
use crate::segmenter::Segment;
use crate::simulator::FilterKind;
use crate::stats::ProcessingStats;

/// Job identifier, unique within one store; never reused.
pub type JobId = u64;

/// Overall job status. Advances in declaration order; `Error` is reachable
/// from any non-terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Idle,
    Converting,
    Splitting,
    Processing,
    Merging,
    Completed,
    Error,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Idle => "idle",
            JobStatus::Converting => "converting",
            JobStatus::Splitting => "splitting",
            JobStatus::Processing => "processing",
            JobStatus::Merging => "merging",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        }
    }

    fn rank(self) -> u8 {
        match self {
            JobStatus::Idle => 0,
            JobStatus::Converting => 1,
            JobStatus::Splitting => 2,
            JobStatus::Processing => 3,
            JobStatus::Merging => 4,
            JobStatus::Completed | JobStatus::Error => 5,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }

    /// True if `next` is the same status or later in the lifecycle.
    pub fn can_advance_to(self, next: JobStatus) -> bool {
        if self.is_terminal() {
            return self == next;
        }
        next == JobStatus::Error || next.rank() >= self.rank()
    }
}

/// One upload-to-completion lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    /// Display name of the source (e.g. the selected file name).
    pub name: String,
    pub duration_secs: f64,
    pub size_bytes: Option<u64>,
    /// Policy of the current or last run; None until a run starts.
    pub mode: Option<ProcessingMode>,
    pub filter: FilterKind,
    pub status: JobStatus,
    pub segments: Vec<Segment>,
    pub stats: Option<ProcessingStats>,
    pub error: Option<String>,
}

impl Job {
    pub fn segment(&self, id: usize) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }
}
