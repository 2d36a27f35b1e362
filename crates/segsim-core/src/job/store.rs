//! The job state container.
//!
//! Holds at most one current job. Segment updates are applied by segment id,
//! never by position, since parallel runs interleave updates across segments.
//! Anything addressed to a job id other than the current one is dropped.

use crate::scheduler::{ProcessingMode, SegmentUpdate};
use crate::segmenter::{Segment, SegmentStatus};
use crate::simulator::FilterKind;
use crate::stats::ProcessingStats;

use super::progress::JobProgress;
use super::types::{Job, JobId, JobStatus};

/// What `JobStore::apply` did with an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    /// Update belongs to a reset or replaced job.
    Stale,
    /// Current job has no segment with that id.
    UnknownSegment,
    /// Update would move the segment backward (e.g. a tick after completion).
    Ignored,
}

#[derive(Debug, Default)]
pub struct JobStore {
    last_id: JobId,
    current: Option<Job>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new job (status idle) from a segment plan, superseding any current job.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        duration_secs: f64,
        size_bytes: Option<u64>,
        filter: FilterKind,
        segments: Vec<Segment>,
    ) -> JobId {
        self.last_id += 1;
        let id = self.last_id;
        if let Some(old) = self.current.take() {
            tracing::debug!(old = old.id, new = id, "job superseded");
        }
        self.current = Some(Job {
            id,
            name: name.into(),
            duration_secs,
            size_bytes,
            mode: None,
            filter,
            status: JobStatus::Idle,
            segments,
            stats: None,
            error: None,
        });
        id
    }

    pub fn current(&self) -> Option<&Job> {
        self.current.as_ref()
    }

    pub fn current_id(&self) -> Option<JobId> {
        self.current.as_ref().map(|j| j.id)
    }

    /// Clears the current job. Late updates for it become stale.
    pub fn reset(&mut self) {
        if let Some(job) = self.current.take() {
            tracing::debug!(job_id = job.id, "job reset");
        }
    }

    fn job_mut(&mut self, job_id: JobId) -> Option<&mut Job> {
        self.current.as_mut().filter(|j| j.id == job_id)
    }

    /// Replace-by-id segment update.
    pub fn apply(&mut self, update: &SegmentUpdate) -> UpdateOutcome {
        let Some(job) = self.job_mut(update.job_id) else {
            tracing::trace!(
                job_id = update.job_id,
                segment = update.segment_id,
                "dropping stale segment update"
            );
            return UpdateOutcome::Stale;
        };
        let Some(segment) = job.segments.iter_mut().find(|s| s.id == update.segment_id) else {
            return UpdateOutcome::UnknownSegment;
        };
        if !segment.status.can_move_to(update.status) {
            return UpdateOutcome::Ignored;
        }

        let progress = if update.progress.is_finite() {
            update.progress.clamp(0.0, 100.0)
        } else {
            segment.progress
        };
        match update.status {
            SegmentStatus::Pending => {
                segment.reset();
            }
            SegmentStatus::Processing => {
                segment.progress = if segment.status == SegmentStatus::Pending {
                    progress
                } else {
                    segment.progress.max(progress)
                };
                segment.status = SegmentStatus::Processing;
            }
            SegmentStatus::Completed => {
                segment.status = SegmentStatus::Completed;
                segment.progress = 100.0;
                segment.processing_time_ms = update.processing_time_ms;
            }
            SegmentStatus::Error => {
                segment.status = SegmentStatus::Error;
            }
        }
        UpdateOutcome::Applied
    }

    /// Whole-job status transition. Refuses stale ids and backward moves.
    pub fn set_status(&mut self, job_id: JobId, status: JobStatus) -> bool {
        let Some(job) = self.job_mut(job_id) else {
            return false;
        };
        if !job.status.can_advance_to(status) {
            tracing::debug!(
                job_id,
                from = job.status.as_str(),
                to = status.as_str(),
                "refusing backward job status transition"
            );
            return false;
        }
        job.status = status;
        true
    }

    pub fn set_mode(&mut self, job_id: JobId, mode: ProcessingMode) -> bool {
        match self.job_mut(job_id) {
            Some(job) => {
                job.mode = Some(mode);
                true
            }
            None => false,
        }
    }

    /// Marks the job as failed; no stats survive a failure.
    pub fn fail(&mut self, job_id: JobId, message: impl Into<String>) -> bool {
        let Some(job) = self.job_mut(job_id) else {
            return false;
        };
        if job.status == JobStatus::Completed {
            return false;
        }
        job.status = JobStatus::Error;
        job.error = Some(message.into());
        job.stats = None;
        true
    }

    pub fn attach_stats(&mut self, job_id: JobId, stats: ProcessingStats) -> bool {
        match self.job_mut(job_id) {
            Some(job) => {
                job.stats = Some(stats);
                true
            }
            None => false,
        }
    }

    /// Puts the job back to idle with all segments pending, keeping its plan.
    pub fn rerun(&mut self, job_id: JobId) -> bool {
        let Some(job) = self.job_mut(job_id) else {
            return false;
        };
        job.status = JobStatus::Idle;
        job.mode = None;
        job.stats = None;
        job.error = None;
        for segment in &mut job.segments {
            segment.reset();
        }
        true
    }

    /// Progress snapshot of the current job (`elapsed_secs` left at 0).
    pub fn progress(&self) -> Option<JobProgress> {
        let job = self.current.as_ref()?;
        let segment_count = job.segments.len();
        let segments_done = job
            .segments
            .iter()
            .filter(|s| s.status == SegmentStatus::Completed)
            .count();
        let segments_active = job
            .segments
            .iter()
            .filter(|s| s.status == SegmentStatus::Processing)
            .count();
        let percent = if segment_count == 0 {
            100.0
        } else {
            job.segments.iter().map(|s| s.progress).sum::<f64>() / segment_count as f64
        };
        Some(JobProgress {
            job_id: job.id,
            status: job.status,
            segments_done,
            segments_active,
            segment_count,
            percent,
            elapsed_secs: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmenter::plan_segments;
    use crate::stats::aggregate;

    fn store_with_job() -> (JobStore, JobId) {
        let mut store = JobStore::new();
        let id = store.create(
            "clip.mp4",
            25.0,
            Some(1_048_576),
            FilterKind::None,
            plan_segments(25.0, 10.0),
        );
        (store, id)
    }

    #[test]
    fn create_assigns_increasing_ids() {
        let mut store = JobStore::new();
        let a = store.create("a", 10.0, None, FilterKind::None, plan_segments(10.0, 10.0));
        let b = store.create("b", 10.0, None, FilterKind::Blur, plan_segments(10.0, 10.0));
        assert!(b > a);
        assert_eq!(store.current_id(), Some(b));
        assert_eq!(store.current().unwrap().status, JobStatus::Idle);
    }

    #[test]
    fn updates_apply_by_id_in_any_order() {
        let (mut store, id) = store_with_job();
        assert_eq!(
            store.apply(&SegmentUpdate::processing(id, 2, 0.0)),
            UpdateOutcome::Applied
        );
        assert_eq!(
            store.apply(&SegmentUpdate::processing(id, 0, 0.0)),
            UpdateOutcome::Applied
        );
        store.apply(&SegmentUpdate::processing(id, 2, 45.0));
        store.apply(&SegmentUpdate::completed(id, 0, 812.5));

        let job = store.current().unwrap();
        assert_eq!(job.segment(2).unwrap().progress, 45.0);
        assert_eq!(job.segment(2).unwrap().status, SegmentStatus::Processing);
        let s0 = job.segment(0).unwrap();
        assert_eq!(s0.status, SegmentStatus::Completed);
        assert_eq!(s0.progress, 100.0);
        assert_eq!(s0.processing_time_ms, Some(812.5));
        assert_eq!(job.segment(1).unwrap().status, SegmentStatus::Pending);
    }

    #[test]
    fn progress_never_regresses_while_processing() {
        let (mut store, id) = store_with_job();
        store.apply(&SegmentUpdate::processing(id, 1, 0.0));
        store.apply(&SegmentUpdate::processing(id, 1, 60.0));
        store.apply(&SegmentUpdate::processing(id, 1, 30.0));
        store.apply(&SegmentUpdate::processing(id, 1, 250.0));
        assert_eq!(store.current().unwrap().segment(1).unwrap().progress, 100.0);
    }

    #[test]
    fn late_tick_after_completion_is_ignored() {
        let (mut store, id) = store_with_job();
        store.apply(&SegmentUpdate::completed(id, 0, 800.0));
        assert_eq!(
            store.apply(&SegmentUpdate::processing(id, 0, 95.0)),
            UpdateOutcome::Ignored
        );
        assert_eq!(
            store.current().unwrap().segment(0).unwrap().status,
            SegmentStatus::Completed
        );
    }

    #[test]
    fn unknown_segment_is_reported() {
        let (mut store, id) = store_with_job();
        assert_eq!(
            store.apply(&SegmentUpdate::processing(id, 99, 0.0)),
            UpdateOutcome::UnknownSegment
        );
    }

    #[test]
    fn stale_update_after_reset_does_not_touch_new_job() {
        let (mut store, old) = store_with_job();
        store.apply(&SegmentUpdate::processing(old, 1, 40.0));
        store.reset();
        assert_eq!(
            store.apply(&SegmentUpdate::processing(old, 1, 50.0)),
            UpdateOutcome::Stale
        );

        let new = store.create("next.mp4", 25.0, None, FilterKind::None, plan_segments(25.0, 10.0));
        assert_ne!(new, old);
        assert_eq!(
            store.apply(&SegmentUpdate::completed(old, 1, 900.0)),
            UpdateOutcome::Stale
        );
        let s1 = store.current().unwrap().segment(1).unwrap().clone();
        assert_eq!(s1.status, SegmentStatus::Pending);
        assert_eq!(s1.progress, 0.0);
        assert!(s1.processing_time_ms.is_none());
    }

    #[test]
    fn status_transitions_and_stale_ids() {
        let (mut store, id) = store_with_job();
        assert!(store.set_status(id, JobStatus::Splitting));
        assert!(store.set_status(id, JobStatus::Processing));
        assert!(!store.set_status(id, JobStatus::Splitting));
        assert!(!store.set_status(id + 1, JobStatus::Merging));
        assert!(store.set_status(id, JobStatus::Merging));
        assert!(store.set_status(id, JobStatus::Completed));
        assert!(!store.fail(id, "too late"));
    }

    #[test]
    fn fail_drops_stats() {
        let (mut store, id) = store_with_job();
        assert!(store.attach_stats(id, aggregate(&[1.0], ProcessingMode::Parallel, 400.0, 1)));
        assert!(store.fail(id, "timer unavailable"));
        let job = store.current().unwrap();
        assert_eq!(job.status, JobStatus::Error);
        assert!(job.stats.is_none());
        assert_eq!(job.error.as_deref(), Some("timer unavailable"));
    }

    #[test]
    fn rerun_resets_segments() {
        let (mut store, id) = store_with_job();
        store.set_mode(id, ProcessingMode::Sequential);
        store.apply(&SegmentUpdate::completed(id, 0, 800.0));
        store.set_status(id, JobStatus::Completed);
        assert!(store.rerun(id));
        let job = store.current().unwrap();
        assert_eq!(job.status, JobStatus::Idle);
        assert!(job.mode.is_none());
        assert!(job
            .segments
            .iter()
            .all(|s| s.status == SegmentStatus::Pending && s.progress == 0.0));
    }

    #[test]
    fn progress_snapshot() {
        let (mut store, id) = store_with_job();
        store.apply(&SegmentUpdate::completed(id, 0, 800.0));
        store.apply(&SegmentUpdate::processing(id, 1, 50.0));
        let p = store.progress().unwrap();
        assert_eq!(p.segments_done, 1);
        assert_eq!(p.segments_active, 1);
        assert_eq!(p.segment_count, 3);
        assert_eq!(p.percent, 50.0);
        assert!(!p.is_done());

        store.reset();
        assert!(store.progress().is_none());
    }
}
