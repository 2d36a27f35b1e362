//! Orchestration: owns the job store and walks a job through its lifecycle.
//!
//! idle → converting → splitting → processing → merging → completed, or error.
//! The scheduling policy runs on a fresh copy of the segments and reports
//! through an update channel; a background task applies those updates to
//! the store. Core count is resolved here and nowhere else.

mod drain;
mod guard;

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::time::Instant;

use crate::config::SegsimConfig;
use crate::error::EngineError;
use crate::job::{Job, JobId, JobProgress, JobStatus, JobStore};
use crate::scheduler::{self, ProcessingMode};
use crate::segmenter;
use crate::simulator::{FilterKind, Simulator};
use crate::stats::{self, ProcessingStats};

use self::drain::run_update_loop;
use self::guard::RunGuard;

/// Core count from config, else the platform, else 1.
fn resolve_cpu_cores(cfg: &SegsimConfig) -> usize {
    cfg.cpu_cores.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    })
}

pub struct Engine {
    cfg: SegsimConfig,
    sim: Arc<Simulator>,
    cpu_cores: usize,
    store: Arc<Mutex<JobStore>>,
}

impl Engine {
    /// Engine with random per-segment jitter.
    pub fn new(cfg: SegsimConfig) -> Result<Self, EngineError> {
        let sim = Simulator::new(&cfg);
        Self::with_simulator(cfg, sim)
    }

    pub fn with_simulator(cfg: SegsimConfig, sim: Simulator) -> Result<Self, EngineError> {
        cfg.validate()?;
        let cpu_cores = resolve_cpu_cores(&cfg);
        tracing::debug!(cpu_cores, "engine initialized");
        Ok(Self {
            cfg,
            sim: Arc::new(sim),
            cpu_cores,
            store: Arc::new(Mutex::new(JobStore::new())),
        })
    }

    pub fn config(&self) -> &SegsimConfig {
        &self.cfg
    }

    pub fn cpu_cores(&self) -> usize {
        self.cpu_cores
    }

    /// Shared handle to the job store, for presentation code that polls state.
    pub fn store(&self) -> Arc<Mutex<JobStore>> {
        Arc::clone(&self.store)
    }

    /// Validates the duration, partitions it and makes it the current job (idle).
    pub async fn load(
        &self,
        name: &str,
        duration_secs: f64,
        size_bytes: Option<u64>,
        filter: FilterKind,
    ) -> Result<JobId, EngineError> {
        let segments = segmenter::partition(duration_secs, self.cfg.segment_length_secs)?;
        let count = segments.len();
        let job_id = self
            .store
            .lock()
            .await
            .create(name, duration_secs, size_bytes, filter, segments);
        tracing::debug!(job_id, name, duration_secs, segments = count, %filter, "job loaded");
        Ok(job_id)
    }

    /// Drops the current job; in-flight updates for it are ignored from now on.
    pub async fn reset(&self) {
        self.store.lock().await.reset();
    }

    pub async fn snapshot(&self) -> Option<Job> {
        self.store.lock().await.current().cloned()
    }

    pub async fn progress(&self) -> Option<JobProgress> {
        self.store.lock().await.progress()
    }

    async fn advance(&self, job_id: JobId, status: JobStatus) -> bool {
        let ok = self.store.lock().await.set_status(job_id, status);
        if ok {
            tracing::debug!(job_id, status = status.as_str(), "job status");
        }
        ok
    }

    /// Runs the current job with `mode` and returns its stats.
    ///
    /// A job that already finished (or failed) is re-run from pending.
    /// Progress snapshots go to `progress_tx` if given (lossy). If the job is
    /// reset or replaced during the run, the stats are returned but not attached.
    /// Dropping the returned future before it resolves marks the job as failed.
    pub async fn run(
        &self,
        mode: ProcessingMode,
        progress_tx: Option<mpsc::Sender<JobProgress>>,
    ) -> Result<ProcessingStats, EngineError> {
        let (job_id, segments, cost_modifier) = {
            let mut store = self.store.lock().await;
            let job = store.current().ok_or(EngineError::NoJob)?;
            let (job_id, status) = (job.id, job.status);
            match status {
                JobStatus::Idle => {}
                JobStatus::Completed | JobStatus::Error => {
                    store.rerun(job_id);
                }
                _ => return Err(EngineError::JobBusy(job_id)),
            }
            store.set_mode(job_id, mode);
            let job = store.current().ok_or(EngineError::NoJob)?;
            (job_id, job.segments.clone(), job.filter.cost_modifier())
        };

        let mut guard = RunGuard::new(Arc::clone(&self.store), job_id);

        // The source is only known by its duration: conversion and splitting
        // are bookkeeping steps here.
        self.advance(job_id, JobStatus::Converting).await;
        self.advance(job_id, JobStatus::Splitting).await;

        let run_start = Instant::now();
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let drain_handle = tokio::spawn(run_update_loop(
            updates_rx,
            Arc::clone(&self.store),
            progress_tx,
            run_start,
        ));
        guard.watch_drain(drain_handle.abort_handle());

        self.advance(job_id, JobStatus::Processing).await;
        let result = scheduler::run_policy(
            mode,
            Arc::clone(&self.sim),
            &self.cfg,
            job_id,
            &segments,
            cost_modifier,
            &updates_tx,
        )
        .await;
        drop(updates_tx);

        match drain_handle.await {
            Ok(summary) => tracing::debug!(
                job_id,
                applied = summary.applied,
                stale = summary.stale,
                rejected = summary.rejected,
                "segment updates drained"
            ),
            Err(e) => tracing::warn!(job_id, "update loop join: {}", e),
        }

        let times = match result {
            Ok(times) => times,
            Err(e) => {
                self.store.lock().await.fail(job_id, e.to_string());
                guard.disarm();
                tracing::warn!(job_id, %mode, "run failed: {}", e);
                return Err(e);
            }
        };

        self.advance(job_id, JobStatus::Merging).await;
        let stats = stats::aggregate(&times, mode, self.cfg.merge_overhead(), self.cpu_cores);

        let mut store = self.store.lock().await;
        guard.disarm();
        if store.attach_stats(job_id, stats.clone()) {
            store.set_status(job_id, JobStatus::Completed);
            tracing::info!(
                job_id,
                %mode,
                total_ms = stats.total_time,
                speedup = stats.speedup_factor,
                wall_ms = run_start.elapsed().as_secs_f64() * 1000.0,
                "run completed"
            );
        } else {
            tracing::warn!(job_id, "job was reset during the run; stats not attached");
        }
        Ok(stats)
    }
}
