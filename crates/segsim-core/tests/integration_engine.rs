//! Integration test: load a job, run it through the engine on a paused clock,
//! and check the job store and the stats end to end.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use segsim_core::config::SegsimConfig;
use segsim_core::job::JobStatus;
use segsim_core::scheduler::ProcessingMode;
use segsim_core::segmenter::SegmentStatus;
use segsim_core::simulator::{FilterKind, FixedJitter, JitterSource, Simulator};
use segsim_core::{Engine, EngineError};
use tokio::sync::mpsc;

fn engine() -> Engine {
    let cfg = SegsimConfig {
        cpu_cores: Some(4),
        ..SegsimConfig::default()
    };
    let sim = Simulator::with_jitter(&cfg, Arc::new(FixedJitter(0.0)));
    Engine::with_simulator(cfg, sim).unwrap()
}

#[tokio::test(start_paused = true)]
async fn parallel_run_completes_and_attaches_stats() {
    let engine = engine();
    let job_id = engine
        .load("clip.mp4", 25.0, Some(3_000_000), FilterKind::None)
        .await
        .unwrap();

    let start = tokio::time::Instant::now();
    let stats = engine.run(ProcessingMode::Parallel, None).await.unwrap();
    let wall = start.elapsed().as_millis();
    assert!((850..=900).contains(&wall), "wall {}ms", wall);

    assert_eq!(stats.segment_count, 3);
    assert_eq!(stats.cpu_cores, 4);
    assert_eq!(stats.mode, ProcessingMode::Parallel);
    assert_eq!(stats.total_time, stats.parallel_time);
    assert!(stats.parallel_time < stats.sequential_time);
    // ~2100 / ~1200
    assert!((1.70..=1.80).contains(&stats.speedup_factor), "{}", stats.speedup_factor);

    let job = engine.snapshot().await.unwrap();
    assert_eq!(job.id, job_id);
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.mode, Some(ProcessingMode::Parallel));
    assert_eq!(job.stats.as_ref(), Some(&stats));
    for (seg, &t) in job.segments.iter().zip(&stats.per_segment_times) {
        assert_eq!(seg.status, SegmentStatus::Completed);
        assert_eq!(seg.progress, 100.0);
        assert_eq!(seg.processing_time_ms, Some(t));
    }
}

#[tokio::test(start_paused = true)]
async fn sequential_run_takes_the_sum() {
    let engine = engine();
    engine
        .load("clip.mp4", 25.0, None, FilterKind::None)
        .await
        .unwrap();

    let start = tokio::time::Instant::now();
    let stats = engine.run(ProcessingMode::Sequential, None).await.unwrap();
    let wall = start.elapsed().as_millis();
    assert!((2100..=2160).contains(&wall), "wall {}ms", wall);

    assert_eq!(stats.total_time, stats.sequential_time);
    let sum: f64 = stats.per_segment_times.iter().sum();
    assert_eq!(stats.sequential_time, sum);
}

#[tokio::test(start_paused = true)]
async fn filter_scales_simulated_cost() {
    let engine = engine();
    engine
        .load("clip.mp4", 10.0, None, FilterKind::Blur)
        .await
        .unwrap();
    let stats = engine.run(ProcessingMode::Sequential, None).await.unwrap();
    let t = stats.per_segment_times[0];
    assert!((1200.0..=1220.0).contains(&t), "{}", t);
}

#[tokio::test(start_paused = true)]
async fn progress_snapshots_reach_completion() {
    let engine = engine();
    engine
        .load("clip.mp4", 40.0, None, FilterKind::None)
        .await
        .unwrap();
    let (tx, mut rx) = mpsc::channel(1024);
    engine.run(ProcessingMode::Parallel, Some(tx)).await.unwrap();

    let mut last = None;
    while let Ok(p) = rx.try_recv() {
        assert_eq!(p.segment_count, 4);
        last = Some(p);
    }
    let last = last.expect("at least one progress snapshot");
    assert!(last.is_done());
    assert_eq!(last.percent, 100.0);
}

#[tokio::test(start_paused = true)]
async fn rerun_in_other_mode_replaces_stats() {
    let engine = engine();
    engine
        .load("clip.mp4", 30.0, None, FilterKind::None)
        .await
        .unwrap();
    let parallel = engine.run(ProcessingMode::Parallel, None).await.unwrap();
    let sequential = engine.run(ProcessingMode::Sequential, None).await.unwrap();

    assert!(parallel.total_time < sequential.total_time);
    let job = engine.snapshot().await.unwrap();
    assert_eq!(job.mode, Some(ProcessingMode::Sequential));
    assert_eq!(job.stats, Some(sequential));
}

#[tokio::test(start_paused = true)]
async fn reset_mid_run_drops_stale_updates() {
    let engine = Arc::new(engine());
    let old_id = engine
        .load("first.mp4", 25.0, None, FilterKind::None)
        .await
        .unwrap();

    let runner = Arc::clone(&engine);
    let handle = tokio::spawn(async move { runner.run(ProcessingMode::Parallel, None).await });

    tokio::time::sleep(Duration::from_millis(300)).await;
    let mid = engine.snapshot().await.unwrap();
    assert_eq!(mid.status, JobStatus::Processing);

    engine.reset().await;
    let new_id = engine
        .load("second.mp4", 25.0, None, FilterKind::None)
        .await
        .unwrap();
    assert_ne!(new_id, old_id);

    // The old run still finishes; its updates and stats must not land on the new job.
    let stats = handle.await.unwrap().unwrap();
    assert_eq!(stats.segment_count, 3);

    let job = engine.snapshot().await.unwrap();
    assert_eq!(job.id, new_id);
    assert_eq!(job.status, JobStatus::Idle);
    assert!(job.stats.is_none());
    for seg in &job.segments {
        assert_eq!(seg.status, SegmentStatus::Pending);
        assert_eq!(seg.progress, 0.0);
        assert!(seg.processing_time_ms.is_none());
    }
}

#[tokio::test]
async fn invalid_duration_is_rejected() {
    let engine = engine();
    assert!(matches!(
        engine.load("x", 0.0, None, FilterKind::None).await,
        Err(EngineError::InvalidDuration(_))
    ));
    assert!(matches!(
        engine.load("x", f64::NAN, None, FilterKind::None).await,
        Err(EngineError::InvalidDuration(_))
    ));
    assert!(engine.snapshot().await.is_none());
}

#[tokio::test]
async fn run_without_job_fails() {
    let engine = engine();
    assert!(matches!(
        engine.run(ProcessingMode::Parallel, None).await,
        Err(EngineError::NoJob)
    ));
}

#[test]
fn broken_config_is_rejected() {
    let cfg = SegsimConfig {
        progress_steps: 0,
        ..SegsimConfig::default()
    };
    assert!(matches!(
        Engine::new(cfg),
        Err(EngineError::InvalidConfig(_))
    ));
}

/// Panics on the `fail_on`-th sample (1-based), zero jitter otherwise.
#[derive(Debug)]
struct PanickingJitter {
    calls: AtomicUsize,
    fail_on: usize,
}

impl JitterSource for PanickingJitter {
    fn sample_ms(&self, _amplitude_ms: f64) -> f64 {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            panic!("jitter source failed on sample {}", call);
        }
        0.0
    }
}

#[tokio::test(start_paused = true)]
async fn dropped_run_marks_job_failed_and_allows_rerun() {
    let engine = engine();
    engine
        .load("long.mp4", 25.0, None, FilterKind::None)
        .await
        .unwrap();

    let cancelled = tokio::time::timeout(
        Duration::from_millis(300),
        engine.run(ProcessingMode::Parallel, None),
    )
    .await;
    assert!(cancelled.is_err(), "run should not finish within 300ms");

    let job = engine.snapshot().await.unwrap();
    assert_eq!(job.status, JobStatus::Error);
    assert_eq!(job.error.as_deref(), Some("run cancelled"));
    assert!(job.stats.is_none());

    let stats = engine.run(ProcessingMode::Parallel, None).await.unwrap();
    assert_eq!(stats.segment_count, 3);
    let job = engine.snapshot().await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.error.is_none());
    for seg in &job.segments {
        assert_eq!(seg.status, SegmentStatus::Completed);
        assert_eq!(seg.progress, 100.0);
    }
}

#[tokio::test(start_paused = true)]
async fn panicking_segment_fails_job_and_cancels_the_rest() {
    let cfg = SegsimConfig {
        cpu_cores: Some(4),
        ..SegsimConfig::default()
    };
    let jitter = PanickingJitter {
        calls: AtomicUsize::new(0),
        fail_on: 2,
    };
    let sim = Simulator::with_jitter(&cfg, Arc::new(jitter));
    let engine = Engine::with_simulator(cfg, sim).unwrap();
    engine
        .load("broken.mp4", 25.0, None, FilterKind::None)
        .await
        .unwrap();

    let start = tokio::time::Instant::now();
    let result = engine.run(ProcessingMode::Parallel, None).await;
    assert!(
        matches!(result, Err(EngineError::TaskJoin(_))),
        "{:?}",
        result
    );
    // Segment 1 starts after one stagger step; nothing else gets to finish.
    assert!(start.elapsed() < Duration::from_millis(200));

    let job = engine.snapshot().await.unwrap();
    assert_eq!(job.status, JobStatus::Error);
    assert!(job.error.is_some());
    assert!(job.stats.is_none());
    assert!(job
        .segments
        .iter()
        .all(|s| s.status != SegmentStatus::Completed));
    assert_eq!(job.segments[2].status, SegmentStatus::Pending);

    // Aborted segments never report completion afterwards.
    tokio::time::sleep(Duration::from_secs(2)).await;
    let job = engine.snapshot().await.unwrap();
    assert!(job
        .segments
        .iter()
        .all(|s| s.status != SegmentStatus::Completed));
}
