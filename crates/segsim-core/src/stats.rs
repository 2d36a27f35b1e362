//! Comparative timing statistics for a completed run.

use serde::{Deserialize, Serialize};

use crate::scheduler::ProcessingMode;

/// Snapshot computed once per completed run. All times in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Policy that produced the per-segment times.
    pub mode: ProcessingMode,
    /// One entry per segment, in segment id order.
    pub per_segment_times: Vec<f64>,
    /// Cost had the segments run one after another: sum of per-segment times.
    pub sequential_time: f64,
    /// Cost had the segments run concurrently: slowest segment plus merge overhead.
    pub parallel_time: f64,
    /// `sequential_time` for sequential runs, `parallel_time` otherwise.
    pub total_time: f64,
    /// `sequential_time / parallel_time`, rounded to 2 decimals.
    pub speedup_factor: f64,
    pub cpu_cores: usize,
    pub segment_count: usize,
}

impl ProcessingStats {
    /// Milliseconds saved relative to the sequential baseline (0 for sequential runs).
    pub fn time_saved(&self) -> f64 {
        (self.sequential_time - self.total_time).max(0.0)
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Computes stats from per-segment times.
///
/// The speedup is reported for sequential runs too, as a what-if figure.
/// An empty input gives zero sequential time, `parallel_time = merge_overhead_ms`
/// and a speedup of 0.
pub fn aggregate(
    per_segment_times: &[f64],
    mode: ProcessingMode,
    merge_overhead_ms: f64,
    cpu_cores: usize,
) -> ProcessingStats {
    let sequential_time: f64 = per_segment_times.iter().sum();
    let slowest = per_segment_times.iter().copied().fold(0.0_f64, f64::max);
    let parallel_time = slowest + merge_overhead_ms.max(0.0);

    let total_time = match mode {
        ProcessingMode::Sequential => sequential_time,
        ProcessingMode::Parallel => parallel_time,
    };
    let speedup_factor = if parallel_time > 0.0 {
        round2(sequential_time / parallel_time)
    } else {
        0.0
    };

    ProcessingStats {
        mode,
        per_segment_times: per_segment_times.to_vec(),
        sequential_time,
        parallel_time,
        total_time,
        speedup_factor,
        cpu_cores,
        segment_count: per_segment_times.len(),
    }
}
