//! Terminal rendering of live progress and final stats.

use segsim_core::format::{format_duration_ms, format_file_size};
use segsim_core::job::{Job, JobProgress};
use segsim_core::stats::ProcessingStats;
use std::io::Write;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const PROGRESS_INTERVAL_MS: u64 = 200;

/// Prints throttled progress lines until the sender side is dropped.
pub fn spawn_progress_printer(mut progress_rx: mpsc::Receiver<JobProgress>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last_print: Option<Instant> = None;
        while let Some(p) = progress_rx.recv().await {
            let now = Instant::now();
            let due = last_print
                .map(|t| now.duration_since(t).as_millis() as u64 >= PROGRESS_INTERVAL_MS)
                .unwrap_or(true);
            if due || p.is_done() {
                let eta = p
                    .eta_secs()
                    .map(|s| format!("{:.1}s", s))
                    .unwrap_or_else(|| "?".to_string());
                print!(
                    "\r  {}/{} segments done, {} active  ({:.1}%)  ETA {}   ",
                    p.segments_done,
                    p.segment_count,
                    p.segments_active,
                    p.fraction() * 100.0,
                    eta
                );
                let _ = std::io::stdout().flush();
                last_print = Some(now);
            }
        }
        println!();
    })
}

pub fn print_job_header(job: &Job) {
    let size = job
        .size_bytes
        .map(|b| format!(" ({})", format_file_size(b)))
        .unwrap_or_default();
    println!(
        "{}{}: {:.1}s, {} segment(s), filter {}",
        job.name,
        size,
        job.duration_secs,
        job.segments.len(),
        job.filter
    );
}

pub fn print_stats(stats: &ProcessingStats) {
    println!("Mode:             {}", stats.mode);
    println!("Segments:         {}", stats.segment_count);
    println!("CPU cores:        {}", stats.cpu_cores);
    println!("Total time:       {}", format_duration_ms(stats.total_time));
    println!("Sequential time:  {}", format_duration_ms(stats.sequential_time));
    println!("Parallel time:    {}", format_duration_ms(stats.parallel_time));
    println!("Speedup:          {:.2}x", stats.speedup_factor);
    if stats.time_saved() > 0.0 {
        println!("Time saved:       {}", format_duration_ms(stats.time_saved()));
    }
    println!("  {:>4}  {:>10}", "SEG", "TIME");
    for (i, t) in stats.per_segment_times.iter().enumerate() {
        println!("  {:>4}  {:>10}", i, format_duration_ms(*t));
    }
}

pub fn print_comparison(sequential: &ProcessingStats, parallel: &ProcessingStats) {
    println!("  {:<12}  {:>10}  {:>10}", "", "SEQUENTIAL", "PARALLEL");
    println!(
        "  {:<12}  {:>10}  {:>10}",
        "Total",
        format_duration_ms(sequential.total_time),
        format_duration_ms(parallel.total_time)
    );
    let seg_count = sequential
        .per_segment_times
        .len()
        .max(parallel.per_segment_times.len());
    for i in 0..seg_count {
        let cell = |s: &ProcessingStats| {
            s.per_segment_times
                .get(i)
                .map(|t| format_duration_ms(*t))
                .unwrap_or_else(|| "-".to_string())
        };
        println!(
            "  {:<12}  {:>10}  {:>10}",
            format!("Segment {}", i),
            cell(sequential),
            cell(parallel)
        );
    }
    println!("{}", speedup_summary(sequential, parallel));
}

/// One-line summary: observed ratio, modelled speedup and the core count as context.
fn speedup_summary(sequential: &ProcessingStats, parallel: &ProcessingStats) -> String {
    let observed = if parallel.total_time > 0.0 {
        sequential.total_time / parallel.total_time
    } else {
        0.0
    };
    format!(
        "Observed speedup: {:.2}x (modelled speedup {:.2}x; {} core(s) available)",
        observed, parallel.speedup_factor, parallel.cpu_cores
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use segsim_core::scheduler::ProcessingMode;
    use segsim_core::stats::aggregate;

    #[test]
    fn speedup_summary_does_not_tie_speedup_to_cores() {
        let times = [800.0, 800.0, 500.0];
        let seq = aggregate(&times, ProcessingMode::Sequential, 400.0, 8);
        let par = aggregate(&times, ProcessingMode::Parallel, 400.0, 8);
        let line = speedup_summary(&seq, &par);
        assert_eq!(
            line,
            "Observed speedup: 1.75x (modelled speedup 1.75x; 8 core(s) available)"
        );

        let par_two = aggregate(&times, ProcessingMode::Parallel, 400.0, 2);
        assert_eq!(par_two.speedup_factor, par.speedup_factor);
        assert!(speedup_summary(&seq, &par_two).ends_with("; 2 core(s) available)"));
    }
}
