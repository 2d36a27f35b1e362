//! `segsim plan --duration <secs>` – show the segment partition.

use anyhow::Result;
use segsim_core::config::SegsimConfig;
use segsim_core::format::format_timestamp;
use segsim_core::segmenter;

pub fn run_plan(cfg: &SegsimConfig, duration: f64, segment_length: Option<f64>) -> Result<()> {
    let length = segment_length.unwrap_or(cfg.segment_length_secs);
    let segments = segmenter::partition(duration, length)?;

    println!("  {:>4}  {:>8}  {:>8}  {:>8}", "ID", "START", "END", "SPAN(s)");
    println!("  {}  {}  {}  {}", "----", "--------", "--------", "--------");
    for s in &segments {
        println!(
            "  {:>4}  {:>8}  {:>8}  {:>8.2}",
            s.id,
            format_timestamp(s.start_time),
            format_timestamp(s.end_time),
            s.span()
        );
    }
    println!(
        "{} segment(s) of up to {}s covering {}s",
        segments.len(),
        length,
        duration
    );
    Ok(())
}
