//! `segsim config` – show where the config lives and what is in effect.

use anyhow::Result;
use segsim_core::config::{self, SegsimConfig};
use std::path::Path;

pub fn run_config(cfg: &SegsimConfig, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("config: {}", path.display());
    println!("  segment_length_secs = {}", cfg.segment_length_secs);
    println!("  base_cost_ms        = {}", cfg.base_cost_ms);
    println!("  min_cost_ms         = {}", cfg.min_cost_ms);
    println!("  jitter_ms           = {}", cfg.jitter_ms);
    println!("  merge_overhead_ms   = {}", cfg.merge_overhead_ms);
    println!("  progress_steps      = {}", cfg.progress_steps);
    println!("  stagger_ms          = {}", cfg.stagger_ms);
    match cfg.cpu_cores {
        Some(n) => println!("  cpu_cores           = {}", n),
        None => println!("  cpu_cores           = (platform)"),
    }
    Ok(())
}
