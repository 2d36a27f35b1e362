//! `segsim compare --duration <secs>` – run both policies over the same segments.

use anyhow::Result;
use segsim_core::config::SegsimConfig;
use segsim_core::scheduler::ProcessingMode;
use segsim_core::Engine;

use super::RunOptions;
use crate::cli::render;

pub async fn run_compare(cfg: &SegsimConfig, opts: RunOptions) -> Result<()> {
    let engine = Engine::new(cfg.clone())?;
    engine
        .load(&opts.name, opts.duration, opts.size_bytes, opts.filter)
        .await?;
    if let Some(job) = engine.snapshot().await {
        render::print_job_header(&job);
    }

    println!("Running sequentially...");
    let sequential = engine.run(ProcessingMode::Sequential, None).await?;
    println!("Running in parallel...");
    let parallel = engine.run(ProcessingMode::Parallel, None).await?;
    tracing::info!(
        sequential_ms = sequential.total_time,
        parallel_ms = parallel.total_time,
        "comparison finished"
    );

    render::print_comparison(&sequential, &parallel);
    Ok(())
}
