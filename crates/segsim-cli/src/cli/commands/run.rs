//! `segsim run --duration <secs>` – process one video and report stats.

use anyhow::{Context, Result};
use segsim_core::config::SegsimConfig;
use segsim_core::job::JobProgress;
use segsim_core::scheduler::ProcessingMode;
use segsim_core::Engine;
use tokio::sync::mpsc;

use super::RunOptions;
use crate::cli::render;

pub async fn run_job(
    cfg: &SegsimConfig,
    opts: RunOptions,
    mode: ProcessingMode,
    json: bool,
) -> Result<()> {
    let engine = Engine::new(cfg.clone())?;
    engine
        .load(&opts.name, opts.duration, opts.size_bytes, opts.filter)
        .await?;

    if json {
        engine.run(mode, None).await?;
        let job = engine
            .snapshot()
            .await
            .context("job vanished after run")?;
        println!("{}", serde_json::to_string_pretty(&job)?);
        return Ok(());
    }

    if let Some(job) = engine.snapshot().await {
        render::print_job_header(&job);
    }
    println!("Processing ({})...", mode);

    let (progress_tx, progress_rx) = mpsc::channel::<JobProgress>(64);
    let printer = render::spawn_progress_printer(progress_rx);
    let result = engine.run(mode, Some(progress_tx)).await;
    let _ = printer.await;
    let stats = result?;

    render::print_stats(&stats);
    Ok(())
}
