//! CLI for the segsim sequential vs. parallel processing demo.

mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use segsim_core::config::{self, SegsimConfig};
use segsim_core::scheduler::ProcessingMode;
use segsim_core::simulator::FilterKind;
use std::path::PathBuf;

use commands::{run_compare, run_config, run_job, run_plan, RunOptions};

/// Top-level CLI for segsim.
#[derive(Debug, Parser)]
#[command(name = "segsim")]
#[command(
    about = "segsim: split a video into segments and compare simulated sequential vs. parallel processing",
    long_about = None
)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/segsim/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Show how a video of the given duration is split into segments.
    Plan {
        /// Video duration in seconds.
        #[arg(long)]
        duration: f64,
        /// Segment length in seconds (default from config).
        #[arg(long, value_name = "SECS")]
        segment_length: Option<f64>,
    },

    /// Process one video with the chosen policy and report timing statistics.
    Run {
        /// Video duration in seconds.
        #[arg(long)]
        duration: f64,
        /// Scheduling policy: sequential or parallel.
        #[arg(long, default_value = "parallel")]
        mode: ProcessingMode,
        /// Filter applied to every segment (scales simulated cost).
        #[arg(long, default_value = "none")]
        filter: FilterKind,
        /// Display name of the video.
        #[arg(long, default_value = "video.mp4")]
        name: String,
        /// Size of the video in bytes (display only).
        #[arg(long, value_name = "BYTES")]
        size_bytes: Option<u64>,
        /// Print the finished job as JSON instead of a table (no live progress).
        #[arg(long)]
        json: bool,
    },

    /// Run the same video sequentially and in parallel, then compare.
    Compare {
        /// Video duration in seconds.
        #[arg(long)]
        duration: f64,
        /// Filter applied to every segment (scales simulated cost).
        #[arg(long, default_value = "none")]
        filter: FilterKind,
        /// Display name of the video.
        #[arg(long, default_value = "video.mp4")]
        name: String,
    },

    /// Show the config file location and effective settings.
    Config,
}

fn load_config(path: Option<&PathBuf>) -> Result<SegsimConfig> {
    match path {
        Some(p) => config::load_from_path(p),
        None => config::load_or_init(),
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(cli.config.as_ref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Plan {
                duration,
                segment_length,
            } => run_plan(&cfg, duration, segment_length)?,
            CliCommand::Run {
                duration,
                mode,
                filter,
                name,
                size_bytes,
                json,
            } => {
                let opts = RunOptions {
                    name,
                    duration,
                    size_bytes,
                    filter,
                };
                run_job(&cfg, opts, mode, json).await?;
            }
            CliCommand::Compare {
                duration,
                filter,
                name,
            } => {
                let opts = RunOptions {
                    name,
                    duration,
                    size_bytes: None,
                    filter,
                };
                run_compare(&cfg, opts).await?;
            }
            CliCommand::Config => run_config(&cfg, cli.config.as_deref())?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
