//! CLI command handlers. Each command is in its own file.

mod compare;
mod config;
mod plan;
mod run;

use segsim_core::simulator::FilterKind;

pub use compare::run_compare;
pub use config::run_config;
pub use plan::run_plan;
pub use run::run_job;

/// The "selected file": what the engine needs to create a job.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub name: String,
    pub duration: f64,
    pub size_bytes: Option<u64>,
    pub filter: FilterKind,
}
