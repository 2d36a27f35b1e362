use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::EngineError;

/// Global configuration loaded from `~/.config/segsim/config.toml`.
///
/// Every key is optional in the file; missing keys take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegsimConfig {
    /// Nominal segment length in seconds.
    pub segment_length_secs: f64,
    /// Simulated cost of one full-length segment with no filter (ms).
    pub base_cost_ms: u64,
    /// Floor for the simulated cost of any segment (ms).
    pub min_cost_ms: u64,
    /// Symmetric random jitter applied to each segment's cost (± ms).
    pub jitter_ms: u64,
    /// Fixed cost of recombining parallel-processed segments (ms).
    pub merge_overhead_ms: u64,
    /// Number of progress events emitted per segment.
    pub progress_steps: u32,
    /// Per-segment startup delay unit for the parallel policy (ms × segment id).
    pub stagger_ms: u64,
    /// Core count reported in stats. None = query the platform.
    pub cpu_cores: Option<usize>,
}

impl Default for SegsimConfig {
    fn default() -> Self {
        Self {
            segment_length_secs: 10.0,
            base_cost_ms: 800,
            min_cost_ms: 500,
            jitter_ms: 100,
            merge_overhead_ms: 400,
            progress_steps: 20,
            stagger_ms: 50,
            cpu_cores: None,
        }
    }
}

impl SegsimConfig {
    /// Rejects values the engine cannot work with.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.segment_length_secs.is_finite() || self.segment_length_secs <= 0.0 {
            return Err(EngineError::InvalidSegmentLength(self.segment_length_secs));
        }
        if self.progress_steps == 0 {
            return Err(EngineError::InvalidConfig(
                "progress_steps must be at least 1".into(),
            ));
        }
        if self.min_cost_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "min_cost_ms must be positive".into(),
            ));
        }
        if self.merge_overhead_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "merge_overhead_ms must be positive".into(),
            ));
        }
        if self.cpu_cores == Some(0) {
            return Err(EngineError::InvalidConfig(
                "cpu_cores must be at least 1 when set".into(),
            ));
        }
        Ok(())
    }

    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    pub fn merge_overhead(&self) -> f64 {
        self.merge_overhead_ms as f64
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("segsim")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from an explicit path.
pub fn load_from_path(path: &Path) -> Result<SegsimConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: SegsimConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SegsimConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SegsimConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}
