//! Segment processing simulator.
//!
//! No frames are touched: a segment's "processing" is a timed delay whose
//! length comes from [`CostModel`], split into equal steps so callers can
//! animate progress. Runs on tokio's clock, which tests pause and advance.

mod cost;
mod filter;
mod jitter;

pub use cost::CostModel;
pub use filter::FilterKind;
pub use jitter::{FixedJitter, JitterSource, RandomJitter};

use std::sync::Arc;
use std::time::Duration;

use crate::config::SegsimConfig;
use crate::error::SimulationError;
use crate::segmenter::Segment;

/// Fails when there is no runtime to drive timers on this thread.
pub(crate) fn ensure_timer() -> Result<(), SimulationError> {
    tokio::runtime::Handle::try_current()
        .map(|_| ())
        .map_err(|_| SimulationError::NoRuntime)
}

/// Stateless between calls; share it behind an `Arc` across segment tasks.
#[derive(Debug, Clone)]
pub struct Simulator {
    cost: CostModel,
    steps: u32,
    jitter: Arc<dyn JitterSource>,
}

impl Simulator {
    /// Simulator with random jitter.
    pub fn new(cfg: &SegsimConfig) -> Self {
        Self::with_jitter(cfg, Arc::new(RandomJitter))
    }

    pub fn with_jitter(cfg: &SegsimConfig, jitter: Arc<dyn JitterSource>) -> Self {
        Self {
            cost: CostModel::from_config(cfg),
            steps: cfg.progress_steps.max(1),
            jitter,
        }
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Draws a jitter sample and returns the target simulated duration for `segment`.
    pub fn target_duration(&self, segment: &Segment, cost_modifier: f64) -> Duration {
        let jitter = self.jitter.sample_ms(self.cost.jitter_ms);
        let ms = self.cost.target_ms(segment.span(), cost_modifier, jitter);
        Duration::from_micros((ms * 1000.0).round() as u64)
    }

    /// Simulates processing `segment`, calling `on_progress(percent)` after each step.
    ///
    /// Percent values are `k × 100 / steps` for k in 1..=steps, so the last one is
    /// exactly 100. Returns the measured elapsed time.
    pub async fn simulate<F>(
        &self,
        segment: &Segment,
        cost_modifier: f64,
        mut on_progress: F,
    ) -> Result<Duration, SimulationError>
    where
        F: FnMut(f64),
    {
        ensure_timer()?;

        let target = self.target_duration(segment, cost_modifier);
        let step = target / self.steps;
        let started = tokio::time::Instant::now();

        tracing::trace!(
            segment = segment.id,
            target_ms = target.as_secs_f64() * 1000.0,
            "simulating segment"
        );

        for k in 1..=self.steps {
            tokio::time::sleep(step).await;
            on_progress(k as f64 * 100.0 / self.steps as f64);
        }

        Ok(started.elapsed())
    }
}
