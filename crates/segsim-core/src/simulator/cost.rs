//! Simulated per-segment cost.

use crate::config::SegsimConfig;

/// Pure cost model: how long a segment "takes" given its span, the filter
/// modifier and a jitter sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    /// Cost of one full nominal-length segment with modifier 1.0 (ms).
    pub base_ms: f64,
    /// Floor applied after jitter (ms).
    pub min_ms: f64,
    /// Jitter amplitude; samples are clamped to [-jitter_ms, +jitter_ms].
    pub jitter_ms: f64,
    /// Nominal segment length (seconds) the base cost refers to.
    pub nominal_span_secs: f64,
}

impl CostModel {
    pub fn from_config(cfg: &SegsimConfig) -> Self {
        Self {
            base_ms: cfg.base_cost_ms as f64,
            min_ms: cfg.min_cost_ms as f64,
            jitter_ms: cfg.jitter_ms as f64,
            nominal_span_secs: cfg.segment_length_secs,
        }
    }

    /// Target duration in milliseconds:
    /// `base × modifier × (span / nominal) + jitter`, floored at `min_ms`.
    pub fn target_ms(&self, span_secs: f64, modifier: f64, jitter_sample_ms: f64) -> f64 {
        let modifier = if modifier.is_finite() && modifier > 0.0 {
            modifier
        } else {
            1.0
        };
        let ratio = if self.nominal_span_secs > 0.0 {
            span_secs.max(0.0) / self.nominal_span_secs
        } else {
            1.0
        };
        let jitter = if jitter_sample_ms.is_finite() {
            jitter_sample_ms.clamp(-self.jitter_ms, self.jitter_ms)
        } else {
            0.0
        };
        (self.base_ms * modifier * ratio + jitter).max(self.min_ms)
    }
}
