//! Jitter sources for the simulated cost.

use rand::Rng;

/// Supplies one symmetric jitter sample per simulated segment.
pub trait JitterSource: Send + Sync + std::fmt::Debug {
    /// Returns a sample in `[-amplitude_ms, +amplitude_ms]`.
    fn sample_ms(&self, amplitude_ms: f64) -> f64;
}

/// Uniform random jitter (thread-local RNG).
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomJitter;

impl JitterSource for RandomJitter {
    fn sample_ms(&self, amplitude_ms: f64) -> f64 {
        if amplitude_ms.is_nan() || amplitude_ms <= 0.0 {
            return 0.0;
        }
        rand::thread_rng().gen_range(-amplitude_ms..=amplitude_ms)
    }
}

/// Always returns the same sample (clamped to the amplitude). Used for deterministic runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn sample_ms(&self, amplitude_ms: f64) -> f64 {
        let amplitude = amplitude_ms.max(0.0);
        self.0.clamp(-amplitude, amplitude)
    }
}
