pub mod config;
pub mod logging;

pub mod engine;
pub mod error;
pub mod format;
pub mod job;
pub mod scheduler;
pub mod segmenter;
pub mod simulator;
pub mod stats;

pub use engine::Engine;
pub use error::{EngineError, SimulationError};
