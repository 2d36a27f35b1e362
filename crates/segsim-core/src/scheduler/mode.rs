//! Execution policy selector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which scheduling policy a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    /// One segment at a time, in id order.
    Sequential,
    /// All segments concurrently, staggered start, joined at the end.
    #[default]
    Parallel,
}

impl ProcessingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessingMode::Sequential => "sequential",
            ProcessingMode::Parallel => "parallel",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "seq" => Ok(ProcessingMode::Sequential),
            "parallel" | "par" => Ok(ProcessingMode::Parallel),
            other => Err(format!(
                "unknown mode '{}' (expected sequential or parallel)",
                other
            )),
        }
    }
}
