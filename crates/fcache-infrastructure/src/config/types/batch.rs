//! Batch orchestrator configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Batch orchestrator configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Deadline applied to descriptors without their own, in milliseconds;
    /// `0` disables it
    pub operation_timeout_ms: u64,
}

impl BatchConfig {
    /// Default per-operation deadline, if any
    pub fn operation_timeout(&self) -> Option<Duration> {
        (self.operation_timeout_ms > 0).then(|| Duration::from_millis(self.operation_timeout_ms))
    }
}
