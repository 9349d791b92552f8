//! Top-level application configuration

use super::{BatchConfig, CacheConfig, LoggingConfig};
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `[cache]` section
    pub cache: CacheConfig,
    /// `[batch]` section
    pub batch: BatchConfig,
    /// `[logging]` section
    pub logging: LoggingConfig,
}
