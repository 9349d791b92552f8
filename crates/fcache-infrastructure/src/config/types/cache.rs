//! Cache configuration types

use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cache configuration
///
/// With no `redis_url` the store runs local-only. With `enabled = false`
/// nothing is cached and every batch descriptor runs its operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache enabled
    pub enabled: bool,

    /// Redis URL; absent means local only
    pub redis_url: Option<String>,

    /// Owner namespace prefixed to every key (`namespace:key`)
    pub namespace: Option<String>,

    /// Default TTL in seconds
    pub default_ttl_secs: u64,

    /// Capacity of the in-process store, in entries
    pub max_local_entries: usize,

    /// `SCAN COUNT` hint used by prefix invalidation
    pub scan_batch_size: usize,

    /// Deadline for one remote call, in milliseconds
    pub remote_timeout_ms: u64,

    /// Seconds between health probes
    pub health_check_interval_secs: u64,

    /// Consecutive successful probes needed to leave fallback mode
    pub recovery_threshold: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redis_url: None,
            namespace: None,
            default_ttl_secs: CACHE_DEFAULT_TTL_SECS,
            max_local_entries: CACHE_DEFAULT_MAX_LOCAL_ENTRIES,
            scan_batch_size: CACHE_DEFAULT_SCAN_BATCH,
            remote_timeout_ms: CACHE_REMOTE_TIMEOUT_MS,
            health_check_interval_secs: CACHE_HEALTH_CHECK_INTERVAL_SECS,
            recovery_threshold: CACHE_RECOVERY_THRESHOLD,
        }
    }
}

impl CacheConfig {
    /// Default TTL as a duration
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Remote call deadline as a duration
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_millis(self.remote_timeout_ms)
    }

    /// Health probe interval as a duration
    pub fn health_check_interval(&self) -> Duration {
        Duration::from_secs(self.health_check_interval_secs)
    }

    /// Whether a remote backend is configured
    pub fn has_remote(&self) -> bool {
        self.redis_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }
}
