//! Cache Provider Port
//!
//! Port for cache backend providers. A provider is a single storage backend:
//! the in-process map, Redis, or the null provider. Providers report their
//! failures honestly through `Result`; turning those failures into a fallback
//! decision is the job of the cache store that owns them.

use crate::constants::DEFAULT_CACHE_TTL_SECS;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cache Entry Configuration
///
/// Configures how a cache entry should be stored. An absent TTL means "use
/// the owner's default"; a zero TTL is a caller error and is rejected by
/// [`CacheEntryConfig::validate`] rather than coerced.
///
/// # Example
///
/// ```
/// use fcache_domain::ports::providers::cache::CacheEntryConfig;
/// use std::time::Duration;
///
/// let config = CacheEntryConfig::default().with_ttl(Duration::from_secs(600));
/// assert_eq!(config.effective_ttl(), Duration::from_secs(600));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntryConfig {
    /// Time to live for the cache entry
    pub ttl: Option<Duration>,
}

impl CacheEntryConfig {
    /// Create a config that defers to the default TTL
    pub fn new() -> Self {
        Self { ttl: None }
    }

    /// Set the TTL for the cache entry
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set TTL in seconds
    pub fn with_ttl_secs(mut self, secs: u64) -> Self {
        self.ttl = Some(Duration::from_secs(secs));
        self
    }

    /// Get the effective TTL, falling back to the domain default
    pub fn effective_ttl(&self) -> Duration {
        self.ttl
            .unwrap_or(Duration::from_secs(DEFAULT_CACHE_TTL_SECS))
    }

    /// Resolve an absent TTL against the given default
    pub fn or_default_ttl(self, default_ttl: Duration) -> Self {
        Self {
            ttl: Some(self.ttl.unwrap_or(default_ttl)),
        }
    }

    /// Reject a zero TTL
    pub fn validate(&self) -> Result<()> {
        match self.ttl {
            Some(ttl) if ttl.is_zero() => Err(Error::invalid_argument(
                "cache TTL must be greater than zero",
            )),
            _ => Ok(()),
        }
    }
}

/// Cache Operation Statistics
///
/// Tracks provider-level counters. Providers that cannot observe a counter
/// (Redis does not track expired keys for us) report zero.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries held, live or not yet reclaimed
    pub entries: u64,
    /// Entries whose TTL has not elapsed
    pub active_entries: u64,
    /// Entries past their TTL that have not been reclaimed yet
    pub expired_entries: u64,
    /// Cache hit rate (0.0 to 1.0)
    pub hit_rate: f64,
}

impl CacheStats {
    /// Create empty cache statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate hit rate from hits and misses
    #[allow(clippy::cast_precision_loss)]
    pub fn calculate_hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Cache Provider Port
///
/// Defines the contract for cache backend providers. Values are JSON strings;
/// typed access is layered on top by the cache store.
///
/// # Implementations
///
/// - **Memory**: In-process map with lazy expiration
/// - **Redis**: Remote cache shared by several processes
/// - **Null**: No-op provider for disabled caching
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug {
    /// Get a value from the cache as JSON string
    ///
    /// # Returns
    /// The cached JSON string if present, None if not found or expired
    async fn get_json(&self, key: &str) -> Result<Option<String>>;

    /// Set a value in the cache from JSON string
    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()>;

    /// Delete a value from the cache
    ///
    /// # Returns
    /// True if the key was deleted, false if it didn't exist
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Delete every key starting with `prefix`
    ///
    /// # Returns
    /// The number of keys removed
    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64>;

    /// Check if a key exists in the cache and hasn't expired
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Clear all values from the cache
    async fn clear(&self) -> Result<()>;

    /// Round-trip health probe
    async fn ping(&self) -> Result<()>;

    /// Get cache statistics
    async fn stats(&self) -> Result<CacheStats>;

    /// Get the cache size (number of entries)
    async fn size(&self) -> Result<usize>;

    /// Physically drop entries past their TTL
    ///
    /// Backends that expire keys on their own have nothing to do.
    async fn reclaim_expired(&self) -> Result<u64> {
        Ok(0)
    }

    /// Get the name/identifier of this provider implementation
    ///
    /// # Returns
    /// A string identifier for the provider (e.g., "memory", "redis", "null")
    fn provider_name(&self) -> &str;
}
