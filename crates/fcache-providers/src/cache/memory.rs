//! In-process cache provider
//!
//! Concurrent map with per-entry expiration. Redis expires keys on its own;
//! this provider has to replicate that, lazily: an entry past its deadline is
//! treated as absent and removed on the read that discovers it.
//! [`MemoryCacheProvider::purge_expired`] reclaims entries nobody reads.
//!
//! Deadlines use `tokio::time::Instant`, so tests can drive expiration with a
//! paused clock.
//!
//! ## Example
//!
//! ```ignore
//! use fcache_providers::cache::MemoryCacheProvider;
//!
//! let provider = MemoryCacheProvider::with_capacity(1000);
//! ```

use crate::constants::MEMORY_DEFAULT_MAX_ENTRIES;
use async_trait::async_trait;
use dashmap::DashMap;
use fcache_domain::error::Result;
use fcache_domain::ports::providers::cache::{CacheEntryConfig, CacheProvider, CacheStats};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: Arc<str>,
    /// `None` when the TTL overflowed the clock; such entries never expire
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// In-process cache provider
///
/// Cloning shares the underlying map.
#[derive(Clone)]
pub struct MemoryCacheProvider {
    entries: Arc<DashMap<String, MemoryEntry>>,
    max_entries: usize,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl Default for MemoryCacheProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCacheProvider {
    /// Create a provider with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(MEMORY_DEFAULT_MAX_ENTRIES)
    }

    /// Create a provider holding at most `max_entries` entries
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            max_entries: max_entries.max(1),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Maximum number of entries
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Remove every expired entry, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    /// Make space for one more entry
    ///
    /// Expired entries go first; if the map is still full, the entry closest
    /// to its deadline is evicted.
    fn make_room(&self) {
        if self.entries.len() < self.max_entries {
            return;
        }
        let purged = self.purge_expired();
        if purged > 0 && self.entries.len() < self.max_entries {
            return;
        }

        let victim = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().expires_at.map_or((1, None), |at| (0, Some(at))))
            .map(|entry| entry.key().clone());

        if let Some(key) = victim {
            tracing::debug!(key = %key, "in-process cache full, evicting entry");
            self.entries.remove(&key);
        }
    }

    fn record(&self, hit: bool) {
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        let value = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => Some(entry.value.to_string()),
            _ => None,
        };

        if value.is_none() {
            // Lazy expiration; a concurrent fresh write is left alone
            self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        }

        self.record(value.is_some());
        Ok(value)
    }

    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()> {
        config.validate()?;
        let expires_at = Instant::now().checked_add(config.effective_ttl());

        if !self.entries.contains_key(key) {
            self.make_room();
        }
        self.entries.insert(
            key.to_string(),
            MemoryEntry {
                value: Arc::from(value),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .remove(key)
            .is_some_and(|(_, entry)| !entry.is_expired(now)))
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64> {
        let mut removed = 0u64;
        self.entries.retain(|key, _| {
            let matches = key.starts_with(prefix);
            if matches {
                removed += 1;
            }
            !matches
        });
        Ok(removed)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now)))
    }

    async fn clear(&self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        let now = Instant::now();
        let (mut active, mut expired) = (0u64, 0u64);
        for entry in self.entries.iter() {
            if entry.is_expired(now) {
                expired += 1;
            } else {
                active += 1;
            }
        }

        let mut stats = CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: active + expired,
            active_entries: active,
            expired_entries: expired,
            hit_rate: 0.0,
        };
        stats.hit_rate = stats.calculate_hit_rate();
        Ok(stats)
    }

    async fn size(&self) -> Result<usize> {
        Ok(self.entries.len())
    }

    async fn reclaim_expired(&self) -> Result<u64> {
        Ok(u64::try_from(self.purge_expired()).unwrap_or(u64::MAX))
    }

    fn provider_name(&self) -> &str {
        "memory"
    }
}

impl std::fmt::Debug for MemoryCacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCacheProvider")
            .field("max_entries", &self.max_entries)
            .field("entries", &self.entries.len())
            .finish()
    }
}
