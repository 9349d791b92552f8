//! Cache store wiring from configuration

use super::store::CacheStore;
use crate::config::CacheConfig;
use fcache_domain::error::Result;
use fcache_domain::ports::providers::CacheProvider;
use fcache_providers::cache::{MemoryCacheProvider, NullCacheProvider, RedisCacheProvider};
use std::sync::Arc;
use tracing::info;

/// Build a cache store from configuration
///
/// - `enabled = false`: a local-only store over the null provider
/// - no `redis_url`: a local-only store over the in-process provider
/// - otherwise: Redis with in-process fallback, probed once before returning
///
/// Only an unparsable Redis URL is an error; an unreachable server just
/// starts the store in fallback mode.
pub async fn build_cache_store(config: &CacheConfig) -> Result<Arc<CacheStore>> {
    if !config.enabled {
        info!("caching disabled, every lookup will miss");
        return Ok(Arc::new(CacheStore::local_only(Arc::new(
            NullCacheProvider::new(),
        ))));
    }

    let local: Arc<dyn CacheProvider> =
        Arc::new(MemoryCacheProvider::with_capacity(config.max_local_entries));

    let store = match config.redis_url.as_deref().filter(|_| config.has_remote()) {
        Some(url) => {
            let remote = RedisCacheProvider::new(url)?.with_scan_batch_size(config.scan_batch_size);
            info!(server = remote.server_address(), "using Redis cache with in-process fallback");
            CacheStore::with_remote(Arc::new(remote), local)
        }
        None => {
            info!("no Redis URL configured, using in-process cache only");
            CacheStore::local_only(local)
        }
    };

    let mut store = store
        .with_default_ttl(config.default_ttl())
        .with_remote_timeout(config.remote_timeout())
        .with_recovery_threshold(config.recovery_threshold);
    if let Some(namespace) = &config.namespace {
        store = store.with_namespace(namespace.clone());
    }

    let mode = store.initialize().await;
    info!(mode = %mode, namespace = ?store.namespace(), "cache store ready");
    Ok(Arc::new(store))
}
