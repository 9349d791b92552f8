//! Cache Store Port
//!
//! The cache store is what request-path code talks to. Unlike a
//! [`CacheProvider`](crate::ports::providers::CacheProvider), every operation
//! is total: backend outages are absorbed (by falling back to the in-process
//! store) and never reach the caller. The only error a caller can see is a
//! precondition violation on `set_value`.

use crate::error::Result;
use crate::ports::providers::cache::CacheEntryConfig;
use crate::value_objects::cache::{CacheStoreStats, ConnectionMode};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Remote-or-local cache store contract
#[async_trait]
pub trait CacheStoreInterface: Send + Sync {
    /// Fetch a JSON value; `None` for misses, expired entries and outages
    /// that also miss locally
    async fn get_value(&self, key: &str) -> Option<serde_json::Value>;

    /// Store a JSON value
    ///
    /// # Returns
    /// `Ok(true)` when every responsible backend accepted the write,
    /// `Ok(false)` when only the local store did, `Err` for a zero TTL
    async fn set_value(
        &self,
        key: &str,
        value: &serde_json::Value,
        config: CacheEntryConfig,
    ) -> Result<bool>;

    /// Remove a key; absent keys are not an error
    async fn delete(&self, key: &str) -> bool;

    /// Remove every key that starts with `prefix`
    async fn delete_by_prefix(&self, prefix: &str) -> bool;

    /// Whether a live entry exists for `key`
    async fn exists(&self, key: &str) -> bool;

    /// Drop every entry owned by this store
    async fn clear(&self) -> bool;

    /// Probe the remote backend without changing the connection mode
    async fn ping(&self) -> bool;

    /// Operational statistics
    async fn stats(&self) -> CacheStoreStats;

    /// Current connection mode
    fn mode(&self) -> ConnectionMode;
}

/// Typed access on top of [`CacheStoreInterface`]
///
/// Serialization happens here, at the edge, so the store itself stays
/// agnostic of payload shape.
#[async_trait]
pub trait CacheStoreExt: CacheStoreInterface {
    /// Get a typed value; a payload that does not decode as `T` is a miss
    async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned + Send,
    {
        let value = self.get_value(key).await?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cached value has unexpected shape");
                None
            }
        }
    }

    /// Set a typed value
    ///
    /// Serialization failures are reported as `Ok(false)`; only a zero TTL is
    /// an error.
    async fn set<T>(&self, key: &str, value: &T, config: CacheEntryConfig) -> Result<bool>
    where
        T: Serialize + Send + Sync,
    {
        config.validate()?;
        match serde_json::to_value(value) {
            Ok(json) => self.set_value(key, &json, config).await,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "value could not be serialized for cache");
                Ok(false)
            }
        }
    }
}

impl<S: CacheStoreInterface + ?Sized> CacheStoreExt for S {}
