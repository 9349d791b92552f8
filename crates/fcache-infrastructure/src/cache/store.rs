//! Remote-or-local cache store
//!
//! [`CacheStore`] owns a remote provider (optional) and an in-process
//! provider. [`CacheStore::run_with_fallback`] is the one place where a remote
//! error becomes a mode transition; every public operation goes through it or
//! through [`CacheStore::call_remote`].
//!
//! Writes land in the in-process store first, so a value this process wrote
//! stays readable when the remote disappears between the write and the read.
//! Whatever the remote missed is recorded and replayed before the store
//! switches back to it.

use super::invalidation::{PendingInvalidation, PendingInvalidations};
use super::key::Keyspace;
use super::mode::ModeState;
use crate::constants::{
    CACHE_DEFAULT_TTL_SECS, CACHE_PENDING_INVALIDATIONS_LIMIT, CACHE_RECOVERY_REPLAY_ROUNDS,
    CACHE_RECOVERY_THRESHOLD, CACHE_REMOTE_TIMEOUT_MS, CACHE_REMOTE_WRITE_ATTEMPTS,
};
use async_trait::async_trait;
use fcache_domain::error::{Error, Result};
use fcache_domain::ports::infrastructure::CacheStoreInterface;
use fcache_domain::ports::providers::{CacheEntryConfig, CacheProvider};
use fcache_domain::value_objects::{CacheStoreStats, ConnectionMode};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Fallback-aware cache store
///
/// Construct once at startup and share it behind an `Arc`.
///
/// # Example
///
/// ```
/// use fcache_domain::ports::infrastructure::CacheStoreExt;
/// use fcache_domain::ports::providers::CacheEntryConfig;
/// use fcache_infrastructure::cache::CacheStore;
/// use fcache_providers::cache::MemoryCacheProvider;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> fcache_domain::Result<()> {
/// let store = CacheStore::local_only(Arc::new(MemoryCacheProvider::new()));
/// store.set("greeting", &"merhaba", CacheEntryConfig::new()).await?;
/// assert_eq!(store.get::<String>("greeting").await.as_deref(), Some("merhaba"));
/// # Ok(())
/// # }
/// ```
pub struct CacheStore {
    remote: Option<Arc<dyn CacheProvider>>,
    local: Arc<dyn CacheProvider>,
    keys: Keyspace,
    default_ttl: Duration,
    remote_timeout: Duration,
    recovery_threshold: u32,
    mode: ModeState,
    pending: PendingInvalidations,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStore {
    /// Store backed only by the in-process provider
    pub fn local_only(local: Arc<dyn CacheProvider>) -> Self {
        Self::build(None, local, ConnectionMode::LocalOnly)
    }

    /// Store that prefers `remote` and falls back to `local`
    ///
    /// Starts in `RemoteActive`; [`CacheStore::initialize`] probes the remote
    /// once so a server that is down at startup is detected immediately.
    pub fn with_remote(remote: Arc<dyn CacheProvider>, local: Arc<dyn CacheProvider>) -> Self {
        Self::build(Some(remote), local, ConnectionMode::RemoteActive)
    }

    fn build(
        remote: Option<Arc<dyn CacheProvider>>,
        local: Arc<dyn CacheProvider>,
        initial: ConnectionMode,
    ) -> Self {
        Self {
            remote,
            local,
            keys: Keyspace::global(),
            default_ttl: Duration::from_secs(CACHE_DEFAULT_TTL_SECS),
            remote_timeout: Duration::from_millis(CACHE_REMOTE_TIMEOUT_MS),
            recovery_threshold: CACHE_RECOVERY_THRESHOLD,
            mode: ModeState::new(initial),
            pending: PendingInvalidations::default(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Scope every key to an owner namespace
    ///
    /// Clears become prefix deletes, which also lets an overflowing
    /// invalidation log collapse into a clear.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.keys = Keyspace::new(Some(namespace.into()));
        self.pending = PendingInvalidations::new(CACHE_PENDING_INVALIDATIONS_LIMIT, true);
        self
    }

    /// TTL used when an entry config carries none
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Deadline for each remote call; elapsing counts as a remote failure
    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    /// Consecutive successful probes needed to leave fallback mode
    pub fn with_recovery_threshold(mut self, threshold: u32) -> Self {
        self.recovery_threshold = threshold.max(1);
        self
    }

    /// Owner namespace, if any
    pub fn namespace(&self) -> Option<&str> {
        self.keys.namespace()
    }

    /// Number of invalidations waiting for the remote to come back
    pub fn pending_invalidations(&self) -> usize {
        self.pending.len()
    }

    /// Probe the remote once at startup
    ///
    /// An unreachable remote puts the store in fallback right away instead of
    /// on the first request.
    pub async fn initialize(&self) -> ConnectionMode {
        if let Some(remote) = &self.remote {
            if let Err(e) = self.timed(remote.ping()).await {
                self.fall_back("startup ping", &e);
            } else {
                info!(backend = remote.provider_name(), "remote cache reachable");
            }
        }
        self.mode()
    }

    /// One health probe step
    ///
    /// In `RemoteActive` a failed probe switches to fallback. In
    /// `LocalFallback` successful probes are counted; once the streak reaches
    /// the recovery threshold, pending invalidations are replayed on the remote
    /// and the store switches back. Any failure resets the streak.
    ///
    /// Returns whether the remote answered the probe.
    pub async fn health_check(&self) -> bool {
        let Some(remote) = &self.remote else {
            return true;
        };

        let probe = self.timed(remote.ping()).await;
        match (self.mode(), probe) {
            (ConnectionMode::LocalFallback, Ok(())) => {
                let streak = self.mode.record_probe_success();
                if streak >= self.recovery_threshold {
                    self.try_recover(remote).await;
                } else {
                    debug!(
                        streak,
                        threshold = self.recovery_threshold,
                        "remote cache probe succeeded"
                    );
                }
                true
            }
            (ConnectionMode::LocalFallback, Err(e)) => {
                self.mode.reset_probe_streak();
                debug!(error = %e, "remote cache probe failed");
                false
            }
            (_, Ok(())) => true,
            (_, Err(e)) => {
                self.fall_back("health probe", &e);
                false
            }
        }
    }

    /// Drop expired entries held in process
    pub async fn reclaim_expired(&self) -> u64 {
        match self.local.reclaim_expired().await {
            Ok(reclaimed) => {
                if reclaimed > 0 {
                    debug!(reclaimed, "expired local cache entries reclaimed");
                }
                reclaimed
            }
            Err(e) => {
                warn!(error = %e, "local cache sweep failed");
                0
            }
        }
    }

    async fn try_recover(&self, remote: &Arc<dyn CacheProvider>) -> bool {
        if self.pending.is_overflowed() {
            debug!("invalidations were dropped during the outage, waiting for a clear");
            return false;
        }
        let mut replayed = 0usize;
        for _ in 0..CACHE_RECOVERY_REPLAY_ROUNDS {
            let ops = self.pending.take();
            for (done, op) in ops.iter().enumerate() {
                if let Err(e) = self.replay(remote, op).await {
                    warn!(
                        error = %e,
                        remaining = ops.len() - done,
                        "replaying cache invalidations failed, staying in fallback mode"
                    );
                    self.pending.restore_front(ops[done..].to_vec());
                    self.mode.reset_probe_streak();
                    return false;
                }
                replayed += 1;
            }

            // Writers record under the same lock after checking the mode, so
            // each write is either in the log or sees RemoteActive
            if let Some(switched) = self.pending.when_empty(|| self.mode.restore_remote()) {
                if switched {
                    info!(
                        backend = remote.provider_name(),
                        replayed, "remote cache recovered, leaving fallback mode"
                    );
                }
                return switched;
            }
        }
        debug!("invalidations kept arriving during replay, retrying on next probe");
        false
    }

    async fn replay(&self, remote: &Arc<dyn CacheProvider>, op: &PendingInvalidation) -> Result<()> {
        match op {
            PendingInvalidation::Rewrite { key, .. } => {
                let remaining = op.remaining_ttl(Instant::now()).unwrap_or_default();
                match self.local.get_json(key).await? {
                    Some(json) if !remaining.is_zero() => {
                        let config = CacheEntryConfig::new().with_ttl(remaining);
                        self.timed(remote.set_json(key, &json, config)).await
                    }
                    _ => self.timed(remote.delete(key)).await.map(drop),
                }
            }
            PendingInvalidation::Delete(key) => self.timed(remote.delete(key)).await.map(drop),
            PendingInvalidation::DeletePrefix(prefix) => {
                self.timed(remote.delete_by_prefix(prefix)).await.map(drop)
            }
            PendingInvalidation::Clear => self.clear_backend(remote).await,
        }
    }

    /// Owner-scoped clear of one backend
    async fn clear_backend(&self, provider: &Arc<dyn CacheProvider>) -> Result<()> {
        match self.keys.owner_prefix() {
            Some(prefix) => self.timed(provider.delete_by_prefix(&prefix)).await.map(drop),
            None => self.timed(provider.clear()).await,
        }
    }

    async fn timed<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.remote_timeout, call)
            .await
            .unwrap_or_else(|_| {
                Err(Error::infrastructure(format!(
                    "remote cache call timed out after {}ms",
                    self.remote_timeout.as_millis()
                )))
            })
    }

    fn fall_back(&self, command: &str, reason: &dyn fmt::Display) {
        if self.mode.enter_fallback() {
            warn!(
                command,
                error = %reason,
                "remote cache unavailable, switching to local fallback"
            );
        } else {
            debug!(command, error = %reason, "remote cache call failed");
        }
    }

    /// Run `op` on the remote when it is the active backend
    ///
    /// `None` means the caller must not count on the remote: no remote is
    /// active, or this call failed and the store is now in fallback.
    async fn call_remote<T, F, Fut>(&self, command: &'static str, op: F) -> Option<T>
    where
        F: FnOnce(Arc<dyn CacheProvider>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if !self.mode().is_remote() {
            return None;
        }
        let remote = Arc::clone(self.remote.as_ref()?);
        match self.timed(op(remote)).await {
            Ok(value) => Some(value),
            Err(e) => {
                self.fall_back(command, &e);
                None
            }
        }
    }

    /// Read from the remote if active, otherwise (or on failure) from local
    async fn run_with_fallback<T, R, RFut, L, LFut>(
        &self,
        command: &'static str,
        remote_op: R,
        local_op: L,
    ) -> Result<T>
    where
        R: FnOnce(Arc<dyn CacheProvider>) -> RFut,
        RFut: Future<Output = Result<T>>,
        L: FnOnce(Arc<dyn CacheProvider>) -> LFut,
        LFut: Future<Output = Result<T>>,
    {
        match self.call_remote(command, remote_op).await {
            Some(value) => Ok(value),
            None => local_op(Arc::clone(&self.local)).await,
        }
    }

    /// Apply a write-side effect to the remote, recording it for replay when
    /// the remote cannot take it. `true` when the remote is up to date.
    ///
    /// Must run after the local side of the write: replay reads local state.
    async fn write_remote<T, F, Fut>(
        &self,
        command: &'static str,
        invalidation: PendingInvalidation,
        op: F,
    ) -> bool
    where
        F: Fn(Arc<dyn CacheProvider>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if self.remote.is_none() {
            return true;
        }
        for _ in 0..CACHE_REMOTE_WRITE_ATTEMPTS {
            if self.call_remote(command, &op).await.is_some() {
                return true;
            }
            let recorded = self.pending.record_if(invalidation.clone(), || {
                self.mode() == ConnectionMode::LocalFallback
            });
            if recorded {
                return false;
            }
            // Recovery finished between the attempt and the record
        }
        self.fall_back(command, &"remote write kept racing recovery");
        self.pending.record(invalidation);
        false
    }

    fn local_result<T>(command: &str, key: &str, result: Result<T>) -> Option<T> {
        result
            .inspect_err(|e| warn!(command, key = %key, error = %e, "local cache call failed"))
            .ok()
    }

    fn record_read(&self, key: &str, hit: bool) {
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "cache miss");
        }
    }
}

#[async_trait]
impl CacheStoreInterface for CacheStore {
    async fn get_value(&self, key: &str) -> Option<serde_json::Value> {
        let qualified = self.keys.qualify(key);
        let k = qualified.as_str();
        let raw = self
            .run_with_fallback(
                "get",
                |remote| async move { remote.get_json(k).await },
                |local| async move { local.get_json(k).await },
            )
            .await;

        let value = Self::local_result("get", k, raw)
            .flatten()
            .and_then(|json| match serde_json::from_str(&json) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(key = %k, error = %e, "cached payload is not valid JSON");
                    None
                }
            });
        self.record_read(k, value.is_some());
        value
    }

    async fn set_value(
        &self,
        key: &str,
        value: &serde_json::Value,
        config: CacheEntryConfig,
    ) -> Result<bool> {
        config.validate()?;
        let config = config.or_default_ttl(self.default_ttl);
        let qualified = self.keys.qualify(key);
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key = %qualified, error = %e, "value could not be serialized for cache");
                return Ok(false);
            }
        };

        let (k, j) = (qualified.as_str(), json.as_str());
        let local_ok = Self::local_result("set", k, self.local.set_json(k, j, config).await).is_some();
        let remote_ok = self
            .write_remote(
                "set",
                PendingInvalidation::rewrite(k, config.effective_ttl()),
                |remote| async move { remote.set_json(k, j, config).await },
            )
            .await;
        Ok(remote_ok && local_ok)
    }

    async fn delete(&self, key: &str) -> bool {
        let qualified = self.keys.qualify(key);
        let k = qualified.as_str();
        let local_ok = Self::local_result("delete", k, self.local.delete(k).await).is_some();
        let remote_ok = self
            .write_remote(
                "delete",
                PendingInvalidation::Delete(qualified.clone()),
                |remote| async move { remote.delete(k).await },
            )
            .await;
        remote_ok && local_ok
    }

    async fn delete_by_prefix(&self, prefix: &str) -> bool {
        let qualified = self.keys.qualify(prefix);
        let p = qualified.as_str();
        let removed = Self::local_result("delete_by_prefix", p, self.local.delete_by_prefix(p).await);
        if let Some(removed) = removed {
            debug!(prefix = %p, removed, "local cache prefix invalidated");
        }
        let remote_ok = self
            .write_remote(
                "delete_by_prefix",
                PendingInvalidation::DeletePrefix(qualified.clone()),
                |remote| async move { remote.delete_by_prefix(p).await },
            )
            .await;
        remote_ok && removed.is_some()
    }

    async fn exists(&self, key: &str) -> bool {
        let qualified = self.keys.qualify(key);
        let k = qualified.as_str();
        let found = self
            .run_with_fallback(
                "exists",
                |remote| async move { remote.exists(k).await },
                |local| async move { local.exists(k).await },
            )
            .await;
        Self::local_result("exists", k, found).unwrap_or(false)
    }

    async fn clear(&self) -> bool {
        let local_ok = match self.keys.owner_prefix() {
            Some(prefix) => self.local.delete_by_prefix(&prefix).await.map(drop),
            None => self.local.clear().await,
        };
        let local_ok = Self::local_result("clear", "*", local_ok).is_some();
        let remote_ok = self
            .write_remote("clear", PendingInvalidation::Clear, |remote| async move {
                self.clear_backend(&remote).await
            })
            .await;
        if remote_ok && local_ok {
            info!(namespace = ?self.keys.namespace(), "cache cleared");
        }
        remote_ok && local_ok
    }

    async fn ping(&self) -> bool {
        match &self.remote {
            None => true,
            Some(remote) => self
                .timed(remote.ping())
                .await
                .inspect_err(|e| debug!(error = %e, "remote cache ping failed"))
                .is_ok(),
        }
    }

    async fn stats(&self) -> CacheStoreStats {
        let mode = self.mode();
        let local = self
            .local
            .stats()
            .await
            .inspect_err(|e| warn!(error = %e, "local cache stats unavailable"))
            .unwrap_or_default();

        let (backend, remote_entries) = match (&self.remote, mode.is_remote()) {
            (Some(remote), true) => {
                let size = self
                    .timed(remote.size())
                    .await
                    .ok()
                    .map(|n| u64::try_from(n).unwrap_or(u64::MAX));
                (remote.provider_name().to_string(), size)
            }
            _ => (self.local.provider_name().to_string(), None),
        };

        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        #[allow(clippy::cast_precision_loss)]
        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        CacheStoreStats {
            backend,
            mode,
            namespace: self.keys.namespace().map(str::to_string),
            local_entries: local.entries,
            active_entries: local.active_entries,
            expired_entries: local.expired_entries,
            remote_entries,
            hits,
            misses,
            hit_rate,
            fallback_transitions: self.mode.fallback_transitions(),
            pending_invalidations: self.pending.len(),
        }
    }

    fn mode(&self) -> ConnectionMode {
        self.mode.get()
    }
}

impl fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("remote", &self.remote.as_ref().map(|r| r.provider_name()))
            .field("local", &self.local.provider_name())
            .field("namespace", &self.keys.namespace())
            .field("mode", &self.mode())
            .finish_non_exhaustive()
    }
}
