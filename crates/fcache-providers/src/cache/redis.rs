//! Redis cache provider
//!
//! Remote cache shared by every process pointed at the same server.
//!
//! ## Features
//!
//! - TTL enforced by the server (`PSETEX`, millisecond precision)
//! - Cursor-based prefix invalidation (`SCAN MATCH` + batched `DEL`), never
//!   `KEYS`
//! - Auto-reconnecting [`ConnectionManager`], created lazily on first use so a
//!   server that is down at startup only fails the calls that need it
//!
//! ## Example
//!
//! ```ignore
//! use fcache_providers::cache::RedisCacheProvider;
//!
//! let provider = RedisCacheProvider::new("redis://localhost:6379")?
//!     .with_scan_batch_size(500);
//! ```

use crate::constants::REDIS_DEFAULT_SCAN_BATCH;
use async_trait::async_trait;
use fcache_domain::error::{Error, Result};
use fcache_domain::ports::providers::cache::{CacheEntryConfig, CacheProvider, CacheStats};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::OnceCell;

/// Redis cache provider
#[derive(Clone)]
pub struct RedisCacheProvider {
    client: Client,
    address: String,
    connection: Arc<OnceCell<ConnectionManager>>,
    scan_batch_size: usize,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl RedisCacheProvider {
    /// Create a provider for the given connection URL
    ///
    /// Only the URL is validated here; no connection is attempted.
    pub fn new(connection_string: &str) -> Result<Self> {
        let client = Client::open(connection_string).map_err(|e| {
            Error::infrastructure_with_source(format!("Failed to create Redis client: {e}"), e)
        })?;

        Ok(Self {
            client,
            address: redact_credentials(connection_string),
            connection: Arc::new(OnceCell::new()),
            scan_batch_size: REDIS_DEFAULT_SCAN_BATCH,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Create a provider with host and port
    pub fn with_host_port(host: &str, port: u16) -> Result<Self> {
        Self::new(&format!("redis://{host}:{port}"))
    }

    /// `COUNT` hint for each `SCAN` round trip
    pub fn with_scan_batch_size(mut self, size: usize) -> Self {
        self.scan_batch_size = size.max(1);
        self
    }

    /// Server address description
    pub fn server_address(&self) -> &str {
        &self.address
    }

    async fn get_connection(&self) -> Result<ConnectionManager> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                self.client.get_connection_manager().await.map_err(|e| {
                    Error::infrastructure_with_source(
                        format!("Failed to get Redis connection: {e}"),
                        e,
                    )
                })
            })
            .await?;
        Ok(manager.clone())
    }

    fn record(&self, hit: bool) {
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    async fn dbsize(&self) -> Result<u64> {
        let mut conn = self.get_connection().await?;
        redis::cmd("DBSIZE")
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("DBSIZE", e))
    }
}

/// Drop any `user:password@` part of a connection URL
fn redact_credentials(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}{}", &url[..scheme_end + 3], &url[at + 1..])
        }
        _ => url.to_string(),
    }
}

fn redis_error(command: &str, e: redis::RedisError) -> Error {
    Error::infrastructure_with_source(format!("Redis {command} failed: {e}"), e)
}

/// Build a `SCAN MATCH` pattern that matches keys starting with `prefix`
///
/// Glob metacharacters in the prefix are escaped so they match literally.
pub fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('*');
    pattern
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.get_connection().await?;
        let value: Option<String> = conn.get(key).await.map_err(|e| redis_error("GET", e))?;
        self.record(value.is_some());
        Ok(value)
    }

    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()> {
        config.validate()?;
        let ttl_ms = u64::try_from(config.effective_ttl().as_millis())
            .unwrap_or(u64::MAX)
            .max(1);

        let mut conn = self.get_connection().await?;
        let (): () = conn
            .pset_ex(key, value, ttl_ms)
            .await
            .map_err(|e| redis_error("PSETEX", e))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let deleted: u64 = conn.del(key).await.map_err(|e| redis_error("DEL", e))?;
        Ok(deleted > 0)
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64> {
        let pattern = prefix_pattern(prefix);
        let mut conn = self.get_connection().await?;
        let mut cursor: u64 = 0;
        let mut removed: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(self.scan_batch_size)
                .query_async(&mut conn)
                .await
                .map_err(|e| redis_error("SCAN", e))?;

            if !keys.is_empty() {
                let deleted: u64 = conn.del(&keys).await.map_err(|e| redis_error("DEL", e))?;
                removed += deleted;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        tracing::debug!(prefix = %prefix, removed, "redis prefix invalidation finished");
        Ok(removed)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        conn.exists(key).await.map_err(|e| redis_error("EXISTS", e))
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.get_connection().await?;
        redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("FLUSHDB", e))
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.get_connection().await?;
        let reply: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("PING", e))?;
        if reply.eq_ignore_ascii_case("PONG") {
            Ok(())
        } else {
            Err(Error::infrastructure(format!(
                "Redis PING returned unexpected reply: {reply}"
            )))
        }
    }

    async fn stats(&self) -> Result<CacheStats> {
        let entries = self.dbsize().await?;
        let mut stats = CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
            // The server reclaims expired keys itself
            active_entries: entries,
            expired_entries: 0,
            hit_rate: 0.0,
        };
        stats.hit_rate = stats.calculate_hit_rate();
        Ok(stats)
    }

    async fn size(&self) -> Result<usize> {
        let entries = self.dbsize().await?;
        Ok(usize::try_from(entries).unwrap_or(usize::MAX))
    }

    fn provider_name(&self) -> &str {
        "redis"
    }
}

impl std::fmt::Debug for RedisCacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheProvider")
            .field("server", &self.server_address())
            .field("scan_batch_size", &self.scan_batch_size)
            .field("connected", &self.connection.initialized())
            .finish()
    }
}
