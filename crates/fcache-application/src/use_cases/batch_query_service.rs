//! Batch Query Service Use Case
//!
//! Runs a batch of independent fetch descriptors against the cache store:
//!
//! 1. every descriptor is validated before any work starts;
//! 2. cacheable descriptors are looked up one after another;
//! 3. misses run concurrently, one task each, on a `JoinSet`;
//! 4. fresh results are written back from inside their task;
//! 5. slots are placed by index once every task has settled.
//!
//! A failing, panicking or timed-out operation only affects its own slot. The
//! `JoinSet` aborts any task still running if the batch future is dropped.

use crate::ports::services::BatchQueryServiceInterface;
use async_trait::async_trait;
use fcache_domain::error::Result;
use fcache_domain::ports::infrastructure::CacheStoreInterface;
use fcache_domain::ports::providers::CacheEntryConfig;
use fcache_domain::value_objects::{
    BatchOutcome, BatchReport, BatchSlot, CacheStoreStats, FetchDescriptor, FetchError,
    FetchOperation, FetchSpec,
};
use futures::FutureExt;
use std::collections::HashSet;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Why an operation produced no value
enum Failure {
    Error(FetchError),
    Panicked(String),
    TimedOut(Duration),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(e) => write!(f, "{e}"),
            Self::Panicked(message) => write!(f, "panicked: {message}"),
            Self::TimedOut(limit) => write!(f, "timed out after {}ms", limit.as_millis()),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

/// Cache-aware concurrent batch executor
#[derive(Clone)]
pub struct BatchQueryService {
    cache: Arc<dyn CacheStoreInterface>,
    default_timeout: Option<Duration>,
}

impl BatchQueryService {
    /// Create a service over the given cache store
    pub fn new(cache: Arc<dyn CacheStoreInterface>) -> Self {
        Self {
            cache,
            default_timeout: None,
        }
    }

    /// Deadline for descriptors that do not carry their own
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout.filter(|t| !t.is_zero());
        self
    }

    /// The underlying cache store
    pub fn cache(&self) -> &Arc<dyn CacheStoreInterface> {
        &self.cache
    }

    fn log_duplicate_keys(descriptors: &[FetchDescriptor]) {
        let mut seen = HashSet::new();
        for spec in descriptors.iter().map(FetchDescriptor::spec) {
            if let Some(key) = spec.cache_key.as_deref() {
                if !seen.insert(key) {
                    debug!(
                        key = %key,
                        descriptor = %spec.name,
                        "duplicate cache key in batch, last writer wins"
                    );
                }
            }
        }
    }
}

/// Run one operation and write its result back to the cache
///
/// Never panics and never errors: every outcome is folded into the returned
/// slot value.
async fn run_descriptor(
    index: usize,
    spec: FetchSpec,
    operation: FetchOperation,
    timeout: Option<Duration>,
    cache: Option<Arc<dyn CacheStoreInterface>>,
) -> (usize, Option<serde_json::Value>) {
    let call = AssertUnwindSafe(async move { operation().await }).catch_unwind();
    let settled = match timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| Failure::TimedOut(limit)),
        None => Ok(call.await),
    };
    let outcome = match settled {
        Ok(Ok(Ok(value))) => Ok(value),
        Ok(Ok(Err(e))) => Err(Failure::Error(e)),
        Ok(Err(payload)) => Err(Failure::Panicked(panic_message(payload.as_ref()))),
        Err(timed_out) => Err(timed_out),
    };

    match outcome {
        Ok(value) => {
            if let (Some(cache), Some(key)) = (cache, spec.cache_key.as_deref()) {
                let config = CacheEntryConfig { ttl: spec.ttl };
                match cache.set_value(key, &value, config).await {
                    Ok(true) => {}
                    Ok(false) => debug!(
                        descriptor = %spec.name,
                        key = %key,
                        "result cached locally only"
                    ),
                    Err(e) => warn!(
                        descriptor = %spec.name,
                        key = %key,
                        error = %e,
                        "result could not be cached"
                    ),
                }
            }
            (index, Some(value))
        }
        Err(failure) => {
            warn!(descriptor = %spec.name, error = %failure, "batch operation failed");
            (index, None)
        }
    }
}

#[async_trait]
impl BatchQueryServiceInterface for BatchQueryService {
    async fn execute_batch(
        &self,
        descriptors: Vec<FetchDescriptor>,
        use_cache: bool,
    ) -> Result<Vec<BatchSlot>> {
        Ok(self.execute_batch_report(descriptors, use_cache).await?.slots)
    }

    async fn execute_batch_report(
        &self,
        descriptors: Vec<FetchDescriptor>,
        use_cache: bool,
    ) -> Result<BatchOutcome> {
        let started = Instant::now();
        if descriptors.is_empty() {
            return Ok(BatchOutcome {
                slots: Vec::new(),
                report: BatchReport::default(),
            });
        }

        for descriptor in &descriptors {
            descriptor.spec().validate()?;
        }
        Self::log_duplicate_keys(&descriptors);

        let mut slots: Vec<Option<BatchSlot>> = vec![None; descriptors.len()];
        let mut report = BatchReport::default();
        let mut misses = Vec::new();

        for (index, descriptor) in descriptors.into_iter().enumerate() {
            let (spec, operation) = descriptor.into_parts();
            if use_cache {
                if let Some(key) = spec.cache_key.as_deref() {
                    if let Some(value) = self.cache.get_value(key).await {
                        debug!(descriptor = %spec.name, key = %key, "served from cache");
                        slots[index] = Some(BatchSlot::Cached(value));
                        report.hits += 1;
                        continue;
                    }
                }
            }
            misses.push((index, spec, operation));
        }

        report.misses = misses.len();
        let mut tasks = JoinSet::new();
        for (index, spec, operation) in misses {
            let timeout = spec.timeout.or(self.default_timeout);
            let cache = use_cache.then(|| Arc::clone(&self.cache));
            tasks.spawn(run_descriptor(index, spec, operation, timeout, cache));
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Some(value))) => slots[index] = Some(BatchSlot::Fresh(value)),
                Ok((index, None)) => slots[index] = Some(BatchSlot::Failed),
                // Unreachable in practice: operations run under catch_unwind
                Err(e) => warn!(error = %e, "batch task did not complete"),
            }
        }

        let slots: Vec<BatchSlot> = slots
            .into_iter()
            .map(|slot| slot.unwrap_or(BatchSlot::Failed))
            .collect();
        report.failures = slots.iter().filter(|slot| slot.is_failed()).count();
        report.elapsed = started.elapsed();

        debug!(
            hits = report.hits,
            misses = report.misses,
            failures = report.failures,
            elapsed_ms = report.elapsed.as_millis(),
            "batch finished"
        );
        Ok(BatchOutcome { slots, report })
    }

    async fn invalidate_prefix(&self, prefix: &str) -> bool {
        self.cache.delete_by_prefix(prefix).await
    }

    async fn get_stats(&self) -> CacheStoreStats {
        self.cache.stats().await
    }

    async fn clear_all(&self) -> bool {
        self.cache.clear().await
    }
}

impl fmt::Debug for BatchQueryService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchQueryService")
            .field("mode", &self.cache.mode())
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}
