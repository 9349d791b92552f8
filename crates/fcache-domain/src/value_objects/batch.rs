//! Batch query value objects
//!
//! A batch is an ordered list of [`FetchDescriptor`]s. The orchestrator
//! answers with one [`BatchSlot`] per descriptor, in the same order.

use crate::error::{Error, Result};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Error produced by a fetch operation
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

/// Future returned by a fetch operation
pub type FetchFuture = BoxFuture<'static, std::result::Result<serde_json::Value, FetchError>>;

/// Zero-argument producer of a JSON value, run at most once
pub type FetchOperation = Box<dyn FnOnce() -> FetchFuture + Send>;

/// Descriptor metadata: everything except the operation itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSpec {
    /// Name used in logs when the operation fails
    pub name: String,
    /// Cache key; `None` opts the descriptor out of caching
    pub cache_key: Option<String>,
    /// TTL for the cached result; `None` uses the store default
    pub ttl: Option<Duration>,
    /// Per-operation deadline; elapsing counts as a failure
    pub timeout: Option<Duration>,
}

impl FetchSpec {
    /// Check the caller-supplied metadata
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_argument("fetch descriptor name cannot be empty"));
        }
        if self.cache_key.as_deref().is_some_and(str::is_empty) {
            return Err(Error::invalid_argument(format!(
                "fetch descriptor '{}' has an empty cache key",
                self.name
            )));
        }
        if self.ttl.is_some_and(|ttl| ttl.is_zero()) {
            return Err(Error::invalid_argument(format!(
                "fetch descriptor '{}' has a zero TTL",
                self.name
            )));
        }
        if self.timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(Error::invalid_argument(format!(
                "fetch descriptor '{}' has a zero timeout",
                self.name
            )));
        }
        Ok(())
    }
}

/// A named, optionally cacheable unit of work
///
/// # Example
///
/// ```
/// use fcache_domain::value_objects::FetchDescriptor;
///
/// let descriptor = FetchDescriptor::new("workers", || async {
///     Ok::<_, std::io::Error>(vec!["ayse", "mehmet"])
/// })
/// .with_cache_key("U1_dash_workers")
/// .with_ttl_secs(300);
///
/// assert_eq!(descriptor.spec().cache_key.as_deref(), Some("U1_dash_workers"));
/// ```
pub struct FetchDescriptor {
    spec: FetchSpec,
    operation: FetchOperation,
}

impl FetchDescriptor {
    /// Wrap a typed async producer; its output is serialized to JSON
    pub fn new<F, Fut, T, E>(name: impl Into<String>, operation: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: Serialize,
        E: Into<FetchError>,
    {
        let operation: FetchOperation = Box::new(move || {
            async move {
                let value: T = operation().await.map_err(Into::<FetchError>::into)?;
                serde_json::to_value(value).map_err(|e| Box::new(e) as FetchError)
            }
            .boxed()
        });

        Self {
            spec: FetchSpec {
                name: name.into(),
                cache_key: None,
                ttl: None,
                timeout: None,
            },
            operation,
        }
    }

    /// Cache the result under `key`
    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.spec.cache_key = Some(key.into());
        self
    }

    /// TTL for the cached result
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.spec.ttl = Some(ttl);
        self
    }

    /// TTL in seconds
    pub fn with_ttl_secs(self, secs: u64) -> Self {
        self.with_ttl(Duration::from_secs(secs))
    }

    /// Deadline for the operation
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.spec.timeout = Some(timeout);
        self
    }

    /// Descriptor metadata
    pub fn spec(&self) -> &FetchSpec {
        &self.spec
    }

    /// Split into metadata and the operation to run
    pub fn into_parts(self) -> (FetchSpec, FetchOperation) {
        (self.spec, self.operation)
    }
}

impl fmt::Debug for FetchDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchDescriptor")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// Result slot for one descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum BatchSlot {
    /// Served from the cache store
    Cached(serde_json::Value),
    /// Computed by running the operation
    Fresh(serde_json::Value),
    /// The operation failed, timed out or panicked
    Failed,
}

impl BatchSlot {
    /// The value, unless the slot is a failure placeholder
    pub fn value(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Cached(value) | Self::Fresh(value) => Some(value),
            Self::Failed => None,
        }
    }

    /// Consume the slot and return its value
    pub fn into_value(self) -> Option<serde_json::Value> {
        match self {
            Self::Cached(value) | Self::Fresh(value) => Some(value),
            Self::Failed => None,
        }
    }

    /// Whether this slot is the failure placeholder
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Whether this slot was a cache hit
    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached(_))
    }

    /// Decode the value as `T`; failures and shape mismatches give `None`
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        self.value()
            .and_then(|value| T::deserialize(value).ok())
    }

    /// Decode the value, substituting `T::default()` for failures
    pub fn decode_or_default<T: DeserializeOwned + Default>(&self) -> T {
        self.decode().unwrap_or_default()
    }
}

/// Counters for one batch call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Slots served from the cache
    pub hits: usize,
    /// Operations that ran
    pub misses: usize,
    /// Operations that failed
    pub failures: usize,
    /// Wall time of the whole batch
    pub elapsed: Duration,
}

/// Slots plus the report for one batch call
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// One slot per descriptor, in input order
    pub slots: Vec<BatchSlot>,
    /// Counters
    pub report: BatchReport,
}
