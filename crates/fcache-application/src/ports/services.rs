//! Service interfaces

use async_trait::async_trait;
use fcache_domain::error::Result;
use fcache_domain::value_objects::{
    BatchOutcome, BatchSlot, CacheStoreStats, Dashboard, DashboardOptions, FetchDescriptor,
};

/// Concurrent batch execution over the cache store
#[async_trait]
pub trait BatchQueryServiceInterface: Send + Sync {
    /// Run every descriptor and return one slot per descriptor, in input order
    ///
    /// Fails only when a descriptor is malformed, before any work starts.
    /// Failing operations become [`BatchSlot::Failed`].
    async fn execute_batch(
        &self,
        descriptors: Vec<FetchDescriptor>,
        use_cache: bool,
    ) -> Result<Vec<BatchSlot>>;

    /// Same as [`Self::execute_batch`], with hit/miss/failure counters
    async fn execute_batch_report(
        &self,
        descriptors: Vec<FetchDescriptor>,
        use_cache: bool,
    ) -> Result<BatchOutcome>;

    /// Drop every cached result whose key starts with `prefix`
    async fn invalidate_prefix(&self, prefix: &str) -> bool;

    /// Cache statistics for maintenance endpoints
    async fn get_stats(&self) -> CacheStoreStats;

    /// Drop every cached result; not meant for the request path
    async fn clear_all(&self) -> bool;
}

/// Per-principal dashboard
#[async_trait]
pub trait DashboardServiceInterface: Send + Sync {
    /// Assemble the dashboard; failed sections come back empty and are
    /// listed in [`Dashboard::degraded_sections`]
    async fn fetch_dashboard(
        &self,
        principal_id: &str,
        options: DashboardOptions,
    ) -> Result<Dashboard>;

    /// Invalidate every cached section of `principal_id`'s dashboard
    async fn invalidate_dashboard(&self, principal_id: &str) -> bool;
}
