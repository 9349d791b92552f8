//! Dashboard Service Use Case
//!
//! A fixed three-descriptor batch per principal. Every section is cached
//! under the principal's dashboard prefix, so one prefix invalidation after a
//! write drops the whole dashboard.

use super::attendance_stats::{aggregate_stats, month_start};
use crate::ports::data_source::DashboardDataSource;
use crate::ports::services::{BatchQueryServiceInterface, DashboardServiceInterface};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use fcache_domain::constants::{
    DASHBOARD_KEY_SUFFIX, DASHBOARD_RECORDS_TTL_SECS, DASHBOARD_STATS_TTL_SECS,
    DASHBOARD_SUBORDINATES_TTL_SECS, DASHBOARD_TOP_PROJECTS,
};
use fcache_domain::error::{Error, Result};
use fcache_domain::value_objects::{BatchSlot, Dashboard, DashboardOptions, FetchDescriptor};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

/// Section names, also used in `degraded_sections`
mod sections {
    pub const SUBORDINATES: &str = "subordinates";
    pub const RECORDS: &str = "records";
    pub const STATS: &str = "stats";
}

/// Cache key prefix shared by every section of `principal_id`'s dashboard
pub fn dashboard_prefix(principal_id: &str) -> String {
    format!("{principal_id}{DASHBOARD_KEY_SUFFIX}")
}

fn reference_day(options: &DashboardOptions) -> NaiveDate {
    options.as_of.unwrap_or_else(|| Utc::now().date_naive())
}

/// Cache keys of the subordinates, records and stats sections, in that order
///
/// Every parameter that changes a section's content is part of its key; all
/// keys share [`dashboard_prefix`].
pub fn dashboard_keys(principal_id: &str, options: &DashboardOptions) -> [String; 3] {
    let prefix = dashboard_prefix(principal_id);
    let day = reference_day(options);
    let limit = options.limit_per_section;
    let records = if options.recent_only {
        format!("{prefix}records_today_{day}_{limit}")
    } else {
        format!("{prefix}records_all_{limit}")
    };
    [
        format!("{prefix}subordinates_{limit}"),
        records,
        format!("{prefix}stats_{day}"),
    ]
}

/// Dashboard assembly over the batch orchestrator
pub struct DashboardService {
    batch: Arc<dyn BatchQueryServiceInterface>,
    source: Arc<dyn DashboardDataSource>,
}

impl DashboardService {
    /// Create a dashboard service
    pub fn new(
        batch: Arc<dyn BatchQueryServiceInterface>,
        source: Arc<dyn DashboardDataSource>,
    ) -> Self {
        Self { batch, source }
    }

    fn descriptors(&self, principal_id: &str, options: DashboardOptions) -> Vec<FetchDescriptor> {
        let [subordinates_key, records_key, stats_key] = dashboard_keys(principal_id, &options);
        let today = reference_day(&options);
        let limit = options.limit_per_section;

        let subordinates = {
            let source = Arc::clone(&self.source);
            let principal = principal_id.to_string();
            FetchDescriptor::new(sections::SUBORDINATES, move || async move {
                source.recent_subordinates(&principal, limit).await
            })
            .with_cache_key(subordinates_key)
            .with_ttl_secs(DASHBOARD_SUBORDINATES_TTL_SECS)
        };

        let records = {
            let source = Arc::clone(&self.source);
            let principal = principal_id.to_string();
            let day = options.recent_only.then_some(today);
            FetchDescriptor::new(sections::RECORDS, move || async move {
                source.recent_records(&principal, day, limit).await
            })
            .with_cache_key(records_key)
            .with_ttl_secs(DASHBOARD_RECORDS_TTL_SECS)
        };

        let stats = {
            let source = Arc::clone(&self.source);
            let principal = principal_id.to_string();
            FetchDescriptor::new(sections::STATS, move || async move {
                let records = source.records_since(&principal, month_start(today)).await?;
                Ok::<_, Error>(aggregate_stats(&records, today, DASHBOARD_TOP_PROJECTS))
            })
            .with_cache_key(stats_key)
            .with_ttl_secs(DASHBOARD_STATS_TTL_SECS)
        };

        vec![subordinates, records, stats]
    }
}

/// Decode a section, substituting its empty default on failure
fn section<T>(slot: &BatchSlot, name: &str, degraded: &mut Vec<String>) -> T
where
    T: DeserializeOwned + Default,
{
    if let Some(value) = slot.decode::<T>() {
        return value;
    }
    if !slot.is_failed() {
        warn!(section = name, "dashboard section has unexpected shape");
    }
    degraded.push(name.to_string());
    T::default()
}

#[async_trait]
impl DashboardServiceInterface for DashboardService {
    async fn fetch_dashboard(
        &self,
        principal_id: &str,
        options: DashboardOptions,
    ) -> Result<Dashboard> {
        if principal_id.trim().is_empty() {
            return Err(Error::invalid_argument("principal id cannot be empty"));
        }
        if options.limit_per_section == 0 {
            return Err(Error::invalid_argument(
                "dashboard section limit must be greater than zero",
            ));
        }

        let descriptors = self.descriptors(principal_id, options);
        let outcome = self
            .batch
            .execute_batch_report(descriptors, options.use_cache)
            .await?;
        debug!(
            principal = %principal_id,
            hits = outcome.report.hits,
            misses = outcome.report.misses,
            failures = outcome.report.failures,
            "dashboard assembled"
        );

        let [subordinates, records, stats]: [BatchSlot; 3] = outcome
            .slots
            .try_into()
            .map_err(|_| Error::internal("dashboard batch returned the wrong number of slots"))?;

        let mut degraded = Vec::new();
        Ok(Dashboard {
            subordinates: section(&subordinates, sections::SUBORDINATES, &mut degraded),
            records: section(&records, sections::RECORDS, &mut degraded),
            stats: section(&stats, sections::STATS, &mut degraded),
            degraded_sections: degraded,
        })
    }

    async fn invalidate_dashboard(&self, principal_id: &str) -> bool {
        let prefix = dashboard_prefix(principal_id);
        debug!(prefix = %prefix, "invalidating dashboard");
        self.batch.invalidate_prefix(&prefix).await
    }
}
