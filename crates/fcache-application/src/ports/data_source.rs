//! Dashboard data source port
//!
//! The persistence layer behind the dashboard. Implementations live with the
//! CRUD backend; this crate only needs these three reads.

use async_trait::async_trait;
use chrono::NaiveDate;
use fcache_domain::error::Result;
use fcache_domain::value_objects::{AttendanceRecord, RecordsSection, SubordinateSummary};

/// Reads backing the dashboard sections
#[async_trait]
pub trait DashboardDataSource: Send + Sync {
    /// Most recently created subordinates of `principal_id`, newest first
    async fn recent_subordinates(
        &self,
        principal_id: &str,
        limit: usize,
    ) -> Result<Vec<SubordinateSummary>>;

    /// Most recent attendance records visible to `principal_id`, plus the
    /// total matching the same filter
    ///
    /// `day` restricts both the rows and the total to one date.
    async fn recent_records(
        &self,
        principal_id: &str,
        day: Option<NaiveDate>,
        limit: usize,
    ) -> Result<RecordsSection>;

    /// Every record dated on or after `since`
    async fn records_since(
        &self,
        principal_id: &str,
        since: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>>;
}
