//! Dashboard value objects
//!
//! The dashboard is the structured, named-section view built on top of a
//! positional batch. Every section has an empty default so that a failing
//! data source degrades the section instead of failing the request.

use crate::constants::DASHBOARD_DEFAULT_LIMIT;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Caller options for a dashboard request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardOptions {
    /// Maximum rows in each list section
    pub limit_per_section: usize,
    /// Restrict the records section to the current day
    pub recent_only: bool,
    /// Consult and populate the cache store
    pub use_cache: bool,
    /// Reference day for "today" and "this month"; defaults to the UTC date
    pub as_of: Option<NaiveDate>,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            limit_per_section: DASHBOARD_DEFAULT_LIMIT,
            recent_only: true,
            use_cache: true,
            as_of: None,
        }
    }
}

/// A subordinate (worker) created by the principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubordinateSummary {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub code: Option<String>,
}

/// One attendance entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: String,
    pub worker_id: String,
    pub worker_name: Option<String>,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    /// Day the work was done
    pub date: NaiveDate,
    /// Hours worked
    pub hours: f64,
    pub created_at: DateTime<Utc>,
}

/// Most recent records plus the total matching the same filter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordsSection {
    pub total_count: u64,
    pub records: Vec<AttendanceRecord>,
}

/// Count and hour sum over some period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub count: u64,
    pub total_hours: f64,
}

impl PeriodTotals {
    /// Fold one record into the totals
    pub fn add(&mut self, hours: f64) {
        self.count += 1;
        self.total_hours += hours;
    }
}

/// Totals for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub totals: PeriodTotals,
}

/// Totals for one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTotals {
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    #[serde(flatten)]
    pub totals: PeriodTotals,
}

/// Pre-aggregated statistics section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub today: PeriodTotals,
    pub month: PeriodTotals,
    /// One bucket per day with records, oldest first
    pub daily: Vec<DailyTotals>,
    /// Projects ranked by hours, descending
    pub projects: Vec<ProjectTotals>,
}

/// The assembled dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub subordinates: Vec<SubordinateSummary>,
    pub records: RecordsSection,
    pub stats: DashboardStats,
    /// Names of sections that fell back to their empty default
    pub degraded_sections: Vec<String>,
}

impl Dashboard {
    /// Whether every section was produced
    pub fn is_complete(&self) -> bool {
        self.degraded_sections.is_empty()
    }
}
