//! Use case implementations

pub mod attendance_stats;
pub mod batch_query_service;
pub mod dashboard_service;

pub use attendance_stats::{aggregate_stats, month_start};
pub use batch_query_service::BatchQueryService;
pub use dashboard_service::{DashboardService, dashboard_keys, dashboard_prefix};
