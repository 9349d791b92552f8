//! Domain value objects

/// Fetch descriptors and batch results
pub mod batch;
/// Cache store mode and statistics
pub mod cache;
/// Dashboard sections
pub mod dashboard;

pub use batch::{
    BatchOutcome, BatchReport, BatchSlot, FetchDescriptor, FetchError, FetchFuture,
    FetchOperation, FetchSpec,
};
pub use cache::{CacheStoreStats, ConnectionMode};
pub use dashboard::{
    AttendanceRecord, DailyTotals, Dashboard, DashboardOptions, DashboardStats, PeriodTotals,
    ProjectTotals, RecordsSection, SubordinateSummary,
};
