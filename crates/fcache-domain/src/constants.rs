//! Domain layer constants
//!
//! Contains constants that are part of the domain logic and are used by
//! the application layer. Infrastructure-specific constants remain in
//! `fcache_infrastructure::constants`.

// ============================================================================
// CACHE DOMAIN CONSTANTS
// ============================================================================

/// Default TTL for cache entries (5 minutes)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

// ============================================================================
// DASHBOARD DOMAIN CONSTANTS
// ============================================================================

/// Suffix appended to a principal id to form the dashboard key prefix
pub const DASHBOARD_KEY_SUFFIX: &str = "_dash_";

/// Default number of rows per dashboard list section
pub const DASHBOARD_DEFAULT_LIMIT: usize = 20;

/// TTL of the subordinate list section (5 minutes)
pub const DASHBOARD_SUBORDINATES_TTL_SECS: u64 = 5 * 60;

/// TTL of the recent records section (2 minutes, changes more often)
pub const DASHBOARD_RECORDS_TTL_SECS: u64 = 2 * 60;

/// TTL of the pre-aggregated statistics section (10 minutes)
pub const DASHBOARD_STATS_TTL_SECS: u64 = 10 * 60;

/// Number of projects kept in the statistics ranking
pub const DASHBOARD_TOP_PROJECTS: usize = 5;
