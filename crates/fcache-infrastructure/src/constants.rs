//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Domain-specific constants are defined in `fcache_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "fcache.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "fcache";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "FCACHE";

/// Separator for nested keys in environment variables (`FCACHE_CACHE__REDIS_URL`)
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// CACHE CONSTANTS
// ============================================================================

/// Default cache TTL in seconds
pub const CACHE_DEFAULT_TTL_SECS: u64 = fcache_domain::constants::DEFAULT_CACHE_TTL_SECS;

/// Default capacity of the in-process store
pub const CACHE_DEFAULT_MAX_LOCAL_ENTRIES: usize =
    fcache_providers::constants::MEMORY_DEFAULT_MAX_ENTRIES;

/// Default `SCAN COUNT` hint for prefix invalidation
pub const CACHE_DEFAULT_SCAN_BATCH: usize = fcache_providers::constants::REDIS_DEFAULT_SCAN_BATCH;

/// Default deadline for a single remote cache call, in milliseconds
pub const CACHE_REMOTE_TIMEOUT_MS: u64 = 500;

/// Default interval between health probes, in seconds
pub const CACHE_HEALTH_CHECK_INTERVAL_SECS: u64 = 15;

/// Consecutive successful probes required to leave fallback mode
pub const CACHE_RECOVERY_THRESHOLD: u32 = 3;

/// Distinct invalidations kept for replay during one outage
pub const CACHE_PENDING_INVALIDATIONS_LIMIT: usize = 1024;

/// Replay passes attempted per recovery before giving up until the next probe
pub const CACHE_RECOVERY_REPLAY_ROUNDS: usize = 3;

/// Remote write attempts when a write races the switch back to the remote
pub const CACHE_REMOTE_WRITE_ATTEMPTS: usize = 3;

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable holding a tracing filter directive
pub const LOG_FILTER_ENV_VAR: &str = "FCACHE_LOG";
