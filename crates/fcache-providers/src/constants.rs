//! Provider-specific constants

/// Default capacity of the in-process cache, in entries
pub const MEMORY_DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Default Redis connection URL
pub const REDIS_DEFAULT_URL: &str = "redis://127.0.0.1:6379";

/// Keys requested per `SCAN` round trip during prefix deletion
pub const REDIS_DEFAULT_SCAN_BATCH: usize = 100;
