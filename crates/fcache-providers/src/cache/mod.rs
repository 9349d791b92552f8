//! Cache Provider Implementations
//!
//! ## Provider Selection Guide
//!
//! - **Single instance / fallback**: `MemoryCacheProvider`
//! - **Multi instance**: `RedisCacheProvider`, paired with a
//!   `MemoryCacheProvider` by the cache store for outages
//! - **Caching disabled**: `NullCacheProvider`

pub mod memory;
pub mod null;
#[cfg(feature = "cache-redis")]
pub mod redis;

// Re-export for convenience
pub use memory::MemoryCacheProvider;
pub use null::NullCacheProvider;
#[cfg(feature = "cache-redis")]
pub use redis::RedisCacheProvider;

// Re-export domain types used by cache providers
pub use fcache_domain::ports::providers::cache::{CacheEntryConfig, CacheStats};
