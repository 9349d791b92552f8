//! # fcache - Provider Implementations
//!
//! Storage backends implementing the [`CacheProvider`] port defined in
//! `fcache-domain`. Providers are deliberately dumb: they report failures
//! through `Result` and leave fallback decisions to the cache store.
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | [`cache::MemoryCacheProvider`] | Local | In-process map with lazy expiration |
//! | [`cache::RedisCacheProvider`] | Remote | Redis, shared across processes |
//! | [`cache::NullCacheProvider`] | Disabled | Stores nothing |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! fcache-providers = { version = "0.1", default-features = false }
//! ```
//!
//! disables the Redis provider and its dependency tree.

// Re-export fcache-domain types commonly used with providers
pub use fcache_domain::error::{Error, Result};
pub use fcache_domain::ports::providers::CacheProvider;

/// Provider-specific constants
pub mod constants;

/// Cache provider implementations
pub mod cache;
