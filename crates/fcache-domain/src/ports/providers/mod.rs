//! External service provider ports

/// Cache backend provider port
pub mod cache;

pub use cache::{CacheEntryConfig, CacheProvider, CacheStats};
