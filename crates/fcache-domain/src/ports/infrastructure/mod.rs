//! Infrastructure service ports

/// Remote-or-local cache store
pub mod cache_store;

pub use cache_store::{CacheStoreExt, CacheStoreInterface};
