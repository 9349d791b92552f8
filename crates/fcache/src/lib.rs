//! # fcache
//!
//! A cache store that prefers Redis and falls back to an in-process store
//! when Redis is unreachable, plus an orchestrator that runs a batch of
//! independent, optionally cached fetch operations concurrently.
//!
//! ## Example
//!
//! ```
//! use fcache::application::{BatchQueryService, BatchQueryServiceInterface};
//! use fcache::domain::value_objects::FetchDescriptor;
//! use fcache::infrastructure::cache::CacheStore;
//! use fcache::providers::cache::MemoryCacheProvider;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> fcache::Result<()> {
//! let store = Arc::new(CacheStore::local_only(Arc::new(MemoryCacheProvider::new())));
//! let service = BatchQueryService::new(store);
//!
//! let slots = service
//!     .execute_batch(
//!         vec![
//!             FetchDescriptor::new("workers", || async { Ok::<_, std::io::Error>(3) })
//!                 .with_cache_key("U1_dash_workers")
//!                 .with_ttl_secs(300),
//!         ],
//!         true,
//!     )
//!     .await?;
//! assert_eq!(slots[0].decode::<u32>(), Some(3));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - `domain` - ports, value objects and the error type
//! - `application` - batch orchestrator and dashboard use cases
//! - `providers` - in-process, Redis and null cache backends
//! - `infrastructure` - the fallback-aware cache store, config and logging
//! - `bootstrap` - builds everything from an `AppConfig`

/// Domain layer - ports, value objects and errors
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use fcache_domain::*;
}

/// Application layer - use cases
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use fcache_application::*;
}

/// Cache backends
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use fcache_providers::*;
}

/// Infrastructure layer - cache store, config and logging
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use fcache_infrastructure::*;
}

/// Composition root
pub mod bootstrap;
/// Maintenance command line
pub mod cli;

// Re-export commonly used types at the crate root
pub use bootstrap::{AppContext, init_app};
pub use domain::{Error, Result};
pub use infrastructure::{AppConfig, CacheStore, ConfigLoader, build_cache_store};
