//! Domain Port Interfaces
//!
//! Defines the boundary contracts between the domain and external layers.
//!
//! ## Organization
//!
//! - **infrastructure/** - Services the application layer consumes (cache store)
//! - **providers/** - Storage backends the infrastructure layer composes

/// Infrastructure service ports
pub mod infrastructure;
/// External service provider ports
pub mod providers;

// Re-export commonly used port traits for convenience
pub use infrastructure::{CacheStoreExt, CacheStoreInterface};
pub use providers::{CacheEntryConfig, CacheProvider, CacheStats};
