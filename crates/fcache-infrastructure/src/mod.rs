//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns that support the application and domain
//! layers. Storage backends live in `fcache-providers`; this crate composes
//! them into the fallback-aware cache store and wires configuration and
//! logging around it.
//!
//! ### Data & Storage
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Remote-or-local cache store, connection mode, health probe |
//!
//! ### Configuration
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-based TOML + environment configuration |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |

pub mod cache;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;

// Re-export commonly used types
pub use cache::{CacheStore, build_cache_store, spawn_health_monitor};
pub use config::{AppConfig, ConfigLoader};
pub use error_ext::ErrorContext;
