//! Configuration
//!
//! Sources are layered by [`ConfigLoader`]: built-in defaults, then an
//! optional TOML file, then `FCACHE_`-prefixed environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, BatchConfig, CacheConfig, LoggingConfig};
