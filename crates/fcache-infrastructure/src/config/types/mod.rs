//! Configuration types, one module per section

pub mod app;
pub mod batch;
pub mod cache;
pub mod logging;

pub use app::AppConfig;
pub use batch::BatchConfig;
pub use cache::CacheConfig;
pub use logging::LoggingConfig;
