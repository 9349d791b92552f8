//! Cache store
//!
//! Composes a remote provider and an in-process provider into one store that
//! never lets a backend outage reach its callers.
//!
//! ## Connection modes
//!
//! ```text
//!             remote failure               N consecutive probe successes
//! RemoteActive ──────────────▶ LocalFallback ─────────────────────────────▶ RemoteActive
//!                                          (pending invalidations replayed)
//! ```
//!
//! Without a configured remote the store is `LocalOnly` for its lifetime.

mod factory;
mod health;
mod invalidation;
mod key;
mod mode;
mod store;

pub use factory::build_cache_store;
pub use health::spawn_health_monitor;
pub use invalidation::PendingInvalidation;
pub use key::Keyspace;
pub use store::CacheStore;
