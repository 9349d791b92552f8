//! Application Layer - fcache
//!
//! Use cases built on the cache store port:
//!
//! - [`use_cases::BatchQueryService`]: runs a batch of named fetch operations
//!   concurrently, short-circuiting on cache hits, and returns one slot per
//!   operation in input order
//! - [`use_cases::DashboardService`]: fixed three-section batch per principal,
//!   invalidated as a unit by key prefix
//!
//! ## Ports (Interfaces)
//!
//! - `ports::services::*`: service interfaces consumed by the outer layers
//! - `ports::data_source::*`: the record store the dashboard reads from
//!
//! ## Dependencies
//!
//! This crate depends only on `fcache-domain`; the cache store implementation
//! is injected.

pub mod ports;
pub mod use_cases;

pub use ports::*;
pub use use_cases::*;
