//! # fcache Domain Layer
//!
//! Core types and port traits for the fallback cache and the concurrent
//! batch orchestrator. This crate has no knowledge of Redis, Tokio tasks or
//! configuration files; those live in the infrastructure and provider crates.
//!
//! ## Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Domain error type and `Result` alias |
//! | [`constants`] | Default TTLs and dashboard key layout |
//! | [`ports`] | Cache provider and cache store contracts |
//! | [`value_objects`] | Fetch descriptors, batch slots, dashboard sections |

pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
