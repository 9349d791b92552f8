//! Application ports

/// Record store read by the dashboard
pub mod data_source;
/// Service interfaces
pub mod services;

pub use data_source::DashboardDataSource;
pub use services::{BatchQueryServiceInterface, DashboardServiceInterface};
