//! Brewstats - sales dashboard analytics.
//!
//! Loads a coffee shop sales export into an immutable [`models::SalesTable`],
//! computes the dashboard KPIs and datasets with the pure functions in
//! [`analysis`], and renders them through [`report`].

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod report;

pub use error::{DataQualityWarning, EngineError};
pub use models::{Hour, Month, SalesRecord, SalesTable, Weekday};
