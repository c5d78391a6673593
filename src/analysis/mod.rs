//! Analysis modules.
//!
//! The aggregator holds the individual engine operations; the dashboard
//! module runs all of them to produce the full set of KPIs and datasets.

pub mod aggregator;
pub mod dashboard;

pub use aggregator::*;
pub use dashboard::{Dashboard, DashboardOptions, Kpis};
