//! Dashboard assembly.
//!
//! Runs every aggregation over one table and collects the results in the
//! shape a presentation layer consumes.

use super::aggregator::{self, Share, COFFEE_CATEGORY, TOP_PRODUCTS_LIMIT};
use crate::error::EngineError;
use crate::models::{Hour, Month, SalesTable, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// Knobs for building a dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardOptions {
    /// How many products the top products ranking keeps.
    pub top_products: usize,
    /// Category whose product mix is broken down.
    pub spotlight_category: String,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            top_products: TOP_PRODUCTS_LIMIT,
            spotlight_category: COFFEE_CATEGORY.to_string(),
        }
    }
}

/// Headline metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_revenue: Decimal,
    pub total_orders: usize,
    pub average_order_value: Decimal,
    pub peak_location: String,
    pub peak_location_revenue: Decimal,
}

impl Kpis {
    /// Compute the headline metrics. Fails on an empty table.
    pub fn compute(table: &SalesTable) -> Result<Self, EngineError> {
        let (peak_location, peak_location_revenue) = aggregator::peak_sales_location(table)?;

        Ok(Self {
            total_revenue: aggregator::total_revenue(table),
            total_orders: aggregator::total_orders(table),
            average_order_value: aggregator::average_order_value(table)?,
            peak_location,
            peak_location_revenue,
        })
    }
}

/// Every dataset the dashboard shows.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub kpis: Kpis,
    pub sales_by_month: Vec<(Month, Decimal)>,
    pub sales_by_location: Vec<Share<Decimal>>,
    pub top_products: Vec<(String, Decimal)>,
    pub average_order_value_by_category: Vec<(String, Decimal)>,
    pub category_popularity: Vec<(String, usize)>,
    pub orders_per_hour: Vec<(Hour, usize)>,
    pub orders_per_weekday: Vec<(Weekday, usize)>,
    pub spotlight_category: String,
    pub product_distribution: Vec<Share<usize>>,
}

impl Dashboard {
    /// Build the dashboard for `table`.
    ///
    /// Returns `EngineError::EmptyInput` when the table has no rows, since
    /// the KPIs are undefined then.
    pub fn build(table: &SalesTable, options: &DashboardOptions) -> Result<Self, EngineError> {
        debug!(
            "Building dashboard over {} rows (top {}, spotlight '{}')",
            table.len(),
            options.top_products,
            options.spotlight_category
        );

        let kpis = Kpis::compute(table)?;

        let product_distribution =
            aggregator::product_distribution(table, &options.spotlight_category);

        Ok(Self {
            kpis,
            sales_by_month: aggregator::revenue_by_month(table),
            sales_by_location: aggregator::with_shares(aggregator::revenue_by_location(table)),
            top_products: aggregator::top_products_by_revenue(table, options.top_products),
            average_order_value_by_category: aggregator::average_order_value_by_category(table),
            category_popularity: aggregator::category_popularity(table),
            orders_per_hour: aggregator::orders_per_hour(table),
            orders_per_weekday: aggregator::orders_per_weekday(table),
            spotlight_category: options.spotlight_category.clone(),
            product_distribution: aggregator::with_shares(product_distribution),
        })
    }

    /// Hour with the most orders, if any.
    pub fn peak_hour(&self) -> Option<(Hour, usize)> {
        self.orders_per_hour
            .iter()
            .copied()
            .reduce(|best, next| if next.1 > best.1 { next } else { best })
    }

    /// Weekday with the most orders. Ties go to the earlier day.
    pub fn peak_day(&self) -> Option<(Weekday, usize)> {
        self.orders_per_weekday
            .iter()
            .copied()
            .reduce(|best, next| if next.1 > best.1 { next } else { best })
    }
}
