//! Sales aggregation and KPI computation.
//!
//! Every operation here is a pure function of a [`SalesTable`]: partition the
//! rows by a key, aggregate each partition, then apply the ordering policy of
//! the operation. Partitions are emitted in the order their key first appears
//! in the table, so ties always resolve to the earliest row.

use crate::error::EngineError;
use crate::models::{Hour, Month, SalesRecord, SalesTable, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Number of products shown in the top products ranking.
pub const TOP_PRODUCTS_LIMIT: usize = 10;

/// Category whose product mix is broken down by default.
pub const COFFEE_CATEGORY: &str = "Coffee";

/// A labelled value together with its percentage of the dataset total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share<V> {
    pub label: String,
    pub value: V,
    /// Percentage of the total, rounded to two decimal places.
    pub percent: Decimal,
}

/// Partition records by `key`, folding each partition into an accumulator.
///
/// Groups come out in first-appearance order of their key.
fn group_by<'a, K, A>(
    records: impl IntoIterator<Item = &'a SalesRecord>,
    key: impl Fn(&'a SalesRecord) -> K,
    mut fold: impl FnMut(&mut A, &'a SalesRecord),
) -> Vec<(K, A)>
where
    K: Eq + Hash + Clone,
    A: Default,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, A)> = Vec::new();

    for record in records {
        let k = key(record);
        let slot = match index.get(&k) {
            Some(&slot) => slot,
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, A::default()));
                groups.len() - 1
            }
        };
        fold(&mut groups[slot].1, record);
    }

    groups
}

fn sum_sales_by<'a, K>(
    table: &'a SalesTable,
    key: impl Fn(&'a SalesRecord) -> K,
) -> Vec<(K, Decimal)>
where
    K: Eq + Hash + Clone,
{
    group_by(table.records(), key, |acc: &mut Decimal, r| *acc += r.sales)
}

fn count_by<'a, K>(
    records: impl IntoIterator<Item = &'a SalesRecord>,
    key: impl Fn(&'a SalesRecord) -> K,
) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
{
    group_by(records, key, |acc: &mut usize, _| *acc += 1)
}

fn owned<V>(groups: Vec<(&str, V)>) -> Vec<(String, V)> {
    groups
        .into_iter()
        .map(|(label, value)| (label.to_string(), value))
        .collect()
}

/// Sum of all sales. Zero for an empty table.
pub fn total_revenue(table: &SalesTable) -> Decimal {
    table.records().iter().map(|r| r.sales).sum()
}

/// Number of distinct order ids.
pub fn total_orders(table: &SalesTable) -> usize {
    table
        .records()
        .iter()
        .map(|r| r.id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Total revenue divided by the number of distinct orders.
pub fn average_order_value(table: &SalesTable) -> Result<Decimal, EngineError> {
    let orders = total_orders(table);
    if orders == 0 {
        return Err(EngineError::EmptyInput {
            operation: "average_order_value",
        });
    }

    Ok(total_revenue(table) / Decimal::from(orders))
}

/// Location with the highest summed sales, and that sum.
///
/// When several locations tie, the one seen first in the table wins.
pub fn peak_sales_location(table: &SalesTable) -> Result<(String, Decimal), EngineError> {
    let mut best: Option<(&str, Decimal)> = None;

    for (location, revenue) in sum_sales_by(table, |r| r.location.as_str()) {
        match best {
            Some((_, top)) if revenue <= top => {}
            _ => best = Some((location, revenue)),
        }
    }

    best.map(|(location, revenue)| (location.to_string(), revenue))
        .ok_or(EngineError::EmptyInput {
            operation: "peak_sales_location",
        })
}

/// Sales per month in calendar order. Months without rows are left out.
pub fn revenue_by_month(table: &SalesTable) -> Vec<(Month, Decimal)> {
    let mut months = sum_sales_by(table, |r| r.month);
    months.sort_by_key(|(month, _)| *month);
    months
}

/// Sales per location, in first-appearance order.
pub fn revenue_by_location(table: &SalesTable) -> Vec<(String, Decimal)> {
    owned(sum_sales_by(table, |r| r.location.as_str()))
}

/// The `limit` best-selling products by summed sales, highest first.
pub fn top_products_by_revenue(table: &SalesTable, limit: usize) -> Vec<(String, Decimal)> {
    let mut products = sum_sales_by(table, |r| r.product.as_str());
    products.sort_by(|a, b| b.1.cmp(&a.1));
    products.truncate(limit);
    owned(products)
}

/// Mean sale amount per category, highest first.
pub fn average_order_value_by_category(table: &SalesTable) -> Vec<(String, Decimal)> {
    let totals = group_by(
        table.records(),
        |r| r.category.as_str(),
        |acc: &mut (Decimal, usize), r| {
            acc.0 += r.sales;
            acc.1 += 1;
        },
    );

    let mut means: Vec<(&str, Decimal)> = totals
        .into_iter()
        .map(|(category, (sum, count))| (category, sum / Decimal::from(count)))
        .collect();
    means.sort_by(|a, b| b.1.cmp(&a.1));
    owned(means)
}

/// Row count per category, most frequent first.
pub fn category_popularity(table: &SalesTable) -> Vec<(String, usize)> {
    let mut counts = count_by(table.records(), |r| r.category.as_str());
    counts.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
    owned(counts)
}

/// Row count per hour of day, ascending. Hours without rows are left out.
pub fn orders_per_hour(table: &SalesTable) -> Vec<(Hour, usize)> {
    let mut hours = count_by(table.records(), |r| r.hour);
    hours.sort_by_key(|(hour, _)| *hour);
    hours
}

/// Row count per weekday, Sunday through Saturday, with absent days as zero.
pub fn orders_per_weekday(table: &SalesTable) -> Vec<(Weekday, usize)> {
    let counts: HashMap<Weekday, usize> = count_by(table.records(), |r| r.weekday)
        .into_iter()
        .collect();

    Weekday::ALL
        .into_iter()
        .map(|day| (day, counts.get(&day).copied().unwrap_or(0)))
        .collect()
}

/// Row count per product within `category`, in first-appearance order.
pub fn product_distribution(table: &SalesTable, category: &str) -> Vec<(String, usize)> {
    let rows = table.records().iter().filter(|r| r.category == category);
    owned(count_by(rows, |r| r.product.as_str()))
}

/// Row count per coffee product.
pub fn coffee_type_distribution(table: &SalesTable) -> Vec<(String, usize)> {
    product_distribution(table, COFFEE_CATEGORY)
}

/// Attach each value's percentage of the total.
///
/// A zero total yields zero percentages rather than a division error.
pub fn with_shares<V>(groups: Vec<(String, V)>) -> Vec<Share<V>>
where
    V: Copy + Into<Decimal>,
{
    let total: Decimal = groups.iter().map(|(_, v)| Into::<Decimal>::into(*v)).sum();

    groups
        .into_iter()
        .map(|(label, value)| {
            let percent = if total.is_zero() {
                Decimal::ZERO
            } else {
                (Into::<Decimal>::into(value) * Decimal::ONE_HUNDRED / total).round_dp(2)
            };
            Share {
                label,
                value,
                percent,
            }
        })
        .collect()
}
