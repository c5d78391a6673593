//! CSV sales data loader.
//!
//! Parses a delimited sales export into a validated [`SalesTable`].
//! Required columns:
//!   id, sales, location, product, category, month, weekday, hour
//! Any other columns are ignored.

use crate::config::LoaderConfig;
use crate::error::EngineError;
use crate::models::{Hour, Month, NegativeSalesPolicy, SalesRecord, SalesTable, Weekday};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Options controlling how a file is read.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Policy for negative sales amounts.
    pub negative_sales: NegativeSalesPolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            negative_sales: NegativeSalesPolicy::Reject,
        }
    }
}

impl From<&LoaderConfig> for LoadOptions {
    fn from(config: &LoaderConfig) -> Self {
        Self {
            delimiter: config.delimiter as u8,
            negative_sales: config.negative_sales,
        }
    }
}

/// One CSV row before domain validation.
#[derive(Debug, Clone, Deserialize)]
struct RawRecord {
    id: String,
    sales: String,
    location: String,
    product: String,
    category: String,
    month: String,
    weekday: String,
    hour: String,
}

impl RawRecord {
    /// Validate every field, tagging failures with the data row number.
    fn into_record(self, row: usize) -> Result<SalesRecord, EngineError> {
        let schema = |column: &'static str, value: &str, reason: String| EngineError::Schema {
            row,
            column,
            value: value.to_string(),
            reason,
        };

        let sales = parse_sales(&self.sales)
            .map_err(|reason| schema("sales", &self.sales, reason))?;
        let month = self
            .month
            .parse::<Month>()
            .map_err(|reason| schema("month", &self.month, reason))?;
        let weekday = self
            .weekday
            .parse::<Weekday>()
            .map_err(|reason| schema("weekday", &self.weekday, reason))?;
        let hour = self
            .hour
            .parse::<Hour>()
            .map_err(|reason| schema("hour", &self.hour, reason))?;

        Ok(SalesRecord {
            id: self.id,
            sales,
            location: self.location,
            product: self.product,
            category: self.category,
            month,
            weekday,
            hour,
        })
    }
}

/// Parse a sales amount, accepting plain and scientific notation.
fn parse_sales(value: &str) -> Result<Decimal, String> {
    let trimmed = value.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| format!("expected a decimal amount, got '{}'", trimmed))
}

/// Load a sales table from a CSV reader.
pub fn load_sales<R: Read>(reader: R, options: &LoadOptions) -> Result<SalesTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (idx, result) in csv_reader.deserialize::<RawRecord>().enumerate() {
        let row = idx + 1;
        // Quoted fields may span lines, so take the line from the reader.
        let raw = match result {
            Ok(raw) => raw,
            Err(err) => {
                let context = match err.position() {
                    Some(pos) => format!("CSV parse error at line {}", pos.line()),
                    None => format!("CSV parse error in record {}", row),
                };
                return Err(anyhow::Error::new(err).context(context));
            }
        };
        records.push(raw.into_record(row)?);
    }

    debug!("Parsed {} sales rows", records.len());

    let table = SalesTable::with_policy(records, options.negative_sales)?;
    Ok(table)
}

/// Load a sales table from a CSV file path.
pub fn load_sales_file(path: &Path, options: &LoadOptions) -> Result<SalesTable> {
    info!("Loading sales data from: {}", path.display());

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open sales data: {}", path.display()))?;

    load_sales(file, options)
        .with_context(|| format!("Failed to load sales data: {}", path.display()))
}
