//! Data models for the sales dashboard.
//!
//! This module contains the typed sales record, the immutable table the
//! engine reads from, and the fixed calendar enumerations used for ordering.

use crate::analysis::Dashboard;
use crate::error::{DataQualityWarning, EngineError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Month of the dataset window (January through June).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Month; 6] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Month::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("expected a month between January and June, got '{}'", trimmed))
    }
}

/// Day of the week, Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// All weekdays in display order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Weekday::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("expected a weekday name, got '{}'", trimmed))
    }
}

/// Hour of the day, always in `0..=23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Hour(u8);

impl Hour {
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Hour {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= 23 {
            Ok(Hour(value))
        } else {
            Err(format!("hour must be between 0 and 23, got {}", value))
        }
    }
}

impl From<Hour> for u8 {
    fn from(hour: Hour) -> Self {
        hour.0
    }
}

impl FromStr for Hour {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: u8 = trimmed
            .parse()
            .map_err(|_| format!("hour must be an integer between 0 and 23, got '{}'", trimmed))?;
        Hour::try_from(value)
    }
}

impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

/// One row of the sales dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Order identifier. Several line items may share one id.
    pub id: String,
    /// Sale amount.
    pub sales: Decimal,
    /// Shop location.
    pub location: String,
    /// Product name.
    pub product: String,
    /// Product category (e.g. "Coffee", "Bakery").
    pub category: String,
    pub month: Month,
    pub weekday: Weekday,
    pub hour: Hour,
}

/// What to do with rows whose `sales` amount is negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NegativeSalesPolicy {
    /// Refuse the table with a schema error.
    #[default]
    Reject,
    /// Keep the row and record a data quality warning.
    Warn,
}

/// Largest accepted magnitude for a single sales amount.
///
/// Keeps every sum over an in-memory table far below `Decimal::MAX`.
pub const MAX_SALES_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0); // 1_000_000_000_000

/// Immutable, ordered collection of sales records.
#[derive(Debug, Clone, Default)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
    warnings: Vec<DataQualityWarning>,
}

impl SalesTable {
    /// Build a table, rejecting negative sales amounts.
    pub fn new(records: Vec<SalesRecord>) -> Result<Self, EngineError> {
        Self::with_policy(records, NegativeSalesPolicy::Reject)
    }

    /// Build a table, handling negative sales amounts according to `policy`.
    ///
    /// Amounts larger than [`MAX_SALES_AMOUNT`] in magnitude are always
    /// rejected. Row numbers in errors and warnings are 1-based positions
    /// in `records`.
    pub fn with_policy(
        records: Vec<SalesRecord>,
        policy: NegativeSalesPolicy,
    ) -> Result<Self, EngineError> {
        let mut warnings = Vec::new();

        for (idx, record) in records.iter().enumerate() {
            let row = idx + 1;

            if record.sales.abs() > MAX_SALES_AMOUNT {
                return Err(EngineError::Schema {
                    row,
                    column: "sales",
                    value: record.sales.to_string(),
                    reason: format!("sales amount exceeds the limit of {}", MAX_SALES_AMOUNT),
                });
            }

            if record.sales < Decimal::ZERO {
                match policy {
                    NegativeSalesPolicy::Reject => {
                        return Err(EngineError::Schema {
                            row,
                            column: "sales",
                            value: record.sales.to_string(),
                            reason: "sales amount must not be negative".to_string(),
                        });
                    }
                    NegativeSalesPolicy::Warn => {
                        let warning = DataQualityWarning {
                            row,
                            message: format!(
                                "negative sales amount {} for order '{}'",
                                record.sales, record.id
                            ),
                        };
                        warn!("Row {}: {}", warning.row, warning.message);
                        warnings.push(warning);
                    }
                }
            }
        }

        Ok(Self { records, warnings })
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Warnings collected while building the table.
    pub fn warnings(&self) -> &[DataQualityWarning] {
        &self.warnings
    }
}

/// Metadata about the dashboard report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Path of the analyzed dataset.
    pub source: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of data rows read.
    pub rows: usize,
    /// Currency symbol used when rendering money values.
    pub currency_symbol: String,
}

/// The complete dashboard report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub dashboard: Dashboard,
    /// Data quality findings from loading.
    pub warnings: Vec<DataQualityWarning>,
}
