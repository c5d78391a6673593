//! Markdown and JSON dashboard generation.
//!
//! This module renders a computed [`Report`] as a Markdown document with one
//! table per dashboard panel, or serializes it as JSON.

use crate::analysis::{Dashboard, Kpis, Share};
use crate::error::DataQualityWarning;
use crate::models::{Report, ReportMetadata};
use anyhow::Result;
use rust_decimal::Decimal;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let currency = report.metadata.currency_symbol.as_str();
    let dashboard = &report.dashboard;
    let mut output = String::new();

    // Title
    output.push_str("# ☕ Coffee Shop Sales Dashboard\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_kpi_section(&dashboard.kpis, currency));
    output.push_str(&generate_sales_section(dashboard, currency));
    output.push_str(&generate_category_section(dashboard, currency));
    output.push_str(&generate_timing_section(dashboard));
    output.push_str(&generate_distribution_section(dashboard));
    output.push_str(&generate_warnings_section(&report.warnings));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Rows:** {}\n", format_count(metadata.rows)));
    section.push('\n');

    section
}

/// Generate the headline KPI table.
fn generate_kpi_section(kpis: &Kpis, currency: &str) -> String {
    let mut section = String::new();

    section.push_str("## Key Metrics\n\n");
    section.push_str(
        "| Total Sales Revenue | Total Orders | Average Order Value (AOV) | Peak Sales Location |\n",
    );
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} ({}) |\n\n",
        format_money(kpis.total_revenue, currency),
        format_count(kpis.total_orders),
        format_money(kpis.average_order_value, currency),
        escape_cell(&kpis.peak_location),
        format_money(kpis.peak_location_revenue, currency),
    ));

    section
}

/// Generate the revenue panels: by month, by location, top products.
fn generate_sales_section(dashboard: &Dashboard, currency: &str) -> String {
    let mut section = String::new();

    section.push_str("## Sales by Month\n\n");
    section.push_str(&money_table(
        "Month",
        dashboard
            .sales_by_month
            .iter()
            .map(|(month, sales)| (month.to_string(), *sales)),
        currency,
    ));

    section.push_str("## Sales by Location\n\n");
    section.push_str(&share_table(
        "Location",
        "Sales",
        &dashboard.sales_by_location,
        |v| format_money(*v, currency),
    ));

    section.push_str(&format!(
        "## Top {} Products by Revenue\n\n",
        dashboard.top_products.len()
    ));
    section.push_str(&money_table(
        "Product",
        dashboard.top_products.iter().cloned(),
        currency,
    ));

    section
}

/// Generate the category panels: average order value and popularity.
fn generate_category_section(dashboard: &Dashboard, currency: &str) -> String {
    let mut section = String::new();

    section.push_str("## Average Order Value by Category\n\n");
    section.push_str(&money_table(
        "Category",
        dashboard.average_order_value_by_category.iter().cloned(),
        currency,
    ));

    section.push_str("## Popular Category\n\n");
    section.push_str(&count_table(
        "Category",
        "Count",
        dashboard
            .category_popularity
            .iter()
            .map(|(category, count)| (category.clone(), *count)),
    ));

    section
}

/// Generate the hourly and weekday order panels.
fn generate_timing_section(dashboard: &Dashboard) -> String {
    let mut section = String::new();

    section.push_str("## Peak Hour\n\n");
    if let Some((hour, count)) = dashboard.peak_hour() {
        section.push_str(&format!(
            "Busiest hour: **{}** with {} orders.\n\n",
            hour,
            format_count(count)
        ));
    }
    section.push_str(&count_table(
        "Hour",
        "Count of Orders",
        dashboard
            .orders_per_hour
            .iter()
            .map(|(hour, count)| (hour.to_string(), *count)),
    ));

    section.push_str("## Peak Day\n\n");
    if let Some((day, count)) = dashboard.peak_day() {
        section.push_str(&format!(
            "Busiest day: **{}** with {} orders.\n\n",
            day,
            format_count(count)
        ));
    }
    section.push_str(&count_table(
        "Weekday",
        "Count of Orders",
        dashboard
            .orders_per_weekday
            .iter()
            .map(|(day, count)| (day.to_string(), *count)),
    ));

    section
}

/// Generate the product mix panel for the spotlight category.
fn generate_distribution_section(dashboard: &Dashboard) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "## Order Distribution by {} Type\n\n",
        dashboard.spotlight_category
    ));
    section.push_str(&share_table(
        "Product",
        "Count",
        &dashboard.product_distribution,
        |v| format_count(*v),
    ));

    section
}

/// Generate the data quality warnings section.
fn generate_warnings_section(warnings: &[DataQualityWarning]) -> String {
    if warnings.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Data Quality Warnings\n\n");
    for warning in warnings {
        section.push_str(&format!("- ⚠️ Row {}: {}\n", warning.row, warning.message));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by brewstats*\n");

    footer
}

fn money_table(
    label: &str,
    rows: impl Iterator<Item = (String, Decimal)>,
    currency: &str,
) -> String {
    let mut table = format!("| {} | Sales |\n|:---|---:|\n", label);
    let mut empty = true;

    for (name, value) in rows {
        empty = false;
        table.push_str(&format!(
            "| {} | {} |\n",
            escape_cell(&name),
            format_money(value, currency)
        ));
    }

    finish_table(table, empty)
}

fn count_table(label: &str, value_label: &str, rows: impl Iterator<Item = (String, usize)>) -> String {
    let mut table = format!("| {} | {} |\n|:---|---:|\n", label, value_label);
    let mut empty = true;

    for (name, count) in rows {
        empty = false;
        table.push_str(&format!("| {} | {} |\n", escape_cell(&name), format_count(count)));
    }

    finish_table(table, empty)
}

fn share_table<V>(
    label: &str,
    value_label: &str,
    shares: &[Share<V>],
    render: impl Fn(&V) -> String,
) -> String {
    let mut table = format!(
        "| {} | {} | Share |\n|:---|---:|---:|\n",
        label, value_label
    );

    for share in shares {
        table.push_str(&format!(
            "| {} | {} | {:.2}% |\n",
            escape_cell(&share.label),
            render(&share.value),
            share.percent
        ));
    }

    finish_table(table, shares.is_empty())
}

/// Pipes inside a cell would split it into extra columns.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn finish_table(table: String, empty: bool) -> String {
    if empty {
        "*No data.*\n\n".to_string()
    } else {
        table + "\n"
    }
}

/// Format a money value as `$1,234.56`.
pub fn format_money(value: Decimal, currency: &str) -> String {
    let rounded = value.round_dp(2);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };

    format!("{}{}{}.{}", sign, currency, group_thousands(whole), cents)
}

/// Format a count with thousands separators.
pub fn format_count(count: usize) -> String {
    group_thousands(&count.to_string())
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DashboardOptions;
    use crate::models::{Hour, Month, SalesRecord, SalesTable, Weekday};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn create_test_report() -> Report {
        let records = vec![
            SalesRecord {
                id: "1".to_string(),
                sales: dec!(1500.00),
                location: "Downtown".to_string(),
                product: "House Beans 250g".to_string(),
                category: "Retail".to_string(),
                month: Month::February,
                weekday: Weekday::Tuesday,
                hour: Hour::try_from(10).unwrap(),
            },
            SalesRecord {
                id: "2".to_string(),
                sales: dec!(4.75),
                location: "Harbor".to_string(),
                product: "Latte".to_string(),
                category: "Coffee".to_string(),
                month: Month::May,
                weekday: Weekday::Friday,
                hour: Hour::try_from(8).unwrap(),
            },
        ];
        let table = SalesTable::new(records).unwrap();
        let dashboard = Dashboard::build(&table, &DashboardOptions::default()).unwrap();

        Report {
            metadata: ReportMetadata {
                source: "sales.csv".to_string(),
                generated_at: Utc::now(),
                rows: table.len(),
                currency_symbol: "$".to_string(),
            },
            dashboard,
            warnings: vec![DataQualityWarning {
                row: 7,
                message: "negative sales amount -1 for order '9'".to_string(),
            }],
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("# ☕ Coffee Shop Sales Dashboard"));
        assert!(markdown.contains("## Key Metrics"));
        assert!(markdown.contains("$1,504.75"));
        assert!(markdown.contains("$752.38"));
        assert!(markdown.contains("Downtown ($1,500.00)"));
        assert!(markdown.contains("## Sales by Month"));
        assert!(markdown.contains("## Top 2 Products by Revenue"));
        assert!(markdown.contains("## Average Order Value by Category"));
        assert!(markdown.contains("## Popular Category"));
        assert!(markdown.contains("## Peak Hour"));
        assert!(markdown.contains("## Peak Day"));
        assert!(markdown.contains("## Order Distribution by Coffee Type"));
        assert!(markdown.contains("| Latte | 1 | 100.00% |"));
        assert!(markdown.contains("Row 7"));
    }

    #[test]
    fn test_pipes_in_labels_are_escaped() {
        let records = vec![SalesRecord {
            id: "1".to_string(),
            sales: dec!(4.75),
            location: "Pier | Kiosk".to_string(),
            product: "Latte | Large".to_string(),
            category: "Coffee".to_string(),
            month: Month::March,
            weekday: Weekday::Monday,
            hour: Hour::try_from(9).unwrap(),
        }];
        let table = SalesTable::new(records).unwrap();
        let mut report = create_test_report();
        report.dashboard = Dashboard::build(&table, &DashboardOptions::default()).unwrap();

        let markdown = generate_markdown_report(&report);
        assert!(markdown.contains("| Latte \\| Large | $4.75 |"));
        assert!(markdown.contains("| Latte \\| Large | 1 | 100.00% |"));
        assert!(markdown.contains("| Pier \\| Kiosk | $4.75 | 100.00% |"));
        assert!(markdown.contains("Pier \\| Kiosk ($4.75)"));
        assert!(!markdown.contains("Latte | Large"));
    }

    #[test]
    fn test_month_rows_in_calendar_order() {
        let markdown = generate_markdown_report(&create_test_report());
        let feb = markdown.find("| February |").unwrap();
        let may = markdown.find("| May |").unwrap();
        assert!(feb < may);
    }

    #[test]
    fn test_weekday_table_lists_all_days() {
        let markdown = generate_markdown_report(&create_test_report());
        assert!(markdown.contains("| Sunday | 0 |"));
        assert!(markdown.contains("| Tuesday | 1 |"));
        assert!(markdown.contains("| Saturday | 0 |"));
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec!(0), "$"), "$0.00");
        assert_eq!(format_money(dec!(999.999), "$"), "$1,000.00");
        assert_eq!(format_money(dec!(1234567.891), "$"), "$1,234,567.89");
        assert_eq!(format_money(dec!(-42.5), "€"), "-€42.50");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(149116), "149,116");
    }

    #[test]
    fn test_empty_dataset_renders_placeholder() {
        let mut report = create_test_report();
        report.dashboard.product_distribution.clear();
        let markdown = generate_markdown_report(&report);
        assert!(markdown.contains("*No data.*"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"kpis\""));
        assert!(json.contains("\"orders_per_weekday\""));
        assert!(json.contains("\"warnings\""));
    }
}
