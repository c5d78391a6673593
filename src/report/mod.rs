//! Report generation.

pub mod generator;

pub use generator::{format_count, format_money, generate_json_report, generate_markdown_report};
