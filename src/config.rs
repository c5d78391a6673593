//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.brewstats.toml` files.

use crate::cli::OutputFormat;
use crate::models::NegativeSalesPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".brewstats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Data loading settings.
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Output file path. `-` writes to stdout. When unset, the report goes
    /// to `brewstats_report.md` or `brewstats_report.json` by format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: None,
            verbose: false,
        }
    }
}

/// Base name of the report file when no output path is configured.
pub const DEFAULT_OUTPUT_STEM: &str = "brewstats_report";

impl GeneralConfig {
    /// Where the report is written for the given format.
    pub fn output_path(&self, format: OutputFormat) -> String {
        match self.output {
            Some(ref output) => output.clone(),
            None => format!("{}.{}", DEFAULT_OUTPUT_STEM, format.extension()),
        }
    }
}

/// CSV loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Whether negative sales amounts are rejected or kept with a warning.
    #[serde(default)]
    pub negative_sales: NegativeSalesPolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            negative_sales: NegativeSalesPolicy::default(),
        }
    }
}

fn default_delimiter() -> char {
    ','
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of products in the top products table.
    #[serde(default = "default_top_products")]
    pub top_products: usize,

    /// Category whose product mix gets its own breakdown.
    #[serde(default = "default_spotlight_category")]
    pub spotlight_category: String,

    /// Currency symbol prefixed to money values.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_products: default_top_products(),
            spotlight_category: default_spotlight_category(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

fn default_top_products() -> usize {
    10
}

fn default_spotlight_category() -> String {
    "Coffee".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Check values serde cannot constrain.
    pub fn validate(&self) -> Result<()> {
        if !self.loader.delimiter.is_ascii() {
            anyhow::bail!(
                "delimiter must be a single ASCII character, got '{}'",
                self.loader.delimiter
            );
        }
        if self.report.top_products == 0 {
            anyhow::bail!("top_products must be at least 1");
        }
        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Only values given explicitly on the command line override.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = Some(output.display().to_string());
        }

        if let Some(top) = args.top {
            self.report.top_products = top;
        }
        if let Some(ref category) = args.category {
            self.report.spotlight_category = category.clone();
        }

        if args.allow_negative {
            self.loader.negative_sales = NegativeSalesPolicy::Warn;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Log level from the merged settings. Quiet wins over verbose.
    pub fn log_level(&self, quiet: bool) -> tracing::Level {
        if quiet {
            tracing::Level::ERROR
        } else if self.general.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.output, None);
        assert!(!config.general.verbose);
        assert_eq!(config.loader.delimiter, ',');
        assert_eq!(config.loader.negative_sales, NegativeSalesPolicy::Reject);
        assert_eq!(config.report.top_products, 10);
        assert_eq!(config.report.spotlight_category, "Coffee");
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "dashboard.json"
verbose = true

[loader]
delimiter = ";"
negative_sales = "warn"

[report]
top_products = 5
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output.as_deref(), Some("dashboard.json"));
        assert!(config.general.verbose);
        assert_eq!(config.loader.delimiter, ';');
        assert_eq!(config.loader.negative_sales, NegativeSalesPolicy::Warn);
        assert_eq!(config.report.top_products, 5);
        assert_eq!(config.report.currency_symbol, "$");
    }

    #[test]
    fn test_output_path_follows_format() {
        let mut general = GeneralConfig::default();
        assert_eq!(general.output_path(OutputFormat::Markdown), "brewstats_report.md");
        assert_eq!(general.output_path(OutputFormat::Json), "brewstats_report.json");

        general.output = Some("-".to_string());
        assert_eq!(general.output_path(OutputFormat::Json), "-");
    }

    #[test]
    fn test_verbose_config_enables_debug() {
        let config: Config = toml::from_str("[general]\nverbose = true\n").unwrap();
        assert_eq!(config.log_level(false), tracing::Level::DEBUG);
        assert_eq!(config.log_level(true), tracing::Level::ERROR);

        let config = Config::default();
        assert_eq!(config.log_level(false), tracing::Level::INFO);
    }

    #[test]
    fn test_merge_with_args() {
        let mut config: Config = toml::from_str(
            r#"
[general]
output = "from_file.md"

[report]
top_products = 7
spotlight_category = "Tea"
"#,
        )
        .unwrap();

        // Flags left off keep the file values.
        let args = Args::try_parse_from(["brewstats", "--data", "sales.csv"]).unwrap();
        config.merge_with_args(&args);
        assert_eq!(config.general.output.as_deref(), Some("from_file.md"));
        assert_eq!(config.report.top_products, 7);
        assert_eq!(config.report.spotlight_category, "Tea");
        assert_eq!(config.loader.negative_sales, NegativeSalesPolicy::Reject);
        assert!(!config.general.verbose);

        let args = Args::try_parse_from([
            "brewstats",
            "--data",
            "sales.csv",
            "--output",
            "dashboard.json",
            "--top",
            "3",
            "--category",
            "Bakery",
            "--allow-negative",
            "--verbose",
        ])
        .unwrap();
        config.merge_with_args(&args);
        assert_eq!(config.general.output.as_deref(), Some("dashboard.json"));
        assert_eq!(config.report.top_products, 3);
        assert_eq!(config.report.spotlight_category, "Bakery");
        assert_eq!(config.loader.negative_sales, NegativeSalesPolicy::Warn);
        assert!(config.general.verbose);
        assert_eq!(config.log_level(args.quiet), tracing::Level::DEBUG);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[report]\ntop_products = 0").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[loader]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.report.top_products, 10);
    }
}
