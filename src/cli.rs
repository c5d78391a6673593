//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Brewstats - coffee shop sales dashboard from the command line
///
/// Computes revenue, order and product KPIs plus the eight dashboard
/// datasets from a sales CSV, and writes them as Markdown or JSON.
///
/// Examples:
///   brewstats --data sales.csv
///   brewstats --data sales.csv --format json --output -
///   brewstats --data sales.csv --top 5 --category Tea
///   brewstats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Sales CSV file to analyze
    ///
    /// Must contain the columns id, sales, location, product, category,
    /// month, weekday and hour. Other columns are ignored.
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "BREWSTATS_DATA",
        required_unless_present = "init_config"
    )]
    pub data: Option<PathBuf>,

    /// Output file path for the report (`-` for stdout)
    ///
    /// Defaults to the config file value, else brewstats_report.md or
    /// brewstats_report.json depending on --format
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .brewstats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of products in the top products ranking
    #[arg(long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Category whose product mix is broken down (default: Coffee)
    #[arg(long, value_name = "NAME")]
    pub category: Option<String>,

    /// Keep rows with negative sales amounts and report them as warnings
    #[arg(long)]
    pub allow_negative: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .brewstats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// File extension for reports in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        match self.data {
            Some(ref path) if !path.exists() => {
                return Err(format!("Data file does not exist: {}", path.display()));
            }
            Some(ref path) if !path.is_file() => {
                return Err(format!("Data path is not a file: {}", path.display()));
            }
            Some(_) => {}
            None => return Err("A data file is required (--data)".to_string()),
        }

        if self.top == Some(0) {
            return Err("Top products count must be at least 1".to_string());
        }

        if let Some(ref category) = self.category {
            if category.trim().is_empty() {
                return Err("Category must not be empty".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn make_args(data: PathBuf) -> Args {
        Args {
            data: Some(data),
            output: None,
            format: OutputFormat::Markdown,
            config: None,
            top: None,
            category: None,
            allow_negative: false,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_ok() {
        let file = NamedTempFile::new().unwrap();
        let args = make_args(file.path().to_path_buf());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_missing_data_file() {
        let args = make_args(PathBuf::from("/nonexistent/sales.csv"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_top() {
        let file = NamedTempFile::new().unwrap();
        let mut args = make_args(file.path().to_path_buf());
        args.top = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let file = NamedTempFile::new().unwrap();
        let mut args = make_args(file.path().to_path_buf());
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args(PathBuf::from("/nonexistent/sales.csv"));
        args.data = None;
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "brewstats",
            "--data",
            "sales.csv",
            "--format",
            "json",
            "--top",
            "5",
        ])
        .unwrap();
        assert_eq!(args.data, Some(PathBuf::from("sales.csv")));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.top, Some(5));
    }

    #[test]
    fn test_output_format_extension() {
        assert_eq!(OutputFormat::Markdown.extension(), "md");
        assert_eq!(OutputFormat::Json.extension(), "json");
    }
}
