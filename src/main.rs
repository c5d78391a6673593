//! Brewstats - coffee shop sales dashboard from the command line
//!
//! Loads a sales CSV, computes the dashboard KPIs and datasets,
//! and writes them as a Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any error (bad arguments, unreadable data, schema error, empty dataset)

use anyhow::{Context, Result};
use brewstats::analysis::{Dashboard, DashboardOptions};
use brewstats::cli::{Args, OutputFormat};
use brewstats::config::{Config, CONFIG_FILE_NAME};
use brewstats::error::EngineError;
use brewstats::loader::{self, LoadOptions};
use brewstats::models::{Report, ReportMetadata};
use brewstats::report;
use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config comes first so its verbose setting reaches the subscriber
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(config.log_level(args.quiet));

    info!("Brewstats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Config: {:?}", config);

    if let Err(e) = run(args, config) {
        error!("Dashboard generation failed: {:#}", e);
        if let Some(EngineError::EmptyInput { .. }) = e.downcast_ref::<EngineError>() {
            eprintln!("\n❌ Error: no sales data available in the input file");
        } else {
            eprintln!("\n❌ Error: {:#}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .brewstats.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the delimiter, top products, spotlight category and more.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the data, build the dashboard and write the report.
fn run(args: Args, config: Config) -> Result<()> {
    let start_time = Instant::now();

    let data_path = args
        .data
        .as_deref()
        .context("A data file is required (--data)")?;

    // Step 1: Load the table
    let load_options = LoadOptions::from(&config.loader);
    let table = loader::load_sales_file(data_path, &load_options)?;
    info!("Loaded {} rows", table.len());

    if !table.warnings().is_empty() {
        warn!(
            "{} rows with data quality warnings were kept",
            table.warnings().len()
        );
    }

    // Step 2: Compute the dashboard
    let options = DashboardOptions {
        top_products: config.report.top_products,
        spotlight_category: config.report.spotlight_category.clone(),
    };
    let dashboard = Dashboard::build(&table, &options)?;

    let report = report_for(data_path, &config, dashboard, &table);

    // Step 3: Render and write
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    let destination = config.general.output_path(args.format);
    let destination = destination.as_str();
    if destination == "-" {
        println!("{}", output);
    } else {
        std::fs::write(destination, &output)
            .with_context(|| format!("Failed to write report to {}", destination))?;

        if !args.quiet {
            print_summary(&report, destination, start_time.elapsed().as_secs_f64());
        }
    }

    Ok(())
}

fn report_for(
    data_path: &Path,
    config: &Config,
    dashboard: Dashboard,
    table: &brewstats::SalesTable,
) -> Report {
    Report {
        metadata: ReportMetadata {
            source: data_path.display().to_string(),
            generated_at: Utc::now(),
            rows: table.len(),
            currency_symbol: config.report.currency_symbol.clone(),
        },
        dashboard,
        warnings: table.warnings().to_vec(),
    }
}

/// Print the headline numbers after writing a report file.
fn print_summary(report: &Report, destination: &str, duration: f64) {
    let kpis = &report.dashboard.kpis;
    let currency = report.metadata.currency_symbol.as_str();

    println!("\n📊 Dashboard Summary:");
    println!("   Rows: {}", report::format_count(report.metadata.rows));
    println!(
        "   Total revenue: {}",
        report::format_money(kpis.total_revenue, currency)
    );
    println!("   Total orders: {}", report::format_count(kpis.total_orders));
    println!(
        "   Average order value: {}",
        report::format_money(kpis.average_order_value, currency)
    );
    println!(
        "   Peak location: {} ({})",
        kpis.peak_location,
        report::format_money(kpis.peak_location_revenue, currency)
    );
    if !report.warnings.is_empty() {
        println!("   ⚠️  Data quality warnings: {}", report.warnings.len());
    }
    println!("   Duration: {:.2}s", duration);
    println!("\n✅ Report saved to: {}", destination);
}

/// Load configuration from file or use defaults, then apply CLI overrides.
///
/// Runs before logging is set up, so problems go straight to stderr.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config {
        // Try explicit config path
        Some(ref config_path) => Config::load(config_path)?,
        // Try default location
        None => match Config::load_default() {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                eprintln!("⚠️  Failed to load config, using defaults: {:#}", e);
                Config::default()
            }
        },
    };

    config.merge_with_args(args);
    config.validate()?;
    Ok(config)
}
