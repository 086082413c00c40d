//! Inspection-Scraper main entry point
//!
//! Running without arguments scrapes the default search page into
//! `inspections.db` and prints everything on record.

use clap::Parser;
use inspection_scraper::config::{load_or_default, Config};
use inspection_scraper::output::print_report;
use inspection_scraper::pipeline::Coordinator;
use inspection_scraper::storage::open_storage;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Inspection-Scraper: a health-inspection record harvester
///
/// Walks the county search-results listing, follows every inspection link
/// to its full report, stores facilities and violations in SQLite, and
/// prints the stored data grouped by facility.
#[derive(Parser, Debug)]
#[command(name = "inspection-scraper")]
#[command(version)]
#[command(about = "Scrapes health-inspection reports into SQLite", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print what is already stored without scraping
    #[arg(long)]
    report_only: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_or_default(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let source = config.source.search_url()?.to_string();

    if cli.report_only {
        handle_report_only(&config, &source)
    } else {
        handle_scrape(config, &source).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("inspection_scraper=info,warn"),
            1 => EnvFilter::new("inspection_scraper=debug,info"),
            2 => EnvFilter::new("inspection_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles --report-only: prints stored data and exits
fn handle_report_only(config: &Config, source: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Database: {}", config.output.database_path);
    let storage = open_storage(Path::new(&config.output.database_path))?;
    print_report(&storage, source)?;
    Ok(())
}

/// Handles the default mode: scrape, then report
async fn handle_scrape(config: Config, source: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Database: {}", config.output.database_path);

    let mut coordinator = Coordinator::new(config)?;

    match coordinator.run().await {
        Ok(summary) => {
            tracing::info!(
                "Scrape completed: {} reports stored, {} skipped",
                summary.reports_stored,
                summary.failures
            );
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            return Err(e.into());
        }
    }

    print_report(coordinator.storage(), source)?;
    Ok(())
}
