//! Shirt-Scraper main entry point
//!
//! This is the command-line interface for the Shirt-Scraper catalog scraper.

use anyhow::Context;
use clap::Parser;
use shirt_scraper::config::{load_config_with_hash, validate, Config};
use shirt_scraper::crawler::run_scraper;
use shirt_scraper::output::print_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shirt-Scraper: a three-tier catalog scraper
///
/// Scrapes the home page, category pages and product pages of a shirt
/// catalog and writes the products to ./data/<YYYY-M-D>.csv. Errors are
/// appended to ./scraper-error.log.
#[derive(Parser, Debug)]
#[command(name = "shirt-scraper")]
#[command(version)]
#[command(about = "A three-tier catalog scraper", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the home page URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(base_url) = cli.base_url {
        config.site.base_url = base_url;
    }
    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_scrape(config, cli.quiet).await;
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shirt_scraper=info,warn"),
            1 => EnvFilter::new("shirt_scraper=debug,info"),
            2 => EnvFilter::new("shirt_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Shirt-Scraper Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Image base URL: {}", config.site.image_base_url);

    println!("\nCrawler:");
    println!("  Home link filter: {}", config.crawler.home_link_filter);
    println!("  Product link filter: {}", config.crawler.product_link_filter);
    println!("  Product marker: {}", config.crawler.product_marker);
    println!("  Fan-out policy: {}", config.crawler.fan_out_policy);
    match config.crawler.max_concurrent_pages_open {
        Some(limit) => println!("  Max concurrent pages: {}", limit),
        None => println!("  Max concurrent pages: unlimited"),
    }
    println!("  Request timeout: {}s", config.crawler.request_timeout);

    println!("\nProduct selectors:");
    println!("  Title: {}", config.product.title_selector);
    println!("  Price: {}", config.product.price_selector);
    println!("  Image: {}", config.product.image_selector);
    println!("  Title label width: {}", config.product.title_label_width);

    println!("\nOutput:");
    println!("  Data directory: {}", config.output.data_dir);
    println!("  Error log: {}", config.output.error_log);

    println!("\n✓ Configuration is valid");
}

/// Handles the main scrape
///
/// A failed scrape has already been reported and logged by the time it
/// returns here, so the process still exits cleanly.
async fn handle_scrape(config: Config, quiet: bool) {
    tracing::info!("Starting scrape of {}", config.site.base_url);

    match run_scraper(config).await {
        Ok(summary) => {
            if !quiet {
                print_summary(&summary);
            }
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
        }
    }
}
