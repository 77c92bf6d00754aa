//! Quote-Harvest main entry point
//!
//! This is the command-line interface for the Quote-Harvest corpus builder.

use clap::Parser;
use quote_harvest::config::{load_config_with_hash, Config};
use quote_harvest::crawler::{harvest, Pipeline};
use quote_harvest::output::{
    generate_markdown_summary, load_statistics, print_quotes, print_report, print_statistics,
};
use quote_harvest::storage::{RecordStore, SqliteStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Quote-Harvest: a one-shot quote corpus builder
///
/// Quote-Harvest walks a paginated quote listing, removes duplicate quotes,
/// looks up every author's biography concurrently and stores the result in
/// SQLite as one all-or-nothing batch.
#[derive(Parser, Debug)]
#[command(name = "quote-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A one-shot quote corpus builder", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Skip printing the persisted quotes after the harvest
    #[arg(long)]
    no_print: bool,

    /// Validate config and show what would be harvested without fetching anything
    #[arg(long, conflicts_with_all = ["stats", "export_summary", "random"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary", "random"])]
    stats: bool,

    /// Write the stored quotes as markdown and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "random"])]
    export_summary: bool,

    /// Fetch and print a single random quote; nothing is stored
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "export_summary"])]
    random: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_summary {
        handle_export_summary(&config)?;
    } else if cli.random {
        handle_random(config).await?;
    } else {
        handle_harvest(config, !cli.no_print).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("quote_harvest=info,warn"),
            1 => EnvFilter::new("quote_harvest=debug,info"),
            2 => EnvFilter::new("quote_harvest=trace,debug"),
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

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config) {
    println!("=== Quote-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Start path: {}", config.site.start_path);
    println!("  Author path prefix: {}", config.site.author_path_prefix);

    println!("\nCrawler:");
    println!(
        "  Max concurrent lookups: {}",
        config.crawler.max_concurrent_lookups
    );
    println!("  On page error: {:?}", config.crawler.on_page_error);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);

    println!("\nUser Agent:");
    println!(
        "  {}/{}",
        config.user_agent.crawler_name, config.user_agent.crawler_version
    );

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Summary: {}", config.output.summary_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("Database: {}\n", config.output.database_path);

    let store = SqliteStore::open(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-summary mode: writes the stored quotes as markdown
fn handle_export_summary(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Exporting Quote Summary ===\n");
    println!("Database: {}", config.output.database_path);
    println!("Output: {}", config.output.summary_path);
    println!();

    let store = SqliteStore::open(Path::new(&config.output.database_path))?;

    tracing::info!("Loading quotes from database...");
    let rows = store.load_all()?;

    generate_markdown_summary(&rows, Path::new(&config.output.summary_path))?;

    println!("✓ Exported {} quotes to: {}", rows.len(), config.output.summary_path);

    Ok(())
}

/// Handles the --random mode
async fn handle_random(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = Pipeline::with_http(config)?;
    let quote = pipeline.random_quote().await?;
    print_quotes(std::slice::from_ref(&quote));
    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, print: bool) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Harvesting {} into {}",
        config.site.base_url,
        config.output.database_path
    );

    match harvest(config).await {
        Ok(report) => {
            tracing::info!("Harvest completed successfully");
            if print {
                print_quotes(&report.quotes);
            }
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed ({:?}): {}", e.kind(), e);
            Err(e.into())
        }
    }
}
