//! webscraper main entry point
//!
//! This is the command-line interface for the webscraper crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use webscraper::config::load_config_with_env;
use webscraper::logging::{file_writer, LOG_DIR};
use webscraper::output::{print_summary, write_results};
use webscraper::Crawler;

/// webscraper: crawl every connected page of a single web site
///
/// Starting from STARTING_URL, webscraper follows same-host links up to
/// --max-depth hops and writes the outcome of every URL it touched to a
/// JSON results file.
#[derive(Parser, Debug)]
#[command(name = "webscraper")]
#[command(version)]
#[command(about = "Scrape all connecting URLs from a given website", long_about = None)]
struct Cli {
    /// Absolute http(s) URL to start from
    #[arg(value_name = "STARTING_URL")]
    starting_url: String,

    /// Maximum number of hops from the starting URL
    #[arg(long, default_value_t = 10)]
    max_depth: u32,

    /// Where to write the JSON results
    #[arg(long, default_value = "results.json")]
    results_filename: PathBuf,

    /// Optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config =
        load_config_with_env(cli.config.as_deref()).context("Failed to load configuration")?;

    // Setup logging based on verbosity; the guard flushes the log file on exit
    let _log_guard = setup_logging(cli.verbose, cli.quiet, &config.log_level);

    tracing::info!("Starting webscraper from {}...", cli.starting_url);

    let crawler = Crawler::new(&config)?;

    // Stop workers cleanly on Ctrl-C
    let shutdown = crawler.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, shutting down");
            shutdown.cancel();
        }
    });

    let id = crawler.begin_crawl(&cli.starting_url, cli.max_depth).await?;
    let stats = crawler.get_results(id)?;

    write_results(&stats, &cli.results_filename).with_context(|| {
        format!(
            "Failed to write results to {}",
            cli.results_filename.display()
        )
    })?;

    if !cli.quiet {
        print_summary(&stats);
    }
    tracing::info!(
        "Scraping completed, results written to {}",
        cli.results_filename.display()
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Lines go to stdout and to `./logs/logfile.log`. If the log file cannot be
/// opened, logging continues on stdout only.
fn setup_logging(verbose: u8, quiet: bool, default_level: &str) -> Option<WorkerGuard> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new(format!("webscraper={},warn", default_level.to_lowercase())),
            1 => EnvFilter::new("webscraper=debug,info"),
            2 => EnvFilter::new("webscraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    let (file_layer, guard, file_error) = match file_writer(Path::new(LOG_DIR)) {
        Ok((writer, guard)) => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_thread_names(true);
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!("Logging to stdout only: {}", e);
    }

    guard
}
