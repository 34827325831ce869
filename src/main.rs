//! # Manorama News
//!
//! A scraper that collects article metadata and engagement metrics from the
//! Manorama Online news site and writes them as tabular CSV data sets.
//!
//! ## Features
//!
//! - Visits a configurable list of category pages and discovers article links
//! - Extracts headline, date, location, engagement counts, and content length
//!   from each article through ordered selector fallbacks
//! - Substitutes random placeholder counts when a metric cannot be found
//! - Derives an engagement score and an estimated read time per article
//! - Appends a summary of every cycle to a JSON run log
//! - Merges collected CSV files into one deduplicated data set
//!
//! ## Usage
//!
//! ```sh
//! manorama_news scrape --schedule 6
//! manorama_news merge --folder scraped_data
//! ```
//!
//! ## Architecture
//!
//! Each cycle follows a pipeline:
//! 1. **Indexing**: Discover article URLs on each category page
//! 2. **Fetching**: Download article pages with randomized pacing
//! 3. **Extraction**: Resolve fields, normalize locations, fill missing metrics
//! 4. **Output**: Write the CSV data set and append the run summary

use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod collector;
mod config;
mod extract;
mod location;
mod merge;
mod metrics;
mod models;
mod outputs;
mod schedule;
mod scrapers;
mod utils;

use cli::{Cli, Command, MergeArgs, ScrapeArgs};
use collector::{ArticleAssembler, run_cycle};
use config::ScraperConfig;
use metrics::RandomMetrics;
use scrapers::http::HttpFetcher;
use scrapers::retry::RetryFetch;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("manorama_news starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    match args.command {
        Command::Scrape(args) => scrape(args).await?,
        Command::Merge(args) => merge_command(args).await?,
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

async fn scrape(args: ScrapeArgs) -> Result<(), Box<dyn Error>> {
    let config = ScraperConfig::load(args.config.as_deref())
        .await?
        .apply(&args.overrides());
    config.validate()?;
    info!(
        max_articles = config.max_articles_per_run,
        categories = config.categories.len(),
        per_category = config.per_category_cap(),
        schedule_hours = config.schedule_hours,
        "Configuration ready"
    );

    // Early check: ensure the output dir is writable
    if let Err(e) = ensure_writable_dir(&config.output_dir).await {
        error!(
            path = %config.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let fetcher = RetryFetch::new(
        HttpFetcher::new(&config)?,
        config.fetch_retries,
        Duration::from_secs(1),
    );
    let assembler = ArticleAssembler::new(&config, RandomMetrics);

    if config.schedule_hours == 0 {
        let report = run_cycle(&fetcher, &config, &assembler).await?;
        info!(
            articles = report.articles_collected,
            file = report.filename.as_deref().unwrap_or("-"),
            "Scraping finished"
        );
        return Ok(());
    }

    info!(every_hours = config.schedule_hours, "Scheduled scraping started; press Ctrl-C to stop");
    let stop = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Could not listen for Ctrl-C; stopping");
        }
    };
    let (fetcher, config, assembler) = (&fetcher, &config, &assembler);
    let runs = schedule::run_every(schedule::hours(config.schedule_hours), stop, move || async move {
        match run_cycle(fetcher, config, assembler).await {
            Ok(report) => info!(articles = report.articles_collected, "Scheduled cycle done"),
            Err(e) => error!(error = %e, "Scheduled cycle failed"),
        }
    })
    .await;
    info!(runs, "Scheduled scraping stopped");
    Ok(())
}

async fn merge_command(args: MergeArgs) -> Result<(), Box<dyn Error>> {
    match merge::merge_folder(Path::new(&args.folder), args.output.as_deref()).await? {
        Some(path) => info!(path = %path.display(), "Merge finished"),
        None => warn!(folder = %args.folder, "Nothing to merge"),
    }
    Ok(())
}
