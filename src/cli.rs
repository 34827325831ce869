//! Command-line interface definitions for the Manorama news scraper.
//!
//! Two subcommands are available: `scrape` runs one collection cycle (or a
//! scheduled series of them) and `merge` combines previously written CSV
//! files into a single deduplicated dataset.

use crate::config::Overrides;
use clap::{Parser, Subcommand};

/// Command-line arguments for the Manorama news scraper.
///
/// # Examples
///
/// ```sh
/// # One cycle with default settings
/// manorama_news scrape
///
/// # Every 6 hours, at most 150 articles per cycle
/// manorama_news scrape --schedule 6 --max-articles 150
///
/// # Merge everything collected so far
/// manorama_news merge --folder scraped_data
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Collect articles and write a CSV data set
    Scrape(ScrapeArgs),
    /// Merge collected CSV files, removing duplicate articles
    Merge(MergeArgs),
}

#[derive(clap::Args, Debug)]
pub struct ScrapeArgs {
    /// Optional path to a YAML configuration file
    #[arg(short, long, env = "MANORAMA_CONFIG")]
    pub config: Option<String>,

    /// Maximum number of articles per cycle
    #[arg(short, long)]
    pub max_articles: Option<usize>,

    /// Repeat the cycle every HOURS hours until interrupted (0 runs once)
    #[arg(short, long, value_name = "HOURS")]
    pub schedule: Option<u64>,

    /// Min and max seconds to wait before each article request
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    pub delay: Option<Vec<f64>>,

    /// Directory CSV files are written to
    #[arg(short, long)]
    pub output_dir: Option<String>,
}

impl ScrapeArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            max_articles: self.max_articles,
            delay_range: self.delay.as_deref().and_then(|d| match d {
                [min, max] => Some((*min, *max)),
                _ => None,
            }),
            schedule_hours: self.schedule,
            output_dir: self.output_dir.clone(),
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct MergeArgs {
    /// Folder containing the CSV files to merge
    #[arg(short, long, default_value = "scraped_data")]
    pub folder: String,

    /// Output file; defaults to merged_manorama_data_<timestamp>.csv
    #[arg(short, long)]
    pub output: Option<String>,
}
