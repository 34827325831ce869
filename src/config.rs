//! Scraper configuration.
//!
//! All lookup tables (categories, location keywords) and run limits live in a
//! single immutable [`ScraperConfig`] that is built once at startup and passed
//! by reference into the pipeline. Values come from, in increasing priority:
//!
//! 1. Built-in defaults ([`ScraperConfig::default`])
//! 2. An optional YAML file (`--config` / `MANORAMA_CONFIG`)
//! 3. Command-line overrides
//!
//! # Example file
//!
//! ```yaml
//! max_articles_per_run: 150
//! delay_range: [1.0, 3.0]
//! categories:
//!   - key: kerala
//!     path: /news/kerala.html
//!   - key: india
//!     path: /news/india.html
//! ```

use crate::metrics::DEFAULT_WORDS_PER_MINUTE;
use serde::{Deserialize, Serialize};
use std::error::Error;
use tracing::{info, instrument};

/// A category page to collect article links from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category key stored on every record, e.g. `kerala`.
    pub key: String,
    /// Path of the category listing page relative to the base URL.
    pub path: String,
}

/// Maps a lower-case keyword found in dateline text to a canonical location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRule {
    pub keyword: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub base_url: String,
    /// Hard cap on records collected per cycle.
    pub max_articles_per_run: usize,
    /// Min and max seconds to wait before each article fetch.
    pub delay_range: (f64, f64),
    /// Interval between scheduled cycles; 0 runs a single cycle.
    pub schedule_hours: u64,
    /// Categories in collection order.
    pub categories: Vec<Category>,
    /// Location keywords in priority order.
    pub location_rules: Vec<LocationRule>,
    pub words_per_minute: u32,
    /// Directory collected CSV files are written to.
    pub output_dir: String,
    /// JSON file holding the append-only list of run summaries.
    pub summary_file: String,
    /// Retries per failed page fetch; 0 disables retrying.
    pub fetch_retries: usize,
    pub request_timeout_secs: u64,
}

fn category(key: &str, path: &str) -> Category {
    Category {
        key: key.to_string(),
        path: path.to_string(),
    }
}

fn rule(keyword: &str, location: &str) -> LocationRule {
    LocationRule {
        keyword: keyword.to_string(),
        location: location.to_string(),
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        ScraperConfig {
            base_url: "https://www.manoramaonline.com".to_string(),
            max_articles_per_run: 100,
            delay_range: (1.0, 3.0),
            schedule_hours: 0,
            categories: vec![
                category("kerala", "/news/kerala.html"),
                category("india", "/news/india.html"),
                category("world", "/news/world.html"),
                category("sports", "/sports.html"),
                category("movies", "/movies.html"),
                category("business", "/business.html"),
                category("health", "/health.html"),
                category("technology", "/tech.html"),
                category("lifestyle", "/life.html"),
            ],
            location_rules: vec![
                rule("thiruvananthapuram", "Kerala/Thiruvananthapuram"),
                rule("kochi", "Kerala/Ernakulam"),
                rule("kozhikode", "Kerala/Kozhikode"),
                rule("thrissur", "Kerala/Thrissur"),
                rule("kollam", "Kerala/Kollam"),
                rule("alappuzha", "Kerala/Alappuzha"),
                rule("palakkad", "Kerala/Palakkad"),
                rule("malappuram", "Kerala/Malappuram"),
                rule("kannur", "Kerala/Kannur"),
                rule("kasargod", "Kerala/Kasargod"),
                rule("kerala", "Kerala/General"),
                rule("india", "India/National"),
                rule("world", "International"),
                rule("gulf", "International/Gulf"),
            ],
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            output_dir: "scraped_data".to_string(),
            summary_file: "scraping_summary.json".to_string(),
            fetch_retries: 0,
            request_timeout_secs: 30,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub max_articles: Option<usize>,
    pub delay_range: Option<(f64, f64)>,
    pub schedule_hours: Option<u64>,
    pub output_dir: Option<String>,
}

impl ScraperConfig {
    /// Parse a YAML document. Keys that are absent keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        let config: ScraperConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load the configuration file at `path`, or the defaults when no path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&str>) -> Result<Self, Box<dyn Error>> {
        let config = match path {
            Some(path) => {
                let yaml = tokio::fs::read_to_string(path).await?;
                let config = Self::from_yaml(&yaml)?;
                info!(path, "Loaded configuration file");
                config
            }
            None => {
                info!("No configuration file given; using defaults");
                Self::default()
            }
        };
        Ok(config)
    }

    pub fn apply(mut self, overrides: &Overrides) -> Self {
        if let Some(max) = overrides.max_articles {
            self.max_articles_per_run = max;
        }
        if let Some(range) = overrides.delay_range {
            self.delay_range = range;
        }
        if let Some(hours) = overrides.schedule_hours {
            self.schedule_hours = hours;
        }
        if let Some(dir) = &overrides.output_dir {
            self.output_dir = dir.clone();
        }
        self
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.categories.is_empty() {
            return Err("at least one category must be configured".into());
        }
        if self.max_articles_per_run == 0 {
            return Err("max_articles_per_run must be greater than zero".into());
        }
        if self.words_per_minute == 0 {
            return Err("words_per_minute must be greater than zero".into());
        }
        let (min, max) = self.delay_range;
        if !min.is_finite() || !max.is_finite() || min < 0.0 || max < min {
            return Err(format!("invalid delay range [{min}, {max}]").into());
        }
        Ok(())
    }

    /// Number of article links considered per category.
    pub fn per_category_cap(&self) -> usize {
        per_category_cap(self.max_articles_per_run, self.categories.len())
    }
}

/// `floor(max_articles / categories)`, or zero when there are no categories.
pub fn per_category_cap(max_articles: usize, categories: usize) -> usize {
    if categories == 0 {
        0
    } else {
        max_articles / categories
    }
}
