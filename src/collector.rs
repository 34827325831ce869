//! Record assembly and collection cycles.
//!
//! A cycle walks the configured categories in order. For each category it
//! considers at most `floor(max_articles_per_run / categories)` article links,
//! and the whole cycle stops as soon as `max_articles_per_run` records have
//! been collected, even in the middle of a category. Pages without a headline
//! produce no record and do not count toward the limit.
//!
//! Failures are contained: a failed article is skipped, a category whose
//! listing cannot be indexed is skipped, and a failed summary write is only
//! logged.

use crate::config::ScraperConfig;
use crate::extract::fields;
use crate::extract::resolver::Lookup;
use crate::location::LocationNormalizer;
use crate::metrics::{MetricFallback, engagement_score, read_minutes};
use crate::models::{ArticleRecord, MetricField, RunSummary, SyntheticFields};
use crate::outputs::{records, summary};
use crate::scrapers::{PageFetcher, index_category};
use crate::utils::{iso_now, timestamp_slug, truncate_for_log};
use chrono::Local;
use scraper::Html;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};

/// Builds [`ArticleRecord`]s from parsed pages.
#[derive(Debug, Clone)]
pub struct ArticleAssembler<M> {
    normalizer: LocationNormalizer,
    words_per_minute: u32,
    fallback: M,
}

impl<M: MetricFallback> ArticleAssembler<M> {
    pub fn new(config: &ScraperConfig, fallback: M) -> Self {
        ArticleAssembler {
            normalizer: LocationNormalizer::new(&config.location_rules),
            words_per_minute: config.words_per_minute,
            fallback,
        }
    }

    /// Assemble one record, or `None` when the page has no headline.
    pub fn assemble<D: Lookup + ?Sized>(
        &self,
        doc: &D,
        url: &str,
        category: &str,
    ) -> Option<ArticleRecord> {
        let headline = fields::headline(doc)?;

        let mut synthetic = SyntheticFields::default();
        let mut counts = [0u64; 4];
        for (slot, field) in counts.iter_mut().zip(MetricField::ALL) {
            let (value, synthesized) = fields::count_or_synthesize(doc, field, &self.fallback);
            if synthesized {
                synthetic.mark(field);
            }
            *slot = value;
        }
        let [views, comments, likes, shares] = counts;
        if synthetic.any() {
            debug!(%url, fields = ?synthetic.names(), "Synthesized missing engagement counts");
        }

        let content_length = fields::content_length(doc);

        Some(ArticleRecord {
            headline,
            date: fields::date(doc),
            location: fields::location(doc, category, &self.normalizer),
            views,
            comments,
            likes,
            shares,
            engagement_score: engagement_score(views, comments, likes, shares),
            read_minutes: read_minutes(content_length, self.words_per_minute),
            category: category.to_string(),
            url: url.to_string(),
            content_length,
            synthetic,
        })
    }

    /// Parse raw HTML and assemble a record from it.
    pub fn assemble_html(&self, html: &str, url: &str, category: &str) -> Option<ArticleRecord> {
        let document = Html::parse_document(html);
        self.assemble(&document, url, category)
    }
}

/// Per-category statistics of one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStats {
    pub category: String,
    /// Article links taken from the listing after capping.
    pub links_considered: usize,
    pub records: usize,
    /// `false` when the listing could not be indexed.
    pub indexed: bool,
}

/// Records collected during one cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleOutcome {
    pub records: Vec<ArticleRecord>,
    pub categories: Vec<CategoryStats>,
}

/// Walk every category and collect records, honoring both caps.
#[instrument(level = "info", skip_all, fields(max = config.max_articles_per_run))]
pub async fn collect_articles<F, M>(
    fetcher: &F,
    config: &ScraperConfig,
    assembler: &ArticleAssembler<M>,
) -> CycleOutcome
where
    F: PageFetcher,
    M: MetricFallback,
{
    let cap = config.per_category_cap();
    let mut outcome = CycleOutcome::default();

    'categories: for category in &config.categories {
        if outcome.records.len() >= config.max_articles_per_run {
            break;
        }
        info!(category = %category.key, "Scraping category");

        let links = match index_category(fetcher, config, category, cap).await {
            Ok(links) => links,
            Err(e) => {
                error!(category = %category.key, error = %e, "Failed to index category; skipping");
                outcome.categories.push(CategoryStats {
                    category: category.key.clone(),
                    links_considered: 0,
                    records: 0,
                    indexed: false,
                });
                continue;
            }
        };

        let mut stats = CategoryStats {
            category: category.key.clone(),
            links_considered: links.len(),
            records: 0,
            indexed: true,
        };

        for link in &links {
            let html = match fetcher.fetch_article(link).await {
                Ok(html) => html,
                Err(e) => {
                    error!(url = %link, error = %e, "Failed to fetch article; skipping");
                    continue;
                }
            };

            match assembler.assemble_html(&html, link, &category.key) {
                Some(record) => {
                    info!(headline = %truncate_for_log(&record.headline, 50), "Scraped article");
                    outcome.records.push(record);
                    stats.records += 1;
                }
                None => warn!(url = %link, "No headline found; dropping article"),
            }

            if outcome.records.len() >= config.max_articles_per_run {
                info!(collected = outcome.records.len(), "Reached max articles for this run");
                outcome.categories.push(stats);
                break 'categories;
            }
        }

        if stats.records == 0 {
            warn!(category = %category.key, "No articles collected from category");
        } else {
            info!(category = %category.key, count = stats.records, "Finished category");
        }
        outcome.categories.push(stats);
    }

    outcome
}

/// What one cycle produced, as reported to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub articles_collected: usize,
    /// CSV file written, when any records were collected.
    pub filename: Option<String>,
}

/// Run one complete cycle: collect, persist records, append the summary.
///
/// Zero collected records is a valid outcome and writes nothing. A failure to
/// write the record set is returned; a failure to update the summary log is
/// only logged.
///
/// # Arguments
///
/// * `fetcher` - Source of category and article pages
/// * `config` - Categories, caps, and output locations
/// * `assembler` - Turns article pages into records
///
/// # Returns
///
/// A [`CycleReport`] with the number of records and the CSV path written.
///
/// # Examples
///
/// ```ignore
/// let fetcher = HttpFetcher::new(&config)?;
/// let assembler = ArticleAssembler::new(&config, RandomMetrics);
/// let report = run_cycle(&fetcher, &config, &assembler).await?;
/// info!(articles = report.articles_collected, "done");
/// ```
#[instrument(level = "info", skip_all)]
pub async fn run_cycle<F, M>(
    fetcher: &F,
    config: &ScraperConfig,
    assembler: &ArticleAssembler<M>,
) -> Result<CycleReport, Box<dyn Error>>
where
    F: PageFetcher,
    M: MetricFallback,
{
    info!("Starting scraping cycle");
    let start = Local::now();

    let outcome = collect_articles(fetcher, config, assembler).await;
    for stats in &outcome.categories {
        debug!(
            category = %stats.category,
            links = stats.links_considered,
            records = stats.records,
            indexed = stats.indexed,
            "Category stats"
        );
    }
    if outcome.records.is_empty() {
        warn!("No articles collected in this cycle");
        return Ok(CycleReport {
            articles_collected: 0,
            filename: None,
        });
    }

    let path = Path::new(&config.output_dir)
        .join(format!("manorama_news_data_{}.csv", timestamp_slug()));
    records::write_records(&path, &outcome.records).await?;
    let filename = path.to_string_lossy().to_string();

    let duration_minutes = (Local::now() - start).num_milliseconds() as f64 / 60_000.0;
    let run_summary =
        RunSummary::from_records(&outcome.records, iso_now(), duration_minutes, filename.clone());
    if let Err(e) = summary::append_summary(&config.summary_file, &run_summary).await {
        error!(path = %config.summary_file, error = %e, "Error saving summary");
    }

    info!(
        collected = outcome.records.len(),
        synthetic = run_summary.synthetic_metric_records,
        %filename,
        "Scraping cycle completed"
    );
    Ok(CycleReport {
        articles_collected: outcome.records.len(),
        filename: Some(filename),
    })
}
