//! Data models for collected articles, run summaries, and merged datasets.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ArticleRecord`]: One assembled article row, the unit persisted to CSV
//! - [`MetricField`] / [`SyntheticFields`]: Which engagement counts were synthesized
//! - [`RunSummary`]: Aggregate statistics of one collection cycle
//! - [`TaggedRecord`]: A record annotated with the dataset it was merged from

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Column order of a persisted record set.
pub const RECORD_COLUMNS: [&str; 12] = [
    "headline",
    "date",
    "location",
    "views",
    "comments",
    "likes",
    "shares",
    "engagement_score",
    "read_minutes",
    "category",
    "url",
    "content_length",
];

/// Name of the provenance column appended to merged datasets.
pub const SOURCE_COLUMN: &str = "source_file";

/// One of the four engagement counts extracted from an article page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricField {
    Views,
    Comments,
    Likes,
    Shares,
}

impl MetricField {
    pub const ALL: [MetricField; 4] = [
        MetricField::Views,
        MetricField::Comments,
        MetricField::Likes,
        MetricField::Shares,
    ];

    /// Inclusive range synthetic values for this field are drawn from.
    pub fn synthetic_range(self) -> (u64, u64) {
        match self {
            MetricField::Views => (100, 50_000),
            MetricField::Comments => (0, 200),
            MetricField::Likes => (0, 1_000),
            MetricField::Shares => (0, 500),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MetricField::Views => "views",
            MetricField::Comments => "comments",
            MetricField::Likes => "likes",
            MetricField::Shares => "shares",
        }
    }
}

/// Tracks which counts of a record were synthesized instead of read from the page.
///
/// This is kept in memory only; the persisted row layout does not carry it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyntheticFields {
    pub views: bool,
    pub comments: bool,
    pub likes: bool,
    pub shares: bool,
}

impl SyntheticFields {
    pub fn mark(&mut self, field: MetricField) {
        match field {
            MetricField::Views => self.views = true,
            MetricField::Comments => self.comments = true,
            MetricField::Likes => self.likes = true,
            MetricField::Shares => self.shares = true,
        }
    }

    pub fn contains(&self, field: MetricField) -> bool {
        match field {
            MetricField::Views => self.views,
            MetricField::Comments => self.comments,
            MetricField::Likes => self.likes,
            MetricField::Shares => self.shares,
        }
    }

    pub fn any(&self) -> bool {
        self.views || self.comments || self.likes || self.shares
    }

    /// Names of the synthesized fields, for logging.
    pub fn names(&self) -> Vec<&'static str> {
        MetricField::ALL
            .into_iter()
            .filter(|f| self.contains(*f))
            .map(MetricField::as_str)
            .collect()
    }
}

/// A single article as collected during one cycle.
///
/// Records are built once by the collector and never mutated afterwards.
/// The serde field order matches [`RECORD_COLUMNS`], so the same struct
/// reads back rows of any persisted record set or merged dataset (the extra
/// `source_file` column is ignored).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// The article headline. Never empty.
    pub headline: String,
    /// Publication time as an ISO-8601 string.
    pub date: String,
    /// Canonical hierarchical location, e.g. `Kerala/Ernakulam`.
    pub location: String,
    pub views: u64,
    pub comments: u64,
    pub likes: u64,
    pub shares: u64,
    /// Weighted interaction rate in `[0.0, 100.0]`, two decimals.
    pub engagement_score: f64,
    /// Estimated reading time, at least one minute.
    pub read_minutes: u32,
    /// The configured category key this article was collected under.
    pub category: String,
    /// Source URL of the article page.
    pub url: String,
    /// Whitespace-delimited word count of the article body.
    pub content_length: u64,
    /// Counts that were synthesized by the fallback policy.
    #[serde(skip)]
    pub synthetic: SyntheticFields,
}

impl ArticleRecord {
    /// Render the record as one CSV row in [`RECORD_COLUMNS`] order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.headline.clone(),
            self.date.clone(),
            self.location.clone(),
            self.views.to_string(),
            self.comments.to_string(),
            self.likes.to_string(),
            self.shares.to_string(),
            self.engagement_score.to_string(),
            self.read_minutes.to_string(),
            self.category.clone(),
            self.url.clone(),
            self.content_length.to_string(),
        ]
    }

    /// Composite key used to detect the same article across runs.
    pub fn dedup_key(&self) -> (String, String) {
        (self.headline.clone(), self.date.clone())
    }
}

/// A record carried into a merged dataset, tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedRecord {
    pub record: ArticleRecord,
    /// Name of the dataset (file name) the record was loaded from.
    pub source: String,
}

/// Aggregate statistics of one collection cycle.
///
/// One summary is produced per cycle that collected at least one record and
/// appended to the persistent summary log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Cycle end time, ISO-8601.
    pub timestamp: String,
    pub duration_minutes: f64,
    pub articles_collected: usize,
    /// Path of the CSV file the records were written to.
    pub filename: String,
    /// Distinct categories present in the collected records.
    pub categories: BTreeSet<String>,
    pub avg_engagement: f64,
    pub total_views: u64,
    pub total_comments: u64,
    /// Records with at least one synthesized engagement count.
    #[serde(default)]
    pub synthetic_metric_records: usize,
}

impl RunSummary {
    /// Build the summary for a finished cycle.
    pub fn from_records(
        records: &[ArticleRecord],
        timestamp: String,
        duration_minutes: f64,
        filename: String,
    ) -> Self {
        let avg_engagement = if records.is_empty() {
            0.0
        } else {
            records.iter().map(|r| r.engagement_score).sum::<f64>() / records.len() as f64
        };

        RunSummary {
            timestamp,
            duration_minutes,
            articles_collected: records.len(),
            filename,
            categories: records.iter().map(|r| r.category.clone()).collect(),
            avg_engagement,
            total_views: records.iter().map(|r| r.views).sum(),
            total_comments: records.iter().map(|r| r.comments).sum(),
            synthetic_metric_records: records.iter().filter(|r| r.synthetic.any()).count(),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_record(headline: &str, date: &str, category: &str) -> ArticleRecord {
    ArticleRecord {
        headline: headline.to_string(),
        date: date.to_string(),
        location: "Kerala/General".to_string(),
        views: 1000,
        comments: 10,
        likes: 20,
        shares: 5,
        engagement_score: 1.15,
        read_minutes: 2,
        category: category.to_string(),
        url: format!("https://www.manoramaonline.com/news/{}.html", headline.len()),
        content_length: 400,
        synthetic: SyntheticFields::default(),
    }
}
