//! Run-summary log.
//!
//! The log is a single pretty-printed JSON array holding one [`RunSummary`] per
//! completed cycle. Appending reads the whole array, pushes the new entry, and
//! writes the array back; there is no locking, so only one writer may use a
//! log at a time.
//!
//! ```text
//! [
//!   { "timestamp": "2025-06-05T06:00:12", "articles_collected": 97, ... },
//!   { "timestamp": "2025-06-05T12:00:09", "articles_collected": 99, ... }
//! ]
//! ```

use crate::models::RunSummary;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Every summary recorded so far; an absent file is an empty log.
pub async fn read_summaries(summary_file: &str) -> Result<Vec<RunSummary>, Box<dyn Error>> {
    if !Path::new(summary_file).exists() {
        return Ok(Vec::new());
    }
    let json = fs::read_to_string(summary_file).await?;
    let summaries = serde_json::from_str(&json)?;
    Ok(summaries)
}

/// Append `summary` to the log at `summary_file`.
#[instrument(level = "info", skip_all, fields(%summary_file))]
pub async fn append_summary(summary_file: &str, summary: &RunSummary) -> Result<(), Box<dyn Error>> {
    let mut summaries = read_summaries(summary_file).await?;
    summaries.push(summary.clone());

    if let Some(parent) = Path::new(summary_file).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let json = serde_json::to_string_pretty(&summaries)?;
    fs::write(summary_file, json).await?;
    info!(entries = summaries.len(), "Appended run summary");
    Ok(())
}
