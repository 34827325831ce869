//! Cross-run dataset merging.
//!
//! Record sets from several cycles are concatenated in the order they are
//! supplied, each row tagged with the dataset it came from, and rows sharing a
//! `(headline, date)` key are collapsed to the first one seen. Merging a
//! dataset with itself therefore yields the same rows as merging it once.

use crate::models::{ArticleRecord, TaggedRecord};
use crate::outputs::records;
use crate::utils::timestamp_slug;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

/// One persisted record set and the name it is tagged with.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub source: String,
    pub records: Vec<ArticleRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedDataset {
    /// Deduplicated rows in first-seen order.
    pub records: Vec<TaggedRecord>,
    /// Rows loaded from each source before deduplication, in input order.
    pub per_source: Vec<(String, usize)>,
    pub duplicates_removed: usize,
}

/// Merge `datasets`, or `None` when there is nothing to merge.
///
/// # Arguments
///
/// * `datasets` - Record sets in the order they should be concatenated
///
/// # Returns
///
/// Every distinct `(headline, date)` row tagged with its source, keeping the
/// first occurrence, plus per-source counts and the number of rows dropped.
/// An empty input yields `None`; datasets that are merely empty yield an
/// empty result.
///
/// # Examples
///
/// ```ignore
/// let merged = merge(vec![monday, tuesday]).expect("at least one dataset");
/// assert!(merged.records.len() <= monday_rows + tuesday_rows);
/// ```
pub fn merge(datasets: Vec<Dataset>) -> Option<MergedDataset> {
    if datasets.is_empty() {
        return None;
    }

    let per_source = datasets
        .iter()
        .map(|d| (d.source.clone(), d.records.len()))
        .collect::<Vec<_>>();
    let total: usize = per_source.iter().map(|(_, n)| n).sum();

    let records = datasets
        .into_iter()
        .flat_map(|dataset| {
            let source = dataset.source;
            dataset.records.into_iter().map(move |record| TaggedRecord {
                record,
                source: source.clone(),
            })
        })
        .unique_by(|tagged| tagged.record.dedup_key())
        .collect::<Vec<_>>();

    Some(MergedDataset {
        duplicates_removed: total - records.len(),
        records,
        per_source,
    })
}

/// CSV files directly inside `folder`, sorted by file name.
pub async fn list_csv_files(folder: &Path) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut entries = tokio::fs::read_dir(folder).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && entry.file_type().await?.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load every readable file as a [`Dataset`] tagged with its file name.
///
/// Files that fail to load are logged and left out.
#[instrument(level = "info", skip_all)]
pub async fn load_datasets(files: Vec<PathBuf>) -> Vec<Dataset> {
    let datasets: Vec<Dataset> = stream::iter(files)
        .then(|path: PathBuf| async move {
            let source = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string_lossy().to_string());
            match records::read_records(&path).await {
                Ok(records) => {
                    info!(file = %path.display(), count = records.len(), "Loaded dataset");
                    Some(Dataset { source, records })
                }
                Err(e) => {
                    error!(file = %path.display(), error = %e, "Error loading dataset; skipping");
                    None
                }
            }
        })
        .filter_map(std::future::ready)
        .collect()
        .await;
    datasets
}

/// Merge every CSV file in `folder` and write the result.
///
/// Returns the path written, or `None` when the folder held no usable data.
#[instrument(level = "info", skip_all, fields(folder = %folder.display()))]
pub async fn merge_folder(
    folder: &Path,
    output: Option<&str>,
) -> Result<Option<PathBuf>, Box<dyn Error>> {
    let files = if folder.is_dir() {
        list_csv_files(folder).await?
    } else {
        Vec::new()
    };
    if files.is_empty() {
        warn!("No CSV files found");
        return Ok(None);
    }
    info!(count = files.len(), "Found CSV files");

    let Some(merged) = merge(load_datasets(files).await) else {
        warn!("No datasets could be loaded");
        return Ok(None);
    };

    for (source, count) in &merged.per_source {
        info!(%source, count, "Source rows");
    }

    let output = match output {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(format!("merged_manorama_data_{}.csv", timestamp_slug())),
    };
    records::write_tagged(&output, &merged.records).await?;
    info!(
        path = %output.display(),
        rows = merged.records.len(),
        duplicates_removed = merged.duplicates_removed,
        "Saved merged dataset"
    );
    Ok(Some(output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_record;

    fn dataset(source: &str, keys: &[(&str, &str)]) -> Dataset {
        Dataset {
            source: source.to_string(),
            records: keys
                .iter()
                .map(|(headline, date)| sample_record(headline, date, "kerala"))
                .collect(),
        }
    }

    #[test]
    fn test_empty_input_is_no_data() {
        assert_eq!(merge(vec![]), None);
    }

    #[test]
    fn test_empty_datasets_merge_to_empty() {
        let merged = merge(vec![dataset("a.csv", &[])]).unwrap();
        assert!(merged.records.is_empty());
        assert_eq!(merged.per_source, vec![("a.csv".to_string(), 0)]);
    }

    #[test]
    fn test_first_seen_wins() {
        let mut later = sample_record("Same", "2025-06-05T00:00:00", "world");
        later.views = 1;
        let first = dataset("first.csv", &[("Same", "2025-06-05T00:00:00")]);
        let second = Dataset {
            source: "second.csv".to_string(),
            records: vec![later],
        };

        let merged = merge(vec![first, second]).unwrap();
        assert_eq!(merged.records.len(), 1);
        assert_eq!(merged.records[0].source, "first.csv");
        assert_eq!(merged.records[0].record.category, "kerala");
        assert_eq!(merged.duplicates_removed, 1);
    }

    #[test]
    fn test_key_is_headline_and_date() {
        let a = dataset(
            "a.csv",
            &[
                ("Same", "2025-06-05T00:00:00"),
                ("Same", "2025-06-06T00:00:00"),
                ("Other", "2025-06-05T00:00:00"),
                ("Same", "2025-06-05T00:00:00"),
            ],
        );
        let merged = merge(vec![a]).unwrap();
        assert_eq!(merged.records.len(), 3);
        assert_eq!(merged.per_source, vec![("a.csv".to_string(), 4)]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let a = dataset("a.csv", &[("X", "d1"), ("Y", "d1"), ("X", "d1")]);
        let once = merge(vec![a.clone()]).unwrap();
        let twice = merge(vec![a.clone(), a]).unwrap();

        assert_eq!(once.records.len(), twice.records.len());
        assert_eq!(once.records, twice.records);
        assert_eq!(twice.per_source.len(), 2);
    }

    #[test]
    fn test_order_follows_input() {
        let a = dataset("a.csv", &[("A1", "d"), ("A2", "d")]);
        let b = dataset("b.csv", &[("B1", "d"), ("A1", "d")]);
        let merged = merge(vec![a, b]).unwrap();
        let tags: Vec<_> = merged
            .records
            .iter()
            .map(|t| (t.record.headline.as_str(), t.source.as_str()))
            .collect();
        assert_eq!(tags, vec![("A1", "a.csv"), ("A2", "a.csv"), ("B1", "b.csv")]);
    }

    #[tokio::test]
    async fn test_merge_folder() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("scraped_data");
        records::write_records(
            &data.join("run_b.csv"),
            &[sample_record("Dup", "d", "india"), sample_record("B", "d", "india")],
        )
        .await
        .unwrap();
        records::write_records(&data.join("run_a.csv"), &[sample_record("Dup", "d", "kerala")])
            .await
            .unwrap();
        tokio::fs::write(data.join("broken.csv"), "headline\n\"unterminated").await.unwrap();
        tokio::fs::write(data.join("notes.txt"), "ignored").await.unwrap();

        let output = dir.path().join("merged.csv");
        let written = merge_folder(&data, Some(output.to_str().unwrap()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(written, output);

        let text = tokio::fs::read_to_string(&output).await.unwrap();
        let rows: Vec<_> = text.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("Dup,") && rows[0].ends_with(",run_a.csv"));
        assert!(rows[1].starts_with("B,") && rows[1].ends_with(",run_b.csv"));
    }

    #[tokio::test]
    async fn test_merge_folder_without_files() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(merge_folder(dir.path(), None).await.unwrap(), None);
        assert_eq!(
            merge_folder(&dir.path().join("missing"), None).await.unwrap(),
            None
        );
    }
}
