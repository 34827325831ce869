//! CSV persistence of record sets.
//!
//! Every file starts with the header row of [`RECORD_COLUMNS`]; merged datasets
//! append a trailing [`SOURCE_COLUMN`]. Files are UTF-8 and written in one
//! piece once the whole set is rendered.

use crate::models::{ArticleRecord, RECORD_COLUMNS, SOURCE_COLUMN, TaggedRecord};
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

async fn write_rows<I>(path: &Path, header: &[&str], rows: I) -> Result<usize, Box<dyn Error>>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    let mut count = 0;
    for row in rows {
        writer.write_record(&row)?;
        count += 1;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(path, bytes).await?;
    Ok(count)
}

/// Write a cycle's records to `path`, creating parent directories.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_records(path: &Path, records: &[ArticleRecord]) -> Result<(), Box<dyn Error>> {
    let count = write_rows(path, &RECORD_COLUMNS, records.iter().map(ArticleRecord::to_row)).await?;
    info!(count, "Saved articles to CSV");
    Ok(())
}

/// Write a merged dataset, one provenance column per row.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_tagged(path: &Path, records: &[TaggedRecord]) -> Result<(), Box<dyn Error>> {
    let mut header = RECORD_COLUMNS.to_vec();
    header.push(SOURCE_COLUMN);
    let rows = records.iter().map(|tagged| {
        let mut row = tagged.record.to_row();
        row.push(tagged.source.clone());
        row
    });
    let count = write_rows(path, &header, rows).await?;
    info!(count, "Saved merged dataset to CSV");
    Ok(())
}

/// Read a persisted record set. Columns beyond [`RECORD_COLUMNS`] are ignored.
pub async fn read_records(path: &Path) -> Result<Vec<ArticleRecord>, Box<dyn Error>> {
    let bytes = fs::read(path).await?;
    let mut reader = csv::Reader::from_reader(bytes.as_slice());
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: ArticleRecord = row?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_record;

    #[tokio::test]
    async fn test_write_then_read_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.csv");
        let mut quoted = sample_record("Rain, wind and \"alerts\"", "2025-06-05T00:00:00", "kerala");
        quoted.headline.push_str(" മഴ");
        let records = vec![quoted, sample_record("Second", "2025-06-06T00:00:00", "india")];

        write_records(&path, &records).await.unwrap();
        let read = read_records(&path).await.unwrap();

        assert_eq!(read, records);
    }

    #[tokio::test]
    async fn test_header_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_records(&path, &[sample_record("A", "d", "world")]).await.unwrap();

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "headline,date,location,views,comments,likes,shares,engagement_score,read_minutes,category,url,content_length"
        );
    }

    #[tokio::test]
    async fn test_tagged_rows_read_back_as_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merged.csv");
        let tagged = vec![TaggedRecord {
            record: sample_record("A", "d", "world"),
            source: "run1.csv".to_string(),
        }];

        write_tagged(&path, &tagged).await.unwrap();
        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(text.lines().next().unwrap().ends_with(",source_file"));
        assert!(text.lines().nth(1).unwrap().ends_with(",run1.csv"));

        let read = read_records(&path).await.unwrap();
        assert_eq!(read, vec![tagged[0].record.clone()]);
    }

    #[tokio::test]
    async fn test_read_rejects_malformed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        tokio::fs::write(&path, "headline,date\nonly,two\n").await.unwrap();
        assert!(read_records(&path).await.is_err());
    }
}
