//! Persistence of collected data.
//!
//! # Submodules
//!
//! - [`records`]: Writes and reads record sets as CSV (one file per cycle, plus merged datasets)
//! - [`summary`]: Maintains the append-only JSON log of run summaries
//!
//! # Output Structure
//!
//! ```text
//! scraped_data/
//! ├── manorama_news_data_20250605_060012.csv
//! └── manorama_news_data_20250605_120009.csv
//! scraping_summary.json
//! merged_manorama_data_20250606_090000.csv
//! ```

pub mod records;
pub mod summary;
