//! Dated CSV output
//!
//! Each run writes `<data-dir>/<YYYY-M-D>.csv`. Month and day are not
//! zero-padded, so March 5th 2024 becomes `2024-3-5.csv`.

use crate::crawler::ProductRecord;
use crate::output::traits::RecordSink;
use chrono::{Local, NaiveDate};
use std::fs;
use std::path::PathBuf;

/// Column names, in [`ProductRecord`] field order
pub const CSV_HEADER: [&str; 5] = ["Title", "Price", "ImageUrl", "Url", "Time"];

/// Writes product records as CSV under a data directory
#[derive(Debug, Clone)]
pub struct CsvOutput {
    data_dir: PathBuf,
}

impl CsvOutput {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Writes the records to the file named after `date`
    pub fn write_records_for(
        &self,
        records: &[ProductRecord],
        date: NaiveDate,
    ) -> crate::Result<PathBuf> {
        let csv = records_to_csv(records)?;

        fs::create_dir_all(&self.data_dir)?;
        let path = self.data_dir.join(csv_file_name(date));
        fs::write(&path, csv)?;

        tracing::info!("Wrote {} records to {}", records.len(), path.display());
        Ok(path)
    }
}

impl RecordSink for CsvOutput {
    fn write_records(&self, records: &[ProductRecord]) -> crate::Result<PathBuf> {
        self.write_records_for(records, Local::now().date_naive())
    }
}

/// Returns the unpadded `YYYY-M-D.csv` file name for a date
pub fn csv_file_name(date: NaiveDate) -> String {
    format!("{}.csv", date.format("%Y-%-m-%-d"))
}

/// Serializes records to CSV text, header row first
///
/// The header is written even when there are no records.
pub fn records_to_csv(records: &[ProductRecord]) -> crate::Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);

    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| crate::ScraperError::Io(e.into_error()))?;

    String::from_utf8(bytes).map_err(|e| crate::ScraperError::Parse {
        context: "csv output".to_string(),
        message: e.to_string(),
    })
}
