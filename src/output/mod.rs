//! Output module for scraper results
//!
//! This module handles:
//! - Serializing product records to dated CSV files
//! - Appending failures to the durable error log
//! - Summarizing a run

mod csv_output;
mod error_log;
mod summary;
mod traits;

pub use csv_output::{csv_file_name, records_to_csv, CsvOutput, CSV_HEADER};
pub use error_log::ErrorLog;
pub use summary::{print_summary, CrawlSummary};
pub use traits::RecordSink;
