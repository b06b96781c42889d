//! Output handler traits

use crate::crawler::ProductRecord;
use std::path::PathBuf;

/// Destination for the records of a finished run
pub trait RecordSink: Send + Sync {
    /// Persists the full record set
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Where the records were written
    /// * `Err(ScraperError)` - Serialization or IO failure
    fn write_records(&self, records: &[ProductRecord]) -> crate::Result<PathBuf>;
}
