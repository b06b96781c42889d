//! Append-only error log

use crate::crawler::CAPTURE_TIME_FORMAT;
use chrono::Local;
use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Durable log of failures, one `<message> <timestamp>` line per error
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one line, creating the file if needed
    pub fn append(&self, message: &str) -> std::io::Result<()> {
        let line = format!(
            "{} {}\n",
            message,
            Local::now().format(CAPTURE_TIME_FORMAT)
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }

    /// Reports an error on the console and in the log
    ///
    /// A failure to write the log itself is only reported on the console.
    pub fn report(&self, error: &dyn Display) {
        tracing::error!("{}", error);

        if let Err(e) = self.append(&error.to_string()) {
            tracing::error!(
                "Failed to append to error log {}: {}",
                self.path.display(),
                e
            );
        }
    }
}
