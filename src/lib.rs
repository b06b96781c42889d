//! Shirt-Scraper: a three-tier catalog scraper
//!
//! This crate crawls a small shirt catalog in three fixed stages (home page,
//! category pages, product pages), extracts product fields and writes them to
//! a dated CSV file. Failures are reported on the console and appended to a
//! durable error log.

pub mod config;
pub mod crawler;
pub mod output;

use thiserror::Error;

/// Main error type for Shirt-Scraper operations
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("HTML parse error in {context}: {message}")]
    Parse { context: String, message: String },

    #[error("CSV serialization error: {0}")]
    Serialization(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while fetching a single page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Returns the URL that failed to fetch
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. } | Self::Transport { url, .. } => url,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Shirt-Scraper operations
pub type Result<T> = std::result::Result<T, ScraperError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{classify_links, extract_links, extract_product, run_scraper, ProductRecord};
pub use output::{CrawlSummary, CsvOutput, ErrorLog};
