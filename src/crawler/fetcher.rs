//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper:
//! - Building the shared HTTP client with a proper user agent string
//! - GET requests returning the raw page markup
//!
//! There is no retry logic. A page either comes back with `200 OK` or the
//! fetch fails and the caller decides what to do.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::FetchError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Crawler settings (request timeout)
///
/// # Example
///
/// ```no_run
/// use shirt_scraper::config::Config;
/// use shirt_scraper::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version
    let user_agent = format!("{}/{}", user_agent.crawler_name, user_agent.crawler_version);

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(crawler.request_timeout))
        .connect_timeout(Duration::from_secs(crawler.request_timeout.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its markup
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200 | `Ok(body)` |
/// | Any other status | `FetchError::Status` |
/// | Connect error, timeout, unreadable body | `FetchError::Transport` |
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, FetchError> {
    tracing::debug!("GET {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| FetchError::Transport {
        url: url.to_string(),
        source,
    })
}
