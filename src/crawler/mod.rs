//! Crawler module for page fetching and extraction
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching
//! - Link extraction and product/category classification
//! - Product field extraction
//! - Tiered crawl coordination

mod coordinator;
mod fetcher;
mod links;
mod product;

pub use coordinator::{run_scraper, Coordinator};
pub use fetcher::{build_http_client, fetch_page};
pub use links::{
    classify_link, classify_links, extract_links, extract_links_from_markup, join_href,
    ClassifiedLinks, LinkClass,
};
pub use product::{
    extract_product, extract_product_from_markup, ProductRecord, ProductRules,
    CAPTURE_TIME_FORMAT,
};
