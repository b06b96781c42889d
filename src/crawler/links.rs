//! Link discovery and classification
//!
//! Links are joined onto the base URL by plain concatenation
//! (`base + "/" + href`). Hrefs that are already absolute or start with a
//! slash therefore come out double-prefixed; the catalog only uses bare
//! relative hrefs, and the CSV must carry exactly these URLs.

use crate::ScraperError;
use scraper::{Html, Selector};

/// Which tier a discovered link belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkClass {
    /// A single product page, scraped in the last stage
    Product,
    /// Any other page, crawled for further product links
    Category,
}

/// Result of splitting links by [`LinkClass`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedLinks {
    pub product_pages: Vec<String>,
    pub to_crawl: Vec<String>,
}

/// Collects the hrefs of every anchor whose href contains `href_filter`
///
/// Each href is joined onto `base_url` and the result is deduplicated by
/// exact string equality, keeping document order with the first occurrence
/// winning.
///
/// # Example
///
/// ```
/// use scraper::Html;
/// use shirt_scraper::crawler::extract_links;
///
/// let doc = Html::parse_document(r#"<a href="shirts.php">All</a><a href="shirts.php">Again</a>"#);
/// let links = extract_links(&doc, "shirt", "http://shop.test").unwrap();
/// assert_eq!(links, vec!["http://shop.test/shirts.php".to_string()]);
/// ```
pub fn extract_links(
    document: &Html,
    href_filter: &str,
    base_url: &str,
) -> Result<Vec<String>, ScraperError> {
    let selector = anchor_selector(href_filter)?;
    let mut links: Vec<String> = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let link = join_href(base_url, href);
        if !links.contains(&link) {
            links.push(link);
        }
    }

    Ok(links)
}

/// Parses `html` and runs [`extract_links`] on it
pub fn extract_links_from_markup(
    html: &str,
    href_filter: &str,
    base_url: &str,
) -> Result<Vec<String>, ScraperError> {
    let document = Html::parse_document(html);
    extract_links(&document, href_filter, base_url)
}

/// Joins an href onto the base URL verbatim
pub fn join_href(base_url: &str, href: &str) -> String {
    format!("{}/{}", base_url, href)
}

/// Classifies a single link by the position of `marker`
///
/// The marker must appear after the first byte; a link starting with the
/// marker is not a product page.
pub fn classify_link(link: &str, marker: &str) -> LinkClass {
    match link.find(marker) {
        Some(pos) if pos > 0 => LinkClass::Product,
        _ => LinkClass::Category,
    }
}

/// Splits links into product pages and pages still to crawl
///
/// Every input link lands in exactly one bucket, in input order.
pub fn classify_links(links: Vec<String>, marker: &str) -> ClassifiedLinks {
    let (product_pages, to_crawl) = links
        .into_iter()
        .partition(|link| classify_link(link, marker) == LinkClass::Product);

    ClassifiedLinks {
        product_pages,
        to_crawl,
    }
}

fn anchor_selector(href_filter: &str) -> Result<Selector, ScraperError> {
    let css = format!("a[href*='{}']", href_filter);
    Selector::parse(&css).map_err(|e| ScraperError::Parse {
        context: format!("selector {}", css),
        message: e.to_string(),
    })
}
