//! Product page extraction

use crate::config::ProductConfig;
use crate::ScraperError;
use chrono::{DateTime, Local};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// Format of the `Time` column (`3/5/2024, 1:07:09 PM`)
pub const CAPTURE_TIME_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// One scraped product
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "Title")]
    pub title: String,

    /// Price exactly as displayed, e.g. `$18`
    #[serde(rename = "Price")]
    pub price: String,

    #[serde(rename = "ImageUrl")]
    pub image_url: String,

    /// The product page this record was scraped from
    #[serde(rename = "Url")]
    pub url: String,

    /// Capture time
    #[serde(rename = "Time")]
    pub time: String,
}

/// Compiled product page selectors
#[derive(Debug, Clone)]
pub struct ProductRules {
    title: Selector,
    price: Selector,
    image: Selector,
    title_label_width: usize,
    image_base_url: String,
}

impl ProductRules {
    /// Compiles the configured selectors
    pub fn new(config: &ProductConfig, image_base_url: &str) -> Result<Self, ScraperError> {
        Ok(Self {
            title: compile(&config.title_selector)?,
            price: compile(&config.price_selector)?,
            image: compile(&config.image_selector)?,
            title_label_width: config.title_label_width,
            image_base_url: image_base_url.to_string(),
        })
    }
}

fn compile(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::Parse {
        context: format!("selector {}", css),
        message: e.to_string(),
    })
}

/// Builds a [`ProductRecord`] from a product page
///
/// Missing elements yield empty fields rather than errors. The title is the
/// heading text with its fixed-width leading label (the price, on the live
/// catalog) cut off.
pub fn extract_product(
    document: &Html,
    source_url: &str,
    rules: &ProductRules,
    captured_at: DateTime<Local>,
) -> ProductRecord {
    let price = first_text(document, &rules.price);
    let heading = first_text(document, &rules.title);
    let title: String = heading.chars().skip(rules.title_label_width).collect();

    let src = document
        .select(&rules.image)
        .next()
        .and_then(|img| img.value().attr("src"))
        .unwrap_or_default();
    let image_url = format!("{}{}", rules.image_base_url, src);

    let record = ProductRecord {
        title,
        price,
        image_url,
        url: source_url.to_string(),
        time: captured_at.format(CAPTURE_TIME_FORMAT).to_string(),
    };

    tracing::debug!(
        "Extracted {:?} ({}) from {}",
        record.title,
        record.price,
        record.url
    );

    record
}

/// Parses `html` and runs [`extract_product`] on it, stamped with the current time
pub fn extract_product_from_markup(html: &str, source_url: &str, rules: &ProductRules) -> ProductRecord {
    let document = Html::parse_document(html);
    extract_product(&document, source_url, rules, Local::now())
}

fn first_text(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .map(|element| element.text().collect::<String>())
        .unwrap_or_default()
}
