use serde::Deserialize;

/// Main configuration structure for Shirt-Scraper
///
/// Every section is optional; missing keys fall back to the values used
/// against the live catalog.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    pub product: ProductConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Home page URL; every discovered href is joined onto it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Prefix prepended to product image `src` attributes
    #[serde(rename = "image-base-url")]
    pub image_base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://shirts4mike.com".to_string(),
            image_base_url: "http://www.shirts4mike.com/".to_string(),
        }
    }
}

/// How a failed fetch inside a fan-out stage is handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FanOutPolicy {
    /// The first failed page aborts the whole run
    #[default]
    FailFast,

    /// Failed pages are logged and skipped
    Isolate,
}

impl std::fmt::Display for FanOutPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FailFast => write!(f, "fail-fast"),
            Self::Isolate => write!(f, "isolate"),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Substring an href must contain to be picked up on the home page
    #[serde(rename = "home-link-filter")]
    pub home_link_filter: String,

    /// Substring an href must contain to be picked up on a category page
    #[serde(rename = "product-link-filter")]
    pub product_link_filter: String,

    /// Marker identifying a product page URL
    #[serde(rename = "product-marker")]
    pub product_marker: String,

    /// Failure handling for the category and product stages
    #[serde(rename = "fan-out-policy")]
    pub fan_out_policy: FanOutPolicy,

    /// Optional cap on fetches in flight within one stage; unset issues
    /// every URL of the stage at once
    #[serde(rename = "max-concurrent-pages-open")]
    pub max_concurrent_pages_open: Option<u32>,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            home_link_filter: "shirt".to_string(),
            product_link_filter: "shirt.php?id=".to_string(),
            product_marker: "?id=".to_string(),
            fan_out_policy: FanOutPolicy::FailFast,
            max_concurrent_pages_open: None,
            request_timeout: 30,
        }
    }
}

/// Selectors used on product pages
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProductConfig {
    #[serde(rename = "title-selector")]
    pub title_selector: String,

    #[serde(rename = "price-selector")]
    pub price_selector: String,

    #[serde(rename = "image-selector")]
    pub image_selector: String,

    /// Number of leading characters dropped from the title text
    #[serde(rename = "title-label-width")]
    pub title_label_width: usize,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            title_selector: ".shirt-details h1".to_string(),
            price_selector: ".shirt-details h1 .price".to_string(),
            image_selector: ".shirt-picture img".to_string(),
            title_label_width: 4,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "shirt-scraper".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the dated CSV files
    #[serde(rename = "data-dir")]
    pub data_dir: String,

    /// Append-only error log
    #[serde(rename = "error-log")]
    pub error_log: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            error_log: "./scraper-error.log".to_string(),
        }
    }
}
