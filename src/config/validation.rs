use crate::config::types::{Config, CrawlerConfig, OutputConfig, ProductConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_product_config(&config.product)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url("base-url", &config.base_url)?;
    validate_http_url("image-base-url", &config.image_base_url)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    require_non_empty("home-link-filter", &config.home_link_filter)?;
    require_non_empty("product-link-filter", &config.product_link_filter)?;
    require_non_empty("product-marker", &config.product_marker)?;

    // Filters are spliced into a quoted attribute selector
    for (key, filter) in [
        ("home-link-filter", &config.home_link_filter),
        ("product-link-filter", &config.product_link_filter),
    ] {
        if filter.contains('\'') {
            return Err(ConfigError::Validation(format!(
                "{} must not contain a single quote, got '{}'",
                key, filter
            )));
        }
    }

    if let Some(limit) = config.max_concurrent_pages_open {
        if !(1..=100).contains(&limit) {
            return Err(ConfigError::Validation(format!(
                "max-concurrent-pages-open must be between 1 and 100, got {}",
                limit
            )));
        }
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    Ok(())
}

/// Validates product page selectors
fn validate_product_config(config: &ProductConfig) -> Result<(), ConfigError> {
    for (key, selector) in [
        ("title-selector", &config.title_selector),
        ("price-selector", &config.price_selector),
        ("image-selector", &config.image_selector),
    ] {
        require_non_empty(key, selector)?;
        Selector::parse(selector).map_err(|e| {
            ConfigError::Validation(format!("{} '{}' is not a valid selector: {}", key, selector, e))
        })?;
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    require_non_empty("crawler-name", &config.crawler_name)?;

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    require_non_empty("crawler-version", &config.crawler_version)
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    require_non_empty("data-dir", &config.data_dir)?;
    require_non_empty("error-log", &config.error_log)
}

fn require_non_empty(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", key)));
    }
    Ok(())
}

/// Requires an absolute http(s) URL
fn validate_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", key, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use the http or https scheme",
            key, value
        )));
    }

    Ok(())
}
