//! Crawler coordinator - tiered crawl orchestration
//!
//! A run walks three fixed stages:
//! 1. Fetch the home page, collect links matching the home filter and split
//!    them into product pages and category pages
//! 2. Fetch every category page and merge the product links found there
//! 3. Fetch every product page and extract a [`ProductRecord`]
//!
//! Stages 2 and 3 fan out: all fetches of the stage are in flight together
//! on the task driving the run, and results are handled in completion order.
//! The link lists and the record vector are only touched by that task, so
//! nothing is locked.

use crate::config::{Config, FanOutPolicy};
use crate::crawler::links::{classify_links, extract_links_from_markup, ClassifiedLinks};
use crate::crawler::product::{extract_product_from_markup, ProductRecord, ProductRules};
use crate::crawler::{build_http_client, fetch_page};
use crate::output::{CrawlSummary, ErrorLog, RecordSink};
use crate::{FetchError, ScraperError};
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;

/// A fetched page: `(url, markup)`
type FetchedPage = (String, String);

/// Main scraper coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
    rules: ProductRules,
    error_log: ErrorLog,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - HTTP client built and product selectors compiled
    /// * `Err(ScraperError)` - Failed to initialize
    pub fn new(config: Config) -> Result<Self, ScraperError> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        let rules = ProductRules::new(&config.product, &config.site.image_base_url)?;
        let error_log = ErrorLog::new(&config.output.error_log);

        Ok(Self {
            config,
            client,
            rules,
            error_log,
        })
    }

    /// Runs all three stages and hands the records to `sink`
    ///
    /// Any error that ends the run is reported on the console and appended
    /// to the error log before being returned. Nothing is written to the
    /// sink unless every stage succeeded.
    pub async fn run(&self, sink: &dyn RecordSink) -> Result<CrawlSummary, ScraperError> {
        let mut summary = CrawlSummary::new();

        let result = match self.scrape(&mut summary).await {
            Ok(records) => sink.write_records(&records),
            Err(e) => Err(e),
        };

        match result {
            Ok(path) => {
                summary.output_path = Some(path);
                tracing::info!(
                    "Scrape completed: {} records from {} product pages",
                    summary.records,
                    summary.total_product_pages()
                );
                Ok(summary)
            }
            Err(e) => {
                self.error_log.report(&e);
                Err(e)
            }
        }
    }

    /// Runs the three stages and returns the extracted records
    pub async fn scrape(
        &self,
        summary: &mut CrawlSummary,
    ) -> Result<Vec<ProductRecord>, ScraperError> {
        let base_url = self.config.site.base_url.as_str();

        let classified = self
            .scrape_home(base_url, summary)
            .await
            .inspect_err(|_| tracing::error!("Home page scrape failed"))?;

        let product_pages = self
            .scrape_categories(base_url, classified, summary)
            .await
            .inspect_err(|_| tracing::error!("Category page scrape failed"))?;

        self.scrape_products(&product_pages, summary)
            .await
            .inspect_err(|_| tracing::error!("Product page scrape failed"))
    }

    /// Stage 1: home page links, split by product marker
    async fn scrape_home(
        &self,
        base_url: &str,
        summary: &mut CrawlSummary,
    ) -> Result<ClassifiedLinks, ScraperError> {
        tracing::info!("Stage 1: scraping home page {}", base_url);

        let html = fetch_page(&self.client, base_url).await?;
        let links =
            extract_links_from_markup(&html, &self.config.crawler.home_link_filter, base_url)?;
        summary.home_links = links.len();

        let classified = classify_links(links, &self.config.crawler.product_marker);
        summary.initial_product_pages = classified.product_pages.len();
        summary.category_pages = classified.to_crawl.len();

        tracing::info!(
            "Found {} product pages and {} pages to crawl",
            classified.product_pages.len(),
            classified.to_crawl.len()
        );

        Ok(classified)
    }

    /// Stage 2: product links from category pages, merged without duplicates
    async fn scrape_categories(
        &self,
        base_url: &str,
        classified: ClassifiedLinks,
        summary: &mut CrawlSummary,
    ) -> Result<Vec<String>, ScraperError> {
        let ClassifiedLinks {
            mut product_pages,
            to_crawl,
        } = classified;

        tracing::info!("Stage 2: scraping {} category pages", to_crawl.len());

        let pages = self.fetch_all(&to_crawl, summary).await?;

        for (url, html) in pages {
            let links =
                extract_links_from_markup(&html, &self.config.crawler.product_link_filter, base_url)?;
            tracing::debug!("{} product links on {}", links.len(), url);

            for link in links {
                if !product_pages.contains(&link) {
                    product_pages.push(link);
                    summary.discovered_product_pages += 1;
                }
            }
        }

        tracing::info!(
            "{} product pages after category scrape ({} new)",
            product_pages.len(),
            summary.discovered_product_pages
        );

        Ok(product_pages)
    }

    /// Stage 3: one record per product page
    async fn scrape_products(
        &self,
        product_pages: &[String],
        summary: &mut CrawlSummary,
    ) -> Result<Vec<ProductRecord>, ScraperError> {
        tracing::info!("Stage 3: scraping {} product pages", product_pages.len());

        let pages = self.fetch_all(product_pages, summary).await?;

        let records: Vec<ProductRecord> = pages
            .iter()
            .map(|(url, html)| extract_product_from_markup(html, url, &self.rules))
            .collect();

        summary.records = records.len();
        Ok(records)
    }

    /// Fetches every URL concurrently, yielding pages in completion order
    ///
    /// Without `max-concurrent-pages-open` every request of the stage is in
    /// flight at once.
    ///
    /// Under [`FanOutPolicy::FailFast`] the first failure drops the fetches
    /// still in flight and is returned. Under [`FanOutPolicy::Isolate`] each
    /// failure is reported and counted, and the remaining pages are kept.
    async fn fetch_all(
        &self,
        urls: &[String],
        summary: &mut CrawlSummary,
    ) -> Result<Vec<FetchedPage>, ScraperError> {
        let limit = match self.config.crawler.max_concurrent_pages_open {
            Some(limit) => limit as usize,
            None => urls.len().max(1),
        };
        let client = &self.client;

        let fetches = stream::iter(urls.iter().cloned())
            .map(|url| async move {
                let html = fetch_page(client, &url).await?;
                Ok::<FetchedPage, FetchError>((url, html))
            })
            .buffer_unordered(limit);

        match self.config.crawler.fan_out_policy {
            FanOutPolicy::FailFast => {
                let pages: Vec<FetchedPage> = fetches.try_collect().await?;
                Ok(pages)
            }
            FanOutPolicy::Isolate => {
                let results: Vec<Result<FetchedPage, FetchError>> = fetches.collect().await;
                let mut pages = Vec::with_capacity(results.len());

                for result in results {
                    match result {
                        Ok(page) => pages.push(page),
                        Err(e) => {
                            tracing::warn!("Skipping {}", e.url());
                            self.error_log.report(&e);
                            summary.failed_pages += 1;
                        }
                    }
                }

                Ok(pages)
            }
        }
    }
}

/// Runs a complete scrape with the given configuration
///
/// Records are written to a dated CSV file under `output.data-dir`; failures
/// are appended to `output.error-log`.
///
/// # Example
///
/// ```no_run
/// use shirt_scraper::config::Config;
/// use shirt_scraper::crawler::run_scraper;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_scraper(Config::default()).await?;
/// println!("{} records", summary.records);
/// # Ok(())
/// # }
/// ```
pub async fn run_scraper(config: Config) -> Result<CrawlSummary, ScraperError> {
    let error_log = ErrorLog::new(&config.output.error_log);
    let sink = crate::output::CsvOutput::new(&config.output.data_dir);

    let coordinator = match Coordinator::new(config) {
        Ok(coordinator) => coordinator,
        Err(e) => {
            error_log.report(&e);
            return Err(e);
        }
    };

    coordinator.run(&sink).await
}
