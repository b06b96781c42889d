//! Per-run statistics

use std::path::PathBuf;

/// Counters collected over one scraper run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Links matching the home filter on the home page
    pub home_links: usize,

    /// Product pages linked directly from the home page
    pub initial_product_pages: usize,

    /// Category pages crawled in the second stage
    pub category_pages: usize,

    /// Product pages discovered on category pages
    pub discovered_product_pages: usize,

    /// Records extracted in the last stage
    pub records: usize,

    /// Pages skipped under the `isolate` fan-out policy
    pub failed_pages: usize,

    /// Written CSV file
    pub output_path: Option<PathBuf>,
}

impl CrawlSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Product pages fetched in the last stage
    pub fn total_product_pages(&self) -> usize {
        self.initial_product_pages + self.discovered_product_pages
    }
}

/// Prints a summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Shirt-Scraper Run Summary ===\n");
    println!("Home page links:          {}", summary.home_links);
    println!("Category pages crawled:   {}", summary.category_pages);
    println!(
        "Product pages:            {} ({} from home, {} discovered)",
        summary.total_product_pages(),
        summary.initial_product_pages,
        summary.discovered_product_pages
    );
    println!("Records extracted:        {}", summary.records);
    if summary.failed_pages > 0 {
        println!("Pages skipped on error:   {}", summary.failed_pages);
    }
    if let Some(path) = &summary.output_path {
        println!("\n✓ Output written to: {}", path.display());
    }
}
