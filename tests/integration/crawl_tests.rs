//! Integration tests for the scraper
//!
//! These tests use wiremock to serve a small shirt catalog and run the full
//! three-stage scrape end-to-end, checking the CSV file and the error log.

use chrono::Local;
use shirt_scraper::config::{Config, FanOutPolicy};
use shirt_scraper::crawler::run_scraper;
use shirt_scraper::output::csv_file_name;
use shirt_scraper::{FetchError, ProductRecord, ScraperError};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, temp: &TempDir) -> Config {
    let mut config = Config::default();
    config.site.base_url = server.uri();
    config.site.image_base_url = format!("{}/", server.uri());
    config.crawler.request_timeout = 5;
    config.output.data_dir = temp.path().join("data").display().to_string();
    config.output.error_log = temp.path().join("scraper-error.log").display().to_string();
    config
}

fn product_page(id: u32, price: &str, name: &str) -> String {
    format!(
        r#"<html><head><title>{name}</title></head><body>
        <div class="section page">
          <div class="shirt-picture"><span><img src="img/shirts/shirt-{id}.jpg" alt="{name}"></span></div>
          <div class="shirt-details"><h1><span class="price">{price}</span> {name}</h1></div>
        </div>
        </body></html>"#
    )
}

async fn mount_html(server: &MockServer, page: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_product(server: &MockServer, id: u32, status: u16, price: &str, name: &str) {
    Mock::given(method("GET"))
        .and(path("/shirt.php"))
        .and(query_param("id", id.to_string()))
        .respond_with(ResponseTemplate::new(status).set_body_string(product_page(id, price, name)))
        .mount(server)
        .await;
}

async fn mount_slow_product(server: &MockServer, id: u32, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/shirt.php"))
        .and(query_param("id", id.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(product_page(id, "$20", "Slow Shirt"))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Home page links two products and one category page; the category page
/// repeats one product and adds two more.
async fn mount_catalog(server: &MockServer) {
    mount_html(
        server,
        "/",
        200,
        r#"<html><body>
        <ul class="nav">
          <li class="shirts"><a href="shirts.php">Shirts</a></li>
          <li class="contact"><a href="contact.php">Contact</a></li>
        </ul>
        <ul class="products">
          <li><a href="shirt.php?id=101"><img src="img/shirts/shirt-101.jpg"></a></li>
          <li><a href="shirt.php?id=102"><img src="img/shirts/shirt-102.jpg"></a></li>
          <li><a href="shirt.php?id=101">Again</a></li>
        </ul>
        </body></html>"#,
    )
    .await;

    mount_html(
        server,
        "/shirts.php",
        200,
        r#"<html><body><ul class="products">
          <li><a href="shirt.php?id=101">Red</a></li>
          <li><a href="shirt.php?id=103">Green</a></li>
          <li><a href="shirt.php?id=104">Yellow</a></li>
          <li><a href="shirts.php">All</a></li>
        </ul></body></html>"#,
    )
    .await;

    mount_product(server, 101, 200, "$18", "Logo Shirt, Red").await;
    mount_product(server, 102, 200, "$20", "Mike the Frog Shirt, Black").await;
    mount_product(server, 103, 200, "$20", "Mike the Frog Shirt, Green").await;
}

fn read_records(path: &Path) -> Vec<ProductRecord> {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open CSV");
    reader
        .deserialize()
        .collect::<Result<_, _>>()
        .expect("Failed to parse CSV")
}

fn error_log_lines(temp: &TempDir) -> Vec<String> {
    std::fs::read_to_string(temp.path().join("scraper-error.log"))
        .map(|content| content.lines().map(String::from).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_full_scrape_writes_dated_csv() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    mount_catalog(&server).await;
    mount_product(&server, 104, 200, "$25", "Mike the Frog Shirt, Yellow").await;

    let summary = run_scraper(create_test_config(&server, &temp))
        .await
        .expect("Scrape failed");

    assert_eq!(summary.home_links, 3);
    assert_eq!(summary.initial_product_pages, 2);
    assert_eq!(summary.category_pages, 1);
    assert_eq!(summary.discovered_product_pages, 2);
    assert_eq!(summary.records, 4);

    let expected_path = temp
        .path()
        .join("data")
        .join(csv_file_name(Local::now().date_naive()));
    assert_eq!(summary.output_path.as_deref(), Some(expected_path.as_path()));

    let content = std::fs::read_to_string(&expected_path).unwrap();
    assert!(content.starts_with("Title,Price,ImageUrl,Url,Time\n"));

    let records = read_records(&expected_path);
    assert_eq!(records.len(), 4);

    let base = server.uri();
    let red = records
        .iter()
        .find(|r| r.url == format!("{}/shirt.php?id=101", base))
        .expect("Missing product 101");
    assert_eq!(red.title, "Logo Shirt, Red");
    assert_eq!(red.price, "$18");
    assert_eq!(red.image_url, format!("{}/img/shirts/shirt-101.jpg", base));
    assert!(!red.time.is_empty());

    let yellow = records
        .iter()
        .find(|r| r.url.ends_with("id=104"))
        .expect("Missing product 104");
    assert_eq!(yellow.price, "$25");

    assert!(error_log_lines(&temp).is_empty());
}

#[tokio::test]
async fn test_home_page_404_writes_nothing() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    mount_html(&server, "/", 404, "Not Found").await;

    let result = run_scraper(create_test_config(&server, &temp)).await;

    assert!(matches!(result, Err(ScraperError::Fetch(_))));
    assert!(!temp.path().join("data").exists());

    let lines = error_log_lines(&temp);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("404"));
}

#[tokio::test]
async fn test_category_failure_aborts_run() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    mount_html(
        &server,
        "/",
        200,
        r#"<a href="shirt.php?id=101">Red</a><a href="shirts.php">All</a>"#,
    )
    .await;
    mount_html(&server, "/shirts.php", 500, "boom").await;
    mount_product(&server, 101, 200, "$18", "Logo Shirt, Red").await;

    let result = run_scraper(create_test_config(&server, &temp)).await;

    assert!(result.is_err());
    assert!(!temp.path().join("data").exists());
    assert_eq!(error_log_lines(&temp).len(), 1);
}

#[tokio::test]
async fn test_product_failure_aborts_run() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    mount_catalog(&server).await;
    mount_product(&server, 104, 404, "", "").await;

    let result = run_scraper(create_test_config(&server, &temp)).await;

    assert!(result.is_err());
    assert!(!temp.path().join("data").exists());

    let lines = error_log_lines(&temp);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("shirt.php?id=104"));
}

#[tokio::test]
async fn test_hung_product_page_times_out_and_aborts_run() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    mount_catalog(&server).await;
    mount_slow_product(&server, 104, Duration::from_secs(3)).await;

    let mut config = create_test_config(&server, &temp);
    config.crawler.request_timeout = 1;

    let result = run_scraper(config).await;

    assert!(matches!(
        result,
        Err(ScraperError::Fetch(FetchError::Transport { .. }))
    ));
    assert!(!temp.path().join("data").exists());

    let lines = error_log_lines(&temp);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("shirt.php?id=104"));
}

#[tokio::test]
async fn test_isolate_policy_keeps_successful_category_pages() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    mount_html(
        &server,
        "/",
        200,
        r#"<a href="shirt.php?id=102">Frog</a>
           <a href="shirts.php">All shirts</a>
           <a href="sale-shirts.php">Sale</a>"#,
    )
    .await;
    mount_html(&server, "/shirts.php", 500, "boom").await;
    mount_html(
        &server,
        "/sale-shirts.php",
        200,
        r#"<a href="shirt.php?id=101">Red</a><a href="shirt.php?id=103">Green</a>"#,
    )
    .await;
    mount_product(&server, 101, 200, "$18", "Logo Shirt, Red").await;
    mount_product(&server, 102, 200, "$20", "Mike the Frog Shirt, Black").await;
    mount_product(&server, 103, 200, "$20", "Mike the Frog Shirt, Green").await;

    let mut config = create_test_config(&server, &temp);
    config.crawler.fan_out_policy = FanOutPolicy::Isolate;

    let summary = run_scraper(config).await.expect("Scrape failed");

    assert_eq!(summary.category_pages, 2);
    assert_eq!(summary.discovered_product_pages, 2);
    assert_eq!(summary.failed_pages, 1);
    assert_eq!(summary.records, 3);

    let records = read_records(summary.output_path.as_deref().unwrap());
    for id in ["101", "102", "103"] {
        assert!(records.iter().any(|r| r.url.ends_with(&format!("id={}", id))));
    }

    let lines = error_log_lines(&temp);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("500"));
    assert!(lines[0].contains("/shirts.php"));
}

#[tokio::test]
async fn test_isolate_policy_keeps_successful_pages() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    mount_catalog(&server).await;
    mount_product(&server, 104, 404, "", "").await;

    let mut config = create_test_config(&server, &temp);
    config.crawler.fan_out_policy = FanOutPolicy::Isolate;

    let summary = run_scraper(config).await.expect("Scrape failed");

    assert_eq!(summary.records, 3);
    assert_eq!(summary.failed_pages, 1);

    let records = read_records(summary.output_path.as_deref().unwrap());
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| !r.url.ends_with("id=104")));

    let lines = error_log_lines(&temp);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("404"));
}

#[tokio::test]
async fn test_home_page_without_category_links() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    mount_html(
        &server,
        "/",
        200,
        r#"<a href="shirt.php?id=101">Red</a><a href="about.php">About</a>"#,
    )
    .await;
    mount_product(&server, 101, 200, "$18", "Logo Shirt, Red").await;

    let summary = run_scraper(create_test_config(&server, &temp))
        .await
        .expect("Scrape failed");

    assert_eq!(summary.category_pages, 0);
    assert_eq!(summary.records, 1);
}

#[tokio::test]
async fn test_unreachable_site_is_logged() {
    let temp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.site.base_url = "http://127.0.0.1:1".to_string();
    config.crawler.request_timeout = 2;
    config.output.data_dir = temp.path().join("data").display().to_string();
    config.output.error_log = temp.path().join("scraper-error.log").display().to_string();

    let result = run_scraper(config).await;

    assert!(matches!(result, Err(ScraperError::Fetch(_))));
    assert!(!temp.path().join("data").exists());
    assert_eq!(error_log_lines(&temp).len(), 1);
}
