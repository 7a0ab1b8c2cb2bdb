//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::sync::Arc;
use std::time::Duration;
use webscraper::config::{Config, CrawlerConfig, HttpClientConfig, RetryConfig};
use webscraper::crawler::{crawl, Crawler, RetryTransport, ATTEMPT_HEADER};
use webscraper::output::{read_results, write_results};
use webscraper::{EventStore, ScrapeError, Status};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a fast test configuration: no backoff, short polling
fn create_test_config() -> Config {
    Config {
        log_level: "debug".to_string(),
        crawler: CrawlerConfig {
            num_workers: 4,
            fetch_concurrency: 2,
            poll_interval_ms: 10,
        },
        http: HttpClientConfig {
            timeout_secs: 5,
            connection_retries: 0,
            ..HttpClientConfig::default()
        },
        retry: RetryConfig {
            status_retries: 2,
            backoff_factor: 0.0,
            jitter_range: 0.0,
        },
    }
}

/// Mounts an HTML page at `page_path`
async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts the five-page site: home, about, blog, contact, payments
///
/// `blog` is linked three times, `/search` does not exist and three distinct
/// off-host URLs are linked (one of them twice).
async fn mount_company_site(server: &MockServer) {
    mount_page(
        server,
        "/",
        r#"<html><head><title>Home</title></head><body>
            <a href="/about">About</a>
            <a href="/blog">Blog</a>
            <a href="https://twitter.com/acme">Twitter</a>
            <a href="https://github.com/acme">GitHub</a>
        </body></html>"#,
    )
    .await;

    mount_page(
        server,
        "/about",
        r#"<html><body>
            <a href="blog">Blog</a>
            <a href="/contact">Contact</a>
            <a href="https://twitter.com/acme">Twitter</a>
        </body></html>"#,
    )
    .await;

    mount_page(
        server,
        "/blog",
        r#"<html><body>
            <a href="/">Home</a>
            <a href="/payments">Payments</a>
            <a href="/search">Search</a>
            <a href="mailto:press@acme.test">Press</a>
        </body></html>"#,
    )
    .await;

    mount_page(
        server,
        "/contact",
        r#"<html><body>
            <a href="/blog#latest">Blog</a>
            <a href="https://linkedin.com/company/acme">LinkedIn</a>
        </body></html>"#,
    )
    .await;

    mount_page(
        server,
        "/payments",
        r#"<html><body><a href="/contact">Contact</a></body></html>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_company_site(&mock_server).await;

    let (_, stats) = crawl(&create_test_config(), &base_url, 5)
        .await
        .expect("Crawl failed");

    assert_eq!(stats.count(Status::Success), 5);
    let mut success = stats.urls(Status::Success).to_vec();
    success.sort();
    let mut expected: Vec<String> = ["/", "/about", "/blog", "/contact", "/payments"]
        .iter()
        .map(|p| format!("{}{}", base_url, p))
        .collect();
    expected.sort();
    assert_eq!(success, expected);

    assert_eq!(stats.count(Status::Failed), 1);
    assert_eq!(
        stats.urls(Status::Failed),
        [format!("{}/search", base_url)]
    );

    assert_eq!(stats.count(Status::Ignored), 3);
    let mut ignored = stats.urls(Status::Ignored).to_vec();
    ignored.sort();
    assert_eq!(
        ignored,
        [
            "https://github.com/acme",
            "https://linkedin.com/company/acme",
            "https://twitter.com/acme",
        ]
    );

    assert_eq!(stats.count(Status::InProgress), 0);
    assert_eq!(stats.total_count, 9);
    assert_eq!(stats.total_count, stats.counts.values().sum::<usize>());

    // Wiremock verifies every page was requested exactly once when it drops
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Create a chain: / -> level1 -> level2 -> level3
    mount_page(&mock_server, "/", r#"<a href="/level1">Level 1</a>"#).await;
    mount_page(&mock_server, "/level1", r#"<a href="/level2">Level 2</a>"#).await;
    mount_page(&mock_server, "/level2", r#"<a href="/level3">Level 3</a>"#).await;

    // Level3 should not be crawled (depth > 2)
    Mock::given(method("GET"))
        .and(path("/level3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (_, stats) = crawl(&create_test_config(), &base_url, 2)
        .await
        .expect("Crawl failed");

    assert_eq!(stats.count(Status::Success), 3);
    assert_eq!(
        stats.urls(Status::Ignored),
        [format!("{}/level3", base_url)]
    );
}

#[tokio::test]
async fn test_rate_limited_page_recorded_as_failed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/busy">Busy</a>"#).await;

    for attempt in ["0", "1"] {
        Mock::given(method("GET"))
            .and(path("/busy"))
            .and(header(ATTEMPT_HEADER, attempt))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/busy"))
        .and(header(ATTEMPT_HEADER, "2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (_, stats) = crawl(&create_test_config(), &base_url, 3)
        .await
        .expect("Crawl failed");

    assert_eq!(stats.urls(Status::Success), [format!("{}/", base_url)]);
    assert_eq!(stats.urls(Status::Failed), [format!("{}/busy", base_url)]);
}

#[tokio::test]
async fn test_rate_limit_recovers() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(ATTEMPT_HEADER, "0"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(ATTEMPT_HEADER, "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>hello</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (_, stats) = crawl(&create_test_config(), &base_url, 3)
        .await
        .expect("Crawl failed");

    assert_eq!(stats.urls(Status::Success), [format!("{}/", base_url)]);
    assert_eq!(stats.total_count, 1);
}

#[tokio::test]
async fn test_unreachable_seed_recorded_as_failed() {
    // Nothing listens on port 1
    let (_, stats) = crawl(&create_test_config(), "http://127.0.0.1:1/", 3)
        .await
        .expect("Crawl failed");

    assert_eq!(stats.urls(Status::Failed), ["http://127.0.0.1:1/"]);
}

#[tokio::test]
async fn test_unsupported_seed_scheme_rejected() {
    let config = create_test_config();
    let store = Arc::new(EventStore::new());
    let transport = RetryTransport::from_config(&config.http, &config.retry).unwrap();
    let crawler = Crawler::with_fetcher(
        config.crawler.clone(),
        Arc::clone(&store),
        Arc::new(transport),
    );

    let result = crawler.begin_crawl("ftp://example.com/", 3).await;
    assert!(matches!(result, Err(ScrapeError::InvalidSeed { .. })));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_shared_store_keeps_crawls_separate() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="/a">A</a>"#))
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config();
    let crawler = Crawler::new(&config).unwrap();

    let shallow = crawler.begin_crawl(&base_url, 0).await.unwrap();
    let deep = crawler.begin_crawl(&base_url, 1).await.unwrap();
    assert_ne!(shallow, deep);

    let shallow = crawler.get_results(shallow).unwrap();
    let deep = crawler.get_results(deep).unwrap();
    assert_eq!(shallow.count(Status::Success), 1);
    assert_eq!(shallow.count(Status::Ignored), 1);
    assert_eq!(deep.count(Status::Success), 2);
    assert_eq!(crawler.store().len(), 2);
}

#[tokio::test]
async fn test_shutdown_stops_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/slow">Slow</a>"#)
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(&create_test_config()).unwrap();
    let shutdown = crawler.shutdown_token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.cancel();
    });

    let id = tokio::time::timeout(Duration::from_secs(5), crawler.begin_crawl(&base_url, 3))
        .await
        .expect("Crawl did not stop")
        .expect("Crawl failed");

    // The in-flight fetch of the seed finishes, nothing new is started
    let stats = crawler.get_results(id).unwrap();
    assert_eq!(stats.urls(Status::Success), [format!("{}/", base_url)]);
    assert_eq!(stats.total_count, 1);
}

#[tokio::test]
async fn test_results_file_round_trip() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_company_site(&mock_server).await;

    let (_, stats) = crawl(&create_test_config(), &base_url, 5)
        .await
        .expect("Crawl failed");

    let dir = tempfile::tempdir().unwrap();
    let results_path = dir.path().join("results.json");
    write_results(&stats, &results_path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&results_path).unwrap()).unwrap();
    assert_eq!(value["total_count"], 9);
    assert_eq!(value["counts"]["success"], 5);
    assert_eq!(value["counts"]["ignored"], 3);
    assert_eq!(
        value["status"]["failed"],
        serde_json::json!([format!("{}/search", base_url)])
    );

    assert_eq!(read_results(&results_path).unwrap(), stats);
}
