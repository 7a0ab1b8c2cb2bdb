//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with rate-limit retry logic
//! - HTML parsing and link extraction
//! - URL admission policy (depth, host, de-duplication)
//! - The shared frontier and the worker pool
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod policy;
mod worker;

pub use coordinator::Crawler;
pub use fetcher::{
    build_http_client, Fetch, FetchError, FetchResponse, HttpClient, RetryPolicy,
    RetryTransport, ATTEMPT_HEADER,
};
pub use frontier::{Frontier, FrontierItem};
pub use parser::{extract_hrefs, extract_links, Links};
pub use policy::decide;

use crate::config::Config;
use crate::storage::ScrapeStats;
use uuid::Uuid;

/// Runs a complete crawl operation
///
/// This is the main entry point for a one-shot crawl. It will:
/// 1. Build the HTTP client and a fresh event store
/// 2. Crawl from `base_url` down to `max_depth` hops
/// 3. Return the crawl id with its aggregated results
///
/// # Arguments
///
/// * `config` - The validated runtime configuration
/// * `base_url` - The seed URL
/// * `max_depth` - Maximum hops from the seed
///
/// # Returns
///
/// * `Ok((Uuid, ScrapeStats))` - Crawl id and results
/// * `Err(ScrapeError)` - Invalid seed URL or HTTP client setup failure
pub async fn crawl(
    config: &Config,
    base_url: &str,
    max_depth: u32,
) -> crate::Result<(Uuid, ScrapeStats)> {
    let crawler = Crawler::new(config)?;
    let id = crawler.begin_crawl(base_url, max_depth).await?;
    let stats = crawler.get_results(id)?;
    Ok((id, stats))
}
