//! Crawler coordinator - crawl orchestration
//!
//! This module wires the pieces of a crawl together:
//! - Validating the seed URL and registering the crawl
//! - Seeding the frontier and launching the worker pool
//! - Waiting for the frontier to drain (or for shutdown)
//! - Stopping the workers and reporting results

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{Fetch, RetryTransport};
use crate::crawler::frontier::{Frontier, FrontierItem};
use crate::crawler::worker::{Worker, WorkerContext};
use crate::storage::{EventStore, ScrapeStats, StoreResult};
use crate::url::canonicalize_url;
use crate::ScrapeError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Main crawler structure
///
/// Owns the dependencies every crawl shares: the event store, the fetch
/// layer and the root shutdown token. Several crawls may run against the
/// same `Crawler`; each gets its own frontier and workers.
pub struct Crawler {
    config: CrawlerConfig,
    store: Arc<EventStore>,
    fetcher: Arc<dyn Fetch>,
    shutdown: CancellationToken,
}

impl Crawler {
    /// Creates a crawler with a fresh event store and an HTTP fetch layer
    ///
    /// # Arguments
    ///
    /// * `config` - The validated runtime configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Successfully created crawler
    /// * `Err(ScrapeError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> crate::Result<Self> {
        let transport = RetryTransport::from_config(&config.http, &config.retry)?;
        Ok(Self::with_fetcher(
            config.crawler.clone(),
            Arc::new(EventStore::new()),
            Arc::new(transport),
        ))
    }

    /// Creates a crawler from explicit dependencies
    pub fn with_fetcher(
        config: CrawlerConfig,
        store: Arc<EventStore>,
        fetcher: Arc<dyn Fetch>,
    ) -> Self {
        Self {
            config,
            store,
            fetcher,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn store(&self) -> &Arc<EventStore> {
        &self.store
    }

    /// Token that stops every running crawl when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Crawls the site at `base_url` and returns the new crawl id
    ///
    /// Fails only if `base_url` is not an absolute `http`/`https` URL, in
    /// which case no crawl state is created. Page failures are recorded as
    /// `Failed` statuses and never surface here. On shutdown the crawl stops
    /// early and keeps whatever statuses were recorded so far.
    pub async fn begin_crawl(&self, base_url: &str, max_depth: u32) -> crate::Result<Uuid> {
        let base = canonicalize_url(base_url).map_err(|source| ScrapeError::InvalidSeed {
            url: base_url.to_string(),
            source,
        })?;

        let settings = self.store.create_event(Uuid::new_v4(), base, max_depth)?;
        let crawl_id = settings.id;
        tracing::info!(
            crawl_id = %crawl_id,
            base_url = %settings.base_url,
            max_depth,
            "Starting crawl"
        );

        let frontier = Arc::new(Frontier::new());
        frontier.push(FrontierItem::new(settings.base_url.as_str(), 0));

        let shutdown = self.shutdown.child_token();
        let ctx = WorkerContext {
            settings: settings.clone(),
            store: Arc::clone(&self.store),
            frontier: Arc::clone(&frontier),
            fetcher: Arc::clone(&self.fetcher),
            gate: Arc::new(Semaphore::new(self.config.fetch_concurrency)),
            shutdown: shutdown.clone(),
            poll_interval: Duration::from_millis(self.config.poll_interval_ms),
        };

        let start_time = Instant::now();
        let workers: Vec<_> = (0..self.config.num_workers)
            .map(|id| tokio::spawn(Worker::new(id, ctx.clone()).run()))
            .collect();

        tokio::select! {
            _ = frontier.join() => {
                tracing::debug!(crawl_id = %crawl_id, "Frontier drained");
            }
            _ = shutdown.cancelled() => {
                tracing::info!(
                    crawl_id = %crawl_id,
                    pending = frontier.len(),
                    "Shutdown requested, stopping crawl"
                );
            }
        }

        shutdown.cancel();
        for worker in workers {
            if let Err(e) = worker.await {
                tracing::error!(crawl_id = %crawl_id, "Worker task failed: {}", e);
            }
        }

        let stats = self.store.get_stats(crawl_id)?;
        tracing::info!(
            crawl_id = %crawl_id,
            urls = stats.total_count,
            started_at = %settings.started_at,
            "Crawl completed in {:?}",
            start_time.elapsed()
        );

        Ok(crawl_id)
    }

    /// Aggregated results of a crawl
    pub fn get_results(&self, crawl_id: Uuid) -> StoreResult<ScrapeStats> {
        self.store.get_stats(crawl_id)
    }
}
