//! Crawl worker loop
//!
//! Each worker repeatedly pops an item from the shared frontier, records the
//! admission decision, fetches admitted URLs through the concurrency gate and
//! pushes every discovered link back onto the frontier. Links are validated
//! when popped, not when discovered.

use crate::crawler::fetcher::Fetch;
use crate::crawler::frontier::{Frontier, FrontierItem};
use crate::crawler::parser::extract_links;
use crate::crawler::policy::decide;
use crate::state::{ScrapeEventSettings, Status};
use crate::storage::{EventStore, StoreResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Everything a worker shares with its siblings
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub settings: ScrapeEventSettings,
    pub store: Arc<EventStore>,
    pub frontier: Arc<Frontier>,
    pub fetcher: Arc<dyn Fetch>,
    /// Bounds concurrent fetches independently of the worker count
    pub gate: Arc<Semaphore>,
    pub shutdown: CancellationToken,
    pub poll_interval: Duration,
}

pub(crate) struct Worker {
    id: usize,
    ctx: WorkerContext,
}

impl Worker {
    pub fn new(id: usize, ctx: WorkerContext) -> Self {
        Self { id, ctx }
    }

    /// Runs until the shutdown token is cancelled
    ///
    /// The token is checked once per loop turn; a fetch that has already
    /// started is allowed to finish.
    pub async fn run(self) {
        tracing::debug!(worker = self.id, "Worker started");

        while !self.ctx.shutdown.is_cancelled() {
            let Some(item) = self.ctx.frontier.try_pop() else {
                tokio::select! {
                    _ = tokio::time::sleep(self.ctx.poll_interval) => {}
                    _ = self.ctx.shutdown.cancelled() => {}
                }
                continue;
            };

            if let Err(e) = self.process(&item).await {
                tracing::error!(worker = self.id, url = %item.url, "Error processing URL: {}", e);
            }
            self.ctx.frontier.task_done();
        }

        tracing::debug!(worker = self.id, "Worker stopped");
    }

    /// Validates, fetches and expands a single frontier item
    async fn process(&self, item: &FrontierItem) -> StoreResult<()> {
        let crawl_id = self.ctx.settings.id;
        let status = decide(&self.ctx.store, &self.ctx.settings, &item.url, item.depth)?;

        if let Some(existing) = self
            .ctx
            .store
            .set_status_if_absent(crawl_id, &item.url, status)?
        {
            tracing::debug!(url = %item.url, status = %existing, "Already recorded, skipping");
            return Ok(());
        }

        if !status.is_pending() {
            return Ok(());
        }

        let url = match Url::parse(&item.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(url = %item.url, "Admitted URL failed to parse: {}", e);
                return self.ctx.store.set_status(crawl_id, &item.url, Status::Failed);
            }
        };

        let Some(body) = self.fetch(&url).await? else {
            return Ok(());
        };

        let mut found = 0;
        for link in extract_links(&body, &url) {
            self.ctx
                .frontier
                .push(FrontierItem::new(link, item.depth + 1));
            found += 1;
        }

        tracing::info!(url = %url, depth = item.depth, links = found, "Visited page");
        Ok(())
    }

    /// Fetches `url` and records the outcome
    ///
    /// Returns the body on success, `None` when the fetch failed.
    async fn fetch(&self, url: &Url) -> StoreResult<Option<String>> {
        let crawl_id = self.ctx.settings.id;

        let result = {
            // The gate is never closed, so a failed acquire just fetches unthrottled
            let _permit = self.ctx.gate.acquire().await.ok();
            self.ctx.fetcher.fetch(url).await
        };

        match result {
            Ok(response) if response.is_success() => {
                if response.url != *url {
                    tracing::debug!(url = %url, final_url = %response.url, "Followed redirect");
                }
                self.ctx
                    .store
                    .set_status(crawl_id, url.as_str(), Status::Success)?;
                Ok(Some(response.body))
            }
            Ok(response) => {
                tracing::warn!(url = %url, status = %response.status, "Failed to fetch page");
                self.ctx
                    .store
                    .set_status(crawl_id, url.as_str(), Status::Failed)?;
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(url = %url, "Failed to fetch page: {}", e);
                self.ctx
                    .store
                    .set_status(crawl_id, url.as_str(), Status::Failed)?;
                Ok(None)
            }
        }
    }
}
