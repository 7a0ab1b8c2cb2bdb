//! Storage module for crawl state
//!
//! This module holds every crawl's status map in memory:
//! - Crawl registration and settings lookup
//! - Per-URL status reads and writes, linearizable per call
//! - Aggregation into result statistics

mod memory;
mod stats;

pub use memory::EventStore;
pub use stats::ScrapeStats;

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during event store operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Scrape event already exists: {0}")]
    DuplicateEvent(Uuid),

    #[error("Scrape event not found: {0}")]
    NotFound(Uuid),
}

/// Result type for event store operations
pub type StoreResult<T> = Result<T, StoreError>;
