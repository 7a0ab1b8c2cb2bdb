//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `Status`: Outcome of an individual URL (in progress, success, failed, ignored)
//! - `ScrapeEventSettings`: Immutable per-crawl configuration
//! - `ScrapeEvent`: Settings plus the status of every URL the crawl touched

mod event;
mod status;

// Re-export main types
pub use event::{ScrapeEvent, ScrapeEventSettings};
pub use status::Status;
