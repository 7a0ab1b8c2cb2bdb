use crate::state::Status;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use url::Url;
use uuid::Uuid;

/// Immutable configuration of a single crawl
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeEventSettings {
    /// Unique crawl identifier
    pub id: Uuid,

    /// The seed URL; its host defines the crawl's scope
    pub base_url: Url,

    /// Maximum number of hops from the seed
    pub max_depth: u32,

    /// When the crawl was registered
    pub started_at: DateTime<Utc>,
}

impl ScrapeEventSettings {
    pub fn new(id: Uuid, base_url: Url, max_depth: u32) -> Self {
        Self {
            id,
            base_url,
            max_depth,
            started_at: Utc::now(),
        }
    }
}

/// A crawl's settings plus the status of every URL it has touched
///
/// Keys are canonical URL strings. Insertion order of keys is remembered so
/// that result buckets list URLs in the order they were first seen.
#[derive(Debug, Clone)]
pub struct ScrapeEvent {
    pub settings: ScrapeEventSettings,
    statuses: HashMap<String, Status>,
    order: Vec<String>,
}

impl ScrapeEvent {
    pub fn new(settings: ScrapeEventSettings) -> Self {
        Self {
            settings,
            statuses: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Returns the stored status, or `Missing` when the URL is unknown
    pub fn status(&self, url: &str) -> Status {
        self.statuses.get(url).copied().unwrap_or(Status::Missing)
    }

    /// Upserts the status for a URL
    pub fn set_status(&mut self, url: &str, status: Status) {
        match self.statuses.get_mut(url) {
            Some(existing) => *existing = status,
            None => {
                self.statuses.insert(url.to_string(), status);
                self.order.push(url.to_string());
            }
        }
    }

    /// Stores the status only if the URL has no record yet
    ///
    /// Returns the previously stored status when one exists.
    pub fn set_status_if_absent(&mut self, url: &str, status: Status) -> Option<Status> {
        if let Some(existing) = self.statuses.get(url) {
            return Some(*existing);
        }
        self.set_status(url, status);
        None
    }

    /// Number of distinct URLs recorded
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates `(url, status)` in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Status)> + '_ {
        self.order
            .iter()
            .map(|url| (url.as_str(), self.status(url)))
    }
}
