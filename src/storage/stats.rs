//! Statistics aggregated from a crawl's status map

use crate::state::{ScrapeEvent, Status};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Crawl results keyed by status
///
/// Serializes to the persisted results format: `total_count`, `counts` and
/// `status`, with every status token present in both maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeStats {
    /// Number of distinct URLs recorded
    pub total_count: usize,

    /// Number of URLs per status
    pub counts: BTreeMap<Status, usize>,

    /// URLs per status, in first-seen order
    #[serde(rename = "status")]
    pub urls_by_status: BTreeMap<Status, Vec<String>>,
}

impl ScrapeStats {
    /// Stats with every bucket present and empty
    pub fn empty() -> Self {
        Self {
            total_count: 0,
            counts: Status::ALL.into_iter().map(|status| (status, 0)).collect(),
            urls_by_status: Status::ALL
                .into_iter()
                .map(|status| (status, Vec::new()))
                .collect(),
        }
    }

    pub fn from_event(event: &ScrapeEvent) -> Self {
        let mut stats = Self::empty();

        // `iter` yields each URL once, so buckets never hold duplicates
        for (url, status) in event.iter() {
            stats
                .urls_by_status
                .entry(status)
                .or_default()
                .push(url.to_string());
            *stats.counts.entry(status).or_default() += 1;
            stats.total_count += 1;
        }

        stats
    }

    /// Number of URLs with the given status
    pub fn count(&self, status: Status) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    /// URLs with the given status, in first-seen order
    pub fn urls(&self, status: Status) -> &[String] {
        self.urls_by_status
            .get(&status)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
