//! Admission policy for candidate URLs
//!
//! One decision function is used for the seed and for every discovered link,
//! so depth, host and de-duplication rules live in a single place.

use crate::state::{ScrapeEventSettings, Status};
use crate::storage::{EventStore, StoreResult};
use crate::url::{canonicalize_url, same_host};

/// Decides what to do with a candidate URL found at `depth`
///
/// # Rules, in order
///
/// 1. Not a well-formed absolute `http`/`https` URL → `Ignored`
/// 2. `depth > max_depth` → `Ignored`
/// 3. Host differs from the base URL's host → `Ignored`
/// 4. Already recorded for this crawl → the recorded status, unchanged
/// 5. Otherwise → `InProgress` (admitted for fetching)
///
/// Reads the store but never writes it. Only an unknown crawl id is an error.
pub fn decide(
    store: &EventStore,
    settings: &ScrapeEventSettings,
    candidate: &str,
    depth: u32,
) -> StoreResult<Status> {
    let url = match canonicalize_url(candidate) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!(url = candidate, "Invalid URL, ignoring: {}", e);
            return Ok(Status::Ignored);
        }
    };

    if depth > settings.max_depth {
        tracing::debug!(
            url = %url,
            depth,
            max_depth = settings.max_depth,
            "Max depth reached, ignoring"
        );
        return Ok(Status::Ignored);
    }

    if !same_host(&url, &settings.base_url) {
        tracing::debug!(
            url = %url,
            base = %settings.base_url,
            "URL on a different host to base URL, ignoring"
        );
        return Ok(Status::Ignored);
    }

    let existing = store.get_status(settings.id, url.as_str())?;
    if existing != Status::Missing {
        tracing::debug!(url = %url, status = %existing, "URL already recorded");
        return Ok(existing);
    }

    Ok(Status::InProgress)
}
