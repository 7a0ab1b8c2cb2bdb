//! In-memory event store
//!
//! A single mutex guards the map of crawl id to `ScrapeEvent`. Every public
//! method takes the lock exactly once, so individual reads and writes are
//! linearizable. A read followed by a write is not atomic; callers that need
//! admission semantics use `set_status_if_absent`.

use crate::state::{ScrapeEvent, ScrapeEventSettings, Status};
use crate::storage::{ScrapeStats, StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use url::Url;
use uuid::Uuid;

/// Concurrency-safe map of crawl id to crawl state
#[derive(Debug, Default)]
pub struct EventStore {
    events: Mutex<HashMap<Uuid, ScrapeEvent>>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the event map
    ///
    /// Every mutation is a single map operation, so a panic in another holder
    /// cannot leave an event half-written and the poisoned guard is reused.
    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, ScrapeEvent>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a new crawl
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeEventSettings)` - The settings of the new crawl
    /// * `Err(StoreError::DuplicateEvent)` - A crawl with this id already exists
    pub fn create_event(
        &self,
        id: Uuid,
        base_url: Url,
        max_depth: u32,
    ) -> StoreResult<ScrapeEventSettings> {
        let mut events = self.lock();
        if events.contains_key(&id) {
            return Err(StoreError::DuplicateEvent(id));
        }

        let settings = ScrapeEventSettings::new(id, base_url, max_depth);
        events.insert(id, ScrapeEvent::new(settings.clone()));
        tracing::debug!(crawl_id = %id, "Registered scrape event");
        Ok(settings)
    }

    pub fn get_settings(&self, id: Uuid) -> StoreResult<ScrapeEventSettings> {
        self.lock()
            .get(&id)
            .map(|event| event.settings.clone())
            .ok_or(StoreError::NotFound(id))
    }

    /// Upserts the status of `url` under crawl `id`
    pub fn set_status(&self, id: Uuid, url: &str, status: Status) -> StoreResult<()> {
        let mut events = self.lock();
        let event = events.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        event.set_status(url, status);
        Ok(())
    }

    /// Records `status` only if `url` has no entry yet
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - The status was stored
    /// * `Ok(Some(existing))` - The URL already had a status, left untouched
    /// * `Err(StoreError::NotFound)` - Unknown crawl id
    pub fn set_status_if_absent(
        &self,
        id: Uuid,
        url: &str,
        status: Status,
    ) -> StoreResult<Option<Status>> {
        let mut events = self.lock();
        let event = events.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        Ok(event.set_status_if_absent(url, status))
    }

    /// Returns the status of `url`, or `Status::Missing` if it has no entry
    ///
    /// Only an unknown crawl id is an error.
    pub fn get_status(&self, id: Uuid, url: &str) -> StoreResult<Status> {
        self.lock()
            .get(&id)
            .map(|event| event.status(url))
            .ok_or(StoreError::NotFound(id))
    }

    /// Aggregates the status map of crawl `id`
    pub fn get_stats(&self, id: Uuid) -> StoreResult<ScrapeStats> {
        self.lock()
            .get(&id)
            .map(ScrapeStats::from_event)
            .ok_or(StoreError::NotFound(id))
    }

    /// Number of registered crawls
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
