//! Shared crawl frontier
//!
//! A multi-producer/multi-consumer FIFO of `(url, depth)` items with
//! join semantics: `join` completes once every pushed item has been marked
//! done, including items pushed while others were being processed.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;

/// A URL waiting to be validated and fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierItem {
    /// Canonical absolute URL
    pub url: String,

    /// Hops from the base URL along the path that discovered it
    pub depth: u32,
}

impl FrontierItem {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<FrontierItem>,

    /// Items pushed but not yet marked done
    unfinished: usize,
}

/// Work queue shared by all workers of one crawl
#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    drained: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, item: FrontierItem) {
        let mut state = self.lock();
        state.queue.push_back(item);
        state.unfinished += 1;
    }

    /// Pops the oldest item without waiting
    pub fn try_pop(&self) -> Option<FrontierItem> {
        self.lock().queue.pop_front()
    }

    /// Marks one popped item as fully processed
    pub fn task_done(&self) {
        let mut state = self.lock();
        match state.unfinished.checked_sub(1) {
            Some(remaining) => state.unfinished = remaining,
            None => {
                tracing::warn!("task_done called more times than items were pushed");
                return;
            }
        }

        if state.unfinished == 0 {
            self.drained.notify_waiters();
        }
    }

    /// Returns true when every pushed item has been marked done
    pub fn is_drained(&self) -> bool {
        let state = self.lock();
        state.unfinished == 0 && state.queue.is_empty()
    }

    /// Number of items waiting in the queue
    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }

    /// Waits until the frontier is drained
    pub async fn join(&self) {
        loop {
            // Registered before the check so a notification in between is not lost
            let notified = self.drained.notified();
            if self.is_drained() {
                return;
            }
            notified.await;
        }
    }
}
