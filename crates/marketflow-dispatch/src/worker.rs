//! Bounded execution substrate for trader reactions.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Caps how many trader reactions run concurrently.
///
/// Submission is decoupled from the dispatcher's registry lock: trader
/// tasks pull events from their queues and take a permit before running
/// the handler, so a slow trader occupies one permit, not the dispatcher.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    max_workers: usize,
}

impl WorkerPool {
    /// Create a pool allowing up to `max_workers` concurrent reactions.
    pub fn new(max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            permits: Arc::new(Semaphore::new(max_workers)),
            max_workers,
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Wait for a free worker slot.
    pub async fn acquire(&self) -> OwnedSemaphorePermit {
        // The semaphore is never closed, so acquisition only fails if the
        // pool itself is gone.
        self.permits
            .clone()
            .acquire_owned()
            .await
            .expect("worker pool semaphore closed")
    }
}
