//! Bounds the number of simultaneously running image workers.

use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Gate limiting how many image workers run at once.
///
/// Dispatch acquires a permit before spawning a worker and moves it
/// into the worker task; dropping the permit when the task finishes
/// frees the slot. No polling, no reaping: the final join still
/// happens once, in dispatch order, at the driver.
#[derive(Clone)]
pub struct AdmissionController {
    semaphore: Arc<Semaphore>,
    max_concurrent: usize,
}

impl AdmissionController {
    /// Creates a controller allowing `max_concurrent` live workers.
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    /// Waits for a free slot and claims it.
    pub async fn admit(&self) -> Result<OwnedSemaphorePermit, AcquireError> {
        Arc::clone(&self.semaphore).acquire_owned().await
    }

    /// The configured concurrency bound.
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Workers currently holding a slot.
    pub fn live(&self) -> usize {
        self.max_concurrent - self.semaphore.available_permits()
    }
}
