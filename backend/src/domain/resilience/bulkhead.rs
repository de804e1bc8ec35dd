//! Bounded-concurrency bulkhead, one semaphore per operation class.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, SemaphorePermit};
use tokio::time::timeout;

/// The three operation classes the spec partitions bulkhead capacity across,
/// so admin/audit work cannot starve the hot read path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationClass {
    Read,
    Write,
    Audit,
}

/// Error returned when a bulkhead permit could not be acquired in time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("bulkhead for {class:?} is full")]
pub struct BulkheadFull {
    pub class: OperationClass,
}

/// Per-class bounded concurrency gate.
pub struct Bulkhead {
    read: Arc<Semaphore>,
    write: Arc<Semaphore>,
    audit: Arc<Semaphore>,
    acquire_timeout: Duration,
}

impl Bulkhead {
    pub fn new(read_capacity: usize, write_capacity: usize, audit_capacity: usize) -> Self {
        Self {
            read: Arc::new(Semaphore::new(read_capacity)),
            write: Arc::new(Semaphore::new(write_capacity)),
            audit: Arc::new(Semaphore::new(audit_capacity)),
            acquire_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_acquire_timeout(mut self, acquire_timeout: Duration) -> Self {
        self.acquire_timeout = acquire_timeout;
        self
    }

    fn semaphore_for(&self, class: OperationClass) -> &Arc<Semaphore> {
        match class {
            OperationClass::Read => &self.read,
            OperationClass::Write => &self.write,
            OperationClass::Audit => &self.audit,
        }
    }

    /// Acquire a permit for `class`, waiting up to the configured timeout.
    ///
    /// # Errors
    /// Returns [`BulkheadFull`] if no permit becomes available in time, or if
    /// the semaphore has been closed (which this type never does).
    pub async fn acquire(&self, class: OperationClass) -> Result<SemaphorePermit<'_>, BulkheadFull> {
        let semaphore = self.semaphore_for(class);
        match timeout(self.acquire_timeout, semaphore.acquire()).await {
            Ok(Ok(permit)) => Ok(permit),
            Ok(Err(_)) | Err(_) => Err(BulkheadFull { class }),
        }
    }
}
