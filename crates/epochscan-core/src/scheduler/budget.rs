//! Admission budget shared by the download and process stages.
//!
//! Each admitted object holds one permit from admission until its count has
//! been folded into the aggregator, so the number of objects occupying either
//! pool never exceeds the budget's capacity.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Admission stopped because the budget was closed.
#[derive(Debug)]
pub struct BudgetClosed;

impl std::fmt::Display for BudgetClosed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "admission budget closed")
    }
}

impl std::error::Error for BudgetClosed {}

#[derive(Debug, Default)]
struct Usage {
    in_use: AtomicUsize,
    peak: AtomicUsize,
}

/// Counting semaphore of in-flight objects.
#[derive(Debug, Clone)]
pub struct AdmissionBudget {
    capacity: usize,
    semaphore: Arc<Semaphore>,
    usage: Arc<Usage>,
}

impl AdmissionBudget {
    /// Create a budget of `capacity` in-flight objects (at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            semaphore: Arc::new(Semaphore::new(capacity)),
            usage: Arc::new(Usage::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently held.
    pub fn in_use(&self) -> usize {
        self.usage.in_use.load(Ordering::Acquire)
    }

    /// Free permits. 0 means the next `acquire` suspends.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Highest number of permits held at once since creation.
    pub fn peak_in_use(&self) -> usize {
        self.usage.peak.load(Ordering::Acquire)
    }

    /// Wait for a free permit. The permit is returned when dropped.
    pub async fn acquire(&self) -> Result<AdmissionPermit, BudgetClosed> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| BudgetClosed)?;
        let now = self.usage.in_use.fetch_add(1, Ordering::AcqRel) + 1;
        self.usage.peak.fetch_max(now, Ordering::AcqRel);
        Ok(AdmissionPermit {
            usage: Arc::clone(&self.usage),
            _permit: permit,
        })
    }

    /// Fail all pending and future `acquire` calls.
    pub fn close(&self) {
        self.semaphore.close();
    }
}

/// One unit of the admission budget; released on drop.
#[derive(Debug)]
pub struct AdmissionPermit {
    usage: Arc<Usage>,
    _permit: OwnedSemaphorePermit,
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        // Runs before `_permit` is dropped, so `in_use` never overshoots capacity.
        self.usage.in_use.fetch_sub(1, Ordering::AcqRel);
    }
}
