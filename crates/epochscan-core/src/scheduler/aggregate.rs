//! Running total and exactly-once completion detection.
//!
//! Each finished object is one logical transition: its count is added to the
//! total, then the completion counter is bumped. Only the `fetch_add` that
//! moves the counter onto `expected` signals completion, so the signal fires
//! once no matter how many workers finish concurrently.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use tokio::sync::Notify;

use crate::error::ScanError;

#[derive(Debug)]
pub struct Aggregator {
    expected: usize,
    total: AtomicU64,
    completed: AtomicUsize,
    skipped: AtomicUsize,
    signals: AtomicUsize,
    failure: Mutex<Option<ScanError>>,
    done: Notify,
}

impl Aggregator {
    /// `expected` is the number of objects scheduled for this run, fixed up front.
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            total: AtomicU64::new(0),
            completed: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            signals: AtomicUsize::new(0),
            failure: Mutex::new(None),
            done: Notify::new(),
        }
    }

    /// Fold one object's count. Returns true for the call that completes the run.
    pub fn record(&self, count: u64) -> bool {
        self.total.fetch_add(count, Ordering::AcqRel);
        self.finish_one()
    }

    /// Count an object that contributes zero (retries exhausted or fault skipped).
    pub fn record_skipped(&self) -> bool {
        self.skipped.fetch_add(1, Ordering::AcqRel);
        self.finish_one()
    }

    fn finish_one(&self) -> bool {
        let done = self.completed.fetch_add(1, Ordering::AcqRel) + 1;
        if done == self.expected {
            self.signals.fetch_add(1, Ordering::AcqRel);
            self.done.notify_one();
            true
        } else {
            false
        }
    }

    /// Record a fatal error and wake the waiter. Only the first error is kept.
    pub fn fail(&self, err: ScanError) {
        let mut slot = self.failure.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_none() {
            *slot = Some(err);
            drop(slot);
            self.done.notify_one();
        }
    }

    pub fn has_failed(&self) -> bool {
        self.failure
            .lock()
            .map(|f| f.is_some())
            .unwrap_or(true)
    }

    /// Remove the recorded fatal error, if any.
    pub fn take_failure(&self) -> Option<ScanError> {
        self.failure.lock().unwrap_or_else(|e| e.into_inner()).take()
    }

    pub fn is_complete(&self) -> bool {
        self.completed.load(Ordering::Acquire) >= self.expected
    }

    /// Resolves once every expected object is done or a fatal error was recorded.
    pub async fn wait(&self) {
        loop {
            let notified = self.done.notified();
            if self.is_complete() || self.has_failed() {
                return;
            }
            notified.await;
        }
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Acquire)
    }

    /// Objects done, including skipped ones.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::Acquire)
    }

    /// How many times completion was signalled (0 or 1).
    pub fn completion_signals(&self) -> usize {
        self.signals.load(Ordering::Acquire)
    }
}
