//! Shared fixtures: a synthetic epoch corpus with known match counts, plus
//! instrumented store and matcher wrappers.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use epochscan_core::matcher::{Matcher, TextMatcher};
use epochscan_core::store::{MemoryStore, ObjectStore, StoreError};

pub const CONTAINER: &str = "s3SimulationFiles";
pub const TERM: &str = "pewter";
pub const CORPUS_LEN: u64 = 100;
pub const CORPUS_TOTAL: u64 = 1874;

const VARIANTS: [&str; 5] = ["pewter", "Pewter", "pewterer's", "PEWTERS", "pewter's"];
const FILLER: [&str; 6] = [
    "the tankard was",
    "spewter and compewter do not count,",
    "polished tin",
    "an old ledger lists",
    "(alloy)",
    "1pewter is not a word;",
];

/// Matches expected in `epoch_<index>`; they sum to [`CORPUS_TOTAL`] over the corpus.
pub fn expected_count(index: u64) -> usize {
    match index {
        0 => 16,
        // 1858 over 99 objects: 76 objects of 19, 23 of 18.
        1..=76 => 19,
        _ => 18,
    }
}

/// Text holding exactly `matches` occurrences of the term or its variants.
pub fn fixture_text(matches: usize, seed: usize) -> String {
    let mut out = String::new();
    for i in 0..matches {
        out.push_str(FILLER[(seed + i) % FILLER.len()]);
        out.push(' ');
        out.push_str(VARIANTS[(seed * 7 + i) % VARIANTS.len()]);
        out.push_str(if i % 3 == 0 { ".\n" } else { " " });
    }
    out.push_str(FILLER[seed % FILLER.len()]);
    out
}

pub fn corpus_store() -> MemoryStore {
    let store = MemoryStore::new();
    for i in 0..CORPUS_LEN {
        store.insert(
            CONTAINER,
            &format!("epoch_{}", i),
            fixture_text(expected_count(i), i as usize),
        );
    }
    store
}

/// Delays every read, to keep objects in flight long enough to overlap.
pub struct SlowStore<S> {
    pub inner: S,
    pub delay: Duration,
}

impl<S: ObjectStore> ObjectStore for SlowStore<S> {
    fn read(&self, container: &str, object: &str) -> Result<Vec<u8>, StoreError> {
        std::thread::sleep(self.delay);
        self.inner.read(container, object)
    }
}

/// Objects between the start of their read and the end of their match.
#[derive(Default)]
pub struct InFlightGauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlightGauge {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }
}

/// Store half of the gauge: enters on every read. Use with a fault-free inner store.
pub struct GaugedStore<S> {
    pub inner: S,
    pub gauge: Arc<InFlightGauge>,
    pub delay: Duration,
}

impl<S: ObjectStore> ObjectStore for GaugedStore<S> {
    fn read(&self, container: &str, object: &str) -> Result<Vec<u8>, StoreError> {
        self.gauge.enter();
        std::thread::sleep(self.delay);
        self.inner.read(container, object)
    }
}

/// Matcher half of the gauge: leaves once the object is counted.
pub struct GaugedMatcher {
    pub inner: TextMatcher,
    pub gauge: Arc<InFlightGauge>,
    pub delay: Duration,
    pub calls: AtomicUsize,
}

impl Matcher for GaugedMatcher {
    fn count_matches(&self, blob: &[u8]) -> u64 {
        std::thread::sleep(self.delay);
        let n = self.inner.count_matches(blob);
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gauge.leave();
        n
    }
}
