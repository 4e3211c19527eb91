//! Decorator that fails the first K reads of every object.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{ObjectStore, StoreError};

/// Wraps a store so each object answers `Transient` for its first
/// `failures_per_object` reads, then delegates to the inner store.
#[derive(Debug)]
pub struct FlakyStore<S> {
    inner: S,
    failures_per_object: u32,
    seen: Mutex<HashMap<(String, String), u32>>,
}

impl<S: ObjectStore> FlakyStore<S> {
    pub fn new(inner: S, failures_per_object: u32) -> Self {
        Self {
            inner,
            failures_per_object,
            seen: Mutex::new(HashMap::new()),
        }
    }

    /// Total reads observed for one object (failed and successful).
    pub fn reads_of(&self, container: &str, object: &str) -> u32 {
        let seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        seen.get(&(container.to_string(), object.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

impl<S: ObjectStore> ObjectStore for FlakyStore<S> {
    fn read(&self, container: &str, object: &str) -> Result<Vec<u8>, StoreError> {
        let reads = {
            let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
            let n = seen
                .entry((container.to_string(), object.to_string()))
                .or_insert(0);
            *n += 1;
            *n
        };
        if reads <= self.failures_per_object {
            return Err(StoreError::Transient);
        }
        self.inner.read(container, object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn fails_first_k_reads_per_object() {
        let inner = MemoryStore::new();
        inner.insert("c", "a", "A");
        inner.insert("c", "b", "B");
        let store = FlakyStore::new(inner, 2);
        assert!(store.read("c", "a").unwrap_err().is_transient());
        assert!(store.read("c", "b").unwrap_err().is_transient());
        assert!(store.read("c", "a").unwrap_err().is_transient());
        assert_eq!(store.read("c", "a").unwrap(), b"A");
        assert_eq!(store.reads_of("c", "a"), 3);
        assert_eq!(store.reads_of("c", "b"), 1);
    }
}
