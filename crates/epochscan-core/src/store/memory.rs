//! In-memory store with zero latency and no faults.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{ObjectStore, StoreError};

/// Objects keyed by `(container, object)`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an object.
    pub fn insert(&self, container: &str, object: &str, data: impl Into<Vec<u8>>) {
        let mut objects = self.objects.write().unwrap_or_else(|e| e.into_inner());
        objects.insert((container.to_string(), object.to_string()), data.into());
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStore for MemoryStore {
    fn read(&self, container: &str, object: &str) -> Result<Vec<u8>, StoreError> {
        let objects = self.objects.read().unwrap_or_else(|e| e.into_inner());
        objects
            .get(&(container.to_string(), object.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                container: container.to_string(),
                object: object.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_returns_inserted_bytes() {
        let store = MemoryStore::new();
        store.insert("c", "epoch_0", b"hello".to_vec());
        assert_eq!(store.read("c", "epoch_0").unwrap(), b"hello");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_object_is_not_found() {
        let store = MemoryStore::new();
        store.insert("c", "epoch_0", "x");
        let err = store.read("other", "epoch_0").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(!err.is_transient());
    }
}
