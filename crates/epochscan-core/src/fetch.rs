//! Object fetcher: one store read, classified into success or transient failure.

use std::sync::Arc;

use crate::store::{ObjectStore, StoreError};

/// Outcome of a single fetch attempt. Fatal faults are returned as `Err` instead.
#[derive(Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(Vec<u8>),
    TransientFailure,
}

/// Adapter binding a store to the container the epochs live in.
#[derive(Clone)]
pub struct Fetcher {
    store: Arc<dyn ObjectStore>,
    container: String,
}

impl Fetcher {
    pub fn new(store: Arc<dyn ObjectStore>, container: impl Into<String>) -> Self {
        Self {
            store,
            container: container.into(),
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Single attempt; no retry, no concurrency control.
    pub fn fetch(&self, object: &str) -> Result<FetchOutcome, StoreError> {
        match self.store.read(&self.container, object) {
            Ok(bytes) => Ok(FetchOutcome::Success(bytes)),
            Err(e) if e.is_transient() => Ok(FetchOutcome::TransientFailure),
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}
