//! Remote object store collaborators.
//!
//! The scan core only sees the [`ObjectStore`] trait: one blocking read per
//! call, which either returns the object's bytes or a [`StoreError`]. Latency
//! and fault models live in the implementations, not in the core.

mod error;
mod flaky;
mod latency;
mod memory;
mod simulated;

pub use error::StoreError;
pub use flaky::FlakyStore;
pub use latency::LatencyModel;
pub use memory::MemoryStore;
pub use simulated::SimulatedStore;

/// Blocking object store. Implementations must tolerate concurrent reads of
/// independent objects from many worker threads.
pub trait ObjectStore: Send + Sync {
    /// Read one object in a single attempt (no retry).
    fn read(&self, container: &str, object: &str) -> Result<Vec<u8>, StoreError>;
}
