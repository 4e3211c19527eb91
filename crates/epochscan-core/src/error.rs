//! Errors surfaced by the scan core to its caller.

use crate::store::StoreError;

/// Failure of a whole scan run.
///
/// Transient store faults never appear here; the retry driver absorbs them.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Range was negative or inverted. No work was dispatched.
    #[error("invalid range [{start}, {end}): start must be >= 0 and end >= start")]
    InvalidRange { start: i64, end: i64 },

    /// A non-retryable store fault for one object, propagated under `FaultPolicy::Fail`.
    #[error("fetching {object} failed")]
    Fetch {
        object: String,
        #[source]
        source: StoreError,
    },

    /// Worker pool could not be created.
    #[error("building {pool} pool")]
    Pool {
        pool: &'static str,
        #[source]
        source: rayon::ThreadPoolBuildError,
    },
}
