//! Store error type, split into retryable and fatal faults.

use std::fmt;
use std::path::PathBuf;

/// Error returned by a single store read.
#[derive(Debug)]
pub enum StoreError {
    /// Flaky network; expected to succeed on retry.
    Transient,
    /// Object does not exist. Not retried.
    NotFound { container: String, object: String },
    /// Backing storage failed (permission denied, unreadable file). Not retried.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StoreError {
    /// True for faults the retry driver may absorb.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Transient => write!(f, "transient network failure"),
            StoreError::NotFound { container, object } => {
                write!(f, "object {}/{} not found", container, object)
            }
            StoreError::Io { path, source } => write!(f, "reading {}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::Transient | StoreError::NotFound { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_is_retryable() {
        assert!(StoreError::Transient.is_transient());
        assert!(!StoreError::NotFound {
            container: "c".into(),
            object: "o".into()
        }
        .is_transient());
        assert!(!StoreError::Io {
            path: PathBuf::from("/x"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }
        .is_transient());
    }
}
