//! Object indices and the contiguous ranges the scheduler admits.

use std::ops::Range;

use crate::error::ScanError;

/// Container the epoch objects live in unless configured otherwise.
pub const DEFAULT_CONTAINER: &str = "s3SimulationFiles";

/// Identifies one fetchable unit of remote data.
pub type ObjectIndex = u64;

/// Name of the object holding epoch `index`.
pub fn object_name(index: ObjectIndex) -> String {
    format!("epoch_{}", index)
}

/// Validated half-open range `[start, end)` of object indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochRange {
    start: ObjectIndex,
    end: ObjectIndex,
}

impl EpochRange {
    /// Rejects negative starts and inverted ranges. `start == end` is a valid empty range.
    pub fn new(start: i64, end: i64) -> Result<Self, ScanError> {
        if start < 0 || end < start {
            return Err(ScanError::InvalidRange { start, end });
        }
        Ok(Self {
            start: start as ObjectIndex,
            end: end as ObjectIndex,
        })
    }

    pub fn start(&self) -> ObjectIndex {
        self.start
    }

    pub fn end(&self) -> ObjectIndex {
        self.end
    }

    /// Number of objects in the range.
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Indices in ascending order (admission order).
    pub fn iter(&self) -> Range<ObjectIndex> {
        self.start..self.end
    }
}

impl std::fmt::Display for EpochRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_names_are_deterministic() {
        assert_eq!(object_name(0), "epoch_0");
        assert_eq!(object_name(42), "epoch_42");
    }

    #[test]
    fn empty_range_is_valid() {
        let r = EpochRange::new(5, 5).unwrap();
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.iter().count(), 0);
    }

    #[test]
    fn negative_start_rejected() {
        assert!(matches!(
            EpochRange::new(-1, 3),
            Err(ScanError::InvalidRange { start: -1, end: 3 })
        ));
    }

    #[test]
    fn inverted_range_rejected() {
        assert!(matches!(
            EpochRange::new(10, 2),
            Err(ScanError::InvalidRange { .. })
        ));
    }

    #[test]
    fn iterates_ascending() {
        let r = EpochRange::new(3, 7).unwrap();
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![3, 4, 5, 6]);
        assert_eq!(r.len(), 4);
        assert_eq!(r.to_string(), "[3, 7)");
    }
}
