//! Result of one scan run.

use serde::Serialize;

use crate::config::StrategyKind;

/// What a run accomplished. `timed_out` runs carry a partial total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub strategy: StrategyKind,
    pub workers: usize,
    pub total_matches: u64,
    /// Objects in the requested range.
    pub requested: usize,
    /// Objects admitted before the run ended.
    pub admitted: usize,
    /// Objects done, including skipped ones.
    pub completed: usize,
    /// Objects that contributed zero because retries ran out or a fault was skipped.
    pub skipped: usize,
    /// Times the aggregator signalled completion; 1 for a finished non-empty run.
    pub completion_signals: usize,
    pub elapsed_secs: f64,
    pub timed_out: bool,
}

impl RunReport {
    /// Objects that never reached done.
    pub fn incomplete(&self) -> usize {
        self.requested.saturating_sub(self.completed)
    }

    pub fn is_complete(&self) -> bool {
        !self.timed_out && self.incomplete() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_counts_unfinished_objects() {
        let r = RunReport {
            strategy: StrategyKind::Pipeline,
            workers: 4,
            total_matches: 120,
            requested: 10,
            admitted: 8,
            completed: 6,
            skipped: 1,
            completion_signals: 0,
            elapsed_secs: 1.5,
            timed_out: true,
        };
        assert_eq!(r.incomplete(), 4);
        assert!(!r.is_complete());
    }
}
