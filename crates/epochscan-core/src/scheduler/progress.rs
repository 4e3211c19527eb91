//! Progress reporting for scan runs (objects done, matches so far, rate).

use std::time::Instant;

use tokio::sync::mpsc;

use super::aggregate::Aggregator;

/// Snapshot of one run's progress (CLI-friendly).
#[derive(Debug, Clone)]
pub struct ProgressStats {
    /// Objects done, including skipped ones.
    pub objects_done: usize,
    pub objects_total: usize,
    pub matches_so_far: u64,
    /// Elapsed time since the run started (seconds).
    pub elapsed_secs: f64,
}

impl ProgressStats {
    /// Objects per second (0 if elapsed is 0).
    pub fn objects_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.objects_done as f64 / self.elapsed_secs
    }

    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.objects_total == 0 {
            return 1.0;
        }
        (self.objects_done as f64 / self.objects_total as f64).min(1.0)
    }
}

/// Sends snapshots from worker threads without ever blocking them.
#[derive(Debug, Clone)]
pub(crate) struct ProgressReporter {
    tx: Option<mpsc::Sender<ProgressStats>>,
    started: Instant,
}

impl ProgressReporter {
    pub(crate) fn new(tx: Option<mpsc::Sender<ProgressStats>>, started: Instant) -> Self {
        Self { tx, started }
    }

    pub(crate) fn report(&self, aggregator: &Aggregator) {
        if let Some(tx) = &self.tx {
            // A full channel just drops this snapshot; the next one supersedes it.
            let _ = tx.try_send(ProgressStats {
                objects_done: aggregator.completed(),
                objects_total: aggregator.expected(),
                matches_so_far: aggregator.total(),
                elapsed_secs: self.started.elapsed().as_secs_f64(),
            });
        }
    }
}
