//! Outcome handling shared by every strategy: fatal faults and the final report.

use std::time::Instant;

use crate::config::{FaultPolicy, StrategyKind};
use crate::control::CancelToken;
use crate::error::ScanError;
use crate::range::EpochRange;
use crate::store::StoreError;

use super::aggregate::Aggregator;
use super::report::RunReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Settled {
    /// Object counted as zero; the run goes on.
    Skipped,
    /// Run cancelled with the error recorded.
    Failed,
}

/// Apply the fault policy to a non-retryable store error for `object`.
pub(crate) fn settle_fatal(
    policy: FaultPolicy,
    object: &str,
    err: StoreError,
    aggregator: &Aggregator,
    cancel: &CancelToken,
) -> Settled {
    match policy {
        FaultPolicy::Skip => {
            tracing::warn!(object, error = %err, "non-retryable fault; counting object as zero");
            aggregator.record_skipped();
            Settled::Skipped
        }
        FaultPolicy::Fail => {
            tracing::error!(object, error = %err, "non-retryable fault; cancelling run");
            cancel.cancel();
            aggregator.fail(ScanError::Fetch {
                object: object.to_string(),
                source: err,
            });
            Settled::Failed
        }
    }
}

/// Turn the aggregator's final state into a report, or the recorded fatal error.
#[allow(clippy::too_many_arguments)]
pub(crate) fn finish_run(
    strategy: StrategyKind,
    workers: usize,
    range: EpochRange,
    admitted: usize,
    aggregator: &Aggregator,
    cancel: &CancelToken,
    started: Instant,
    timed_out: bool,
) -> Result<RunReport, ScanError> {
    if let Some(err) = aggregator.take_failure() {
        cancel.cancel();
        return Err(err);
    }

    let report = RunReport {
        strategy,
        workers,
        total_matches: aggregator.total(),
        requested: range.len(),
        admitted,
        completed: aggregator.completed(),
        skipped: aggregator.skipped(),
        completion_signals: aggregator.completion_signals(),
        elapsed_secs: started.elapsed().as_secs_f64(),
        timed_out,
    };

    if timed_out {
        cancel.cancel();
        tracing::warn!(
            range = %range,
            incomplete = report.incomplete(),
            partial_total = report.total_matches,
            "run timed out; returning partial result"
        );
    } else if report.incomplete() > 0 {
        tracing::warn!(
            range = %range,
            incomplete = report.incomplete(),
            "run interrupted; returning partial result"
        );
    } else {
        tracing::info!(
            range = %range,
            total = report.total_matches,
            skipped = report.skipped,
            elapsed_ms = (report.elapsed_secs * 1000.0) as u64,
            "run complete"
        );
    }
    Ok(report)
}
