//! Scan scheduling.
//!
//! The pipeline strategy is the core: one admission budget bounds how many
//! objects are in flight across a download pool and a process pool, and an
//! aggregator folds per-object counts and detects completion exactly once.
//! Sequential and unbounded strategies share the same report contract.

mod aggregate;
mod budget;
mod job;
mod options;
mod pipeline;
mod progress;
mod report;
mod sequential;
mod settle;
mod strategy;
mod task;
mod unbounded;

pub use aggregate::Aggregator;
pub use budget::{AdmissionBudget, AdmissionPermit, BudgetClosed};
pub use options::ScanOptions;
pub use pipeline::PipelineScheduler;
pub use progress::ProgressStats;
pub use report::RunReport;
pub use sequential::SequentialScan;
pub use strategy::Strategy;
pub use task::{Task, TaskState};
pub use unbounded::UnboundedScan;

use std::sync::Arc;

use crate::matcher::TextMatcher;
use crate::range::EpochRange;
use crate::store::ObjectStore;
use crate::ScanError;

/// Validate `[start, end)` and scan it for `term` with the given strategy.
pub async fn count_matches_in_epochs(
    start: i64,
    end: i64,
    term: &str,
    store: Arc<dyn ObjectStore>,
    kind: crate::config::StrategyKind,
    options: ScanOptions,
) -> Result<RunReport, ScanError> {
    let range = EpochRange::new(start, end)?;
    let matcher = Arc::new(TextMatcher::new(term));
    let strategy = Strategy::build(kind, store, matcher, options)?;
    strategy.run(range).await
}
