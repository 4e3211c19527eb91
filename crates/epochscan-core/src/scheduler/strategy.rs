//! Closed set of interchangeable scan strategies, selected by configuration.

use std::sync::Arc;

use crate::config::StrategyKind;
use crate::error::ScanError;
use crate::matcher::Matcher;
use crate::range::EpochRange;
use crate::store::ObjectStore;

use super::options::ScanOptions;
use super::pipeline::PipelineScheduler;
use super::report::RunReport;
use super::sequential::SequentialScan;
use super::unbounded::UnboundedScan;

pub enum Strategy {
    Sequential(SequentialScan),
    Unbounded(UnboundedScan),
    Pipeline(PipelineScheduler),
}

impl Strategy {
    pub fn build(
        kind: StrategyKind,
        store: Arc<dyn ObjectStore>,
        matcher: Arc<dyn Matcher>,
        options: ScanOptions,
    ) -> Result<Self, ScanError> {
        Ok(match kind {
            StrategyKind::Sequential => {
                Strategy::Sequential(SequentialScan::new(store, matcher, options))
            }
            StrategyKind::Unbounded => {
                Strategy::Unbounded(UnboundedScan::new(store, matcher, options))
            }
            StrategyKind::Pipeline => {
                Strategy::Pipeline(PipelineScheduler::new(store, matcher, options)?)
            }
        })
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Sequential(_) => StrategyKind::Sequential,
            Strategy::Unbounded(_) => StrategyKind::Unbounded,
            Strategy::Pipeline(_) => StrategyKind::Pipeline,
        }
    }

    /// Scan `range`; every strategy honours the same report contract.
    pub async fn run(&self, range: EpochRange) -> Result<RunReport, ScanError> {
        match self {
            Strategy::Sequential(s) => s.run(range).await,
            Strategy::Unbounded(s) => s.run(range).await,
            Strategy::Pipeline(s) => s.run(range).await,
        }
    }
}
