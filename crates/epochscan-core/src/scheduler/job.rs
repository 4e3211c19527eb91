//! Whole-object work item used by the sequential and unbounded strategies,
//! which fetch and match on the same thread.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::FaultPolicy;
use crate::control::CancelToken;
use crate::fetch::Fetcher;
use crate::matcher::Matcher;
use crate::range::{object_name, ObjectIndex};
use crate::retry::{fetch_with_retry, RetryOutcome, RetryPolicy};

use super::aggregate::Aggregator;
use super::progress::ProgressReporter;
use super::settle::settle_fatal;

#[derive(Clone)]
pub(crate) struct ObjectJob {
    pub(crate) fetcher: Fetcher,
    pub(crate) matcher: Arc<dyn Matcher>,
    pub(crate) retry: RetryPolicy,
    pub(crate) on_fatal: FaultPolicy,
    pub(crate) aggregator: Arc<Aggregator>,
    pub(crate) cancel: CancelToken,
    pub(crate) progress: ProgressReporter,
}

impl ObjectJob {
    /// True once the run should stop taking new objects.
    pub(crate) fn should_stop(&self) -> bool {
        self.cancel.is_cancelled() || self.aggregator.has_failed()
    }

    /// Fetch, match, and fold one object.
    pub(crate) fn scan(&self, index: ObjectIndex) {
        let object = object_name(index);
        match fetch_with_retry(&self.fetcher, &self.retry, &object, &self.cancel) {
            Ok(RetryOutcome::Fetched { bytes, .. }) => {
                let count = self.matcher.count_matches(&bytes);
                self.aggregator.record(count);
            }
            Ok(RetryOutcome::Exhausted { .. }) => {
                self.aggregator.record_skipped();
            }
            Ok(RetryOutcome::Cancelled { .. }) => return,
            Err(e) => {
                settle_fatal(self.on_fatal, &object, e, &self.aggregator, &self.cancel);
            }
        }
        self.progress.report(&self.aggregator);
    }
}

/// Await a blocking scan, bounded by `timeout`. Returns true if it timed out.
pub(crate) async fn join_within(handle: JoinHandle<()>, timeout: Option<Duration>) -> bool {
    let join = async {
        if let Err(e) = handle.await {
            tracing::error!("scan worker failed: {}", e);
        }
    };
    match timeout {
        Some(limit) => tokio::time::timeout(limit, join).await.is_err(),
        None => {
            join.await;
            false
        }
    }
}
