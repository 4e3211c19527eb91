//! Bounded two-stage pipeline: download pool and process pool behind one
//! admission budget.
//!
//! Objects are admitted in ascending order, one budget permit each. The
//! download pool fetches (with retry), hands the bytes to the process pool,
//! and the process pool folds the count into the aggregator and drops the
//! task, which returns its permit and lets the next admission proceed.

use std::sync::Arc;
use std::time::Instant;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::StrategyKind;
use crate::control::CancelToken;
use crate::error::ScanError;
use crate::fetch::Fetcher;
use crate::matcher::Matcher;
use crate::range::EpochRange;
use crate::retry::{fetch_with_retry_observed, RetryOutcome};
use crate::store::ObjectStore;

use super::aggregate::Aggregator;
use super::budget::AdmissionBudget;
use super::options::ScanOptions;
use super::progress::ProgressReporter;
use super::report::RunReport;
use super::settle::{finish_run, settle_fatal, Settled};
use super::task::{Task, TaskState};

/// Shared state of one run, cloned into every worker closure.
#[derive(Clone)]
struct RunContext {
    budget: AdmissionBudget,
    aggregator: Arc<Aggregator>,
    cancel: CancelToken,
    progress: ProgressReporter,
}

pub struct PipelineScheduler {
    fetcher: Fetcher,
    matcher: Arc<dyn Matcher>,
    options: ScanOptions,
    download_pool: Arc<ThreadPool>,
    process_pool: Arc<ThreadPool>,
}

fn build_pool(name: &'static str, threads: usize) -> Result<ThreadPool, ScanError> {
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(move |i| format!("epochscan-{}-{}", name, i))
        .build()
        .map_err(|source| ScanError::Pool { pool: name, source })
}

impl PipelineScheduler {
    /// Builds the download and process pools, each with `options.workers` threads.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        matcher: Arc<dyn Matcher>,
        options: ScanOptions,
    ) -> Result<Self, ScanError> {
        let workers = options.workers.max(1);
        Ok(Self {
            fetcher: Fetcher::new(store, options.container.clone()),
            matcher,
            download_pool: Arc::new(build_pool("download", workers)?),
            process_pool: Arc::new(build_pool("process", workers)?),
            options,
        })
    }

    /// Scan `range` and return the aggregate match count.
    ///
    /// On timeout the partial total is returned with `timed_out` set; tasks
    /// still in flight are cancelled at their next retry boundary. A fatal
    /// fault or a timeout closes the admission budget, so a pending admission
    /// stops instead of taking the permit the failed task gives back.
    pub async fn run(&self, range: EpochRange) -> Result<RunReport, ScanError> {
        let started = Instant::now();
        let ctx = RunContext {
            budget: AdmissionBudget::new(self.options.workers),
            aggregator: Arc::new(Aggregator::new(range.len())),
            cancel: CancelToken::new(),
            progress: ProgressReporter::new(self.options.progress.clone(), started),
        };
        tracing::info!(
            range = %range,
            workers = ctx.budget.capacity(),
            "pipeline run starting"
        );

        let mut admitted = 0usize;
        let drive = async {
            for index in range.iter() {
                if ctx.cancel.is_cancelled() || ctx.aggregator.has_failed() {
                    break;
                }
                let permit = match ctx.budget.acquire().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        tracing::warn!(epoch = index, "{}; returning partial result", e);
                        ctx.cancel.cancel();
                        return;
                    }
                };
                admitted += 1;
                self.dispatch(Task::admit(index, permit), &ctx);
            }
            ctx.aggregator.wait().await;
        };

        let timed_out = match self.options.timeout {
            Some(limit) => {
                let elapsed = tokio::time::timeout(limit, drive).await.is_err();
                if elapsed {
                    ctx.cancel.cancel();
                    ctx.budget.close();
                }
                elapsed
            }
            None => {
                drive.await;
                false
            }
        };

        tracing::debug!(
            peak_in_flight = ctx.budget.peak_in_use(),
            "pipeline admission finished"
        );
        finish_run(
            StrategyKind::Pipeline,
            ctx.budget.capacity(),
            range,
            admitted,
            &ctx.aggregator,
            &ctx.cancel,
            started,
            timed_out,
        )
    }

    /// Download stage: fetch with retry, then hand off to the process stage.
    fn dispatch(&self, mut task: Task, ctx: &RunContext) {
        let fetcher = self.fetcher.clone();
        let retry = self.options.retry;
        let on_fatal = self.options.on_fatal;
        let matcher = Arc::clone(&self.matcher);
        let process_pool = Arc::clone(&self.process_pool);
        let ctx = ctx.clone();

        self.download_pool.spawn(move || {
            task.transition(TaskState::Downloading);
            let object = task.object().to_string();
            let outcome = fetch_with_retry_observed(&fetcher, &retry, &object, &ctx.cancel, |_, _| {
                task.transition(TaskState::Retrying)
            });

            match outcome {
                Ok(RetryOutcome::Fetched { bytes, attempts }) => {
                    task.transition(TaskState::Fetched);
                    if attempts > 1 {
                        tracing::debug!(object = %object, attempts, "fetched after retries");
                    }
                    process_pool.spawn(move || {
                        task.transition(TaskState::Processing);
                        let count = matcher.count_matches(&bytes);
                        drop(bytes);
                        task.transition(TaskState::Done);
                        tracing::trace!(epoch = task.index(), count, "object processed");
                        if ctx.aggregator.record(count) {
                            tracing::debug!("last object processed; pipeline complete");
                        }
                        ctx.progress.report(&ctx.aggregator);
                        drop(task);
                    });
                }
                Ok(RetryOutcome::Exhausted { .. }) => {
                    task.transition(TaskState::Done);
                    ctx.aggregator.record_skipped();
                    ctx.progress.report(&ctx.aggregator);
                }
                Ok(RetryOutcome::Cancelled { .. }) => {
                    task.transition(TaskState::Done);
                }
                Err(e) => {
                    task.transition(TaskState::Done);
                    match settle_fatal(on_fatal, &object, e, &ctx.aggregator, &ctx.cancel) {
                        Settled::Skipped => ctx.progress.report(&ctx.aggregator),
                        // Close before `task` returns its permit.
                        Settled::Failed => ctx.budget.close(),
                    }
                }
            }
        });
    }
}
