//! One object at a time, fetch then match, on a blocking thread.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::StrategyKind;
use crate::control::CancelToken;
use crate::error::ScanError;
use crate::fetch::Fetcher;
use crate::matcher::Matcher;
use crate::range::EpochRange;
use crate::store::ObjectStore;

use super::aggregate::Aggregator;
use super::job::{join_within, ObjectJob};
use super::options::ScanOptions;
use super::progress::ProgressReporter;
use super::report::RunReport;
use super::settle::finish_run;

pub struct SequentialScan {
    fetcher: Fetcher,
    matcher: Arc<dyn Matcher>,
    options: ScanOptions,
}

impl SequentialScan {
    pub fn new(store: Arc<dyn ObjectStore>, matcher: Arc<dyn Matcher>, options: ScanOptions) -> Self {
        Self {
            fetcher: Fetcher::new(store, options.container.clone()),
            matcher,
            options,
        }
    }

    pub async fn run(&self, range: EpochRange) -> Result<RunReport, ScanError> {
        let started = Instant::now();
        let job = ObjectJob {
            fetcher: self.fetcher.clone(),
            matcher: Arc::clone(&self.matcher),
            retry: self.options.retry,
            on_fatal: self.options.on_fatal,
            aggregator: Arc::new(Aggregator::new(range.len())),
            cancel: CancelToken::new(),
            progress: ProgressReporter::new(self.options.progress.clone(), started),
        };
        let admitted = Arc::new(AtomicUsize::new(0));
        tracing::info!(range = %range, "sequential run starting");

        let handle = tokio::task::spawn_blocking({
            let job = job.clone();
            let admitted = Arc::clone(&admitted);
            move || {
                for index in range.iter() {
                    if job.should_stop() {
                        break;
                    }
                    admitted.fetch_add(1, Ordering::Relaxed);
                    job.scan(index);
                }
            }
        });
        let timed_out = join_within(handle, self.options.timeout).await;

        finish_run(
            StrategyKind::Sequential,
            1,
            range,
            admitted.load(Ordering::Relaxed),
            &job.aggregator,
            &job.cancel,
            started,
            timed_out,
        )
    }
}
