//! Per-run knobs shared by every strategy.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::{FaultPolicy, ScanConfig};
use crate::range::DEFAULT_CONTAINER;
use crate::retry::RetryPolicy;

use super::progress::ProgressStats;

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Admission budget and per-pool thread count.
    pub workers: usize,
    pub container: String,
    pub retry: RetryPolicy,
    /// Bound on the whole run; `None` waits until every object is done.
    pub timeout: Option<Duration>,
    pub on_fatal: FaultPolicy,
    pub progress: Option<mpsc::Sender<ProgressStats>>,
}

impl ScanOptions {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            container: DEFAULT_CONTAINER.to_string(),
            retry: RetryPolicy::default(),
            timeout: None,
            on_fatal: FaultPolicy::default(),
            progress: None,
        }
    }

    pub fn from_config(cfg: &ScanConfig) -> Self {
        Self {
            workers: cfg.workers(),
            container: cfg.container.clone(),
            retry: cfg.retry_policy(),
            timeout: cfg.timeout(),
            on_fatal: cfg.on_fatal,
            progress: None,
        }
    }

    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = container.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_fault_policy(mut self, on_fatal: FaultPolicy) -> Self {
        self.on_fatal = on_fatal;
        self
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<ProgressStats>) -> Self {
        self.progress = Some(tx);
        self
    }
}
