//! CLI command handlers.

mod bench;
mod completions;
mod search;

pub use bench::run_bench;
pub use completions::run_completions;
pub use search::run_search;

use anyhow::Result;
use epochscan_core::config::ScanConfig;
use epochscan_core::store::{ObjectStore, SimulatedStore};
use std::sync::Arc;

/// Simulated store rooted at the configured data directory.
fn open_store(cfg: &ScanConfig) -> Result<Arc<dyn ObjectStore>> {
    let root = cfg.data_dir()?;
    tracing::debug!(root = %root.display(), failure_rate = cfg.failure_rate, "opening simulated store");
    Ok(Arc::new(
        SimulatedStore::new(root, cfg.failure_rate).with_latency_scale(cfg.latency_scale),
    ))
}
