//! Benchmark mode: run the same range under each strategy and compare.
//!
//! Runs sequential, unbounded, and the pipeline at several worker counts
//! against one store. Reports elapsed time, objects per second, and the total
//! each run found, and recommends the fastest run whose total agrees with the
//! majority (a disagreeing total means that run lost or skipped objects).

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::StrategyKind;
use crate::error::ScanError;
use crate::matcher::TextMatcher;
use crate::range::EpochRange;
use crate::scheduler::{ScanOptions, Strategy};
use crate::store::ObjectStore;

/// Pipeline worker counts tried in addition to the configured one.
const PIPELINE_WORKERS: [usize; 3] = [1, 2, 4];

/// Result of one benchmark run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BenchResult {
    pub strategy: StrategyKind,
    pub workers: usize,
    pub total_matches: u64,
    pub objects: usize,
    pub skipped: usize,
    pub elapsed_secs: f64,
    pub objects_per_sec: f64,
    pub timed_out: bool,
}

/// Strategy and worker count for each run, in execution order.
pub fn bench_plan(configured_workers: usize) -> Vec<(StrategyKind, usize)> {
    let mut pipeline: Vec<usize> = PIPELINE_WORKERS.to_vec();
    pipeline.push(configured_workers.max(1));
    pipeline.sort_unstable();
    pipeline.dedup();

    let mut plan = vec![(StrategyKind::Sequential, 1), (StrategyKind::Unbounded, 0)];
    plan.extend(pipeline.into_iter().map(|w| (StrategyKind::Pipeline, w)));
    plan
}

/// Runs every entry of [`bench_plan`] over `range`. Stops at the first fatal error.
pub async fn run_bench(
    store: Arc<dyn ObjectStore>,
    term: &str,
    range: EpochRange,
    options: &ScanOptions,
) -> Result<Vec<BenchResult>, ScanError> {
    let matcher = Arc::new(TextMatcher::new(term));
    let plan = bench_plan(options.workers);
    let mut results = Vec::with_capacity(plan.len());

    for (kind, workers) in plan {
        let mut opts = options.clone();
        opts.progress = None;
        if workers > 0 {
            opts.workers = workers;
        }
        let strategy = Strategy::build(kind, Arc::clone(&store), matcher.clone(), opts)?;
        let report = strategy.run(range).await?;
        let objects_per_sec = if report.elapsed_secs > 0.0 {
            report.completed as f64 / report.elapsed_secs
        } else {
            0.0
        };
        tracing::info!(
            strategy = ?strategy.kind(),
            workers = report.workers,
            elapsed_ms = (report.elapsed_secs * 1000.0) as u64,
            total = report.total_matches,
            "bench run finished"
        );
        results.push(BenchResult {
            strategy: strategy.kind(),
            workers: report.workers,
            total_matches: report.total_matches,
            objects: report.completed,
            skipped: report.skipped,
            elapsed_secs: report.elapsed_secs,
            objects_per_sec,
            timed_out: report.timed_out,
        });
    }
    Ok(results)
}

/// Fastest complete run whose total matches the most common total.
pub fn recommend(results: &[BenchResult]) -> Option<&BenchResult> {
    let mut votes: HashMap<u64, usize> = HashMap::new();
    for r in results.iter().filter(|r| !r.timed_out) {
        *votes.entry(r.total_matches).or_insert(0) += 1;
    }
    let (&majority, _) = votes
        .iter()
        .max_by_key(|&(total, count)| (*count, std::cmp::Reverse(*total)))?;
    results
        .iter()
        .filter(|r| !r.timed_out && r.total_matches == majority)
        .min_by(|a, b| a.elapsed_secs.total_cmp(&b.elapsed_secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn result(strategy: StrategyKind, workers: usize, total: u64, secs: f64) -> BenchResult {
        BenchResult {
            strategy,
            workers,
            total_matches: total,
            objects: 10,
            skipped: 0,
            elapsed_secs: secs,
            objects_per_sec: 10.0 / secs,
            timed_out: false,
        }
    }

    #[test]
    fn plan_covers_every_strategy_without_duplicates() {
        let plan = bench_plan(4);
        assert_eq!(plan[0], (StrategyKind::Sequential, 1));
        assert_eq!(plan[1].0, StrategyKind::Unbounded);
        let pipeline: Vec<usize> = plan
            .iter()
            .filter(|(k, _)| *k == StrategyKind::Pipeline)
            .map(|(_, w)| *w)
            .collect();
        assert_eq!(pipeline, vec![1, 2, 4]);
        assert_eq!(bench_plan(8).len(), 6);
    }

    #[test]
    fn recommend_skips_disagreeing_totals() {
        let results = vec![
            result(StrategyKind::Sequential, 1, 100, 5.0),
            result(StrategyKind::Unbounded, 8, 90, 0.5),
            result(StrategyKind::Pipeline, 4, 100, 1.0),
        ];
        let best = recommend(&results).unwrap();
        assert_eq!(best.strategy, StrategyKind::Pipeline);
        assert_eq!(best.workers, 4);
    }

    #[test]
    fn recommend_empty_is_none() {
        assert!(recommend(&[]).is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn every_strategy_agrees_on_total() {
        let store = MemoryStore::new();
        for i in 0..6 {
            store.insert("c", &format!("epoch_{}", i), "pewter Pewterer and spewter");
        }
        let options = ScanOptions::new(2).with_container("c");
        let range = EpochRange::new(0, 6).unwrap();
        let results = run_bench(Arc::new(store), "pewter", range, &options).await.unwrap();
        let plan = bench_plan(2);
        assert_eq!(results.len(), plan.len());
        for (r, (kind, _)) in results.iter().zip(&plan) {
            assert_eq!(r.strategy, *kind);
        }
        assert!(results.iter().all(|r| r.total_matches == 12));
        assert!(recommend(&results).is_some());
    }
}
