//! `epochscan bench [term]` – compare strategies on one range.

use anyhow::{Context, Result};
use epochscan_core::bench::{self, BenchResult};
use epochscan_core::config::{ScanConfig, StrategyKind};
use epochscan_core::range::EpochRange;
use epochscan_core::scheduler::ScanOptions;

fn strategy_label(kind: StrategyKind) -> &'static str {
    match kind {
        StrategyKind::Sequential => "sequential",
        StrategyKind::Unbounded => "unbounded",
        StrategyKind::Pipeline => "pipeline",
    }
}

fn print_bench_results(results: &[BenchResult]) {
    println!(
        "  {:>10}  {:>7}  {:>8}  {:>8}  {:>8}  {:>7}",
        "Strategy", "Workers", "Matches", "Time(s)", "Obj/s", "Skipped"
    );
    println!(
        "  {}  {}  {}  {}  {}  {}",
        "----------", "-------", "--------", "--------", "--------", "-------"
    );
    for r in results {
        println!(
            "  {:>10}  {:>7}  {:>8}  {:>8.2}  {:>8.1}  {:>7}{}",
            strategy_label(r.strategy),
            r.workers,
            r.total_matches,
            r.elapsed_secs,
            r.objects_per_sec,
            r.skipped,
            if r.timed_out { "  (timed out)" } else { "" }
        );
    }
}

pub async fn run_bench(term: &str, cfg: &ScanConfig, start: i64, end: i64) -> Result<()> {
    let range = EpochRange::new(start, end)?;
    let store = super::open_store(cfg)?;
    let options = ScanOptions::from_config(cfg);
    let results = bench::run_bench(store, term, range, &options)
        .await
        .with_context(|| format!("bench over {}", range))?;
    print_bench_results(&results);
    if let Some(best) = bench::recommend(&results) {
        println!(
            "Recommended: {} with {} worker(s)",
            strategy_label(best.strategy),
            best.workers
        );
    }
    Ok(())
}
