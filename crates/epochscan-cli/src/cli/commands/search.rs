//! `epochscan search [term]` – count matches across a range of epochs.

use anyhow::{Context, Result};
use epochscan_core::config::ScanConfig;
use epochscan_core::scheduler::{self, ProgressStats, RunReport, ScanOptions};
use std::time::Instant;

const PROGRESS_INTERVAL_MS: u128 = 500;

fn print_report(term: &str, report: &RunReport) {
    if report.is_complete() {
        println!("{} matches found for '{}' and variants", report.total_matches, term);
    } else {
        println!(
            "{} matches found for '{}' and variants (partial: {} of {} objects unfinished)",
            report.total_matches,
            term,
            report.incomplete(),
            report.requested
        );
    }
    if report.skipped > 0 {
        println!("{} object(s) counted as zero after failures", report.skipped);
    }
    println!("Execution time is {} ms", (report.elapsed_secs * 1000.0).round() as u64);
}

pub async fn run_search(
    term: &str,
    cfg: &ScanConfig,
    start: i64,
    end: i64,
    json: bool,
) -> Result<()> {
    let store = super::open_store(cfg)?;
    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<ProgressStats>(64);
    let progress_handle = tokio::spawn(async move {
        let mut last_print = Instant::now();
        while let Some(stats) = progress_rx.recv().await {
            if json {
                continue;
            }
            if last_print.elapsed().as_millis() >= PROGRESS_INTERVAL_MS
                || stats.objects_done >= stats.objects_total
            {
                eprint!(
                    "\r  {} / {} objects ({:.1}%)  {:.1} obj/s  {} matches  ",
                    stats.objects_done,
                    stats.objects_total,
                    stats.fraction() * 100.0,
                    stats.objects_per_sec(),
                    stats.matches_so_far
                );
                last_print = Instant::now();
            }
        }
    });

    let options = ScanOptions::from_config(cfg).with_progress(progress_tx);
    let result =
        scheduler::count_matches_in_epochs(start, end, term, store, cfg.strategy, options).await;
    // Workers still holding a sender after a timeout must not keep the printer alive.
    progress_handle.abort();
    if !json {
        eprintln!();
    }
    let report = result.with_context(|| format!("search for '{}' in [{}, {})", term, start, end))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(term, &report);
    }
    Ok(())
}
