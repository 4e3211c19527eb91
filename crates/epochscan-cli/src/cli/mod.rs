//! CLI for the epochscan search pipeline.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use epochscan_core::config::{self, FaultPolicy, ScanConfig, StrategyKind};
use std::path::PathBuf;

use commands::{run_bench, run_completions, run_search};

/// Top-level CLI for epochscan.
#[derive(Debug, Parser)]
#[command(name = "epochscan")]
#[command(about = "Count term matches across a numbered series of remote objects", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Count matches for a term (and its variants) across a range of epochs.
    Search {
        /// Term to search for.
        #[arg(default_value = "pewter")]
        term: String,
        #[command(flatten)]
        scan: ScanArgs,
        /// Print the run report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Run the same range under every strategy and compare timings.
    Bench {
        /// Term to search for.
        #[arg(default_value = "pewter")]
        term: String,
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Print shell completions to stdout.
    Completions {
        shell: clap_complete::Shell,
    },
}

/// Overrides for values in config.toml.
#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    /// First epoch to search (inclusive).
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub start: i64,
    /// Epoch just after the last one to search (exclusive).
    #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
    pub end: i64,
    /// Objects in flight and threads per pool (default: available parallelism).
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,
    /// Scheduling strategy: pipeline, sequential or unbounded.
    #[arg(long, value_parser = parse_strategy)]
    pub strategy: Option<StrategyKind>,
    /// Probability that a simulated read fails transiently.
    #[arg(long, value_name = "P")]
    pub failure_rate: Option<f64>,
    /// Give up waiting after SECS and report the partial total (0: never).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
    /// Attempts per object before it counts as zero (default: retry forever).
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,
    /// Root directory of the simulated store.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Count missing or unreadable objects as zero instead of failing the run.
    #[arg(long)]
    pub skip_missing: bool,
}

fn parse_strategy(s: &str) -> Result<StrategyKind, String> {
    match s {
        "pipeline" => Ok(StrategyKind::Pipeline),
        "sequential" => Ok(StrategyKind::Sequential),
        "unbounded" => Ok(StrategyKind::Unbounded),
        other => Err(format!(
            "unknown strategy '{}' (expected pipeline, sequential or unbounded)",
            other
        )),
    }
}

impl ScanArgs {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, cfg: &mut ScanConfig) {
        if let Some(workers) = self.workers {
            cfg.workers = Some(workers);
        }
        if let Some(strategy) = self.strategy {
            cfg.strategy = strategy;
        }
        if let Some(rate) = self.failure_rate {
            cfg.failure_rate = rate;
        }
        if let Some(secs) = self.timeout {
            cfg.timeout_secs = Some(secs);
        }
        if let Some(n) = self.max_attempts {
            let mut retry = cfg.retry.clone().unwrap_or_default();
            retry.max_attempts = Some(n);
            cfg.retry = Some(retry);
        }
        if let Some(dir) = &self.data_dir {
            cfg.data_dir = Some(dir.clone());
        }
        if self.skip_missing {
            cfg.on_fatal = FaultPolicy::Skip;
        }
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Search { term, scan, json } => {
                scan.apply(&mut cfg);
                run_search(&term, &cfg, scan.start, scan.end, json).await?;
            }
            CliCommand::Bench { term, scan } => {
                scan.apply(&mut cfg);
                run_bench(&term, &cfg, scan.start, scan.end).await?;
            }
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
