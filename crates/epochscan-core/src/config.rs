use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::range::DEFAULT_CONTAINER;
use crate::retry::{MaxAttempts, RetryPolicy};

/// Retry policy parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts per object (including the first). Absent = never give up.
    #[serde(default)]
    pub max_attempts: Option<u32>,
    /// Delay before the second attempt, in milliseconds.
    pub base_delay_ms: u64,
    /// Maximum backoff delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Randomize each delay in `[0, backoff]`.
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: None,
            base_delay_ms: 20,
            max_delay_ms: 2000,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: match self.max_attempts {
                Some(n) => MaxAttempts::Limited(n.max(1)),
                None => MaxAttempts::Unbounded,
            },
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            jitter: self.jitter,
        }
    }
}

/// How the epochs are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// One object at a time on the calling thread.
    Sequential,
    /// Every object in parallel with no admission bound.
    Unbounded,
    /// Download and process pools behind one shared admission budget.
    #[default]
    Pipeline,
}

/// What a non-retryable store fault does to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultPolicy {
    /// Cancel the run and return the error.
    #[default]
    Fail,
    /// Log the fault and count the object as zero matches.
    Skip,
}

/// Global configuration loaded from `~/.config/epochscan/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// In-flight objects and per-pool threads. Absent = available parallelism.
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default)]
    pub strategy: StrategyKind,
    /// Container holding the `epoch_<n>` objects.
    #[serde(default = "default_container")]
    pub container: String,
    /// Root directory of the simulated store. Absent = XDG data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Probability that a simulated read fails transiently.
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,
    /// Multiplier on simulated read latency (0 = no delay).
    #[serde(default = "default_latency_scale")]
    pub latency_scale: f64,
    /// Bound on a whole run in seconds (one hour unless set).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub on_fatal: FaultPolicy,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

fn default_true() -> bool {
    true
}

fn default_container() -> String {
    DEFAULT_CONTAINER.to_string()
}

fn default_failure_rate() -> f64 {
    0.025
}

fn default_latency_scale() -> f64 {
    1.0
}

fn default_timeout_secs() -> Option<u64> {
    Some(3600)
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: None,
            strategy: StrategyKind::default(),
            container: default_container(),
            data_dir: None,
            failure_rate: default_failure_rate(),
            latency_scale: default_latency_scale(),
            timeout_secs: default_timeout_secs(),
            on_fatal: FaultPolicy::default(),
            retry: None,
        }
    }
}

impl ScanConfig {
    /// Configured worker count, or the machine's available parallelism.
    pub fn workers(&self) -> usize {
        self.workers
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
            .max(1)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().to_policy()
    }

    /// Run timeout; `timeout_secs = 0` disables it.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Root of the simulated store.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix("epochscan")?;
        Ok(xdg_dirs.get_data_home())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("epochscan")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ScanConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ScanConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<ScanConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: ScanConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = ScanConfig::default();
        assert_eq!(cfg.strategy, StrategyKind::Pipeline);
        assert_eq!(cfg.container, "s3SimulationFiles");
        assert!((cfg.failure_rate - 0.025).abs() < 1e-12);
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(3600)));
        assert_eq!(cfg.on_fatal, FaultPolicy::Fail);
        assert!(cfg.workers() >= 1);
        assert_eq!(cfg.retry_policy().max_attempts, MaxAttempts::Unbounded);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = ScanConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ScanConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.strategy, cfg.strategy);
        assert_eq!(parsed.container, cfg.container);
        assert_eq!(parsed.timeout_secs, cfg.timeout_secs);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg: ScanConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.container, "s3SimulationFiles");
        assert_eq!(cfg.timeout_secs, Some(3600));
        assert!(cfg.retry.is_none());
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            workers = 3
            strategy = "sequential"
            failure_rate = 0.0
            latency_scale = 0.0
            on_fatal = "skip"
            data_dir = "/srv/epochs"

            [retry]
            max_attempts = 3
            base_delay_ms = 5
            max_delay_ms = 40
            jitter = false
        "#;
        let cfg: ScanConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.workers(), 3);
        assert_eq!(cfg.strategy, StrategyKind::Sequential);
        assert_eq!(cfg.on_fatal, FaultPolicy::Skip);
        assert_eq!(cfg.data_dir().unwrap(), PathBuf::from("/srv/epochs"));
        let policy = cfg.retry_policy();
        assert_eq!(policy.max_attempts, MaxAttempts::Limited(3));
        assert_eq!(policy.base_delay, Duration::from_millis(5));
        assert_eq!(policy.max_delay, Duration::from_millis(40));
        assert!(!policy.jitter);
    }

    #[test]
    fn zero_timeout_disables_it() {
        let cfg: ScanConfig = toml::from_str("timeout_secs = 0\nlatency_scale = inf\n").unwrap();
        assert_eq!(cfg.timeout_secs, Some(0));
        assert_eq!(cfg.timeout(), None);
        assert!(cfg.latency_scale.is_infinite());

        let cfg: ScanConfig = toml::from_str("timeout_secs = 90").unwrap();
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "strategy = \"unbounded\"\nworkers = 2\n").unwrap();
        let cfg = load_from_path(&path).unwrap();
        assert_eq!(cfg.strategy, StrategyKind::Unbounded);
        assert_eq!(cfg.workers, Some(2));
    }
}
