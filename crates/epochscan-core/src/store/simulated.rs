//! Filesystem-backed store that simulates a flaky, slow remote service.

use std::path::{Path, PathBuf};

use rand::Rng;

use super::{LatencyModel, ObjectStore, StoreError};

/// Largest latency multiplier; keeps the scaled worst case a finite sleep.
pub const MAX_LATENCY_SCALE: f64 = 100.0;

fn clamp_latency_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        0.0
    } else {
        scale.clamp(0.0, MAX_LATENCY_SCALE)
    }
}

/// Reads `<root>/<container>/<object>` after a sampled delay, failing with
/// [`StoreError::Transient`] at `failure_rate`.
#[derive(Debug, Clone)]
pub struct SimulatedStore {
    root: PathBuf,
    failure_rate: f64,
    latency: LatencyModel,
    latency_scale: f64,
}

impl SimulatedStore {
    pub fn new(root: impl Into<PathBuf>, failure_rate: f64) -> Self {
        Self {
            root: root.into(),
            failure_rate: if failure_rate.is_nan() {
                0.0
            } else {
                failure_rate.clamp(0.0, 1.0)
            },
            latency: LatencyModel,
            latency_scale: 1.0,
        }
    }

    /// Multiply every sampled latency by `scale`, clamped to
    /// `[0, MAX_LATENCY_SCALE]`; 0 (or NaN) disables the delay.
    pub fn with_latency_scale(mut self, scale: f64) -> Self {
        self.latency_scale = clamp_latency_scale(scale);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }
}

impl ObjectStore for SimulatedStore {
    fn read(&self, container: &str, object: &str) -> Result<Vec<u8>, StoreError> {
        let mut rng = rand::thread_rng();
        if self.latency_scale > 0.0 {
            let delay = self.latency.sample(&mut rng).mul_f64(self.latency_scale);
            std::thread::sleep(delay);
        }
        if self.failure_rate > 0.0 && rng.gen_bool(self.failure_rate) {
            return Err(StoreError::Transient);
        }

        let path = self.root.join(container).join(object);
        std::fs::read(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound {
                    container: container.to_string(),
                    object: object.to_string(),
                }
            } else {
                StoreError::Io { path, source }
            }
        })
    }
}
