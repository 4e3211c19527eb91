//! Empirical read-latency distribution for the simulated store.

use std::time::Duration;

use rand::Rng;

/// Measured cumulative percentiles of object read latency, in milliseconds.
const PERCENTILES_MS: &[(f64, f64)] = &[
    (0.0, 12.0),
    (0.10, 38.0),
    (0.25, 52.0),
    (0.50, 74.0),
    (0.75, 109.0),
    (0.90, 172.0),
    (0.99, 334.0),
    (0.999, 527.0),
    (1.0, 3700.0),
];

fn millis(ms: f64) -> Duration {
    Duration::from_micros((ms * 1000.0).round() as u64)
}

/// Samples latencies by inverse-CDF interpolation over [`PERCENTILES_MS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LatencyModel;

impl LatencyModel {
    /// Latency at cumulative probability `p` (clamped to `[0, 1]`).
    pub fn at(&self, p: f64) -> Duration {
        let p = p.clamp(0.0, 1.0);
        let mut lower = PERCENTILES_MS[0];
        for &upper in &PERCENTILES_MS[1..] {
            if p <= upper.0 {
                let span = upper.0 - lower.0;
                let frac = if span > 0.0 { (p - lower.0) / span } else { 0.0 };
                return millis(lower.1 + frac * (upper.1 - lower.1));
            }
            lower = upper;
        }
        millis(lower.1)
    }

    /// Draw one latency.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        self.at(rng.gen::<f64>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_documented_percentiles() {
        let m = LatencyModel;
        assert_eq!(m.at(0.10), Duration::from_millis(38));
        assert_eq!(m.at(0.999), Duration::from_millis(527));
        assert_eq!(m.at(1.0), Duration::from_millis(3700));
    }

    #[test]
    fn monotonic_and_clamped() {
        let m = LatencyModel;
        let mut prev = Duration::ZERO;
        for i in 0..=100 {
            let d = m.at(i as f64 / 100.0);
            assert!(d >= prev);
            prev = d;
        }
        assert_eq!(m.at(-3.0), m.at(0.0));
        assert_eq!(m.at(7.0), m.at(1.0));
    }
}
