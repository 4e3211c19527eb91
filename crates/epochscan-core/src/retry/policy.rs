use std::time::Duration;

use rand::Rng;

/// Upper bound on attempts per object (including the first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxAttempts {
    /// Give up after this many attempts; the object contributes zero.
    Limited(u32),
    /// Never give up on an object.
    Unbounded,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Stop retrying this object.
    NoRetry,
    /// Retry after the given delay (may be zero).
    RetryAfter(Duration),
}

/// Exponential backoff with optional full jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: MaxAttempts,
    /// Delay before the second attempt.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Draw each delay uniformly from `[0, backoff]` instead of using it as is.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MaxAttempts::Unbounded,
            base_delay: Duration::from_millis(20),
            max_delay: Duration::from_secs(2),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Retry at once with no delay, up to `max_attempts`.
    pub fn immediate(max_attempts: MaxAttempts) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter: false,
        }
    }

    /// Backoff before attempt `attempt + 1`, without jitter.
    ///
    /// `attempt` is 1-based: base * 2^(attempt-1), capped at `max_delay`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = 1u32 << attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(exp).min(self.max_delay)
    }

    /// Decide what to do after transient failure number `attempt` (1-based).
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if let MaxAttempts::Limited(max) = self.max_attempts {
            if attempt >= max {
                return RetryDecision::NoRetry;
            }
        }

        let delay = self.backoff(attempt);
        if !self.jitter || delay.is_zero() {
            return RetryDecision::RetryAfter(delay);
        }
        let nanos = rand::thread_rng().gen_range(0..=delay.as_nanos() as u64);
        RetryDecision::RetryAfter(Duration::from_nanos(nanos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delay_of(d: RetryDecision) -> Duration {
        match d {
            RetryDecision::RetryAfter(d) => d,
            RetryDecision::NoRetry => panic!("expected retry"),
        }
    }

    #[test]
    fn exponential_backoff_grows_and_is_capped() {
        let p = RetryPolicy {
            max_attempts: MaxAttempts::Unbounded,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
            jitter: false,
        };
        assert_eq!(delay_of(p.decide(1)), Duration::from_millis(100));
        assert_eq!(delay_of(p.decide(2)), Duration::from_millis(200));
        assert_eq!(delay_of(p.decide(3)), Duration::from_millis(400));
        assert_eq!(delay_of(p.decide(10)), Duration::from_secs(1));
        assert_eq!(delay_of(p.decide(u32::MAX)), Duration::from_secs(1));
    }

    #[test]
    fn jitter_stays_within_backoff() {
        let p = RetryPolicy {
            jitter: true,
            ..RetryPolicy::default()
        };
        for attempt in 1..12 {
            assert!(delay_of(p.decide(attempt)) <= p.backoff(attempt));
        }
    }

    #[test]
    fn respects_max_attempts() {
        let p = RetryPolicy::immediate(MaxAttempts::Limited(3));
        assert_eq!(p.decide(1), RetryDecision::RetryAfter(Duration::ZERO));
        assert_eq!(p.decide(2), RetryDecision::RetryAfter(Duration::ZERO));
        assert_eq!(p.decide(3), RetryDecision::NoRetry);
    }

    #[test]
    fn unbounded_never_stops() {
        let p = RetryPolicy::immediate(MaxAttempts::Unbounded);
        assert!(matches!(p.decide(1_000_000), RetryDecision::RetryAfter(_)));
    }
}
