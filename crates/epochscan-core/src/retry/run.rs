//! Retry loop: fetch one object until success, exhaustion, or cancellation.

use std::time::Duration;

use crate::control::CancelToken;
use crate::fetch::{FetchOutcome, Fetcher};
use crate::store::StoreError;

use super::policy::{RetryDecision, RetryPolicy};

/// How a retried fetch ended. Fatal store faults are returned as `Err` instead.
#[derive(Debug, PartialEq, Eq)]
pub enum RetryOutcome {
    Fetched { bytes: Vec<u8>, attempts: u32 },
    /// Bounded policy ran out of attempts.
    Exhausted { attempts: u32 },
    /// The run was cancelled before the object could be fetched.
    Cancelled { attempts: u32 },
}

/// Fetches `object`, retrying transient failures according to `policy`.
pub fn fetch_with_retry(
    fetcher: &Fetcher,
    policy: &RetryPolicy,
    object: &str,
    cancel: &CancelToken,
) -> Result<RetryOutcome, StoreError> {
    fetch_with_retry_observed(fetcher, policy, object, cancel, |_, _| {})
}

/// Like [`fetch_with_retry`], calling `on_retry(attempt, delay)` before each backoff sleep.
pub fn fetch_with_retry_observed<F>(
    fetcher: &Fetcher,
    policy: &RetryPolicy,
    object: &str,
    cancel: &CancelToken,
    mut on_retry: F,
) -> Result<RetryOutcome, StoreError>
where
    F: FnMut(u32, Duration),
{
    let mut attempt = 1u32;
    loop {
        if cancel.is_cancelled() {
            return Ok(RetryOutcome::Cancelled {
                attempts: attempt - 1,
            });
        }
        match fetcher.fetch(object)? {
            FetchOutcome::Success(bytes) => {
                return Ok(RetryOutcome::Fetched {
                    bytes,
                    attempts: attempt,
                })
            }
            FetchOutcome::TransientFailure => match policy.decide(attempt) {
                RetryDecision::NoRetry => {
                    tracing::warn!(
                        container = fetcher.container(),
                        object,
                        attempts = attempt,
                        "giving up after transient failures"
                    );
                    return Ok(RetryOutcome::Exhausted { attempts: attempt });
                }
                RetryDecision::RetryAfter(delay) => {
                    tracing::debug!(
                        container = fetcher.container(),
                        object,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "transient failure; retrying"
                    );
                    on_retry(attempt, delay);
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                    attempt = attempt.saturating_add(1);
                }
            },
        }
    }
}
