//! Retry driver and backoff policy.
//!
//! Only transient store faults are retried. The policy decides how many
//! attempts an object gets and how long to wait between them, so the scheduler
//! and the alternative strategies share one consistent behaviour.

mod policy;
mod run;

pub use policy::{MaxAttempts, RetryDecision, RetryPolicy};
pub use run::{fetch_with_retry, fetch_with_retry_observed, RetryOutcome};
