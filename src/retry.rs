// src/retry.rs
//! Bounded exponential backoff around fallible async calls.
//!
//! `RetryPolicy::run` attempts the operation up to `max_attempts` times,
//! sleeping `initial_delay * factor^(attempt-1)` between attempts and never
//! after the last one. Terminal errors (per [`CollaboratorError::is_retryable`])
//! fail immediately; on exhaustion the final error is re-raised so the caller
//! records an error outcome instead of crashing.

use std::future::Future;
use std::time::Duration;

use crate::error::CollaboratorError;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(250),
            factor: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration, factor: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            factor,
        }
    }

    /// Delay before attempt `n+1` (after the n-th failure, 1-based).
    fn backoff(&self, failed_attempt: u32) -> Duration {
        let mult = self.factor.powi(failed_attempt.saturating_sub(1) as i32);
        self.initial_delay.mul_f64(mult)
    }

    /// Run `op`, retrying transient failures with exponential backoff.
    pub async fn run<F, Fut, T>(&self, operation_name: &str, mut op: F) -> Result<T, CollaboratorError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CollaboratorError>>,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match op().await {
                Ok(v) => {
                    if attempt > 1 {
                        tracing::debug!(operation = operation_name, attempt, "succeeded after retry");
                    }
                    return Ok(v);
                }
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    let wait = self.backoff(attempt);
                    tracing::warn!(
                        operation = operation_name,
                        attempt,
                        backoff_ms = wait.as_millis() as u64,
                        error = %err,
                        "transient failure, will retry"
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(err) => {
                    tracing::warn!(
                        operation = operation_name,
                        attempt,
                        error = %err,
                        retryable = err.is_retryable(),
                        "giving up"
                    );
                    return Err(err);
                }
            }
        }
    }
}
