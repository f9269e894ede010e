//! Retry wrapper for remote calls.
//!
//! Every remote operation goes through [`Invoker::invoke`], which retries
//! failures whose kind is transient with exponential backoff plus jitter, and
//! gives up immediately on anything else. Both the operation and the backoff
//! sleep race the caller's cancellation token.

use connector_sync_types::{Result, RetryConfig, SyncError};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Bounded retry policy applied per call.
///
/// Holds no state between calls; attempt counters live on the stack of each
/// `invoke`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invoker {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for Invoker {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl Invoker {
    /// `max_attempts` counts the first attempt; values below 1 are treated as 1.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), base_delay }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, config.base_delay())
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `operation` until it succeeds, fails terminally, runs out of
    /// attempts, or `cancel` fires.
    pub async fn invoke<T, F, Fut>(&self, cancel: &CancellationToken, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled);
            }

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(SyncError::Cancelled),
                outcome = operation() => outcome,
            };

            let err = match outcome {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::debug!("Remote call succeeded after {} retries", attempt);
                    }
                    return Ok(value);
                },
                Err(err) => err,
            };

            if !err.is_retryable() {
                tracing::debug!("Non-retryable error, stopping: {}", err);
                return Err(err);
            }

            attempt += 1;
            if attempt >= self.max_attempts {
                tracing::warn!("Giving up after {} attempts: {}", attempt, err);
                return Err(SyncError::RetriesExhausted { attempts: attempt, last: Box::new(err) });
            }

            let delay = backoff_delay(self.base_delay, attempt - 1);
            tracing::warn!(
                "Retryable error (attempt {}/{}), backing off {}ms: {}",
                attempt,
                self.max_attempts,
                delay.as_millis(),
                err
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(SyncError::Cancelled),
                _ = tokio::time::sleep(delay) => {},
            }
        }
    }
}

/// Delay after the 0-indexed `attempt`: `base * 2^attempt` plus uniform
/// jitter in `[0, half of that)`.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let delay = base.saturating_mul(2_u32.saturating_pow(attempt));
    let half = delay / 2;
    if half.is_zero() {
        return delay;
    }
    let jitter = rand::thread_rng().gen_range(Duration::ZERO..half);
    delay.saturating_add(jitter)
}

#[cfg(test)]
#[path = "invoker_tests.rs"]
mod invoker_tests;
