//! Bounded retry with exponential backoff for batch submission.

use std::time::Duration;

use rand::Rng;
use tracing::warn;

use sower_weaviate::types::{ObjectResult, WeaviateObject};

use crate::transport::{Result, WeaviateTransport};

/// Retry settings for one write job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; a retryable failure is attempted
    /// `max_retries + 1` times in total.
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Fresh backoff state for one submission attempt chain.
    pub fn backoff(&self) -> Backoff {
        Backoff {
            policy: *self,
            attempt: 0,
        }
    }
}

/// Backoff state local to one attempt chain.
///
/// Yields the delay before each retry: exponential doubling from the
/// initial backoff, capped at the maximum, plus up to 50% random jitter.
/// Exhausted once `max_retries` delays have been produced.
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: RetryPolicy,
    attempt: u32,
}

impl Backoff {
    /// Completed attempts so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// The base delay for the given retry, without jitter.
    fn base_delay(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.policy
            .initial_backoff
            .saturating_mul(factor)
            .min(self.policy.max_backoff)
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.attempt >= self.policy.max_retries {
            return None;
        }

        let base = self.base_delay(self.attempt);
        self.attempt += 1;

        let jitter_bound = (base.as_millis() as u64 / 2).max(1);
        let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..jitter_bound));
        Some(base + jitter)
    }
}

/// Submits a batch through the transport, retrying retryable failures.
///
/// The identical object slice is resubmitted on every attempt; the batch
/// is never mutated once it enters submission. Terminal failures get
/// exactly one attempt.
pub async fn submit_with_retry(
    transport: &dyn WeaviateTransport,
    objects: &[WeaviateObject],
    policy: RetryPolicy,
) -> Result<Vec<ObjectResult>> {
    let mut backoff = policy.backoff();
    loop {
        match transport.submit(objects).await {
            Ok(results) => return Ok(results),
            Err(err) if err.is_retryable() => {
                let Some(delay) = backoff.next() else {
                    warn!(
                        attempts = backoff.attempt() + 1,
                        err = %err,
                        "batch submission attempts exhausted"
                    );
                    return Err(err);
                };
                warn!(
                    attempt = backoff.attempt(),
                    delay_ms = delay.as_millis() as u64,
                    err = %err,
                    "batch submission failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
