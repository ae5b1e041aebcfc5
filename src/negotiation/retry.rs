//! Bounded retry for reasoning requests

use crate::llm::{LlmError, LlmRequest, LlmResponse, LlmService};
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// How transient transport failures are retried.
///
/// `max_attempts` counts every attempt including the first. Delays grow
/// exponentially from `base_delay` (1s, 2s, 4s, ...) and never exceed
/// `max_delay`, even when the provider asks for a longer `retry-after`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Retry without waiting
    pub fn no_delay(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before the attempt after `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let backoff = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)));
        retry_after.unwrap_or(backoff).min(self.max_delay)
    }
}

/// Send `request`, retrying retryable failures per `policy`.
///
/// Non-retryable errors return at once. The last error is returned once
/// attempts are exhausted; the caller decides what an exhausted transport
/// means for its decision.
pub async fn send_with_retry(
    llm: &dyn LlmService,
    request: &LlmRequest,
    policy: &RetryPolicy,
) -> Result<LlmResponse, LlmError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match llm.complete(request).await {
            Ok(response) => return Ok(response),
            Err(e) if e.kind.is_retryable() && attempt < max_attempts => {
                let delay = policy.delay_for(attempt, e.retry_after);
                tracing::warn!(
                    model = llm.model_id(),
                    attempt,
                    max_attempts,
                    delay_ms = %delay.as_millis(),
                    error = %e,
                    "LLM request failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                if e.kind.is_retryable() {
                    tracing::error!(model = llm.model_id(), attempts = attempt, error = %e, "LLM request failed after all attempts");
                } else {
                    tracing::error!(model = llm.model_id(), error = %e, kind = ?e.kind, "LLM request failed, not retryable");
                }
                return Err(e);
            }
        }
    }
}
