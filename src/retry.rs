// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Retry Logic with Exponential Backoff
 * Bounded retry policy for flaky intelligence sources
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary - Enterprise Edition
 */

use crate::errors::{ReconError, ReconResult};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry configuration with exponential backoff.
///
/// Defaults match the policy used against rate-limited upstreams such as
/// crt.sh: up to 6 attempts, 4s initial delay doubling per attempt, capped
/// at 60s. Jitter is off by default so the delay schedule is deterministic.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (first try included)
    pub max_attempts: u32,

    /// Delay before the first retry
    pub initial_backoff: Duration,

    /// Upper bound on any single delay
    pub max_backoff: Duration,

    /// Backoff multiplier (typically 2.0 for exponential)
    pub backoff_multiplier: f64,

    /// Enable jitter to prevent thundering herd
    pub enable_jitter: bool,

    /// Jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            initial_backoff: Duration::from_secs(4),
            max_backoff: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            enable_jitter: false,
            jitter_factor: 0.3,
        }
    }
}

impl RetryConfig {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_initial_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    pub fn with_jitter(mut self, jitter_factor: f64) -> Self {
        self.enable_jitter = true;
        self.jitter_factor = jitter_factor;
        self
    }

    /// Calculate backoff duration before retry number `attempt`.
    ///
    /// `attempt` counts completed attempts, so the delay before attempt n+1
    /// is `min(max_backoff, initial_backoff * multiplier^(n-1))`.
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_secs(0);
        }

        let base_backoff = self.initial_backoff.as_millis() as f64
            * self.backoff_multiplier.powi((attempt - 1) as i32);

        let capped_backoff = base_backoff.min(self.max_backoff.as_millis() as f64);

        let backoff_with_jitter = if self.enable_jitter {
            let mut rng = rand::rng();
            let jitter_range = capped_backoff * self.jitter_factor;
            let jitter = rng.random_range(-jitter_range..jitter_range);
            (capped_backoff + jitter).max(0.0)
        } else {
            capped_backoff
        };

        Duration::from_millis(backoff_with_jitter as u64)
    }
}

/// Retry a future with exponential backoff.
///
/// Success or a non-retryable error terminates immediately; a retryable
/// error sleeps for the configured (or error-suggested) delay and tries
/// again until the attempt budget is exhausted.
pub async fn retry_with_backoff<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> ReconResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ReconResult<T>>,
{
    let mut attempt = 0;
    let mut last_error: Option<ReconError> = None;

    while attempt < config.max_attempts {
        attempt += 1;

        debug!(
            attempt = attempt,
            max_attempts = config.max_attempts,
            operation = operation_name,
            "Executing operation"
        );

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(
                        attempt = attempt,
                        operation = operation_name,
                        "Operation succeeded after retry"
                    );
                }
                return Ok(result);
            }
            Err(err) => {
                let is_retryable = err.is_retryable();
                let custom_delay = err.retry_delay();

                warn!(
                    attempt = attempt,
                    max_attempts = config.max_attempts,
                    operation = operation_name,
                    error = %err,
                    retryable = is_retryable,
                    "Operation failed"
                );

                if !is_retryable {
                    debug!(operation = operation_name, "Error is not retryable, aborting");
                    return Err(err);
                }

                last_error = Some(err);

                if attempt < config.max_attempts {
                    let backoff = custom_delay.unwrap_or_else(|| config.calculate_backoff(attempt));

                    debug!(
                        attempt = attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        operation = operation_name,
                        "Backing off before retry"
                    );

                    tokio::time::sleep(backoff).await;
                } else {
                    warn!(
                        operation = operation_name,
                        attempts = attempt,
                        "Max retry attempts reached"
                    );
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        ReconError::General(format!(
            "Operation '{}' failed after {} attempts",
            operation_name, config.max_attempts
        ))
    }))
}
