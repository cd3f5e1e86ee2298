//! Exponential backoff shared by job publishing and consumption.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::config::defaults;

/// Exponential backoff with a capped interval.
///
/// `max_attempts` counts the first attempt, so the default policy makes three
/// attempts with 1s and 2s pauses in between.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub initial_interval: Duration,
    pub multiplier: f64,
    pub max_interval: Duration,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(defaults::RETRY_INITIAL_MS),
            multiplier: defaults::RETRY_MULTIPLIER,
            max_interval: Duration::from_millis(defaults::RETRY_MAX_INTERVAL_MS),
            max_attempts: defaults::RETRY_MAX_ATTEMPTS,
        }
    }
}

/// The last error of an operation that never succeeded.
#[derive(Debug, thiserror::Error)]
#[error("gave up after {attempts} attempts: {last_error}")]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

impl RetryPolicy {
    /// Pause after the failed attempt number `attempt` (1-based).
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let millis = self.initial_interval.as_millis() as f64 * self.multiplier.powi(exponent);
        let capped = millis.min(self.max_interval.as_millis() as f64);
        Duration::from_millis(capped.max(0.0) as u64)
    }

    /// Every pause a fully failing operation goes through.
    pub fn schedule(&self) -> Vec<Duration> {
        (1..self.attempt_limit())
            .map(|attempt| self.backoff_after(attempt))
            .collect()
    }

    fn attempt_limit(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Run `operation` until it succeeds or the attempts are used up.
    ///
    /// The closure receives the 1-based attempt number.
    pub async fn run<T, E, F, Fut>(
        &self,
        operation_name: &str,
        mut operation: F,
    ) -> Result<T, RetryExhausted<E>>
    where
        E: Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let limit = self.attempt_limit();
        let mut attempt = 1;

        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= limit => {
                    warn!(
                        "{} failed on attempt {}/{}, giving up: {}",
                        operation_name, attempt, limit, err
                    );
                    return Err(RetryExhausted {
                        attempts: attempt,
                        last_error: err,
                    });
                }
                Err(err) => {
                    let delay = self.backoff_after(attempt);
                    warn!(
                        "{} failed on attempt {}/{}, retrying in {:?}: {}",
                        operation_name, attempt, limit, delay, err
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
