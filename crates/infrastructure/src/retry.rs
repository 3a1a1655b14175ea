//! Retry with exponential backoff
//!
//! Wraps calls to the mapping services so that transient failures
//! (connection drops, 5xx, rate limiting) are retried with growing,
//! jittered delays. A rate-limited response that names a `Retry-After`
//! delay is never retried sooner than that.
//!
//! ```rust,ignore
//! use infrastructure::retry::{RetryConfig, retry};
//!
//! let hits = retry(&RetryConfig::default(), || client.search("coffee", &area)).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use integration_osm::OsmError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, warn};

/// Configuration for retry behavior with exponential backoff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Initial delay before first retry in milliseconds (default: 200ms)
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Maximum delay between retries in milliseconds (default: 5000ms)
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Maximum number of retry attempts (default: 2)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Whether to add jitter to the delay (default: true)
    #[serde(default = "default_true")]
    pub jitter_enabled: bool,

    /// Maximum jitter factor, 0.0 to 1.0 (default: 0.1)
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,
}

const fn default_initial_delay() -> u64 {
    200
}

const fn default_max_delay() -> u64 {
    5_000
}

const fn default_multiplier() -> f64 {
    2.0
}

const fn default_max_retries() -> u32 {
    2
}

const fn default_true() -> bool {
    true
}

const fn default_jitter_factor() -> f64 {
    0.1
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            multiplier: default_multiplier(),
            max_retries: default_max_retries(),
            jitter_enabled: default_true(),
            jitter_factor: default_jitter_factor(),
        }
    }
}

impl RetryConfig {
    /// A single attempt, never retried
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Short deterministic delays for tests
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            initial_delay_ms: 1,
            max_delay_ms: 10,
            multiplier: 2.0,
            max_retries: 2,
            jitter_enabled: false,
            jitter_factor: 0.0,
        }
    }

    /// Disable jitter
    #[must_use]
    pub const fn without_jitter(mut self) -> Self {
        self.jitter_enabled = false;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.multiplier < 1.0 {
            return Err("multiplier must be at least 1.0".to_string());
        }
        if !(0.0..=1.0).contains(&self.jitter_factor) {
            return Err("jitter_factor must be between 0.0 and 1.0".to_string());
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err("initial_delay_ms must not exceed max_delay_ms".to_string());
        }
        Ok(())
    }

    /// Delay before retry number `attempt` (0-indexed)
    ///
    /// `initial_delay * multiplier^attempt`, capped at `max_delay`, with
    /// optional jitter.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base_delay = (self.initial_delay_ms as f64) * self.multiplier.powi(attempt as i32);
        let capped_delay = base_delay.min(self.max_delay_ms as f64);

        let final_delay = if self.jitter_enabled && self.jitter_factor > 0.0 {
            let jitter_range = capped_delay * self.jitter_factor;
            let jitter = rand::rng().random_range(-jitter_range..=jitter_range);
            (capped_delay + jitter).max(0.0)
        } else {
            capped_delay
        };

        Duration::from_millis(final_delay as u64)
    }
}

/// Errors that can be checked for retryability
pub trait Retryable {
    /// Returns true if the failed call may succeed when repeated
    fn is_retryable(&self) -> bool;

    /// Minimum wait the remote side asked for, if any
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl Retryable for application::ApplicationError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

impl Retryable for OsmError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimitExceeded {
                retry_after_secs: Some(secs),
            } => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }
}

/// Result of a retried operation plus attempt metadata
#[derive(Debug)]
pub struct RetryResult<T, E> {
    /// The final result
    pub result: Result<T, E>,
    /// Number of attempts made (1 = no retries)
    pub attempts: u32,
    /// Total time spent including delays
    pub total_duration: Duration,
}

impl<T, E> RetryResult<T, E> {
    /// Check if the operation succeeded
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Convert to a plain `Result`, discarding metadata
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

/// Run `operation`, retrying retryable failures per `config`
#[allow(clippy::cast_possible_truncation)]
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> RetryResult<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let start = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let err = match operation().await {
            Ok(value) => {
                if attempts > 1 {
                    debug!(
                        attempts,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Operation succeeded after retries"
                    );
                }
                return RetryResult {
                    result: Ok(value),
                    attempts,
                    total_duration: start.elapsed(),
                };
            },
            Err(err) => err,
        };

        let retry_attempt = attempts - 1;
        if !err.is_retryable() || retry_attempt >= config.max_retries {
            if err.is_retryable() {
                warn!(attempts, max_retries = config.max_retries, error = %err, "Operation failed after max retries");
            } else {
                debug!(attempts, error = %err, "Operation failed with non-retryable error");
            }
            return RetryResult {
                result: Err(err),
                attempts,
                total_duration: start.elapsed(),
            };
        }

        let backoff = config.delay_for_attempt(retry_attempt);
        let delay = err.retry_after().map_or(backoff, |after| after.max(backoff));
        warn!(
            attempt = attempts,
            max_retries = config.max_retries,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Operation failed, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

/// [`with_retry`] without the metadata
pub async fn retry<F, Fut, T, E>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    with_retry(config, operation).await.into_result()
}
