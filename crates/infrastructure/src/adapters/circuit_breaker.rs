//! Circuit breaker for mapping service calls
//!
//! When the search or routing backend keeps failing, further calls fail
//! fast instead of stacking up timeouts behind a dead service.
//!
//! - **Closed**: requests pass through
//! - **Open**: requests fail immediately
//! - **Half-Open**: a trial request decides whether to close again
//!
//! ```rust,ignore
//! let cb = CircuitBreaker::new("nominatim");
//! let hits = cb.call(|| client.search("coffee", &area)).await?;
//! ```

use std::{fmt, future::Future, time::Duration};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Configuration for a circuit breaker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before the circuit opens (default: 5)
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    /// Consecutive half-open successes before it closes (default: 2)
    #[serde(default = "default_success_threshold")]
    pub success_threshold: u32,
    /// Seconds the circuit stays open before a trial request (default: 30)
    #[serde(default = "default_half_open_timeout_secs")]
    pub half_open_timeout_secs: u64,
}

const fn default_failure_threshold() -> u32 {
    5
}

const fn default_success_threshold() -> u32 {
    2
}

const fn default_half_open_timeout_secs() -> u64 {
    30
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            success_threshold: default_success_threshold(),
            half_open_timeout_secs: default_half_open_timeout_secs(),
        }
    }
}

impl CircuitBreakerConfig {
    /// Creates a custom configuration
    #[must_use]
    pub const fn custom(
        failure_threshold: u32,
        success_threshold: u32,
        half_open_timeout_secs: u64,
    ) -> Self {
        Self {
            failure_threshold,
            success_threshold,
            half_open_timeout_secs,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.failure_threshold == 0 {
            return Err("failure_threshold must be greater than 0".to_string());
        }
        if self.success_threshold == 0 {
            return Err("success_threshold must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// State of a circuit breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Requests pass through
    Closed,
    /// Requests fail fast
    Open,
    /// Waiting for a trial request to succeed
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
            Self::HalfOpen => write!(f, "half-open"),
        }
    }
}

/// Error returned when the circuit is open
#[derive(Debug, Clone, Error)]
#[error("Circuit breaker open for service '{service_name}': service is temporarily unavailable")]
pub struct CircuitOpenError {
    /// Name of the service
    pub service_name: String,
}

/// Error type for circuit breaker operations
#[derive(Debug, Error)]
pub enum CircuitBreakerError<E> {
    /// The circuit is open, the call was not made
    #[error(transparent)]
    CircuitOpen(CircuitOpenError),
    /// The underlying service returned an error
    #[error("{0}")]
    ServiceError(E),
}

impl<E> CircuitBreakerError<E> {
    /// Returns true if the call was rejected without reaching the service
    #[must_use]
    pub const fn is_circuit_open(&self) -> bool {
        matches!(self, Self::CircuitOpen(_))
    }

    /// The service error, if the call was made
    pub fn into_service_error(self) -> Option<E> {
        match self {
            Self::CircuitOpen(_) => None,
            Self::ServiceError(e) => Some(e),
        }
    }
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    failure_count: u32,
    success_count: u32,
    opened_at: Option<Instant>,
}

impl BreakerState {
    const fn closed() -> Self {
        Self {
            state: CircuitState::Closed,
            failure_count: 0,
            success_count: 0,
            opened_at: None,
        }
    }

    fn open(&mut self) {
        self.state = CircuitState::Open;
        self.opened_at = Some(Instant::now());
        self.failure_count = 0;
        self.success_count = 0;
    }
}

/// Circuit breaker guarding one remote service
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    state: RwLock<BreakerState>,
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl CircuitBreaker {
    /// Creates a circuit breaker with default configuration
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, CircuitBreakerConfig::default())
    }

    /// Creates a circuit breaker with custom configuration
    #[must_use]
    pub fn with_config(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            state: RwLock::new(BreakerState::closed()),
        }
    }

    /// Name of the guarded service
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state; an open circuit turns half-open once its timeout passed
    #[must_use]
    pub fn state(&self) -> CircuitState {
        let mut state = self.state.write();
        if state.state == CircuitState::Open {
            let timeout = Duration::from_secs(self.config.half_open_timeout_secs);
            if state.opened_at.is_some_and(|at| at.elapsed() >= timeout) {
                debug!(service = %self.name, "Circuit transitioning from Open to HalfOpen");
                state.state = CircuitState::HalfOpen;
                state.success_count = 0;
            }
        }
        state.state
    }

    /// Returns true if requests are currently rejected
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state() == CircuitState::Open
    }

    /// Fail fast if the circuit is open
    pub fn check(&self) -> Result<(), CircuitOpenError> {
        if self.is_open() {
            warn!(service = %self.name, "Circuit breaker preventing call to service");
            return Err(CircuitOpenError {
                service_name: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Record a successful call
    pub fn on_success(&self) {
        let mut state = self.state.write();
        state.failure_count = 0;
        if state.state == CircuitState::HalfOpen {
            state.success_count += 1;
            if state.success_count >= self.config.success_threshold {
                info!(service = %self.name, "Circuit transitioning from HalfOpen to Closed");
                *state = BreakerState::closed();
            }
        }
    }

    /// Record a failed call
    pub fn on_failure(&self) {
        let mut state = self.state.write();
        state.failure_count += 1;
        state.success_count = 0;
        match state.state {
            CircuitState::Closed if state.failure_count >= self.config.failure_threshold => {
                warn!(
                    service = %self.name,
                    failures = state.failure_count,
                    "Circuit transitioning from Closed to Open"
                );
                state.open();
            },
            CircuitState::HalfOpen => {
                warn!(service = %self.name, "Circuit transitioning from HalfOpen to Open after failure");
                state.open();
            },
            CircuitState::Closed | CircuitState::Open => {},
        }
    }

    /// Call `f` through the breaker, counting every error as a failure
    pub async fn call<F, Fut, T, E>(&self, f: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        self.call_when(|_| true, f).await
    }

    /// Call `f` through the breaker
    ///
    /// Only errors for which `trips` returns true count towards opening the
    /// circuit; the rest are answers from a healthy service and reset the
    /// failure count like a success.
    pub async fn call_when<P, F, Fut, T, E>(
        &self,
        trips: P,
        f: F,
    ) -> Result<T, CircuitBreakerError<E>>
    where
        P: FnOnce(&E) -> bool,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        self.check().map_err(CircuitBreakerError::CircuitOpen)?;

        match f().await {
            Ok(value) => {
                self.on_success();
                Ok(value)
            },
            Err(e) => {
                if trips(&e) {
                    warn!(service = %self.name, error = %e, "Service call failed");
                    self.on_failure();
                } else {
                    debug!(service = %self.name, error = %e, "Service answered with an error");
                    self.on_success();
                }
                Err(CircuitBreakerError::ServiceError(e))
            },
        }
    }
}
