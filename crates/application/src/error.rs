//! Application-level errors

use std::fmt;

use domain::DomainError;
use thiserror::Error;

/// Why the user's location could not be determined
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationFailure {
    /// The user refused location access
    PermissionDenied,
    /// No fix arrived within the bounded wait
    Timeout {
        /// The wait that elapsed, in milliseconds
        timeout_ms: u64,
    },
    /// The provider reported an error of its own
    Provider(String),
}

impl fmt::Display for LocationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "location permission denied"),
            Self::Timeout { timeout_ms } => {
                write!(f, "no location fix within {timeout_ms}ms")
            },
            Self::Provider(msg) => write!(f, "location provider error: {msg}"),
        }
    }
}

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The mapping service could not be reached or failed
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The user's location could not be determined
    #[error("Location unavailable: {0}")]
    LocationUnavailable(LocationFailure),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ServiceUnavailable(_))
    }

    /// Location permission denied
    #[must_use]
    pub const fn permission_denied() -> Self {
        Self::LocationUnavailable(LocationFailure::PermissionDenied)
    }

    /// Location request timed out
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn location_timeout(timeout: std::time::Duration) -> Self {
        Self::LocationUnavailable(LocationFailure::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        })
    }
}
