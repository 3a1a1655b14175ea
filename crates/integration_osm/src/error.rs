//! OSM service error types

use reqwest::{StatusCode, header::HeaderMap};
use thiserror::Error;

/// Errors that can occur when calling Nominatim or OSRM
#[derive(Debug, Error)]
pub enum OsmError {
    /// Connection to the service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The service rejected the request
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse the service response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by the service)
        retry_after_secs: Option<u64>,
    },

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// No route between the requested points
    #[error("No route found: {0}")]
    NoRoute(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl OsmError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::ServiceUnavailable(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
        )
    }

    /// Map a transport failure
    pub(crate) fn from_send(error: &reqwest::Error, timeout_secs: u64) -> Self {
        if error.is_timeout() {
            Self::Timeout { timeout_secs }
        } else {
            Self::ConnectionFailed(error.to_string())
        }
    }

    /// Map a non-success HTTP status
    ///
    /// 429 becomes a rate limit, 5xx an outage, anything else a rejected
    /// request.
    pub(crate) fn from_status(status: StatusCode, headers: &HeaderMap) -> Self {
        if status == StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimitExceeded {
                retry_after_secs: headers
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            }
        } else if status.is_server_error() {
            Self::ServiceUnavailable(format!("HTTP {status}"))
        } else {
            Self::RequestFailed(format!("HTTP {status}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderValue, RETRY_AFTER};

    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(OsmError::ConnectionFailed("refused".to_string()).is_retryable());
        assert!(OsmError::ServiceUnavailable("HTTP 503".to_string()).is_retryable());
        assert!(OsmError::Timeout { timeout_secs: 10 }.is_retryable());
        assert!(
            OsmError::RateLimitExceeded {
                retry_after_secs: None
            }
            .is_retryable()
        );
    }

    #[test]
    fn non_retryable_errors() {
        assert!(!OsmError::RequestFailed("HTTP 400".to_string()).is_retryable());
        assert!(!OsmError::ParseError("bad json".to_string()).is_retryable());
        assert!(!OsmError::NoRoute("impossible".to_string()).is_retryable());
    }

    #[test]
    fn status_mapping() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));

        assert!(matches!(
            OsmError::from_status(StatusCode::TOO_MANY_REQUESTS, &headers),
            OsmError::RateLimitExceeded {
                retry_after_secs: Some(30)
            }
        ));
        assert!(matches!(
            OsmError::from_status(StatusCode::BAD_GATEWAY, &HeaderMap::new()),
            OsmError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            OsmError::from_status(StatusCode::FORBIDDEN, &HeaderMap::new()),
            OsmError::RequestFailed(_)
        ));
    }

    #[test]
    fn error_display() {
        let err = OsmError::Timeout { timeout_secs: 7 };
        assert!(err.to_string().contains('7'));

        let err = OsmError::NoRoute("Impossible route between points".to_string());
        assert!(err.to_string().contains("Impossible route"));
    }
}
