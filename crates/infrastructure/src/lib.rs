//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of the OpenStreetMap clients and
//! a watch-channel location feed, and provides configuration loading,
//! retry/circuit-breaker resilience and tracing setup.

pub mod adapters;
pub mod config;
pub mod retry;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, GeoLocationConfig, LocationAppConfig, WorkflowAppConfig};
pub use retry::{RetryConfig, RetryResult, Retryable, retry, with_retry};
pub use telemetry::{LogFormat, LoggingConfig, TelemetryError, init_tracing};
