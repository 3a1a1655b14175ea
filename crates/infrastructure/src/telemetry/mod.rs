//! Logging initialisation
//!
//! Installs the global `tracing` subscriber: an `EnvFilter` plus a text or
//! JSON fmt layer writing to stderr.

mod subscriber;

pub use subscriber::{LogFormat, LoggingConfig, TelemetryError, init_tracing};
