//! Application configuration
//!
//! Split into focused sub-modules:
//! - `workflow`: default viewport, location timeout, route fitting
//! - `location`: fixed coordinate and permission for the location provider
//!
//! The search and routing sections reuse the Nominatim and OSRM client
//! configs directly; retry and circuit breaker settings reuse the
//! resilience types, and `logging` the telemetry config.

mod location;
mod workflow;

use std::path::Path;

use application::error::ApplicationError;
use integration_osm::{NominatimConfig, OsrmConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use location::LocationAppConfig;
pub use workflow::{GeoLocationConfig, WorkflowAppConfig};

use crate::adapters::CircuitBreakerConfig;
use crate::retry::RetryConfig;
use crate::telemetry::LoggingConfig;

/// Base name of the optional config file (`wayfinder.toml`, `.yaml`, ...)
pub const DEFAULT_CONFIG_FILE: &str = "wayfinder";

/// Prefix of environment overrides (`WAYFINDER_SEARCH__BASE_URL`)
pub const ENV_PREFIX: &str = "WAYFINDER";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Map workflow settings
    #[serde(default)]
    pub workflow: WorkflowAppConfig,

    /// Nominatim place search
    #[serde(default)]
    pub search: NominatimConfig,

    /// OSRM routing
    #[serde(default)]
    pub routing: OsrmConfig,

    /// Location provider
    #[serde(default)]
    pub location: LocationAppConfig,

    /// Retry policy for mapping service calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Circuit breaker for mapping service calls
    #[serde(default)]
    pub circuit_breaker: CircuitBreakerConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `wayfinder.*` in the working directory (if
    /// present) and `WAYFINDER_*` environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file, or the default file when
    /// `path` is `None`
    ///
    /// An explicit file must exist. Environment variables override file
    /// values; nested keys are joined with `__`.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration file");
                config::File::from(path).required(true)
            },
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = config::Config::builder().add_source(file).add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Check every section, reporting the first problem found
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let sections: [(&str, Result<(), String>); 7] = [
            ("workflow", self.workflow.validate()),
            ("search", self.search.validate()),
            ("routing", self.routing.validate()),
            ("location", self.location.validate()),
            ("retry", self.retry.validate()),
            ("circuit_breaker", self.circuit_breaker.validate()),
            ("logging", self.logging.validate()),
        ];

        for (section, result) in sections {
            result.map_err(|e| ApplicationError::Configuration(format!("{section}: {e}")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use application::ports::PermissionState;

    use super::*;
    use crate::telemetry::LogFormat;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.search.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.routing.profile, "driving");
        assert_eq!(config.location.permission, PermissionState::NotDetermined);
    }

    #[test]
    fn loads_sections_from_file() {
        let file = write_config(
            r#"
            [workflow]
            default_center = { latitude = 52.52, longitude = 13.405 }
            default_span_degrees = 0.1
            location_timeout_secs = 5

            [search]
            base_url = "http://localhost:8080"
            max_results = 20

            [routing]
            base_url = "http://localhost:5000"

            [location]
            fixed = { latitude = 52.5163, longitude = 13.3777 }

            [retry]
            max_retries = 4

            [logging]
            filter = "debug"
            format = "json"
            "#,
        );

        let config = AppConfig::load_from(Some(file.path())).unwrap();

        assert!((config.workflow.default_center.latitude - 52.52).abs() < f64::EPSILON);
        assert_eq!(config.workflow.location_timeout_secs, 5);
        assert_eq!(config.search.base_url, "http://localhost:8080");
        assert_eq!(config.search.max_results, 20);
        assert_eq!(config.search.accept_language, "en");
        assert_eq!(config.routing.base_url, "http://localhost:5000");
        assert!(config.location.fixed.is_some());
        assert_eq!(config.retry.max_retries, 4);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let file = write_config("");
        let config = AppConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(config.workflow.location_timeout_secs, 10);
        assert_eq!(config.circuit_breaker.failure_threshold, 5);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = AppConfig::load_from(Some(Path::new("/nonexistent/wayfinder.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn validation_names_the_section() {
        let mut config = AppConfig::default();
        config.routing.base_url = "ftp://router.example".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("routing:"));
    }

    #[test]
    fn validation_rejects_bad_workflow() {
        let mut config = AppConfig::default();
        config.workflow.route_padding = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn round_trips_through_toml() {
        let config = AppConfig::default();
        let text = toml::to_string(&config).unwrap();
        let file = write_config(&text);
        let loaded = AppConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(loaded.search.base_url, config.search.base_url);
        assert_eq!(loaded.workflow, config.workflow);
    }
}
