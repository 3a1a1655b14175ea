//! OSM service configuration

use serde::{Deserialize, Serialize};
use url::Url;

const DEFAULT_USER_AGENT: &str = "Wayfinder/0.1 (https://github.com/twohreichel/wayfinder)";

/// Configuration for the Nominatim place search service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_nominatim_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_nominatim_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of places per search (Nominatim caps this at 40)
    #[serde(default = "default_max_results")]
    pub max_results: u8,

    /// Cache TTL in minutes (0 to disable caching)
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u64,

    /// Minimum spacing between requests in milliseconds (Nominatim usage
    /// policy asks for at most one per second; 0 disables)
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Preferred result language, as an Accept-Language value
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_nominatim_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_nominatim_timeout_secs() -> u64 {
    5
}

const fn default_max_results() -> u8 {
    10
}

const fn default_cache_ttl_minutes() -> u64 {
    10
}

const fn default_min_request_interval_ms() -> u64 {
    1100
}

fn default_accept_language() -> String {
    "en".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_nominatim_base_url(),
            timeout_secs: default_nominatim_timeout_secs(),
            max_results: default_max_results(),
            cache_ttl_minutes: default_cache_ttl_minutes(),
            min_request_interval_ms: default_min_request_interval_ms(),
            accept_language: default_accept_language(),
            user_agent: default_user_agent(),
        }
    }
}

impl NominatimConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 2,
            max_results: 5,
            cache_ttl_minutes: 0,
            min_request_interval_ms: 0,
            ..Default::default()
        }
    }

    /// Check if caching is enabled
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.cache_ttl_minutes > 0
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        validate_base_url(&self.base_url)?;

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.max_results == 0 || self.max_results > 40 {
            return Err("max_results must be between 1 and 40".to_string());
        }

        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }

        Ok(())
    }
}

/// Configuration for the OSRM routing service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsrmConfig {
    /// Base URL for the OSRM API
    #[serde(default = "default_osrm_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_osrm_timeout_secs")]
    pub timeout_secs: u64,

    /// Routing profile segment of the URL
    #[serde(default = "default_profile")]
    pub profile: String,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_osrm_base_url() -> String {
    "https://router.project-osrm.org".to_string()
}

const fn default_osrm_timeout_secs() -> u64 {
    10
}

fn default_profile() -> String {
    "driving".to_string()
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: default_osrm_base_url(),
            timeout_secs: default_osrm_timeout_secs(),
            profile: default_profile(),
            user_agent: default_user_agent(),
        }
    }
}

impl OsrmConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 2,
            ..Default::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        validate_base_url(&self.base_url)?;

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.profile.is_empty() || self.profile.contains('/') {
            return Err("profile must be a single path segment".to_string());
        }

        Ok(())
    }
}

fn validate_base_url(base_url: &str) -> Result<(), String> {
    if base_url.is_empty() {
        return Err("base_url must not be empty".to_string());
    }
    let url = Url::parse(base_url).map_err(|e| format!("base_url is invalid: {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("base_url must use http or https, got {}", url.scheme()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominatim_defaults() {
        let config = NominatimConfig::default();
        assert_eq!(config.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.max_results, 10);
        assert!(config.caching_enabled());
        assert_eq!(config.min_request_interval_ms, 1100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nominatim_testing_config() {
        let config = NominatimConfig::for_testing();
        assert!(!config.caching_enabled());
        assert_eq!(config.min_request_interval_ms, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nominatim_rejects_bad_values() {
        let bad_url = NominatimConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(bad_url.validate().is_err());

        let ftp = NominatimConfig {
            base_url: "ftp://nominatim.example".to_string(),
            ..Default::default()
        };
        assert!(ftp.validate().is_err());

        let too_many = NominatimConfig {
            max_results: 41,
            ..Default::default()
        };
        assert!(too_many.validate().is_err());

        let zero_timeout = NominatimConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(zero_timeout.validate().is_err());
    }

    #[test]
    fn osrm_defaults() {
        let config = OsrmConfig::default();
        assert_eq!(config.base_url, "https://router.project-osrm.org");
        assert_eq!(config.profile, "driving");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn osrm_rejects_nested_profile() {
        let config = OsrmConfig {
            profile: "driving/fast".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: NominatimConfig =
            serde_json::from_str(r#"{"base_url": "http://localhost:8080"}"#).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_results, 10);
        assert_eq!(config.accept_language, "en");
    }
}
