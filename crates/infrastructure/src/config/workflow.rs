//! Workflow configuration

use std::time::Duration;

use application::error::ApplicationError;
use application::services::WorkflowConfig;
use domain::{CoordinateSpan, DomainError, GeoLocation, Viewport};
use serde::{Deserialize, Serialize};

/// Geographic location configuration (latitude/longitude pair)
///
/// Configured as inline table: `{ latitude = 22.5726, longitude = 88.3639 }`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocationConfig {
    /// Latitude (-90.0 to 90.0)
    pub latitude: f64,
    /// Longitude (-180.0 to 180.0)
    pub longitude: f64,
}

impl GeoLocationConfig {
    /// Convert to the domain `GeoLocation` value object
    pub fn to_geo_location(&self) -> Result<GeoLocation, DomainError> {
        GeoLocation::new(self.latitude, self.longitude)
    }
}

impl From<GeoLocation> for GeoLocationConfig {
    fn from(location: GeoLocation) -> Self {
        Self {
            latitude: location.latitude(),
            longitude: location.longitude(),
        }
    }
}

/// Map workflow settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowAppConfig {
    /// Map center at startup and fallback route origin (default: Kolkata)
    #[serde(default = "default_center")]
    pub default_center: GeoLocationConfig,

    /// Span of the default viewport in degrees, both axes (default: 0.05)
    #[serde(default = "default_span_degrees")]
    pub default_span_degrees: f64,

    /// Bounded wait for a one-shot location request (default: 10s)
    #[serde(default = "default_location_timeout_secs")]
    pub location_timeout_secs: u64,

    /// Factor applied to a route's bounding box when fitting it (default: 1.2)
    #[serde(default = "default_route_padding")]
    pub route_padding: f64,

    /// Smallest span used when fitting a route, in degrees (default: 0.005)
    #[serde(default = "default_min_route_span_degrees")]
    pub min_route_span_degrees: f64,
}

fn default_center() -> GeoLocationConfig {
    GeoLocation::kolkata().into()
}

const fn default_span_degrees() -> f64 {
    0.05
}

const fn default_location_timeout_secs() -> u64 {
    10
}

const fn default_route_padding() -> f64 {
    1.2
}

const fn default_min_route_span_degrees() -> f64 {
    0.005
}

impl Default for WorkflowAppConfig {
    fn default() -> Self {
        Self {
            default_center: default_center(),
            default_span_degrees: default_span_degrees(),
            location_timeout_secs: default_location_timeout_secs(),
            route_padding: default_route_padding(),
            min_route_span_degrees: default_min_route_span_degrees(),
        }
    }
}

impl WorkflowAppConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.default_center
            .to_geo_location()
            .map_err(|e| format!("default_center: {e}"))?;
        CoordinateSpan::square(self.default_span_degrees)
            .map_err(|e| format!("default_span_degrees: {e}"))?;

        if self.location_timeout_secs == 0 {
            return Err("location_timeout_secs must be greater than 0".to_string());
        }
        if !self.route_padding.is_finite() || self.route_padding < 1.0 {
            return Err("route_padding must be at least 1.0".to_string());
        }
        CoordinateSpan::square(self.min_route_span_degrees)
            .map_err(|e| format!("min_route_span_degrees: {e}"))?;

        Ok(())
    }

    /// Build the workflow's runtime configuration
    pub fn to_workflow_config(&self) -> Result<WorkflowConfig, ApplicationError> {
        let center = self.default_center.to_geo_location()?;
        let span = CoordinateSpan::square(self.default_span_degrees)?;

        Ok(WorkflowConfig {
            default_viewport: Viewport::new(center, span),
            location_timeout: Duration::from_secs(self.location_timeout_secs),
            route_padding: self.route_padding,
            min_route_span: self.min_route_span_degrees,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_workflow_defaults() {
        let config = WorkflowAppConfig::default().to_workflow_config().unwrap();
        let expected = WorkflowConfig::default();

        assert_eq!(config.default_viewport, expected.default_viewport);
        assert_eq!(config.location_timeout, expected.location_timeout);
        assert!((config.route_padding - expected.route_padding).abs() < f64::EPSILON);
        assert!((config.min_route_span - expected.min_route_span).abs() < f64::EPSILON);
    }

    #[test]
    fn custom_center_and_span() {
        let config = WorkflowAppConfig {
            default_center: GeoLocationConfig {
                latitude: 52.52,
                longitude: 13.405,
            },
            default_span_degrees: 0.2,
            ..Default::default()
        };
        let workflow = config.to_workflow_config().unwrap();

        assert!((workflow.default_viewport.center.latitude() - 52.52).abs() < 1e-9);
        assert!((workflow.default_viewport.span.latitude_delta() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn invalid_center_is_rejected() {
        let config = WorkflowAppConfig {
            default_center: GeoLocationConfig {
                latitude: 95.0,
                longitude: 0.0,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(matches!(
            config.to_workflow_config(),
            Err(ApplicationError::Domain(DomainError::InvalidCoordinates { .. }))
        ));
    }

    #[test]
    fn zero_span_and_timeout_are_rejected() {
        let zero_span = WorkflowAppConfig {
            default_span_degrees: 0.0,
            ..Default::default()
        };
        assert!(zero_span.validate().is_err());

        let zero_timeout = WorkflowAppConfig {
            location_timeout_secs: 0,
            ..Default::default()
        };
        assert!(zero_timeout.validate().is_err());
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: WorkflowAppConfig =
            serde_json::from_str(r#"{"location_timeout_secs": 3}"#).unwrap();
        assert_eq!(config.location_timeout_secs, 3);
        assert_eq!(config.default_center, default_center());
    }
}
