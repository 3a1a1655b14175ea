//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Latitude or longitude out of range (or not a number)
    #[error("Invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Viewport span deltas out of range
    #[error("Invalid span: latitude delta {latitude_delta}, longitude delta {longitude_delta}")]
    InvalidSpan {
        latitude_delta: f64,
        longitude_delta: f64,
    },

    /// A geometry was built from zero points
    #[error("Geometry must contain at least one coordinate")]
    EmptyGeometry,

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create an invalid coordinates error
    #[must_use]
    pub const fn invalid_coordinates(latitude: f64, longitude: f64) -> Self {
        Self::InvalidCoordinates {
            latitude,
            longitude,
        }
    }
}
