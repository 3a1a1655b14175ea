//! Coordinate span value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Smallest delta a span may have, in degrees
pub const MIN_SPAN_DELTA: f64 = 1e-6;

/// Latitude and longitude extent of a map region, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinateSpan")]
pub struct CoordinateSpan {
    latitude_delta: f64,
    longitude_delta: f64,
}

#[derive(Deserialize)]
struct RawCoordinateSpan {
    latitude_delta: f64,
    longitude_delta: f64,
}

impl TryFrom<RawCoordinateSpan> for CoordinateSpan {
    type Error = DomainError;

    fn try_from(raw: RawCoordinateSpan) -> Result<Self, Self::Error> {
        Self::new(raw.latitude_delta, raw.longitude_delta)
    }
}

impl CoordinateSpan {
    /// Create a span with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSpan` unless the latitude delta is in
    /// (0, 180] and the longitude delta in (0, 360].
    pub fn new(latitude_delta: f64, longitude_delta: f64) -> Result<Self, DomainError> {
        let lat_ok = latitude_delta > 0.0 && latitude_delta <= 180.0;
        let lon_ok = longitude_delta > 0.0 && longitude_delta <= 360.0;
        if !lat_ok || !lon_ok {
            return Err(DomainError::InvalidSpan {
                latitude_delta,
                longitude_delta,
            });
        }
        Ok(Self {
            latitude_delta,
            longitude_delta,
        })
    }

    /// Create a span, clamping both deltas into their valid ranges
    ///
    /// NaN deltas collapse to [`MIN_SPAN_DELTA`].
    #[must_use]
    pub fn clamped(latitude_delta: f64, longitude_delta: f64) -> Self {
        let clamp = |value: f64, max: f64| {
            if value.is_nan() {
                MIN_SPAN_DELTA
            } else {
                value.clamp(MIN_SPAN_DELTA, max)
            }
        };
        Self {
            latitude_delta: clamp(latitude_delta, 180.0),
            longitude_delta: clamp(longitude_delta, 360.0),
        }
    }

    /// Square span with the same delta on both axes
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSpan` if `delta` is out of range.
    pub fn square(delta: f64) -> Result<Self, DomainError> {
        Self::new(delta, delta)
    }

    /// Latitude extent in degrees
    #[must_use]
    pub const fn latitude_delta(&self) -> f64 {
        self.latitude_delta
    }

    /// Longitude extent in degrees
    #[must_use]
    pub const fn longitude_delta(&self) -> f64 {
        self.longitude_delta
    }
}

impl Default for CoordinateSpan {
    /// City-level zoom (0.05° on both axes)
    fn default() -> Self {
        Self {
            latitude_delta: 0.05,
            longitude_delta: 0.05,
        }
    }
}

impl fmt::Display for CoordinateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}° × {:.4}°", self.latitude_delta, self.longitude_delta)
    }
}
