//! Route entity - a computed path between two points

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{BoundingRegion, GeoLocation};

use super::Place;

/// Polyline of a route, origin first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GeoLocation>", into = "Vec<GeoLocation>")]
pub struct RouteGeometry {
    points: Vec<GeoLocation>,
    bounds: BoundingRegion,
}

impl RouteGeometry {
    /// Create a geometry from its points
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyGeometry` if `points` is empty.
    pub fn new(points: Vec<GeoLocation>) -> Result<Self, DomainError> {
        let bounds = BoundingRegion::from_points(&points)?;
        Ok(Self { points, bounds })
    }

    /// Points of the polyline
    #[must_use]
    pub fn points(&self) -> &[GeoLocation] {
        &self.points
    }

    /// Box containing the whole polyline
    #[must_use]
    pub const fn bounding_region(&self) -> BoundingRegion {
        self.bounds
    }
}

impl TryFrom<Vec<GeoLocation>> for RouteGeometry {
    type Error = DomainError;

    fn try_from(points: Vec<GeoLocation>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<RouteGeometry> for Vec<GeoLocation> {
    fn from(geometry: RouteGeometry) -> Self {
        geometry.points
    }
}

/// A route to a destination place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Where the route starts
    pub origin: GeoLocation,
    /// Place the route leads to
    pub destination: Place,
    /// Path of the route
    pub geometry: RouteGeometry,
    /// Length in meters
    pub distance_meters: f64,
    /// Expected travel time in seconds
    pub expected_travel_time_secs: f64,
}

impl Route {
    /// Box containing the whole route
    #[must_use]
    pub fn bounding_region(&self) -> BoundingRegion {
        self.geometry.bounding_region()
    }

    /// Length in kilometers
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    /// Compact summary, e.g. `"12.4 km · 27 min"`
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn summary(&self) -> String {
        let minutes = (self.expected_travel_time_secs / 60.0).round().max(0.0) as u64;
        if minutes >= 60 {
            format!(
                "{:.1} km · {}h {:02}min",
                self.distance_km(),
                minutes / 60,
                minutes % 60
            )
        } else {
            format!("{:.1} km · {minutes} min", self.distance_km())
        }
    }
}
