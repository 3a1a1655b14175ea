//! Bounding region of a set of coordinates
//!
//! Regions never wrap across the antimeridian: a route from 179°E to 179°W
//! yields a region spanning the whole longitude range between them.

use serde::{Deserialize, Serialize};

use super::GeoLocation;
use crate::errors::DomainError;

/// Axis-aligned latitude/longitude box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingRegion {
    /// Southern edge
    pub min_latitude: f64,
    /// Northern edge
    pub max_latitude: f64,
    /// Western edge
    pub min_longitude: f64,
    /// Eastern edge
    pub max_longitude: f64,
}

impl BoundingRegion {
    /// Smallest region containing every point
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyGeometry` if `points` yields nothing.
    pub fn from_points<'a, I>(points: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = &'a GeoLocation>,
    {
        let mut iter = points.into_iter();
        let first = iter.next().ok_or(DomainError::EmptyGeometry)?;

        let init = Self {
            min_latitude: first.latitude(),
            max_latitude: first.latitude(),
            min_longitude: first.longitude(),
            max_longitude: first.longitude(),
        };

        Ok(iter.fold(init, |region, p| Self {
            min_latitude: region.min_latitude.min(p.latitude()),
            max_latitude: region.max_latitude.max(p.latitude()),
            min_longitude: region.min_longitude.min(p.longitude()),
            max_longitude: region.max_longitude.max(p.longitude()),
        }))
    }

    /// Midpoint of the region
    #[must_use]
    pub fn center(&self) -> GeoLocation {
        // Midpoints of in-range values are in range
        GeoLocation::new_unchecked(
            f64::midpoint(self.min_latitude, self.max_latitude),
            f64::midpoint(self.min_longitude, self.max_longitude),
        )
    }

    /// North-south extent in degrees
    #[must_use]
    pub fn latitude_delta(&self) -> f64 {
        self.max_latitude - self.min_latitude
    }

    /// East-west extent in degrees
    #[must_use]
    pub fn longitude_delta(&self) -> f64 {
        self.max_longitude - self.min_longitude
    }

    /// Whether `location` lies inside the region (edges included)
    #[must_use]
    pub fn contains(&self, location: &GeoLocation) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&location.latitude())
            && (self.min_longitude..=self.max_longitude).contains(&location.longitude())
    }
}
