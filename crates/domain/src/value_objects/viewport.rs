//! Viewport value object - the visible map region

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{BoundingRegion, CoordinateSpan, GeoLocation};

/// Visible map region: center coordinate plus span
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Center of the visible region
    pub center: GeoLocation,
    /// Extent of the visible region
    pub span: CoordinateSpan,
}

impl Viewport {
    /// Create a viewport
    #[must_use]
    pub const fn new(center: GeoLocation, span: CoordinateSpan) -> Self {
        Self { center, span }
    }

    /// Same span, different center
    #[must_use]
    pub const fn recentered(&self, center: GeoLocation) -> Self {
        Self {
            center,
            span: self.span,
        }
    }

    /// Viewport that shows the whole `region`
    ///
    /// Deltas are scaled by `padding` and never drop below `min_delta`.
    #[must_use]
    pub fn fitting(region: &BoundingRegion, padding: f64, min_delta: f64) -> Self {
        let span = CoordinateSpan::clamped(
            (region.latitude_delta() * padding).max(min_delta),
            (region.longitude_delta() * padding).max(min_delta),
        );
        Self {
            center: region.center(),
            span,
        }
    }

    /// Region covered by this viewport, clamped to valid coordinates
    #[must_use]
    pub fn bounds(&self) -> BoundingRegion {
        let half_lat = self.span.latitude_delta() / 2.0;
        let half_lon = self.span.longitude_delta() / 2.0;
        BoundingRegion {
            min_latitude: (self.center.latitude() - half_lat).max(-90.0),
            max_latitude: (self.center.latitude() + half_lat).min(90.0),
            min_longitude: (self.center.longitude() - half_lon).max(-180.0),
            max_longitude: (self.center.longitude() + half_lon).min(180.0),
        }
    }

    /// Whether `location` is visible
    #[must_use]
    pub fn contains(&self, location: &GeoLocation) -> bool {
        self.bounds().contains(location)
    }
}

impl Default for Viewport {
    /// Kolkata at city-level zoom
    fn default() -> Self {
        Self::new(GeoLocation::kolkata(), CoordinateSpan::default())
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ± {}", self.center, self.span)
    }
}
