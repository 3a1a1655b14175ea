//! Mapping service port
//!
//! Defines the interface to the external mapping service: place search
//! scoped to a viewport, route calculation and optional place imagery.
//! Adapters in the infrastructure layer implement this port.

use async_trait::async_trait;
use domain::{GeoLocation, Place, RouteGeometry, Viewport};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// A search hit as returned by the mapping service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    /// Name of the place, if the service knows one
    pub name: Option<String>,
    /// Position of the place
    pub coordinate: GeoLocation,
    /// Formatted address, if available
    pub address: Option<String>,
}

impl PlaceCandidate {
    /// Create a named candidate
    pub fn named(name: impl Into<String>, coordinate: GeoLocation) -> Self {
        Self {
            name: Some(name.into()),
            coordinate,
            address: None,
        }
    }

    /// Turn the candidate into a place annotated with its distance from
    /// `reference`
    #[must_use]
    pub fn into_place(self, reference: &GeoLocation) -> Place {
        let place = Place::new(self.name.unwrap_or_default(), self.coordinate)
            .with_distance_from(reference);
        match self.address {
            Some(address) => place.with_address(address),
            None => place,
        }
    }
}

/// A computed route as returned by the mapping service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    /// Path of the route
    pub geometry: RouteGeometry,
    /// Length in meters
    pub distance_meters: f64,
    /// Expected travel time in seconds
    pub expected_travel_time_secs: f64,
}

/// Opaque reference to immersive imagery of a place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHandle {
    /// Where the imagery can be loaded from
    pub url: String,
    /// Credit line required by the imagery provider
    pub attribution: Option<String>,
}

/// Port for mapping service operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MappingServicePort: Send + Sync {
    /// Search for places matching `query` near the given viewport
    ///
    /// Results keep the service's ranking order.
    async fn search(
        &self,
        query: &str,
        viewport: &Viewport,
    ) -> Result<Vec<PlaceCandidate>, ApplicationError>;

    /// Calculate a route between two coordinates
    async fn route(
        &self,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<RouteResponse, ApplicationError>;

    /// Look up imagery for a place
    ///
    /// `Ok(None)` means the service has no imagery for this place.
    async fn imagery(&self, place: &Place) -> Result<Option<ImageHandle>, ApplicationError>;
}
