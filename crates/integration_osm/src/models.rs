//! OSM data models
//!
//! Typed results of Nominatim searches and OSRM routes, plus the raw wire
//! shapes they are parsed from.

use domain::GeoLocation;
use serde::{Deserialize, Serialize};

use crate::error::OsmError;

/// One place returned by a Nominatim search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Short name of the place, if Nominatim has one
    pub name: Option<String>,
    /// Position of the place
    pub coordinate: GeoLocation,
    /// Full formatted address
    pub display_name: Option<String>,
}

/// A driving route returned by OSRM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrivingRoute {
    /// Path of the route, origin first
    pub coordinates: Vec<GeoLocation>,
    /// Length in meters
    pub distance_meters: f64,
    /// Expected travel time in seconds
    pub duration_secs: f64,
}

/// Raw Nominatim `jsonv2` search result
#[derive(Debug, Deserialize)]
pub(crate) struct RawSearchResult {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl TryFrom<RawSearchResult> for SearchHit {
    type Error = OsmError;

    fn try_from(raw: RawSearchResult) -> Result<Self, Self::Error> {
        let latitude: f64 = raw
            .lat
            .parse()
            .map_err(|_| OsmError::ParseError(format!("invalid latitude {:?}", raw.lat)))?;
        let longitude: f64 = raw
            .lon
            .parse()
            .map_err(|_| OsmError::ParseError(format!("invalid longitude {:?}", raw.lon)))?;
        let coordinate = GeoLocation::new(latitude, longitude)
            .map_err(|e| OsmError::ParseError(e.to_string()))?;

        Ok(Self {
            name: raw.name.filter(|name| !name.trim().is_empty()),
            coordinate,
            display_name: raw.display_name.filter(|name| !name.trim().is_empty()),
        })
    }
}

/// Raw OSRM `route` response
#[derive(Debug, Deserialize)]
pub(crate) struct RawRouteResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRoute {
    pub geometry: RawLineString,
    pub distance: f64,
    pub duration: f64,
}

/// GeoJSON line string; positions are `[longitude, latitude]`
#[derive(Debug, Deserialize)]
pub(crate) struct RawLineString {
    pub coordinates: Vec<[f64; 2]>,
}

impl TryFrom<RawRoute> for DrivingRoute {
    type Error = OsmError;

    fn try_from(raw: RawRoute) -> Result<Self, Self::Error> {
        let coordinates = raw
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| GeoLocation::new(lat, lon))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| OsmError::ParseError(e.to_string()))?;

        if coordinates.is_empty() {
            return Err(OsmError::ParseError("route geometry is empty".to_string()));
        }

        Ok(Self {
            coordinates,
            distance_meters: raw.distance,
            duration_secs: raw.duration,
        })
    }
}
