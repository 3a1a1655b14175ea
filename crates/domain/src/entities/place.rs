//! Place entity - a named point of interest on the map

use serde::{Deserialize, Serialize};

use crate::value_objects::{GeoLocation, PlaceId};

/// Display name used when the mapping service returns a nameless result
pub const UNKNOWN_PLACE_NAME: &str = "Unknown location";

/// Display name of the user's own position
pub const CURRENT_LOCATION_NAME: &str = "My Location";

/// A named point of interest
///
/// Places are replaced wholesale when a new search completes; nothing in the
/// workspace edits one after it has been handed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Unique identifier
    pub id: PlaceId,
    /// Display name
    pub name: String,
    /// Position of the place
    pub coordinate: GeoLocation,
    /// Formatted postal address, when the service provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Great-circle distance from the reference point of the search (km)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    /// Marks the user's own position
    #[serde(default)]
    pub is_current_location: bool,
}

impl Place {
    /// Create a place with a fresh identity
    ///
    /// A blank name is replaced by [`UNKNOWN_PLACE_NAME`].
    pub fn new(name: impl Into<String>, coordinate: GeoLocation) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            UNKNOWN_PLACE_NAME.to_string()
        } else {
            name
        };
        Self {
            id: PlaceId::new(),
            name,
            coordinate,
            address: None,
            distance_km: None,
            is_current_location: false,
        }
    }

    /// The user's own position
    pub fn current_location(coordinate: GeoLocation) -> Self {
        Self {
            is_current_location: true,
            ..Self::new(CURRENT_LOCATION_NAME, coordinate)
        }
    }

    /// Attach a formatted address
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Annotate with the distance from `reference`
    #[must_use]
    pub fn with_distance_from(mut self, reference: &GeoLocation) -> Self {
        self.distance_km = Some(self.coordinate.distance_km(reference));
        self
    }

    /// Human-readable distance, e.g. `"1.3 km away"`
    #[must_use]
    pub fn distance_label(&self) -> Option<String> {
        self.distance_km.map(|km| format!("{km:.1} km away"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_place_has_unique_id() {
        let a = Place::new("Coffee", GeoLocation::kolkata());
        let b = Place::new("Coffee", GeoLocation::kolkata());
        assert_ne!(a.id, b.id);
        assert!(!a.is_current_location);
        assert!(a.distance_km.is_none());
    }

    #[test]
    fn blank_name_becomes_unknown() {
        let place = Place::new("  ", GeoLocation::kolkata());
        assert_eq!(place.name, UNKNOWN_PLACE_NAME);
    }

    #[test]
    fn current_location_is_flagged() {
        let place = Place::current_location(GeoLocation::kolkata());
        assert!(place.is_current_location);
        assert_eq!(place.name, CURRENT_LOCATION_NAME);
    }

    #[test]
    fn distance_annotation() {
        let reference = GeoLocation::kolkata();
        let place = Place::new("Howrah Bridge", GeoLocation::new(22.5851, 88.3468).expect("valid"))
            .with_distance_from(&reference);

        let km = place.distance_km.expect("distance");
        assert!(km > 1.0 && km < 3.0);
        assert_eq!(place.distance_label(), Some(format!("{km:.1} km away")));
    }

    #[test]
    fn address_is_optional_in_json() {
        let place = Place::new("Park Street", GeoLocation::kolkata());
        let json = serde_json::to_string(&place).expect("serialize");
        assert!(!json.contains("address"));

        let place = place.with_address("Park Street, Kolkata");
        let json = serde_json::to_string(&place).expect("serialize");
        assert!(json.contains("Park Street, Kolkata"));
    }
}
