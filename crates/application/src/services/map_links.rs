//! Map link helpers
//!
//! Pure functions building "open in maps" and driving-directions links for
//! places, pointing at openstreetmap.org.

use std::fmt::Write;

use domain::{GeoLocation, Place};

const OSM_BASE: &str = "https://www.openstreetmap.org";

/// Zoom level used for single-place links
const PLACE_ZOOM: u8 = 17;

/// Link showing a free-form search on the map
#[must_use]
pub fn search_link(query: &str) -> String {
    format!("{OSM_BASE}/search?query={}", url_encode(query))
}

/// Link with a marker at `coordinate`
#[must_use]
pub fn coordinate_link(coordinate: &GeoLocation) -> String {
    let (lat, lon) = (coordinate.latitude(), coordinate.longitude());
    format!("{OSM_BASE}/?mlat={lat:.6}&mlon={lon:.6}#map={PLACE_ZOOM}/{lat:.6}/{lon:.6}")
}

/// "Open in maps" link for a place
#[must_use]
pub fn place_link(place: &Place) -> String {
    coordinate_link(&place.coordinate)
}

/// Driving directions from `origin` to `destination`
#[must_use]
pub fn directions_link(origin: &GeoLocation, destination: &GeoLocation) -> String {
    format!(
        "{OSM_BASE}/directions?engine=fossgis_osrm_car&route={:.6}%2C{:.6}%3B{:.6}%2C{:.6}",
        origin.latitude(),
        origin.longitude(),
        destination.latitude(),
        destination.longitude()
    )
}

/// Two-line description of a place with its map link
#[must_use]
pub fn format_place_with_link(place: &Place) -> String {
    let mut line = place.name.clone();
    if let Some(address) = &place.address {
        let _ = write!(line, ", {address}");
    }
    if let Some(label) = place.distance_label() {
        let _ = write!(line, " ({label})");
    }
    format!("📍 {line}\n🗺️ {}", place_link(place))
}

/// Percent-encode a query parameter value, spaces as `+`
fn url_encode(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(char::from(byte));
            },
            b' ' => encoded.push('+'),
            _ => {
                let _ = write!(encoded, "%{byte:02X}");
            },
        }
    }
    encoded
}
