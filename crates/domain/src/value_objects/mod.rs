//! Value Objects - Immutable, identity-less domain primitives

mod bounding_region;
mod coordinate_span;
mod geo_location;
mod place_id;
mod viewport;

pub use bounding_region::BoundingRegion;
pub use coordinate_span::{CoordinateSpan, MIN_SPAN_DELTA};
pub use geo_location::{EARTH_RADIUS_KM, GeoLocation};
pub use place_id::PlaceId;
pub use viewport::Viewport;
