//! Domain entities - Objects with identity and lifecycle

mod place;
mod route;

pub use place::{CURRENT_LOCATION_NAME, Place, UNKNOWN_PLACE_NAME};
pub use route::{Route, RouteGeometry};
