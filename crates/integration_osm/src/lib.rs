//! OpenStreetMap integration for Wayfinder
//!
//! Provides place search via [Nominatim](https://nominatim.openstreetmap.org)
//! and driving routes via [OSRM](https://project-osrm.org). Both services are
//! only called; nothing is geocoded or routed locally.
//!
//! # Architecture
//!
//! Each service sits behind a client trait: [`PlaceSearchClient`] is
//! implemented by [`NominatimSearchClient`], [`RoutingClient`] by
//! [`OsrmRoutingClient`]. Both map HTTP failures onto [`OsmError`].
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_osm::{NominatimConfig, NominatimSearchClient, PlaceSearchClient};
//!
//! let client = NominatimSearchClient::new(&NominatimConfig::default())?;
//! let hits = client.search("coffee", &viewport.bounds()).await?;
//! ```

mod config;
mod error;
mod models;
mod routing;
mod search;

pub use config::{NominatimConfig, OsrmConfig};
pub use error::OsmError;
pub use models::{DrivingRoute, SearchHit};
pub use routing::{OsrmRoutingClient, RoutingClient};
pub use search::{NominatimSearchClient, PlaceSearchClient};
