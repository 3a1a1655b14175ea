//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod circuit_breaker;
mod osm_mapping_adapter;
mod watch_location_provider;

pub use circuit_breaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, CircuitOpenError, CircuitState,
};
pub use osm_mapping_adapter::OsmMappingAdapter;
pub use watch_location_provider::{
    LocationPublisher, WatchLocationProvider, forward_location_updates,
};
