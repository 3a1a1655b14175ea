//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod location_port;
mod mapping_service_port;

#[cfg(test)]
pub use location_port::MockLocationPort;
pub use location_port::{LocationPort, PermissionState};
#[cfg(test)]
pub use mapping_service_port::MockMappingServicePort;
pub use mapping_service_port::{ImageHandle, MappingServicePort, PlaceCandidate, RouteResponse};
