//! Domain layer for Wayfinder
//!
//! Contains the map vocabulary: coordinates, viewports, places and routes.
//! This layer performs no I/O and defines the ubiquitous language shared by
//! the workflow and the adapters.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
