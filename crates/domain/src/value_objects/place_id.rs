//! Place identifier value object
//!
//! # Examples
//!
//! ```
//! use domain::PlaceId;
//!
//! let place_id = PlaceId::new();
//! let parsed = PlaceId::parse(&place_id.to_string()).unwrap();
//! assert_eq!(place_id, parsed);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity of a place
///
/// Every place built from a search result gets a fresh id, so two searches
/// returning the same point of interest yield distinct places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaceId(Uuid);

impl PlaceId {
    /// Create a new random place ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a place ID from an existing UUID
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a place ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Get the underlying UUID
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PlaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for PlaceId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_place_id_is_unique() {
        assert_ne!(PlaceId::new(), PlaceId::new());
    }

    #[test]
    fn place_id_can_be_parsed() {
        let original = PlaceId::new();
        let parsed = PlaceId::parse(&original.to_string()).expect("parse");
        assert_eq!(original, parsed);
    }

    #[test]
    fn parse_invalid_returns_error() {
        assert!(PlaceId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn from_uuid() {
        let uuid = Uuid::new_v4();
        let id: PlaceId = uuid.into();
        assert_eq!(id.as_uuid(), uuid);
        assert_eq!(PlaceId::from_uuid(uuid), id);
    }
}
