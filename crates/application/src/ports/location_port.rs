//! Location provider port
//!
//! Replaces delegate callbacks with an explicit request/response interface:
//! the workflow asks for the last known coordinate, the permission state, or
//! a single fresh fix with a bounded wait.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use domain::GeoLocation;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Whether the user allowed location access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    /// The user has not been asked yet
    #[default]
    NotDetermined,
    /// Location access allowed
    Granted,
    /// Location access refused
    Denied,
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotDetermined => write!(f, "not determined"),
            Self::Granted => write!(f, "granted"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// Port for the device location provider
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LocationPort: Send + Sync {
    /// Last known coordinate, if any
    fn current_coordinate(&self) -> Option<GeoLocation>;

    /// Current permission state
    fn permission_state(&self) -> PermissionState;

    /// Wait for one fresh fix
    ///
    /// Implementations must give up after `timeout` with
    /// `ApplicationError::LocationUnavailable`.
    async fn request_one_shot_location(
        &self,
        timeout: Duration,
    ) -> Result<GeoLocation, ApplicationError>;
}
