//! Location provider configuration

use application::ports::PermissionState;
use serde::{Deserialize, Serialize};

use super::GeoLocationConfig;

/// Location provider settings
///
/// ```toml
/// [location]
/// fixed = { latitude = 22.5448, longitude = 88.3426 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationAppConfig {
    /// Coordinate reported as the user's location; implies permission granted
    #[serde(default)]
    pub fixed: Option<GeoLocationConfig>,

    /// Permission state when no fixed coordinate is set
    #[serde(default)]
    pub permission: PermissionState,
}

impl LocationAppConfig {
    /// Permission the provider starts with
    pub fn effective_permission(&self) -> PermissionState {
        if self.fixed.is_some() {
            PermissionState::Granted
        } else {
            self.permission
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let Some(fixed) = &self.fixed else {
            return Ok(());
        };
        fixed
            .to_geo_location()
            .map_err(|e| format!("fixed: {e}"))?;
        if self.permission == PermissionState::Denied {
            return Err("a fixed coordinate cannot be combined with permission = \"denied\"".to_string());
        }
        Ok(())
    }
}
