//! Location provider backed by a watch channel
//!
//! Whatever produces fixes (a GPS daemon, a fixed coordinate from config, a
//! test) pushes them through a [`LocationPublisher`]. The provider side
//! implements [`LocationPort`] for the workflow, and
//! [`forward_location_updates`] turns pushed fixes into
//! `MapWorkflow::apply_location_update` calls.

use std::sync::Arc;
use std::time::Duration;

use application::error::{ApplicationError, LocationFailure};
use application::ports::{LocationPort, PermissionState};
use application::services::MapWorkflow;
use async_trait::async_trait;
use domain::GeoLocation;
use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::config::LocationAppConfig;

/// Sending half: publishes location fixes
#[derive(Debug, Clone)]
pub struct LocationPublisher {
    tx: watch::Sender<Option<GeoLocation>>,
}

impl LocationPublisher {
    /// Publish a new fix
    pub fn publish(&self, coordinate: GeoLocation) {
        self.tx.send_replace(Some(coordinate));
    }

    /// Number of live receivers
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Receiving half: answers [`LocationPort`] queries from the latest fix
#[derive(Debug)]
pub struct WatchLocationProvider {
    rx: watch::Receiver<Option<GeoLocation>>,
    permission: RwLock<PermissionState>,
}

impl WatchLocationProvider {
    /// Create a connected publisher/provider pair with no fix yet
    pub fn channel(permission: PermissionState) -> (LocationPublisher, Self) {
        let (tx, rx) = watch::channel(None);
        (
            LocationPublisher { tx },
            Self {
                rx,
                permission: RwLock::new(permission),
            },
        )
    }

    /// Provider that always reports `coordinate` with permission granted
    pub fn fixed(coordinate: GeoLocation) -> (LocationPublisher, Self) {
        let (publisher, provider) = Self::channel(PermissionState::Granted);
        publisher.publish(coordinate);
        (publisher, provider)
    }

    /// Provider configured from the `[location]` section
    pub fn from_config(
        config: &LocationAppConfig,
    ) -> Result<(LocationPublisher, Self), ApplicationError> {
        let (publisher, provider) = Self::channel(config.effective_permission());
        if let Some(fixed) = &config.fixed {
            publisher.publish(fixed.to_geo_location()?);
        }
        Ok((publisher, provider))
    }

    /// Record a permission change
    pub fn set_permission(&self, permission: PermissionState) {
        *self.permission.write() = permission;
    }

    /// Receiver that observes every published fix
    pub fn updates(&self) -> watch::Receiver<Option<GeoLocation>> {
        let mut rx = self.rx.clone();
        rx.mark_unchanged();
        rx
    }
}

#[async_trait]
impl LocationPort for WatchLocationProvider {
    fn current_coordinate(&self) -> Option<GeoLocation> {
        *self.rx.borrow()
    }

    fn permission_state(&self) -> PermissionState {
        *self.permission.read()
    }

    #[instrument(skip(self))]
    async fn request_one_shot_location(
        &self,
        timeout: Duration,
    ) -> Result<GeoLocation, ApplicationError> {
        if self.permission_state() == PermissionState::Denied {
            return Err(ApplicationError::permission_denied());
        }

        let mut rx = self.rx.clone();
        let waited = tokio::time::timeout(timeout, rx.wait_for(Option::is_some)).await;
        let coordinate = match waited {
            Ok(Ok(fix)) => *fix,
            Ok(Err(_)) => None,
            Err(_) => {
                warn!(?timeout, "No location fix arrived in time");
                return Err(ApplicationError::location_timeout(timeout));
            },
        };

        coordinate.ok_or_else(|| {
            ApplicationError::LocationUnavailable(LocationFailure::Provider(
                "location publisher went away".to_string(),
            ))
        })
    }
}

/// Apply every fix published on `updates` to `workflow`
///
/// The task ends when the publisher is dropped.
pub fn forward_location_updates(
    mut updates: watch::Receiver<Option<GeoLocation>>,
    workflow: Arc<MapWorkflow>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let fix = *updates.borrow_and_update();
            if let Some(coordinate) = fix {
                let recentered = workflow.apply_location_update(coordinate);
                debug!(%coordinate, recentered, "Applied location update");
            }
        }
        debug!("Location publisher closed");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(lat: f64, lon: f64) -> GeoLocation {
        GeoLocation::new(lat, lon).unwrap()
    }

    #[test]
    fn starts_without_fix() {
        let (_publisher, provider) = WatchLocationProvider::channel(PermissionState::NotDetermined);
        assert!(provider.current_coordinate().is_none());
        assert_eq!(provider.permission_state(), PermissionState::NotDetermined);
    }

    #[test]
    fn fixed_provider_is_granted() {
        let (_publisher, provider) = WatchLocationProvider::fixed(loc(22.5726, 88.3639));
        assert_eq!(provider.current_coordinate(), Some(loc(22.5726, 88.3639)));
        assert_eq!(provider.permission_state(), PermissionState::Granted);
    }

    #[test]
    fn config_without_fix_keeps_permission() {
        let config = LocationAppConfig {
            fixed: None,
            permission: PermissionState::Denied,
        };
        let (_publisher, provider) = WatchLocationProvider::from_config(&config).unwrap();
        assert!(provider.current_coordinate().is_none());
        assert_eq!(provider.permission_state(), PermissionState::Denied);
    }

    #[test]
    fn config_with_fix_publishes_it() {
        let config = LocationAppConfig {
            fixed: Some(loc(22.5448, 88.3426).into()),
            permission: PermissionState::NotDetermined,
        };
        let (_publisher, provider) = WatchLocationProvider::from_config(&config).unwrap();
        assert_eq!(provider.current_coordinate(), Some(loc(22.5448, 88.3426)));
        assert_eq!(provider.permission_state(), PermissionState::Granted);
    }

    #[test]
    fn published_fix_becomes_current() {
        let (publisher, provider) = WatchLocationProvider::channel(PermissionState::Granted);
        publisher.publish(loc(22.5448, 88.3426));
        assert_eq!(provider.current_coordinate(), Some(loc(22.5448, 88.3426)));
        assert!(publisher.receiver_count() >= 1);
    }

    #[tokio::test]
    async fn denied_permission_fails_fast() {
        let (_publisher, provider) = WatchLocationProvider::channel(PermissionState::Granted);
        provider.set_permission(PermissionState::Denied);

        let err = provider
            .request_one_shot_location(Duration::from_secs(10))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::LocationUnavailable(LocationFailure::PermissionDenied)
        ));
    }

    #[tokio::test]
    async fn one_shot_returns_known_fix() {
        let (_publisher, provider) = WatchLocationProvider::fixed(loc(22.5726, 88.3639));
        let fix = provider
            .request_one_shot_location(Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(fix, loc(22.5726, 88.3639));
    }

    #[tokio::test]
    async fn one_shot_waits_for_next_fix() {
        let (publisher, provider) = WatchLocationProvider::channel(PermissionState::NotDetermined);
        let provider = Arc::new(provider);

        let waiting = {
            let provider = Arc::clone(&provider);
            tokio::spawn(async move {
                provider
                    .request_one_shot_location(Duration::from_secs(10))
                    .await
            })
        };
        tokio::task::yield_now().await;
        publisher.publish(loc(22.5851, 88.3468));

        assert_eq!(waiting.await.unwrap().unwrap(), loc(22.5851, 88.3468));
    }

    #[tokio::test(start_paused = true)]
    async fn one_shot_times_out() {
        let (_publisher, provider) = WatchLocationProvider::channel(PermissionState::Granted);
        let err = provider
            .request_one_shot_location(Duration::from_secs(10))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::LocationUnavailable(LocationFailure::Timeout { timeout_ms: 10_000 })
        ));
    }

    #[tokio::test]
    async fn dropped_publisher_is_provider_error() {
        let (publisher, provider) = WatchLocationProvider::channel(PermissionState::Granted);
        drop(publisher);
        let err = provider
            .request_one_shot_location(Duration::from_secs(10))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::LocationUnavailable(LocationFailure::Provider(_))
        ));
    }
}
