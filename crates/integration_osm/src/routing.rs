//! OSRM routing client
//!
//! Requests driving routes from an [OSRM](https://project-osrm.org) server
//! using the `route` service with full GeoJSON geometry.

use std::time::Duration;

use async_trait::async_trait;
use domain::GeoLocation;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use crate::config::OsrmConfig;
use crate::error::OsmError;
use crate::models::{DrivingRoute, RawRouteResponse};

/// Trait for routing clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Calculate the best route from `origin` to `destination`
    async fn route(
        &self,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<DrivingRoute, OsmError>;
}

/// OSRM-based routing client
#[derive(Debug)]
pub struct OsrmRoutingClient {
    client: Client,
    config: OsrmConfig,
}

impl OsrmRoutingClient {
    /// Create a new OSRM routing client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &OsrmConfig) -> Result<Self, OsmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| OsmError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// `{base}/route/v1/{profile}/{lon},{lat};{lon},{lat}`
    fn route_url(&self, origin: &GeoLocation, destination: &GeoLocation) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            origin.longitude(),
            origin.latitude(),
            destination.longitude(),
            destination.latitude()
        )
    }

    /// Turn an OSRM body into the first route
    ///
    /// Any `code` other than `Ok`, or an empty route list, means no route.
    fn parse_response(body: &str) -> Result<DrivingRoute, OsmError> {
        let raw: RawRouteResponse =
            serde_json::from_str(body).map_err(|e| OsmError::ParseError(e.to_string()))?;

        if raw.code != "Ok" {
            let message = raw.message.unwrap_or_default();
            return Err(OsmError::NoRoute(format!("{}: {message}", raw.code)));
        }

        let route = raw
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| OsmError::NoRoute("response contained no routes".to_string()))?;
        DrivingRoute::try_from(route)
    }
}

#[async_trait]
impl RoutingClient for OsrmRoutingClient {
    #[instrument(skip(self), fields(from = %origin, to = %destination))]
    async fn route(
        &self,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<DrivingRoute, OsmError> {
        let url = self.route_url(origin, destination);
        let params = [("overview", "full"), ("geometries", "geojson")];

        debug!(%url, "Requesting route");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| OsmError::from_send(&e, self.config.timeout_secs))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| OsmError::ParseError(e.to_string()))?;

        // OSRM reports unroutable input as 400 with a JSON code
        if status == StatusCode::BAD_REQUEST {
            if let Ok(raw) = serde_json::from_str::<RawRouteResponse>(&body) {
                let message = raw.message.unwrap_or_default();
                return Err(OsmError::NoRoute(format!("{}: {message}", raw.code)));
            }
        }
        if !status.is_success() {
            return Err(OsmError::from_status(status, &headers));
        }

        let route = Self::parse_response(&body)?;
        debug!(
            points = route.coordinates.len(),
            distance_meters = route.distance_meters,
            "Route found"
        );
        Ok(route)
    }
}
