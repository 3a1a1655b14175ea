//! OSM mapping adapter - Implements MappingServicePort using integration_osm
//!
//! Place search goes to Nominatim, routing to OSRM. Each backend has its own
//! circuit breaker, and transient failures are retried before they reach
//! the workflow.

use std::{future::Future, sync::Arc};

use application::error::ApplicationError;
use application::ports::{ImageHandle, MappingServicePort, PlaceCandidate, RouteResponse};
use async_trait::async_trait;
use domain::{GeoLocation, Place, RouteGeometry, Viewport};
use integration_osm::{
    NominatimConfig, NominatimSearchClient, OsmError, OsrmConfig, OsrmRoutingClient,
    PlaceSearchClient, RoutingClient, SearchHit,
};
use tracing::{debug, instrument};

use super::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError};
use crate::retry::{RetryConfig, retry};

/// Adapter for OpenStreetMap services (Nominatim search, OSRM routing)
pub struct OsmMappingAdapter {
    search: Arc<dyn PlaceSearchClient>,
    routing: Arc<dyn RoutingClient>,
    retry: RetryConfig,
    search_breaker: Option<CircuitBreaker>,
    routing_breaker: Option<CircuitBreaker>,
}

impl std::fmt::Debug for OsmMappingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsmMappingAdapter")
            .field("retry", &self.retry)
            .field("search_breaker", &self.search_breaker)
            .field("routing_breaker", &self.routing_breaker)
            .finish_non_exhaustive()
    }
}

impl OsmMappingAdapter {
    /// Create an adapter over the given clients, without retries or breakers
    pub fn new(search: Arc<dyn PlaceSearchClient>, routing: Arc<dyn RoutingClient>) -> Self {
        Self {
            search,
            routing,
            retry: RetryConfig::none(),
            search_breaker: None,
            routing_breaker: None,
        }
    }

    /// Create an adapter talking to the configured Nominatim and OSRM servers
    ///
    /// # Errors
    ///
    /// Returns an error if either HTTP client fails to initialize.
    pub fn from_config(
        search: &NominatimConfig,
        routing: &OsrmConfig,
    ) -> Result<Self, ApplicationError> {
        let search = NominatimSearchClient::new(search)
            .map_err(|e| ApplicationError::Configuration(format!("Nominatim client: {e}")))?;
        let routing = OsrmRoutingClient::new(routing)
            .map_err(|e| ApplicationError::Configuration(format!("OSRM client: {e}")))?;
        Ok(Self::new(Arc::new(search), Arc::new(routing)))
    }

    /// Retry transient failures per `config`
    #[must_use]
    pub fn with_retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Guard both backends with circuit breakers
    #[must_use]
    pub fn with_circuit_breaker_config(mut self, config: CircuitBreakerConfig) -> Self {
        self.search_breaker = Some(CircuitBreaker::with_config("nominatim", config.clone()));
        self.routing_breaker = Some(CircuitBreaker::with_config("osrm", config));
        self
    }

    /// Run `call` with retries, behind `breaker` when one is configured
    ///
    /// Only retryable errors count against the breaker: a "no route" answer
    /// comes from a healthy service.
    async fn guarded<T, F, Fut>(
        &self,
        breaker: Option<&CircuitBreaker>,
        operation: &'static str,
        call: F,
    ) -> Result<T, ApplicationError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, OsmError>>,
    {
        match breaker {
            Some(cb) => cb
                .call_when(OsmError::is_retryable, || retry(&self.retry, call))
                .await
                .map_err(|e| match e {
                    CircuitBreakerError::CircuitOpen(open) => {
                        ApplicationError::ServiceUnavailable(open.to_string())
                    },
                    CircuitBreakerError::ServiceError(e) => Self::service_error(operation, &e),
                }),
            None => retry(&self.retry, call)
                .await
                .map_err(|e| Self::service_error(operation, &e)),
        }
    }

    fn service_error(operation: &str, error: &OsmError) -> ApplicationError {
        ApplicationError::ServiceUnavailable(format!("{operation} failed: {error}"))
    }

    fn candidate(hit: SearchHit) -> PlaceCandidate {
        PlaceCandidate {
            name: hit.name,
            coordinate: hit.coordinate,
            address: hit.display_name,
        }
    }
}

#[async_trait]
impl MappingServicePort for OsmMappingAdapter {
    #[instrument(skip(self, viewport), fields(center = %viewport.center))]
    async fn search(
        &self,
        query: &str,
        viewport: &Viewport,
    ) -> Result<Vec<PlaceCandidate>, ApplicationError> {
        let area = viewport.bounds();
        let hits = self
            .guarded(self.search_breaker.as_ref(), "Place search", || {
                self.search.search(query, &area)
            })
            .await?;

        debug!(count = hits.len(), "Search hits received");
        Ok(hits.into_iter().map(Self::candidate).collect())
    }

    #[instrument(skip(self), fields(from = %origin, to = %destination))]
    async fn route(
        &self,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<RouteResponse, ApplicationError> {
        let route = self
            .guarded(self.routing_breaker.as_ref(), "Routing", || {
                self.routing.route(origin, destination)
            })
            .await?;

        Ok(RouteResponse {
            geometry: RouteGeometry::new(route.coordinates)?,
            distance_meters: route.distance_meters,
            expected_travel_time_secs: route.duration_secs,
        })
    }

    async fn imagery(&self, place: &Place) -> Result<Option<ImageHandle>, ApplicationError> {
        debug!(place = %place.name, "OpenStreetMap offers no place imagery");
        Ok(None)
    }
}
