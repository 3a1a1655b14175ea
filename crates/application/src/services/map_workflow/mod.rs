//! Search/select/route workflow
//!
//! Mediates between user input, the location provider and the mapping
//! service, and owns the transient session state: viewport, search results,
//! selection and route.
//!
//! Every state slot carries a generation counter. A request takes a fresh
//! generation when issued and its response is applied only if that
//! generation is still current when it completes, so a slow earlier
//! response can never overwrite a newer one. Superseded responses surface as
//! [`Outcome::Discarded`].
//!
//! All slots live behind one lock. Each check-and-apply step runs inside a
//! single critical section, and every change is published to subscribers
//! before the lock is released.

mod generation;
mod session;

use std::{fmt, sync::Arc, time::Duration};

use domain::{BoundingRegion, DomainError, GeoLocation, Place, Route, Viewport};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

pub use generation::{Generation, GenerationCounter, Outcome};
pub use session::{PlaceDetail, RoutePhase, RouteState, SearchPhase, SessionSnapshot};
use session::Session;

use crate::{
    error::ApplicationError,
    ports::{LocationPort, MappingServicePort, PermissionState},
};

/// Configuration for the map workflow
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Viewport at session start; its span is reused when recentering
    pub default_viewport: Viewport,
    /// Bounded wait for a one-shot location request (default: 10s)
    pub location_timeout: Duration,
    /// Factor applied to a route's bounding box when fitting it (default: 1.2)
    pub route_padding: f64,
    /// Smallest span used when fitting a route, in degrees (default: 0.005)
    pub min_route_span: f64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            default_viewport: Viewport::default(),
            location_timeout: Duration::from_secs(10),
            route_padding: 1.2,
            min_route_span: 0.005,
        }
    }
}

/// A route that was applied to the session
#[derive(Debug, Clone, PartialEq)]
pub struct FittedRoute {
    /// The route now displayed
    pub route: Route,
    /// Box containing the route geometry
    pub bounds: BoundingRegion,
    /// Viewport recentered to show the whole route
    pub viewport: Viewport,
}

/// Slot with an in-flight marker in the snapshot
#[derive(Debug, Clone, Copy)]
enum InFlightSlot {
    Search,
    Route,
}

/// Clears a request's in-flight marker if its future is dropped before
/// the response is applied
///
/// Only the request that still owns the slot's current generation resets
/// the marker; a newer request keeps its own.
struct InFlight<'a> {
    workflow: &'a MapWorkflow,
    slot: InFlightSlot,
    generation: Generation,
    armed: bool,
}

impl<'a> InFlight<'a> {
    const fn new(workflow: &'a MapWorkflow, slot: InFlightSlot, generation: Generation) -> Self {
        Self {
            workflow,
            slot,
            generation,
            armed: true,
        }
    }

    /// The response reached the session; nothing to undo
    fn complete(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let generation = self.generation;
        let slot = self.slot;
        self.workflow.mutate(|session| match slot {
            InFlightSlot::Search if session.search.is_current(generation) => {
                session.snapshot.search_phase = SearchPhase::Idle;
                debug!(%generation, "Search abandoned before completion");
            },
            InFlightSlot::Route if session.route.is_current(generation) => {
                session.snapshot.route.pending_destination = None;
                debug!(%generation, "Route request abandoned before completion");
            },
            _ => {},
        });
    }
}

/// The search/select/route workflow
pub struct MapWorkflow {
    mapping: Arc<dyn MappingServicePort>,
    location: Arc<dyn LocationPort>,
    config: WorkflowConfig,
    session: Mutex<Session>,
    updates: watch::Sender<SessionSnapshot>,
}

impl fmt::Debug for MapWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapWorkflow")
            .field("config", &self.config)
            .field("subscribers", &self.updates.receiver_count())
            .finish_non_exhaustive()
    }
}

impl MapWorkflow {
    /// Create a workflow looking at the configured default viewport
    #[must_use]
    pub fn new(
        mapping: Arc<dyn MappingServicePort>,
        location: Arc<dyn LocationPort>,
        config: WorkflowConfig,
    ) -> Self {
        let session = Session::new(config.default_viewport);
        let (updates, _) = watch::channel(session.snapshot.clone());
        Self {
            mapping,
            location,
            config,
            session: Mutex::new(session),
            updates,
        }
    }

    /// Workflow configuration
    pub const fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Copy of the current session state
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().snapshot.clone()
    }

    /// Receiver that observes every session change
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    /// Currently visible region
    pub fn viewport(&self) -> Viewport {
        self.session.lock().snapshot.viewport
    }

    /// Run `f` inside the critical section and publish the resulting state
    fn mutate<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut session = self.session.lock();
        let result = f(&mut session);
        let snapshot = &session.snapshot;
        self.updates.send_if_modified(|published| {
            if published == snapshot {
                false
            } else {
                published.clone_from(snapshot);
                true
            }
        });
        result
    }

    /// Search for places around `viewport`
    ///
    /// A blank query is a no-op: it returns an empty result set without
    /// contacting the mapping service or touching the session. On failure
    /// the previous results stay in place.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        viewport: Viewport,
    ) -> Result<Outcome<Vec<Place>>, ApplicationError> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Blank query, skipping search");
            return Ok(Outcome::Applied(Vec::new()));
        }

        let generation = self.mutate(|session| {
            session.snapshot.search_phase = SearchPhase::Searching;
            session.search.advance()
        });
        debug!(%generation, "Search issued");
        let in_flight = InFlight::new(self, InFlightSlot::Search, generation);

        let response = self.mapping.search(query, &viewport).await;

        in_flight.complete();
        self.mutate(|session| {
            if !session.search.is_current(generation) {
                debug!(%generation, "Discarding superseded search response");
                return Ok(Outcome::Discarded);
            }
            session.snapshot.search_phase = SearchPhase::Idle;

            let candidates = response.inspect_err(|e| {
                warn!(error = %e, "Search failed, keeping previous results");
            })?;

            let places: Vec<Place> = candidates
                .into_iter()
                .map(|candidate| candidate.into_place(&viewport.center))
                .collect();
            info!(count = places.len(), "Search results applied");

            session.snapshot.results.clone_from(&places);
            session.snapshot.last_query = Some(query.to_string());
            Ok(Outcome::Applied(places))
        })
    }

    /// Search around the current viewport
    pub async fn search_here(&self, query: &str) -> Result<Outcome<Vec<Place>>, ApplicationError> {
        let viewport = self.viewport();
        self.search(query, viewport).await
    }

    /// Select a place, or clear the selection with `None`
    ///
    /// Selecting a place recenters the map on it and fetches its imagery.
    /// A place that is not the destination of the current route drops that
    /// route. When the imagery lookup fails the detail keeps its distance
    /// and the error is returned.
    #[instrument(skip(self, place), fields(place = place.as_ref().map(|p| p.name.as_str())))]
    pub async fn select_place(
        &self,
        place: Option<Place>,
    ) -> Result<Outcome<Option<PlaceDetail>>, ApplicationError> {
        let Some(place) = place else {
            self.mutate(|session| {
                session.detail.advance();
                session.snapshot.selection = None;
                session.snapshot.detail = None;
            });
            debug!("Selection cleared");
            return Ok(Outcome::Applied(None));
        };

        let user_coordinate = self.location.current_coordinate();
        let span = self.config.default_viewport.span;

        let generation = self.mutate(|session| {
            let (reference, measured_from_user) = user_coordinate.map_or_else(
                || session.snapshot.distance_reference(),
                |coordinate| (coordinate, true),
            );

            if !session.snapshot.route.leads_to(&place.id) && !session.snapshot.route.is_empty() {
                debug!("Selection changed destination, clearing route");
                session.reset_route();
            }

            session.snapshot.detail = Some(PlaceDetail {
                place_id: place.id,
                imagery: None,
                distance_km: place.coordinate.distance_km(&reference),
                measured_from_user,
            });
            session.snapshot.selection = Some(place.clone());
            session.viewport.advance();
            session.snapshot.viewport = Viewport::new(place.coordinate, span);
            session.detail.advance()
        });

        let imagery = self.mapping.imagery(&place).await;

        self.mutate(|session| {
            if !session.detail.is_current(generation) {
                debug!(%generation, "Discarding detail for superseded selection");
                return Ok(Outcome::Discarded);
            }
            let imagery = imagery.inspect_err(|e| {
                warn!(error = %e, "Imagery lookup failed");
            })?;
            if imagery.is_none() {
                debug!("No preview available");
            }

            let detail = session.snapshot.detail.as_mut().ok_or_else(|| {
                ApplicationError::Internal("detail missing for current selection".to_string())
            })?;
            detail.imagery = imagery;
            Ok(Outcome::Applied(Some(detail.clone())))
        })
    }

    /// Select the search result at `index`
    pub async fn select_result(
        &self,
        index: usize,
    ) -> Result<Outcome<Option<PlaceDetail>>, ApplicationError> {
        let place = self
            .session
            .lock()
            .snapshot
            .results
            .get(index)
            .cloned()
            .ok_or_else(|| {
                DomainError::ValidationError(format!("no search result at index {index}"))
            })?;
        self.select_place(Some(place)).await
    }

    /// Request directions to `destination`
    ///
    /// Without an explicit origin the route starts at the user's location if
    /// known, else at the default viewport center. On success the route is
    /// displayed and the viewport fits it; on failure the previous route stays.
    #[instrument(skip(self, destination), fields(destination = %destination.name))]
    pub async fn request_directions(
        &self,
        origin: Option<GeoLocation>,
        destination: Place,
    ) -> Result<Outcome<FittedRoute>, ApplicationError> {
        let provider_coordinate = self.location.current_coordinate();

        let (origin, generation) = self.mutate(|session| {
            let origin = origin
                .or(provider_coordinate)
                .or_else(|| {
                    session
                        .snapshot
                        .current_location
                        .as_ref()
                        .map(|place| place.coordinate)
                })
                .unwrap_or(self.config.default_viewport.center);
            session.snapshot.route.pending_destination = Some(destination.id);
            (origin, session.route.advance())
        });
        info!(%origin, %generation, "Requesting directions");
        let in_flight = InFlight::new(self, InFlightSlot::Route, generation);

        let response = self.mapping.route(&origin, &destination.coordinate).await;

        in_flight.complete();
        self.mutate(|session| {
            if !session.route.is_current(generation) {
                debug!(%generation, "Discarding superseded route response");
                return Ok(Outcome::Discarded);
            }
            session.snapshot.route.pending_destination = None;

            let response = response.inspect_err(|e| {
                warn!(error = %e, "Route request failed, keeping previous route");
            })?;

            let route = Route {
                origin,
                destination,
                geometry: response.geometry,
                distance_meters: response.distance_meters,
                expected_travel_time_secs: response.expected_travel_time_secs,
            };
            let bounds = route.bounding_region();
            let viewport = Viewport::fitting(
                &bounds,
                self.config.route_padding,
                self.config.min_route_span,
            );
            info!(summary = %route.summary(), "Route displayed");

            session.snapshot.route.route = Some(route.clone());
            session.snapshot.route.displayed = true;
            session.viewport.advance();
            session.snapshot.viewport = viewport;

            Ok(Outcome::Applied(FittedRoute {
                route,
                bounds,
                viewport,
            }))
        })
    }

    /// Dismiss the route and supersede any route request in flight
    pub fn clear_route(&self) {
        self.mutate(|session| {
            if session.snapshot.route.is_empty() {
                return;
            }
            session.reset_route();
            debug!("Route cleared");
        });
    }

    /// Recenter the map on the user
    ///
    /// A known coordinate recenters immediately. Otherwise a one-shot
    /// location request is issued and the map recenters when it resolves,
    /// unless the viewport was moved in the meantime.
    #[instrument(skip(self))]
    pub async fn center_on_user(&self) -> Result<Outcome<Viewport>, ApplicationError> {
        let span = self.config.default_viewport.span;
        let generation = self.mutate(|session| session.viewport.advance());

        if let Some(coordinate) = self.location.current_coordinate() {
            debug!(%coordinate, "Recentering on known location");
            return Ok(self.mutate(|session| {
                session.record_location(coordinate);
                let viewport = Viewport::new(coordinate, span);
                session.snapshot.viewport = viewport;
                Outcome::Applied(viewport)
            }));
        }

        let permission = self.location.permission_state();
        if permission == PermissionState::Denied {
            warn!("Location permission denied");
            return Err(ApplicationError::permission_denied());
        }

        let timeout = self.config.location_timeout;
        debug!(?permission, ?timeout, "Requesting one-shot location");
        let coordinate =
            match tokio::time::timeout(timeout, self.location.request_one_shot_location(timeout))
                .await
            {
                Ok(Ok(coordinate)) => coordinate,
                Ok(Err(e)) => {
                    warn!(error = %e, "Location request failed");
                    return Err(e);
                },
                Err(_) => {
                    warn!(?timeout, "Location request timed out");
                    return Err(ApplicationError::location_timeout(timeout));
                },
            };

        Ok(self.mutate(|session| {
            session.record_location(coordinate);
            if !session.viewport.is_current(generation) {
                debug!(%generation, "Viewport moved meanwhile, not recentering");
                return Outcome::Discarded;
            }
            let viewport = Viewport::new(coordinate, span);
            session.snapshot.viewport = viewport;
            info!(%coordinate, "Recentered on user");
            Outcome::Applied(viewport)
        }))
    }

    /// Report a pan or zoom by the user
    pub fn set_viewport(&self, viewport: Viewport) {
        self.mutate(|session| {
            session.viewport.advance();
            session.snapshot.viewport = viewport;
        });
    }

    /// Apply a location fix pushed by the provider
    ///
    /// Every fix updates the user's marker. Returns true when the fix
    /// recentered the map, which happens only for the first fix of a
    /// session and only while the viewport is still the one the session
    /// started with. A pan, a selection, a fitted route or a recenter
    /// request all take precedence.
    pub fn apply_location_update(&self, coordinate: GeoLocation) -> bool {
        let span = self.config.default_viewport.span;
        self.mutate(|session| {
            let first_fix = !session.has_located;
            session.record_location(coordinate);
            if !first_fix {
                return false;
            }
            if session.viewport.current() != Generation::default() {
                debug!(%coordinate, "First location fix, viewport already moved");
                return false;
            }
            session.viewport.advance();
            session.snapshot.viewport = Viewport::new(coordinate, span);
            debug!(%coordinate, "First location fix, recentering");
            true
        })
    }
}
