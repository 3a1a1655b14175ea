//! Session state owned by the workflow and the snapshots handed to readers

use domain::{BoundingRegion, GeoLocation, Place, PlaceId, Route, Viewport};
use serde::Serialize;

use super::generation::GenerationCounter;
use crate::ports::ImageHandle;

/// Whether a search is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    /// No search pending
    #[default]
    Idle,
    /// The latest search has not completed yet
    Searching,
}

/// Lifecycle of the route slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutePhase {
    /// Nothing requested or shown
    NoRoute,
    /// A route request is in flight
    Requested,
    /// A route is on the map
    Displayed,
}

/// Supplementary data for the selected place
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceDetail {
    /// Place the detail belongs to
    pub place_id: PlaceId,
    /// Immersive imagery, once fetched and if the service has any
    pub imagery: Option<ImageHandle>,
    /// Great-circle distance to the place (km)
    pub distance_km: f64,
    /// True when measured from the user's location, false when measured
    /// from the viewport center
    pub measured_from_user: bool,
}

impl PlaceDetail {
    /// Human-readable distance, e.g. `"1.3 km away"`
    pub fn distance_label(&self) -> String {
        format!("{:.1} km away", self.distance_km)
    }
}

/// Route slot of the session
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RouteState {
    /// Last computed route
    pub route: Option<Route>,
    /// Whether the route is on the map
    pub displayed: bool,
    /// Destination of the request in flight, if any
    pub pending_destination: Option<PlaceId>,
}

impl RouteState {
    /// Current lifecycle phase
    pub fn phase(&self) -> RoutePhase {
        if self.pending_destination.is_some() {
            RoutePhase::Requested
        } else if self.displayed && self.route.is_some() {
            RoutePhase::Displayed
        } else {
            RoutePhase::NoRoute
        }
    }

    /// Whether the shown or requested route leads to `place`
    pub fn leads_to(&self, place: &PlaceId) -> bool {
        self.pending_destination.as_ref() == Some(place)
            || self
                .route
                .as_ref()
                .is_some_and(|route| &route.destination.id == place)
    }

    /// Whether there is nothing to clear
    pub fn is_empty(&self) -> bool {
        self.route.is_none() && !self.displayed && self.pending_destination.is_none()
    }
}

/// Read-only view of the session for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Visible map region
    pub viewport: Viewport,
    /// Results of the latest applied search, in service order
    pub results: Vec<Place>,
    /// Search lifecycle
    pub search_phase: SearchPhase,
    /// Query that produced `results`
    pub last_query: Option<String>,
    /// Selected place
    pub selection: Option<Place>,
    /// Detail of the selected place
    pub detail: Option<PlaceDetail>,
    /// Route slot
    pub route: RouteState,
    /// The user's own position, once known
    pub current_location: Option<Place>,
}

impl SessionSnapshot {
    /// Empty session looking at `viewport`
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            results: Vec::new(),
            search_phase: SearchPhase::Idle,
            last_query: None,
            selection: None,
            detail: None,
            route: RouteState::default(),
            current_location: None,
        }
    }

    /// Places the map should pin
    ///
    /// While a route is displayed only its destination is pinned. The user's
    /// location is always included once known.
    pub fn visible_markers(&self) -> Vec<&Place> {
        let mut markers: Vec<&Place> = match (&self.route.route, self.route.displayed) {
            (Some(route), true) => vec![&route.destination],
            _ => self.results.iter().collect(),
        };
        markers.extend(self.current_location.as_ref());
        markers
    }

    /// Box around every pinned marker
    pub fn markers_region(&self) -> Option<BoundingRegion> {
        BoundingRegion::from_points(self.visible_markers().into_iter().map(|p| &p.coordinate))
            .ok()
    }

    /// Coordinate distances to the selection are measured from
    pub(super) fn distance_reference(&self) -> (GeoLocation, bool) {
        self.current_location.as_ref().map_or_else(
            || (self.viewport.center, false),
            |place| (place.coordinate, true),
        )
    }
}

/// Mutable state behind the workflow's lock
#[derive(Debug)]
pub(super) struct Session {
    pub snapshot: SessionSnapshot,
    pub search: GenerationCounter,
    pub detail: GenerationCounter,
    pub route: GenerationCounter,
    pub viewport: GenerationCounter,
    pub has_located: bool,
}

impl Session {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            snapshot: SessionSnapshot::new(viewport),
            search: GenerationCounter::default(),
            detail: GenerationCounter::default(),
            route: GenerationCounter::default(),
            viewport: GenerationCounter::default(),
            has_located: false,
        }
    }

    /// Record the user's position, keeping the identity of the marker
    pub fn record_location(&mut self, coordinate: GeoLocation) {
        let place = match self.snapshot.current_location.take() {
            Some(existing) => Place {
                coordinate,
                ..existing
            },
            None => Place::current_location(coordinate),
        };
        self.snapshot.current_location = Some(place);
        self.has_located = true;
    }

    /// Drop the route slot and supersede any request in flight
    pub fn reset_route(&mut self) {
        self.route.advance();
        self.snapshot.route = RouteState::default();
    }
}
