//! End-to-end workflow tests over the OSM adapter (wiremock-based)

use std::sync::Arc;
use std::time::Duration;

use application::ports::PermissionState;
use application::services::{MapWorkflow, RoutePhase, WorkflowConfig};
use domain::{GeoLocation, Viewport};
use infrastructure::{
    OsmMappingAdapter, RetryConfig, WatchLocationProvider, forward_location_updates,
};
use integration_osm::{NominatimConfig, OsrmConfig};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_JSON: &str = r#"[
    {"lat": "22.5535", "lon": "88.3520", "name": "Blue Tokai", "display_name": "Blue Tokai, Park Street, Kolkata"},
    {"lat": "22.5764", "lon": "88.3633", "name": "Indian Coffee House", "display_name": "Indian Coffee House, College Street, Kolkata"},
    {"lat": "22.5530", "lon": "88.3517", "name": "", "display_name": "Park Street, Kolkata"}
]"#;

const ROUTE_JSON: &str = r#"{
    "code": "Ok",
    "routes": [{
        "geometry": {"type": "LineString", "coordinates": [[88.3639, 22.5726], [88.3650, 22.5745], [88.3633, 22.5764]]},
        "distance": 620.5,
        "duration": 118.0
    }]
}"#;

fn loc(lat: f64, lon: f64) -> GeoLocation {
    GeoLocation::new(lat, lon).unwrap()
}

async fn osm_servers() -> (MockServer, MockServer) {
    let nominatim = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_JSON))
        .mount(&nominatim)
        .await;

    let osrm = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/.+"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ROUTE_JSON))
        .mount(&osrm)
        .await;

    (nominatim, osrm)
}

fn adapter(nominatim: &MockServer, osrm: &MockServer) -> OsmMappingAdapter {
    let search = NominatimConfig {
        base_url: nominatim.uri(),
        ..NominatimConfig::for_testing()
    };
    let routing = OsrmConfig {
        base_url: osrm.uri(),
        ..OsrmConfig::for_testing()
    };
    OsmMappingAdapter::from_config(&search, &routing)
        .unwrap()
        .with_retry(RetryConfig::for_testing())
}

#[tokio::test]
async fn coffee_search_select_and_route() {
    let (nominatim, osrm) = osm_servers().await;
    let (_publisher, location) = WatchLocationProvider::fixed(loc(22.5726, 88.3639));
    let workflow = MapWorkflow::new(
        Arc::new(adapter(&nominatim, &osrm)),
        Arc::new(location),
        WorkflowConfig::default(),
    );

    let results = workflow
        .search("coffee", Viewport::default())
        .await
        .unwrap()
        .applied()
        .unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[1].name, "Indian Coffee House");
    assert_eq!(results[2].name, "Unknown location");

    let detail = workflow.select_result(1).await.unwrap().applied().unwrap();
    let detail = detail.unwrap();
    assert!(detail.imagery.is_none());
    assert!(detail.measured_from_user);

    let destination = workflow.snapshot().selection.unwrap();
    let fitted = workflow
        .request_directions(None, destination)
        .await
        .unwrap()
        .applied()
        .unwrap();

    let snapshot = workflow.snapshot();
    assert!(snapshot.route.displayed);
    assert_eq!(snapshot.route.phase(), RoutePhase::Displayed);
    assert_eq!(snapshot.viewport, fitted.viewport);
    assert!(fitted.viewport.contains(&loc(22.5764, 88.3633)));
    assert!(fitted.viewport.contains(&loc(22.5726, 88.3639)));
}

#[tokio::test]
async fn unreachable_search_service_keeps_results() {
    let (nominatim, osrm) = osm_servers().await;
    let (_publisher, location) = WatchLocationProvider::channel(PermissionState::Granted);
    let workflow = MapWorkflow::new(
        Arc::new(adapter(&nominatim, &osrm)),
        Arc::new(location),
        WorkflowConfig::default(),
    );

    workflow.search("coffee", Viewport::default()).await.unwrap();
    nominatim.reset().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&nominatim)
        .await;

    let err = workflow
        .search("tea", Viewport::default())
        .await
        .unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(workflow.snapshot().results.len(), 3);
}

#[tokio::test]
async fn pushed_fixes_reach_the_workflow() {
    let (nominatim, osrm) = osm_servers().await;
    let (publisher, location) = WatchLocationProvider::channel(PermissionState::Granted);
    let updates = location.updates();
    let workflow = Arc::new(MapWorkflow::new(
        Arc::new(adapter(&nominatim, &osrm)),
        Arc::new(location),
        WorkflowConfig::default(),
    ));
    let mut snapshots = workflow.subscribe();
    let forwarder = forward_location_updates(updates, Arc::clone(&workflow));

    publisher.publish(loc(22.5448, 88.3426));

    let snapshot = tokio::time::timeout(
        Duration::from_secs(5),
        snapshots.wait_for(|s| s.current_location.is_some()),
    )
    .await
    .unwrap()
    .unwrap()
    .clone();

    assert_eq!(snapshot.viewport.center, loc(22.5448, 88.3426));
    assert_eq!(snapshot.current_location.unwrap().name, "My Location");

    drop(publisher);
    forwarder.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn center_on_user_times_out_without_fix() {
    let mapping =
        OsmMappingAdapter::from_config(&NominatimConfig::for_testing(), &OsrmConfig::for_testing())
            .unwrap();
    let (_publisher, location) = WatchLocationProvider::channel(PermissionState::Granted);
    let workflow = MapWorkflow::new(
        Arc::new(mapping),
        Arc::new(location),
        WorkflowConfig::default(),
    );
    let before = workflow.viewport();

    let err = workflow.center_on_user().await.unwrap_err();

    assert!(err.to_string().contains("no location fix"));
    assert_eq!(workflow.viewport(), before);
}
