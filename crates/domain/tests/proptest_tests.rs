//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::value_objects::{BoundingRegion, CoordinateSpan, GeoLocation, MIN_SPAN_DELTA, Viewport};
use domain::{Place, RouteGeometry};
use proptest::prelude::*;

fn any_location() -> impl Strategy<Value = GeoLocation> {
    (-90.0f64..=90.0f64, -180.0f64..=180.0f64)
        .prop_map(|(lat, lon)| GeoLocation::new(lat, lon).unwrap())
}

// ============================================================================
// GeoLocation Property Tests
// ============================================================================

mod geo_location_tests {
    use super::*;

    proptest! {
        #[test]
        fn valid_coordinates_create_location(
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64
        ) {
            let location = GeoLocation::new(lat, lon).unwrap();
            prop_assert!((location.latitude() - lat).abs() < f64::EPSILON);
            prop_assert!((location.longitude() - lon).abs() < f64::EPSILON);
        }

        #[test]
        fn out_of_range_latitude_rejected(
            lat in prop_oneof![-1000.0f64..-90.001f64, 90.001f64..1000.0f64],
            lon in -180.0f64..=180.0f64
        ) {
            prop_assert!(GeoLocation::new(lat, lon).is_err());
        }

        #[test]
        fn out_of_range_longitude_rejected(
            lat in -90.0f64..=90.0f64,
            lon in prop_oneof![-1000.0f64..-180.001f64, 180.001f64..1000.0f64]
        ) {
            prop_assert!(GeoLocation::new(lat, lon).is_err());
        }

        #[test]
        fn distance_is_symmetric_and_non_negative(a in any_location(), b in any_location()) {
            let ab = a.distance_km(&b);
            let ba = b.distance_km(&a);
            prop_assert!(ab >= 0.0);
            prop_assert!((ab - ba).abs() < 1e-6);
        }

        #[test]
        fn distance_to_self_is_zero(a in any_location()) {
            prop_assert!(a.distance_km(&a).abs() < 1e-9);
        }

        #[test]
        fn distance_bounded_by_half_circumference(a in any_location(), b in any_location()) {
            // π · R, plus rounding slack
            prop_assert!(a.distance_km(&b) <= 20_015.1);
        }
    }
}

// ============================================================================
// CoordinateSpan Property Tests
// ============================================================================

mod coordinate_span_tests {
    use super::*;

    proptest! {
        #[test]
        fn clamped_span_is_always_valid(lat in any::<f64>(), lon in any::<f64>()) {
            let span = CoordinateSpan::clamped(lat, lon);
            prop_assert!(span.latitude_delta() >= MIN_SPAN_DELTA);
            prop_assert!(span.latitude_delta() <= 180.0);
            prop_assert!(span.longitude_delta() >= MIN_SPAN_DELTA);
            prop_assert!(span.longitude_delta() <= 360.0);
        }

        #[test]
        fn non_positive_span_rejected(delta in -100.0f64..=0.0f64) {
            prop_assert!(CoordinateSpan::new(delta, 1.0).is_err());
            prop_assert!(CoordinateSpan::new(1.0, delta).is_err());
        }
    }
}

// ============================================================================
// BoundingRegion / Viewport Property Tests
// ============================================================================

mod region_tests {
    use super::*;

    proptest! {
        #[test]
        fn region_contains_every_point(points in prop::collection::vec(any_location(), 1..20)) {
            let region = BoundingRegion::from_points(&points).unwrap();
            for point in &points {
                prop_assert!(region.contains(point));
            }
            prop_assert!(region.contains(&region.center()));
        }

        #[test]
        fn fitted_viewport_shows_whole_route(
            points in prop::collection::vec(any_location(), 1..20),
            padding in 1.05f64..2.0f64
        ) {
            let geometry = RouteGeometry::new(points.clone()).unwrap();
            let viewport = Viewport::fitting(&geometry.bounding_region(), padding, 0.005);

            prop_assert!(viewport.span.latitude_delta() >= 0.005);
            prop_assert!(viewport.span.longitude_delta() >= 0.005);
            for point in &points {
                prop_assert!(viewport.contains(point));
            }
        }

        #[test]
        fn recentered_viewport_keeps_span(center in any_location(), target in any_location()) {
            let viewport = Viewport::new(center, CoordinateSpan::square(0.05).unwrap());
            let moved = viewport.recentered(target);
            prop_assert_eq!(moved.center, target);
            prop_assert_eq!(moved.span, viewport.span);
            prop_assert!(moved.contains(&target));
        }

        #[test]
        fn viewport_bounds_stay_in_range(center in any_location(), delta in 0.001f64..=180.0f64) {
            let bounds = Viewport::new(center, CoordinateSpan::square(delta).unwrap()).bounds();
            prop_assert!(bounds.min_latitude >= -90.0);
            prop_assert!(bounds.max_latitude <= 90.0);
            prop_assert!(bounds.min_longitude >= -180.0);
            prop_assert!(bounds.max_longitude <= 180.0);
        }
    }
}

// ============================================================================
// Place Property Tests
// ============================================================================

mod place_tests {
    use super::*;

    proptest! {
        #[test]
        fn distance_from_reference_matches_haversine(place in any_location(), reference in any_location()) {
            let candidate = Place::new("Somewhere", place).with_distance_from(&reference);
            let expected = place.distance_km(&reference);
            prop_assert!((candidate.distance_km.unwrap() - expected).abs() < 1e-9);
            prop_assert!(candidate.distance_label().is_some());
        }

        #[test]
        fn blank_names_fall_back(spaces in "[ \t]{0,5}", location in any_location()) {
            let place = Place::new(spaces, location);
            prop_assert_eq!(place.name.as_str(), domain::UNKNOWN_PLACE_NAME);
        }
    }
}
