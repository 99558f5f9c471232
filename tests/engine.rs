use geo::{MultiLineString, MultiPolygon, line_string, polygon};
use street_coverage::prelude::*;

fn three_vertex_engine(tolerance: f64) -> CoverageEngine {
    let street = Street::new(
        "1",
        MultiLineString(vec![line_string![
            (x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 2.0, y: 0.0)
        ]]),
    );
    let network = StreetNetwork::from_streets(vec![street]).unwrap();
    let config = EngineConfig::new("unused.geojson").with_tolerance(tolerance);
    CoverageEngine::with_network(network, config)
}

#[test]
fn partial_then_full_trip_reaches_full_coverage() {
    let engine = three_vertex_engine(0.0);

    let stats = engine.submit_routes(&[TripRoute::new(line_string![
        (x: 0.0, y: 0.0), (x: 1.0, y: 0.0)
    ])]);
    assert_eq!(stats.routes_processed, 1);
    assert_eq!(stats.newly_traveled, 1);

    let summary = engine.coverage();
    assert_eq!(summary.total_segments, 2);
    assert_eq!(summary.traveled_segments, 1);
    assert_eq!(summary.coverage_percentage, 50.0);
    assert!(engine.is_traveled("1_0"));
    assert!(!engine.is_traveled("1_1"));

    engine.submit_routes(&[TripRoute::new(line_string![
        (x: 0.0, y: 0.0), (x: 2.0, y: 0.0)
    ])]);
    let summary = engine.coverage();
    assert_eq!(summary.traveled_segments, 2);
    assert_eq!(summary.coverage_percentage, 100.0);
    assert_eq!(summary.traveled_streets, 1);
}

#[test]
fn submitting_the_same_trip_twice_changes_nothing() {
    let engine = three_vertex_engine(1e-7);
    let trip = TripRoute::new(line_string![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0)]);

    engine.submit_routes(std::slice::from_ref(&trip));
    let first = engine.coverage();

    let stats = engine.submit_routes(std::slice::from_ref(&trip));
    assert_eq!(stats.newly_traveled, 0);
    assert_eq!(engine.coverage(), first);
}

#[test]
fn summary_invariants_hold() {
    let engine = three_vertex_engine(1e-7);
    engine.submit_routes(&[TripRoute::new(line_string![
        (x: 0.0, y: 0.0), (x: 1.0, y: 0.0)
    ])]);

    let summary = engine.coverage();
    assert!(summary.traveled_segments <= summary.total_segments);
    assert!(summary.traveled_streets <= summary.total_streets);
    assert!(summary.coverage_percentage >= 0.0);
    assert!(summary.coverage_percentage <= 100.0);
}

#[test]
fn reset_returns_coverage_to_zero() {
    let engine = three_vertex_engine(1e-7);
    engine.submit_routes(&[TripRoute::new(line_string![
        (x: 0.0, y: 0.0), (x: 2.0, y: 0.0)
    ])]);
    assert!(engine.coverage().traveled_segments > 0);

    engine.reset();
    let summary = engine.coverage();
    assert_eq!(summary.traveled_segments, 0);
    assert_eq!(summary.coverage_percentage, 0.0);
}

#[test]
fn out_of_tolerance_trip_leaves_state_unchanged() {
    let engine = three_vertex_engine(1e-7);

    let stats = engine.submit_routes(&[TripRoute::new(line_string![
        (x: 0.0, y: 5.0), (x: 2.0, y: 5.0)
    ])]);
    assert_eq!(stats.routes_processed, 1);
    assert_eq!(stats.segments_matched, 0);
    assert_eq!(engine.coverage().traveled_segments, 0);
}

#[test]
fn degenerate_trips_are_skipped_not_fatal() {
    let engine = three_vertex_engine(1e-7);
    let routes = vec![
        TripRoute::new(line_string![(x: 0.0, y: 0.0)]).with_id("one-point"),
        TripRoute::new(line_string![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0)]),
    ];

    let stats = engine.submit_routes(&routes);
    assert_eq!(stats.routes_skipped, 1);
    assert_eq!(stats.routes_processed, 1);
    assert_eq!(engine.coverage().traveled_segments, 2);
}

#[test]
fn boundary_view_counts_only_intersecting_segments() {
    let engine = three_vertex_engine(0.0);
    engine.submit_routes(&[TripRoute::new(line_string![
        (x: 0.0, y: 0.0), (x: 1.0, y: 0.0)
    ])]);

    // Excludes segment 1_1 = [(1,0),(2,0)] entirely
    let boundary = MultiPolygon(vec![polygon![
        (x: -0.5, y: -0.5), (x: 0.9, y: -0.5), (x: 0.9, y: 0.5), (x: -0.5, y: 0.5)
    ]]);

    let view = engine.coverage_within(&boundary);
    assert_eq!(view.total_segments, 1);
    assert_eq!(view.traveled_segments, 1);
    assert_eq!(view.coverage_percentage, 100.0);

    // Unfiltered totals are unaffected by the view
    assert_eq!(engine.coverage().total_segments, 2);
}

#[test]
fn exports_follow_the_traveled_filter() {
    let engine = three_vertex_engine(0.0);
    engine.submit_routes(&[TripRoute::new(line_string![
        (x: 0.0, y: 0.0), (x: 1.0, y: 0.0)
    ])]);

    assert_eq!(
        engine.export_segments(NetworkFilter::All, None).features.len(),
        2
    );
    assert_eq!(
        engine
            .export_segments(NetworkFilter::Traveled, None)
            .features
            .len(),
        1
    );
    assert_eq!(
        engine
            .export_segments(NetworkFilter::Untraveled, None)
            .features
            .len(),
        1
    );

    // The street has a traveled segment, so the street-level untraveled view is empty
    assert!(
        engine
            .export_network(NetworkFilter::Untraveled, None)
            .features
            .is_empty()
    );
}
