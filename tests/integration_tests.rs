//! End-to-end scenarios across the public API: a store feeds the map, the
//! session drives it with input and time, and a recording backend captures
//! what would be drawn.

use std::time::Duration;

use approx::assert_abs_diff_eq;
use instant::Instant;
use vectormap::prelude::*;

const MAIN_ST: &str = r#"{
    "objects": [
        { "id": 1, "type": "minor-road", "name": "Main", "suffix": "St",
          "points": [[42.0, -71.0], [42.01, -71.0]],
          "left":  { "range": { "start": 101, "end": 199 }, "city": "Boston", "state": "MA", "zip": "02139" },
          "right": { "range": { "start": 100, "end": 200 }, "city": "Boston", "state": "MA", "zip": "02139" } },
        { "id": 2, "type": "lake",
          "points": [[42.004, -70.996], [42.006, -70.996], [42.006, -70.994]] }
    ],
    "locations": [
        { "id": 7, "point": { "latitude": 42.005, "longitude": -70.9985 }, "name": "Cafe",
          "attributes": [ { "name": "web", "value": "https://cafe.example" } ] }
    ],
    "gazetteer": {
        "states": [ { "name": "Massachusetts", "code": "MA" } ],
        "cities": [ { "name": "Boston", "state": "MA" } ]
    }
}"#;

fn document() -> StoreDocument {
    serde_json::from_str(MAIN_ST).unwrap()
}

fn main_st_points() -> Vec<WorldPoint> {
    vec![WorldPoint::new(42.0, -71.0), WorldPoint::new(42.01, -71.0)]
}

fn session(zoom: u8) -> MapSession {
    let view = MapView::new(WorldPoint::new(42.005, -71.0), zoom, Dimensions::new(800, 600)).unwrap();
    MapSession::new(Map::with_default_style(view).unwrap())
}

#[test]
fn test_house_number_placed_on_right_side() {
    let range = AddressRange::new(100, 200);
    let fraction = address_fraction(150, &range).unwrap();
    assert_abs_diff_eq!(fraction, 0.5);

    let points = main_st_points();
    let right = interpolate_address_point(&points, fraction, RoadSide::Right).unwrap();
    assert_abs_diff_eq!(right.latitude, 42.005, epsilon = 1e-9);
    // Northbound, so the right side is east
    assert_abs_diff_eq!(right.longitude, -71.0 + 0.00012, epsilon = 1e-9);

    let center = interpolate_address_point(&points, fraction, RoadSide::Center).unwrap();
    assert_abs_diff_eq!(center.longitude, -71.0, epsilon = 1e-12);
    assert!(!right.points_equal(&center));
}

#[test]
fn test_parity_mismatch_rejected() {
    let range = AddressRange::new(97, 157);
    assert_eq!(address_fraction(124, &range), None);
    let fraction = address_fraction(125, &range).unwrap();
    assert_abs_diff_eq!(fraction, 28.0 / 60.0, epsilon = 1e-12);
}

#[test]
fn test_history_truncates_forward_entries() {
    let mut history = History::new();
    for lat in [1.0, 2.0, 3.0] {
        history.add(WorldPoint::new(lat, 0.0), 5);
    }
    history.go_back();
    history.go_back();
    history.add(WorldPoint::new(4.0, 0.0), 5);

    assert_eq!(history.len(), 2);
    assert!(!history.can_go_forward());
    assert_eq!(history.current().unwrap().center, WorldPoint::new(4.0, 0.0));
    assert_eq!(history.go_back().unwrap().center, WorldPoint::new(1.0, 0.0));
}

#[test]
fn test_readding_current_view_drops_forward_entries() {
    let mut history = History::new();
    for lat in [1.0, 2.0, 3.0] {
        history.add(WorldPoint::new(lat, 0.0), 5);
    }
    history.go_back();
    history.go_back();
    history.add(WorldPoint::new(1.0, 0.0), 5);

    assert_eq!(history.len(), 1);
    assert!(!history.can_go_forward());
    assert!(!history.can_go_back());
}

#[test]
fn test_animation_progress_is_clamped() {
    let start = Instant::now();
    let animator = Animator::starting_at(start, 1.0, AnimationCurve::Slide).unwrap();
    assert_eq!(animator.progress(start), 0.0);
    assert_eq!(animator.progress(start + Duration::from_secs(5)), 1.0);
    assert!(animator.is_done(start + Duration::from_secs(1)));

    for curve in [AnimationCurve::Slide, AnimationCurve::FastThenSlide] {
        assert_eq!(curve.apply(-0.5), 0.0);
        assert_eq!(curve.apply(1.5), 1.0);
    }
    assert!(Animator::new(0.0, AnimationCurve::Slide).is_err());
}

#[test]
fn test_clipped_runs_stay_inside() {
    let rect = WorldRect::from_coords(0.0, 0.0, 1.0, 1.0);
    let zigzag = vec![
        WorldPoint::new(-0.5, 0.5),
        WorldPoint::new(0.5, 0.5),
        WorldPoint::new(0.5, 1.5),
        WorldPoint::new(0.5, 2.0),
        WorldPoint::new(0.2, 0.8),
    ];
    let runs = clip_polyline_runs(&zigzag, &rect);
    assert_eq!(runs.len(), 2);
    for point in runs.iter().flatten() {
        assert!(rect.expanded(1e-12).contains(point), "{:?} escaped", point);
    }

    // Entirely outside
    let outside = vec![WorldPoint::new(2.0, 2.0), WorldPoint::new(3.0, 3.0)];
    assert!(clip_polyline_runs(&outside, &rect).is_empty());
    assert!(clip_polyline_to_rect(&outside, &rect).is_empty());

    // Entirely inside is returned untouched
    let inside = vec![WorldPoint::new(0.2, 0.2), WorldPoint::new(0.8, 0.3)];
    assert_eq!(clip_polyline_to_rect(&inside, &rect), inside);
}

#[test]
fn test_project_round_trip() {
    for zoom in MIN_ZOOM_LEVEL..=MAX_ZOOM_LEVEL {
        let metrics =
            RenderMetrics::compute(WorldPoint::new(42.0, -71.0), zoom, Dimensions::new(1024, 768))
                .unwrap();
        for point in [
            WorldPoint::new(42.0, -71.0),
            WorldPoint::new(42.0123, -70.9871),
            WorldPoint::new(41.5, -72.25),
        ] {
            let back = metrics.unproject(&metrics.project(&point));
            assert_abs_diff_eq!(back.latitude, point.latitude, epsilon = 1e-9);
            assert_abs_diff_eq!(back.longitude, point.longitude, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_render_from_store() {
    let store = MemoryStore::from_document(document());
    let mut session = session(8);
    let mut backend = RecordingBackend::new();

    let stats = session.render(&store, &mut backend, DrawFlags::ALL).unwrap();
    assert_eq!(backend.frames, 1);
    assert!(matches!(backend.calls.first(), Some(DrawCall::Fill { .. })));
    // Road casing and centre line
    assert_eq!(backend.polylines().count(), 2);
    assert_eq!(backend.polygons().count(), 1);
    assert_eq!(stats.fills, 1);
    assert!(!session.map().needs_refresh());
}

#[test]
fn test_search_then_show_result() {
    let document = document();
    let gazetteer = document.gazetteer.clone();
    let store = MemoryStore::from_document(document);

    let results = search_roads("150 Main St Boston MA", &gazetteer, &store).unwrap();
    assert_eq!(results.len(), 1);
    let result = results[0].clone();
    assert_eq!(
        result.source,
        MatchSource::Road {
            road_id: 1,
            side: RoadSide::Right
        }
    );

    let t0 = Instant::now();
    let mut session = session(8);
    session.show_search_result(&result, t0).unwrap();
    assert_eq!(session.map().zoom_level(), SEARCH_RESULT_ZOOM_LEVEL);
    assert!(session.is_sliding());

    assert_eq!(session.tick(t0 + Duration::from_millis(100)), Some(DrawFlags::GEOMETRY));
    assert_eq!(session.tick(t0 + Duration::from_secs(3)), Some(DrawFlags::ALL));
    assert!(!session.is_sliding());
    assert!(session.map().center().points_equal(&result.point));
    assert_eq!(session.history().current().unwrap().center, result.point);
}

#[test]
fn test_location_search_then_show_result() {
    let document = document();
    let gazetteer = document.gazetteer.clone();
    let store = MemoryStore::from_document(document);

    let results = search_locations("best cafe", &store).unwrap();
    assert_eq!(results.len(), 1);
    let result = results[0].clone();
    assert_eq!(result.source, MatchSource::Location { location_id: 7 });
    assert_eq!(result.text, "Cafe");
    assert_eq!(result.zoom_level, LOCATION_RESULT_ZOOM_LEVEL);

    // Road results come first, and "cafe" names no road
    let all = search_all("cafe", &gazetteer, &store, &store).unwrap();
    assert_eq!(all, results);
    let all = search_all("150 Main St", &gazetteer, &store, &store).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].road_id(), Some(1));

    let t0 = Instant::now();
    let mut session = session(8);
    session.show_search_result(&result, t0).unwrap();
    assert_eq!(session.map().zoom_level(), LOCATION_RESULT_ZOOM_LEVEL);
    assert!(session.is_sliding());
    assert_eq!(session.tick(t0 + Duration::from_secs(3)), Some(DrawFlags::ALL));
    assert!(session.map().center().points_equal(&result.point));
    assert_eq!(session.history().len(), 2);

    // Pins load from zoom 7, so the found location is drawn and clickable
    let mut backend = RecordingBackend::new();
    session.render(&store, &mut backend, DrawFlags::ALL).unwrap();
    let pin = session.map().render_metrics().unwrap().world_to_screen(&result.point);
    assert_eq!(session.click(pin), Some(ClickOutcome::Selected(7)));
}

#[test]
fn test_extreme_input_is_clamped() {
    let t0 = Instant::now();
    let mut session = session(8);
    session.handle_input(&InputEvent::Scroll { steps: i32::MAX }, t0).unwrap();
    assert_eq!(session.map().zoom_level(), MAX_ZOOM_LEVEL);
    session.handle_input(&InputEvent::Scroll { steps: i32::MIN }, t0).unwrap();
    assert_eq!(session.map().zoom_level(), MIN_ZOOM_LEVEL);
    session
        .handle_input(&InputEvent::Drag { dx: i32::MIN, dy: 0 }, t0)
        .unwrap();
    assert!(session.map().center().longitude > -71.0);
}

#[test]
fn test_balloon_with_many_attributes() {
    let mut document = document();
    let cafe = &mut document.locations[0];
    for i in 0..3000 {
        cafe.attributes.push(LocationAttribute::new("note", format!("line {}", i)));
    }
    let store = MemoryStore::from_document(document);
    let mut session = session(8);
    let mut backend = RecordingBackend::new();
    session.render(&store, &mut backend, DrawFlags::ALL).unwrap();

    let pin = session
        .map()
        .render_metrics()
        .unwrap()
        .world_to_screen(&WorldPoint::new(42.005, -70.9985));
    assert_eq!(session.click(pin), Some(ClickOutcome::Selected(7)));
    assert_eq!(session.map().selection(7).unwrap().urls.len(), 1);
}

#[test]
fn test_click_pin_then_close_balloon() {
    let store = MemoryStore::from_document(document());
    let mut session = session(8);
    let mut backend = RecordingBackend::new();
    session.render(&store, &mut backend, DrawFlags::ALL).unwrap();

    let metrics = session.map().render_metrics().unwrap();
    let pin = metrics.world_to_screen(&WorldPoint::new(42.005, -70.9985));
    let t0 = Instant::now();

    let outcome = session
        .handle_input(&InputEvent::Click { position: pin }, t0)
        .unwrap();
    assert_eq!(outcome, Some(ClickOutcome::Selected(7)));

    let selection = session.map().selection(7).unwrap();
    let url = selection.urls[0].rect.center();
    let close = selection.close_rect.center();

    let outcome = session
        .handle_input(&InputEvent::Click { position: url }, t0)
        .unwrap();
    assert_eq!(outcome, Some(ClickOutcome::OpenUrl("https://cafe.example".into())));

    let outcome = session
        .handle_input(&InputEvent::Click { position: close }, t0)
        .unwrap();
    assert_eq!(outcome, Some(ClickOutcome::Deselected(7)));
    assert!(session.map().selections().is_empty());
}

#[test]
fn test_click_road_reports_name() {
    let store = MemoryStore::from_document(document());
    let mut session = session(8);
    let mut backend = RecordingBackend::new();
    session.render(&store, &mut backend, DrawFlags::ALL).unwrap();

    let hit = session
        .map()
        .hit_test_screen(ScreenPoint::new(398, 280))
        .unwrap();
    assert!(matches!(hit.kind, HitKind::Road { road_id: 1, .. }));
    assert_eq!(hit.text, "Main St");

    // Roads are reported but do not change the session
    assert_eq!(session.click(ScreenPoint::new(398, 280)), None);
}

#[test]
fn test_drag_defers_full_redraw() {
    let store = MemoryStore::from_document(document());
    let mut session = session(8);
    let t0 = Instant::now();
    let before = session.map().center();

    session
        .handle_input(&InputEvent::Drag { dx: 40, dy: 0 }, t0)
        .unwrap();
    assert!(session.map().center().longitude < before.longitude);
    assert!(session.redraw_pending());
    assert_eq!(session.tick(t0 + Duration::from_millis(100)), None);
    assert_eq!(session.tick(t0 + Duration::from_millis(300)), Some(DrawFlags::ALL));
    assert_eq!(session.tick(t0 + Duration::from_millis(400)), None);

    let mut backend = RecordingBackend::new();
    session.render(&store, &mut backend, DrawFlags::GEOMETRY).unwrap();
    assert_eq!(backend.labels().count(), 0);

    session.handle_input(&InputEvent::DragEnd, t0).unwrap();
    assert_eq!(session.history().len(), 2);
    assert!(session.go_back().unwrap());
    assert!(session.map().center().points_equal(&before));
}

#[test]
fn test_edge_click_and_zoom_history() {
    let t0 = Instant::now();
    let mut session = session(8);
    let start = session.map().center();

    // Left edge, middle third
    session
        .handle_input(&InputEvent::Click { position: ScreenPoint::new(2, 300) }, t0)
        .unwrap();
    let moved = session.map().center();
    let dpp = session.map().render_metrics().unwrap().degrees_per_pixel();
    assert_abs_diff_eq!(moved.longitude, start.longitude - 400.0 * dpp, epsilon = 1e-9);

    session.handle_input(&InputEvent::Scroll { steps: 5 }, t0).unwrap();
    assert_eq!(session.map().zoom_level(), MAX_ZOOM_LEVEL);
    assert_eq!(session.history().len(), 3);

    assert!(session.go_back().unwrap());
    assert_eq!(session.map().zoom_level(), 8);
    assert!(session.go_back().unwrap());
    assert!(session.map().center().points_equal(&start));
    assert!(!session.go_back().unwrap());
    assert!(session.go_forward().unwrap());
    assert!(session.map().center().points_equal(&moved));
}
