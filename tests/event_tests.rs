use mapsync::{
    events::{Error, MapEvent},
    shared::Coordinate,
};
use serde_json::{Value, json};

#[test]
fn add_markers_reads_wire_keys() {
    let event = MapEvent::from_json(
        "map:add-markers",
        json!({"points": [{
            "lon": 37.6, "lat": 55.7, "title": "Riverside", "address": "Naberezhnaya 1",
            "score": 8.7, "website": "https://riverside.example", "id": "rc-1", "distance": 850.0
        }]}),
    )
    .unwrap();
    let MapEvent::AddMarkers(payload) = event else {
        panic!("expected add-markers");
    };
    let point = &payload.points[0];
    assert_eq!(point.coordinate(), Coordinate::new(37.6, 55.7));
    assert_eq!(point.title.as_deref(), Some("Riverside"));
    assert_eq!(point.external_id.as_deref(), Some("rc-1"));
    assert_eq!(point.distance.unwrap().as_meters(), 850.0);
}

#[test]
fn add_markers_without_points_is_empty() {
    let event = MapEvent::from_json("map:add-markers", Value::Null).unwrap();
    assert_eq!(event, MapEvent::AddMarkers(Default::default()));
}

#[test]
fn draw_route_reads_route_info() {
    let event = MapEvent::from_json(
        "map:draw-route",
        json!({
            "coordinates": [[37.0, 55.0], [37.1, 55.1]],
            "routeInfo": {"totalDistance": 1200.0, "algorithm": "fastest", "traffic": true}
        }),
    )
    .unwrap();
    let MapEvent::DrawRoute(payload) = event else {
        panic!("expected draw-route");
    };
    assert_eq!(payload.coordinates[1], Coordinate::new(37.1, 55.1));
    let info = payload.route_info.unwrap();
    assert!(info.traffic);
    assert!(!info.highways);
    assert_eq!(info.algorithm.as_deref(), Some("fastest"));
}

#[test]
fn focus_marker_requires_numbers() {
    let event = MapEvent::from_json("map:focus-marker", json!({"lon": 37.6, "lat": 55.7})).unwrap();
    assert_eq!(event.name(), "map:focus-marker");

    let err = MapEvent::from_json("map:focus-marker", json!({"lon": "37.6", "lat": 55.7}));
    assert!(matches!(
        err,
        Err(Error::InvalidPayload { event: "map:focus-marker", .. })
    ));
}

#[test]
fn malformed_points_are_rejected() {
    let err = MapEvent::from_json("map:add-markers", json!({"points": [{"title": "no coordinates"}]}));
    assert!(matches!(err, Err(Error::InvalidPayload { .. })));
}

#[test]
fn clear_ignores_detail() {
    let event = MapEvent::from_json("map:clear", json!({"anything": true})).unwrap();
    assert_eq!(event, MapEvent::Clear);
}
