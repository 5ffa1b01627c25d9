use std::{collections::HashMap, sync::Arc};

use axum::{
    Json,
    extract::Query,
    http::StatusCode,
    routing::{get, post},
};
use mapsync::routing::RoutingRequest;
use serde_json::{Value, json};
use server::{AppState, Config, api::RoutePlan, build_router};

const KEY: &str = "test-key";

async fn fake_routing(
    Query(params): Query<HashMap<String, String>>,
    Json(request): Json<RoutingRequest>,
) -> (StatusCode, Json<Value>) {
    if params.get("key").map(String::as_str) != Some(KEY) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
    }
    if request.points[0].lon < 0.0 {
        return (StatusCode::OK, Json(json!({"result": []})));
    }
    let body = json!({
        "result": [{
            "algorithm": "fastest",
            "total_distance": 2100,
            "total_duration": 420,
            "ui_total_distance": {"value": "2.1", "unit": "km"},
            "ui_total_duration": "7 min",
            "maneuvers": [
                {"outcoming_path": {"geometry": [
                    {"selection": "LINESTRING(37.6 55.7, 37.61 55.71)"}
                ]}},
                {"comment": "finish"},
                {"outcoming_path": {"geometry": [
                    {"selection": "LINESTRING(abc def, 37.62 55.72)"}
                ]}}
            ]
        }]
    });
    (StatusCode::OK, Json(body))
}

async fn fake_catalog(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    if params.get("q").map(String::as_str) == Some("Nowhere") {
        return Json(json!({"result": {"items": []}}));
    }
    Json(json!({
        "result": {"items": [{
            "id": "70000001",
            "name": "Riverside Park",
            "address_name": "Naberezhnaya 1",
            "point": {"lon": 37.601, "lat": 55.701},
            "rubrics": [{"name": "Residential complex"}],
            "contact_groups": [{"contacts": [
                {"type": "phone", "value": "+74950000000"},
                {"type": "website", "value": "https://riverside.example"}
            ]}],
            "schedule": {"text": "Daily 9-21"},
            "reviews": {"general_rating": 4.6, "general_review_count": 120, "count": 80},
            "photos": [{"url": "https://img.example/1.jpg", "type": "main"}]
        }]}
    }))
}

async fn broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn spawn(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{port}")
}

async fn spawn_upstream() -> String {
    let app = axum::Router::new()
        .route("/routing", post(fake_routing))
        .route("/catalog", get(fake_catalog))
        .route("/broken", post(broken).get(broken));
    spawn(app).await
}

async fn spawn_server(api_key: Option<&str>, routing_path: &str) -> String {
    let upstream = spawn_upstream().await;
    let mut config = Config {
        routing_url: format!("{upstream}{routing_path}"),
        catalog_url: format!("{upstream}/catalog"),
        ..Default::default()
    };
    if let Some(key) = api_key {
        config = config.with_api_key(key);
    }
    spawn(build_router(Arc::new(AppState::new(config)))).await
}

fn route_body(from_lon: f64) -> Value {
    json!({"from": {"lon": from_lon, "lat": 55.7}, "to": {"lon": 37.62, "lat": 55.72}})
}

#[tokio::test]
async fn health_reports_ok() {
    let base = spawn_server(None, "/routing").await;
    let resp = reqwest::get(format!("{base}/api/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn route_returns_draw_route_event() {
    let base = spawn_server(Some(KEY), "/routing").await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/route"))
        .json(&route_body(37.6))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let plan: RoutePlan = resp.json().await.unwrap();
    assert_eq!(plan.event, "map:draw-route");
    let points: Vec<(f64, f64)> = plan
        .detail
        .coordinates
        .iter()
        .map(|coordinate| (*coordinate).into())
        .collect();
    assert_eq!(points, vec![(37.6, 55.7), (37.61, 55.71), (37.62, 55.72)]);
    let info = plan.detail.route_info.unwrap();
    assert_eq!(info.total_distance.unwrap().as_meters(), 2100.0);
    assert_eq!(info.algorithm.as_deref(), Some("fastest"));
    assert!(plan.summary.contains("Distance: 2.1 km"));
    assert!(plan.summary.contains("Time: 7 min"));

    let endpoints: Vec<_> = plan
        .markers
        .points
        .iter()
        .map(|point| (point.title.as_deref(), point.longitude, point.latitude))
        .collect();
    assert_eq!(
        endpoints,
        vec![(Some("Point 1"), 37.6, 55.7), (Some("Point 2"), 37.62, 55.72)]
    );
}

#[tokio::test]
async fn route_not_found_is_404() {
    let base = spawn_server(Some(KEY), "/routing").await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/route"))
        .json(&route_body(-1.0))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn route_upstream_failure_is_502() {
    let base = spawn_server(Some(KEY), "/broken").await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/route"))
        .json(&route_body(37.6))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
}

#[tokio::test]
async fn route_without_key_is_500() {
    let base = spawn_server(None, "/routing").await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/route"))
        .json(&route_body(37.6))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
}

#[tokio::test]
async fn details_normalizes_catalog_item() {
    let base = spawn_server(Some(KEY), "/routing").await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/2gis/details"))
        .json(&json!({"title": "Riverside", "lon": 37.6, "lat": 55.7, "id": "rc-1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["name"], "Riverside Park");
    assert_eq!(body["address"], "Naberezhnaya 1");
    assert_eq!(body["contacts"]["phones"], json!(["+74950000000"]));
    assert_eq!(body["contacts"]["websites"], json!(["https://riverside.example"]));
    assert_eq!(body["schedule"]["text"], "Daily 9-21");
    assert_eq!(body["rating"]["value"], 4.6);
    assert_eq!(body["rating"]["count"], 120);
    assert_eq!(body["rating"]["reviews"], 80);
    assert_eq!(body["mainPhoto"]["image_url"], "https://img.example/1.jpg");
    assert_eq!(body["rubrics"], json!(["Residential complex"]));
    assert_eq!(body["coordinates"]["lon"], 37.601);
    assert_eq!(body["metadata"]["id"], "70000001");
    assert_eq!(body["metadata"]["source"], "2gis");
}

#[tokio::test]
async fn details_fallback_when_nothing_found() {
    let base = spawn_server(Some(KEY), "/routing").await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/2gis/details"))
        .json(&json!({"title": "Nowhere", "lon": 37.6, "lat": 55.7}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["fallback"]["name"], "Nowhere");
    assert!(body["fallback"]["rating"].is_null());
    assert!(body["fallback"]["website"].is_null());
    assert!(body["fallback"].as_object().unwrap().contains_key("website"));
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn details_rejects_incomplete_query() {
    let base = spawn_server(Some(KEY), "/routing").await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/2gis/details"))
        .json(&json!({"title": "", "lon": 37.6, "lat": 55.7}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}
