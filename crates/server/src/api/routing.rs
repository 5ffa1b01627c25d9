use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use mapsync::{
    events::{AddMarkers, DRAW_ROUTE, DrawRoute, MarkerPoint},
    routing::{Error as RoutingError, RoutePoint, plan_route, route_summary},
    shared::Coordinate,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::ApiError;
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteQuery {
    pub from: RoutePoint,
    pub to: RoutePoint,
}

const ENDPOINT_ADDRESS: &str = "Address not specified";

/// A ready-to-dispatch `map:draw-route` event plus the text for the chat.
///
/// `markers` is the `map:add-markers` payload for the two endpoints, sent
/// alongside the route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePlan {
    pub event: String,
    pub detail: DrawRoute,
    pub markers: AddMarkers,
    pub summary: String,
}

fn endpoint_markers(from: Coordinate, to: Coordinate) -> AddMarkers {
    let points = [from, to]
        .into_iter()
        .enumerate()
        .map(|(index, point)| MarkerPoint {
            address: Some(ENDPOINT_ADDRESS.to_string()),
            ..MarkerPoint::new(point.longitude, point.latitude)
                .with_title(format!("Point {}", index + 1))
        })
        .collect();
    AddMarkers { points }
}

pub async fn route(
    State(state): State<Arc<AppState>>,
    Json(query): Json<RouteQuery>,
) -> Result<Json<RoutePlan>, ApiError> {
    let from = Coordinate::from(query.from);
    let to = Coordinate::from(query.to);
    if !from.is_finite() || !to.is_finite() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Route points must be finite coordinates",
        ));
    }

    let response = state.client.route(from, to).await.map_err(|err| {
        error!("Failed to fetch route: {err}");
        ApiError::from(err)
    })?;

    let detail = plan_route(&response).map_err(|err| {
        warn!("No drawable route from {from} to {to}: {err}");
        match err {
            RoutingError::NoRoute | RoutingError::NoGeometry => {
                ApiError::new(StatusCode::NOT_FOUND, "Route not found")
            }
        }
    })?;
    let summary = response
        .first_route()
        .map(route_summary)
        .unwrap_or_default();
    info!(
        "Planned route from {from} to {to} with {} points",
        detail.coordinates.len()
    );

    Ok(Json(RoutePlan {
        event: DRAW_ROUTE.to_string(),
        detail,
        markers: endpoint_markers(from, to),
        summary,
    }))
}
