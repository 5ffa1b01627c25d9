mod models;
pub use models::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    events::DrawRoute,
    shared::geo::{Coordinate, Distance, path_length},
    wkt,
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Could not find a route")]
    NoRoute,
    #[error("A route was found but it has no drawable geometry")]
    NoGeometry,
}

/// Metadata sent along with a route polyline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_distance: Option<Distance>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reliability: Option<f64>,
    #[serde(default)]
    pub traffic: bool,
    #[serde(default)]
    pub highways: bool,
}

impl From<&Route> for RouteInfo {
    fn from(route: &Route) -> Self {
        Self {
            total_distance: route.total_distance.map(Distance::from_meters),
            total_duration: route.total_duration,
            algorithm: route.algorithm.clone(),
            reliability: route.reliability,
            traffic: false,
            highways: false,
        }
    }
}

/// A decoded route: the points of its polyline plus whatever metadata the
/// provider sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteGeometry {
    pub points: Vec<Coordinate>,
    pub info: Option<RouteInfo>,
}

impl RoutingResponse {
    pub fn first_route(&self) -> Option<&Route> {
        self.result.first()
    }
}

impl Route {
    /// Concatenates, in maneuver order then geometry-entry order, every
    /// coordinate that can be read out of the route's `LINESTRING`s.
    pub fn geometry(&self) -> Vec<Coordinate> {
        self.maneuvers
            .iter()
            .filter_map(|maneuver| maneuver.outcoming_path.as_ref())
            .flat_map(|path| path.geometry.iter())
            .filter_map(|entry| entry.selection.as_deref())
            .flat_map(|selection| match wkt::parse_linestring(selection) {
                Ok(points) => points,
                Err(err) => {
                    debug!("Skipping geometry entry: {err}");
                    Vec::new()
                }
            })
            .collect()
    }
}

/// Decodes the polyline of the first route in a routing response.
///
/// An empty result means no route could be drawn; callers report that to
/// the user instead of treating it as a failure.
pub fn decode_route_geometry(response: &RoutingResponse) -> Vec<Coordinate> {
    response
        .first_route()
        .map(Route::geometry)
        .unwrap_or_default()
}

/// Turns a routing response into the payload of a `map:draw-route` event.
pub fn plan_route(response: &RoutingResponse) -> Result<DrawRoute, self::Error> {
    let route = response.first_route().ok_or(self::Error::NoRoute)?;
    let coordinates = route.geometry();
    if coordinates.len() < 2 {
        return Err(self::Error::NoGeometry);
    }

    let mut info = RouteInfo::from(route);
    if info.total_distance.is_none() {
        info.total_distance = Some(path_length(&coordinates));
    }
    debug!(
        "Planned route with {} points over {} maneuvers",
        coordinates.len(),
        route.maneuvers.len()
    );
    Ok(DrawRoute {
        coordinates,
        route_info: Some(info),
    })
}

/// Human readable description of a route for the chat.
pub fn route_summary(route: &Route) -> String {
    let distance = route
        .ui_total_distance
        .as_ref()
        .map(|distance| format!("{} {}", distance.value, distance.unit))
        .unwrap_or_else(|| "unknown".to_string());
    let duration = route.ui_total_duration.as_deref().unwrap_or("unknown");
    let algorithm = route.algorithm.as_deref().unwrap_or("standard");
    format!("Route is ready.\nDistance: {distance}\nTime: {duration}\nAlgorithm: {algorithm}")
}

#[cfg(test)]
fn route_with(selections: &[&[&str]]) -> Route {
    Route {
        maneuvers: selections
            .iter()
            .map(|entries| Maneuver {
                outcoming_path: Some(OutcomingPath {
                    geometry: entries
                        .iter()
                        .map(|selection| GeometryEntry {
                            selection: Some(selection.to_string()),
                            ..Default::default()
                        })
                        .collect(),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

#[test]
fn geometry_keeps_maneuver_order_test() {
    let route = route_with(&[
        &["LINESTRING(1 1, 2 2)", "LINESTRING(3 3)"],
        &["POINT(9 9)", "LINESTRING(4 4)"],
    ]);
    let points: Vec<(f64, f64)> = route.geometry().into_iter().map(Into::into).collect();
    assert_eq!(points, vec![(1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0)]);
}

#[test]
fn plan_route_needs_two_points_test() {
    let response = RoutingResponse {
        result: vec![route_with(&[&["LINESTRING(1 1)"]])],
        ..Default::default()
    };
    assert_eq!(plan_route(&response), Err(Error::NoGeometry));
    assert_eq!(plan_route(&RoutingResponse::default()), Err(Error::NoRoute));
}

#[test]
fn plan_route_fills_missing_distance_test() {
    let response = RoutingResponse {
        result: vec![route_with(&[&["LINESTRING(37.0 55.0, 37.1 55.1)"]])],
        ..Default::default()
    };
    let draw = plan_route(&response).unwrap();
    let info = draw.route_info.unwrap();
    assert!(info.total_distance.unwrap().as_meters() > 10_000.0);
    assert!(!info.traffic);
}

#[test]
fn route_summary_test() {
    let route = Route {
        algorithm: Some("fastest".into()),
        ui_total_distance: Some(UiDistance {
            value: "12.4".into(),
            unit: "km".into(),
        }),
        ..Default::default()
    };
    assert_eq!(
        route_summary(&route),
        "Route is ready.\nDistance: 12.4 km\nTime: unknown\nAlgorithm: fastest"
    );
}
