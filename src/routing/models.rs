use serde::{Deserialize, Serialize};

use crate::shared::geo::Coordinate;

/// Body of a routing-provider response. Only the fields the map needs are
/// modelled; everything else is ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingResponse {
    #[serde(default)]
    pub result: Vec<Route>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub maneuvers: Vec<Maneuver>,
    /// Meters.
    #[serde(default)]
    pub total_distance: Option<f64>,
    /// Seconds.
    #[serde(default)]
    pub total_duration: Option<f64>,
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default)]
    pub reliability: Option<f64>,
    #[serde(default)]
    pub ui_total_distance: Option<UiDistance>,
    #[serde(default)]
    pub ui_total_duration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiDistance {
    pub value: String,
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Maneuver {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub outcoming_path: Option<OutcomingPath>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomingPath {
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub geometry: Vec<GeometryEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryEntry {
    #[serde(default)]
    pub selection: Option<String>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub lat: f64,
    pub lon: f64,
}

impl From<Coordinate> for RoutePoint {
    fn from(value: Coordinate) -> Self {
        Self {
            lat: value.latitude,
            lon: value.longitude,
        }
    }
}

impl From<RoutePoint> for Coordinate {
    fn from(value: RoutePoint) -> Self {
        Coordinate::new(value.lon, value.lat)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    #[default]
    Car,
    Pedestrian,
    Bicycle,
}

/// Request body for the routing provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingRequest {
    pub points: Vec<RoutePoint>,
    pub transport: Transport,
}

impl RoutingRequest {
    pub fn car(from: Coordinate, to: Coordinate) -> Self {
        Self {
            points: vec![from.into(), to.into()],
            transport: Transport::Car,
        }
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }
}
