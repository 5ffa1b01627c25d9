//! The event contract between the chat UI and the map view.
//!
//! Every event travels as a name plus a JSON `detail` value. Payloads are
//! validated here, once, so the synchronizer only ever sees typed data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

use crate::{
    routing::RouteInfo,
    shared::geo::{Coordinate, Distance},
};

pub const ADD_MARKERS: &str = "map:add-markers";
pub const DRAW_ROUTE: &str = "map:draw-route";
pub const CLEAR: &str = "map:clear";
pub const FOCUS_MARKER: &str = "map:focus-marker";
pub const SHOW_NEARBY_OBJECTS: &str = "map:show-nearby-objects";
pub const SHOW_DETAILS: &str = "map:show-details";
pub const FOCUS_PLACE: &str = "map:focus-place";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown map event: {0}")]
    UnknownEvent(String),
    #[error("Invalid payload for {event}: {source}")]
    InvalidPayload {
        event: &'static str,
        source: serde_json::Error,
    },
}

/// A point produced by the chat/search flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerPoint {
    #[serde(rename = "lon", alias = "longitude")]
    pub longitude: f64,
    #[serde(rename = "lat", alias = "latitude")]
    pub latitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(
        default,
        rename = "id",
        alias = "externalId",
        skip_serializing_if = "Option::is_none"
    )]
    pub external_id: Option<String>,
    #[serde(
        default,
        rename = "distance",
        alias = "distanceMeters",
        skip_serializing_if = "Option::is_none"
    )]
    pub distance: Option<Distance>,
}

impl MarkerPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.longitude, self.latitude)
    }

    /// Score with one decimal, or the 1-based position when there is none.
    pub fn label(&self, index: usize) -> String {
        match self.score {
            Some(score) => format!("{score:.1}"),
            None => (index + 1).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyObject {
    pub name: String,
    pub distance_meters: Distance,
    pub coordinates: Coordinate,
}

/// A residential complex together with the closest objects of each entity
/// the user asked about. Objects within a group are closest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexWithObjects {
    pub id: String,
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    #[serde(default)]
    pub nearest_objects_by_entity: BTreeMap<String, Vec<NearbyObject>>,
}

impl ComplexWithObjects {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lon, self.lat)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddMarkers {
    #[serde(default)]
    pub points: Vec<MarkerPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRoute {
    #[serde(default)]
    pub coordinates: Vec<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_info: Option<RouteInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusMarker {
    pub lon: f64,
    pub lat: f64,
    #[serde(default)]
    pub zoom: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowNearbyObjects {
    #[serde(default)]
    pub complexes: Vec<ComplexWithObjects>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowDetails {
    pub id: String,
    pub data: Value,
    pub original: MarkerPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusPlace {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    AddMarkers(AddMarkers),
    DrawRoute(DrawRoute),
    Clear,
    FocusMarker(FocusMarker),
    ShowNearbyObjects(ShowNearbyObjects),
    ShowDetails(ShowDetails),
    FocusPlace(FocusPlace),
}

impl MapEvent {
    /// Validates a raw `(name, detail)` pair coming off the event bus.
    /// A missing or `null` detail is read as an empty object.
    pub fn from_json(name: &str, detail: Value) -> Result<Self, self::Error> {
        let detail = match detail {
            Value::Null => Value::Object(Default::default()),
            detail => detail,
        };
        let event = match name {
            ADD_MARKERS => Self::AddMarkers(payload(ADD_MARKERS, detail)?),
            DRAW_ROUTE => Self::DrawRoute(payload(DRAW_ROUTE, detail)?),
            CLEAR => Self::Clear,
            FOCUS_MARKER => Self::FocusMarker(payload(FOCUS_MARKER, detail)?),
            SHOW_NEARBY_OBJECTS => Self::ShowNearbyObjects(payload(SHOW_NEARBY_OBJECTS, detail)?),
            SHOW_DETAILS => Self::ShowDetails(payload(SHOW_DETAILS, detail)?),
            FOCUS_PLACE => Self::FocusPlace(payload(FOCUS_PLACE, detail)?),
            other => return Err(self::Error::UnknownEvent(other.to_string())),
        };
        Ok(event)
    }

    pub fn name(&self) -> &'static str {
        match self {
            MapEvent::AddMarkers(_) => ADD_MARKERS,
            MapEvent::DrawRoute(_) => DRAW_ROUTE,
            MapEvent::Clear => CLEAR,
            MapEvent::FocusMarker(_) => FOCUS_MARKER,
            MapEvent::ShowNearbyObjects(_) => SHOW_NEARBY_OBJECTS,
            MapEvent::ShowDetails(_) => SHOW_DETAILS,
            MapEvent::FocusPlace(_) => FOCUS_PLACE,
        }
    }
}

fn payload<T: DeserializeOwned>(event: &'static str, detail: Value) -> Result<T, self::Error> {
    serde_json::from_value(detail).map_err(|source| self::Error::InvalidPayload { event, source })
}

#[test]
fn marker_label_test() {
    assert_eq!(MarkerPoint::new(0.0, 0.0).with_score(8.46).label(0), "8.5");
    assert_eq!(MarkerPoint::new(0.0, 0.0).label(2), "3");
}

#[test]
fn unknown_event_test() {
    assert!(matches!(
        MapEvent::from_json("map:explode", Value::Null),
        Err(Error::UnknownEvent(name)) if name == "map:explode"
    ));
}
