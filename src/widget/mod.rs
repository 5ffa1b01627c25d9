mod recording;
pub use recording::*;

use thiserror::Error;

use crate::{overlay::OverlayKind, shared::geo::Coordinate};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Widget rejected the operation: {0}")]
    Rejected(String),
    #[error("Overlay {0} is not owned by this widget")]
    UnknownOverlay(u64),
}

/// A point overlay as the widget should render it.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub kind: OverlayKind,
    pub coordinate: Coordinate,
    pub label: Option<String>,
    pub title: Option<String>,
    pub color: String,
}

/// A line overlay connecting `coordinates` in order.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineSpec {
    pub coordinates: Vec<Coordinate>,
    pub color: String,
    pub width: f64,
}

/// The surface of the third-party map SDK that the synchronizer drives.
///
/// `Handle` is whatever the SDK hands back for a created overlay; the
/// synchronizer keeps it until it passes it back to [`MapWidget::destroy`].
pub trait MapWidget {
    type Handle;

    fn create_marker(&mut self, marker: &MarkerSpec) -> Result<Self::Handle, self::Error>;
    fn create_polyline(&mut self, polyline: &PolylineSpec) -> Result<Self::Handle, self::Error>;
    fn destroy(&mut self, handle: Self::Handle) -> Result<(), self::Error>;
    fn set_center(&mut self, center: Coordinate) -> Result<(), self::Error>;
    fn set_zoom(&mut self, zoom: f64) -> Result<(), self::Error>;
}
