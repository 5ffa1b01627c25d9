//! Keeps a map widget's overlays in sync with a stream of map events.
//!
//! The chat side of the application emits [`events::MapEvent`]s (points to
//! mark, a route to draw, requests to clear or focus). A
//! [`sync::MapSynchronizer`] owns the widget and every overlay it created,
//! and turns those events into widget calls. Route polylines come out of a
//! routing-provider response through [`routing::decode_route_geometry`].

pub mod config;
pub mod details;
pub mod events;
pub mod overlay;
pub mod routing;
pub mod shared;
pub mod sync;
pub mod widget;
pub mod wkt;

pub mod prelude {
    pub use crate::config::ViewConfig;
    pub use crate::events::{
        AddMarkers, ComplexWithObjects, DrawRoute, FocusMarker, MapEvent, MarkerPoint,
        NearbyObject, ShowNearbyObjects,
    };
    pub use crate::overlay::{OverlayKind, OverlayState, OverlayStore};
    pub use crate::routing::{RouteInfo, RoutingRequest, RoutingResponse, decode_route_geometry};
    pub use crate::shared::geo::{Coordinate, Distance};
    pub use crate::sync::{MapSynchronizer, Ticket};
    pub use crate::widget::{MapWidget, RecordingWidget};
}
