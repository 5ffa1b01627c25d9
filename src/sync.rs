use tracing::{debug, error, warn};

use crate::{
    config::ViewConfig,
    events::{ComplexWithObjects, DrawRoute, MapEvent, MarkerPoint},
    overlay::{OverlayHandle, OverlayKind, OverlaySource, OverlayState, OverlayStore},
    routing::{RouteGeometry, RouteInfo},
    shared::geo::Coordinate,
    widget::{MapWidget, MarkerSpec, PolylineSpec},
};

/// Issued when an asynchronous request starts. A completion carrying a
/// ticket from before the last clear is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

/// Owns a map widget and every overlay drawn on it.
pub struct MapSynchronizer<W: MapWidget> {
    widget: W,
    overlays: OverlayStore<W::Handle>,
    config: ViewConfig,
    generation: u64,
}

impl<W: MapWidget> MapSynchronizer<W> {
    pub fn new(widget: W) -> Self {
        Self {
            widget,
            overlays: OverlayStore::new(),
            config: ViewConfig::default(),
            generation: 0,
        }
    }

    pub fn with_config(mut self, config: ViewConfig) -> Self {
        self.config = config;
        self
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn overlays(&self) -> &OverlayStore<W::Handle> {
        &self.overlays
    }

    pub fn count(&self, kind: OverlayKind) -> usize {
        self.overlays.count(kind)
    }

    pub fn state(&self, kind: OverlayKind) -> OverlayState {
        self.overlays.state(kind)
    }

    /// Routes a validated event to its handler.
    pub fn dispatch(&mut self, event: MapEvent) {
        let name = event.name();
        debug!("Dispatching {name}");
        match event {
            MapEvent::AddMarkers(payload) => self.on_add_markers(&payload.points),
            MapEvent::DrawRoute(payload) => {
                self.on_draw_route(&payload.coordinates, payload.route_info.as_ref())
            }
            MapEvent::Clear => self.on_clear(),
            MapEvent::FocusMarker(payload) => {
                self.on_focus_marker(payload.lon, payload.lat, payload.zoom)
            }
            MapEvent::ShowNearbyObjects(payload) => {
                self.on_show_nearby_objects(&payload.complexes)
            }
            MapEvent::ShowDetails(_) | MapEvent::FocusPlace(_) => {
                debug!("{name} does not change map state");
            }
        }
    }

    pub fn on_add_markers(&mut self, points: &[MarkerPoint]) {
        self.destroy_kind(OverlayKind::Marker);
        if points.is_empty() {
            debug!("No points to mark");
            return;
        }

        for (index, point) in points.iter().enumerate() {
            let spec = MarkerSpec {
                kind: OverlayKind::Marker,
                coordinate: point.coordinate(),
                label: Some(point.label(index)),
                title: point.title.clone(),
                color: self.config.marker_color.clone(),
            };
            self.create_marker(spec, OverlaySource::Point(point.clone()));
        }
        debug!(
            "Marked {} of {} points",
            self.count(OverlayKind::Marker),
            points.len()
        );

        let zoom = self.config.marker_zoom(points.len());
        match points
            .iter()
            .map(MarkerPoint::coordinate)
            .find(Coordinate::is_finite)
        {
            Some(center) => self.move_viewport(center, zoom),
            None => warn!("No finite point to center the map on"),
        }
    }

    pub fn on_draw_route(&mut self, points: &[Coordinate], info: Option<&RouteInfo>) {
        self.destroy_kind(OverlayKind::Route);
        let points: Vec<Coordinate> = points
            .iter()
            .copied()
            .filter(Coordinate::is_finite)
            .collect();
        if points.is_empty() {
            warn!("No coordinates to draw a route with");
            return;
        }

        let info = info.cloned().unwrap_or_default();
        let polyline = PolylineSpec {
            coordinates: points.clone(),
            color: if info.traffic {
                self.config.traffic_route_color.clone()
            } else {
                self.config.route_color.clone()
            },
            width: if info.highways {
                self.config.highway_route_width
            } else {
                self.config.route_width
            },
        };
        match self.widget.create_polyline(&polyline) {
            Ok(widget_ref) => {
                let geometry = RouteGeometry {
                    points: polyline.coordinates,
                    info: Some(info),
                };
                self.overlays.push(OverlayHandle::new(
                    OverlayKind::Route,
                    widget_ref,
                    OverlaySource::Route(geometry),
                ));
                debug!("Drew route with {} points", points.len());
            }
            Err(err) => error!("Failed to draw route: {err}"),
        }

        let zoom = self.config.route_zoom(points.len());
        self.move_viewport(points[0], zoom);
    }

    /// Destroys every overlay and invalidates all outstanding tickets.
    pub fn on_clear(&mut self) {
        self.generation += 1;
        let handles = self.overlays.take_all();
        if handles.is_empty() {
            return;
        }
        debug!("Clearing {} overlays", handles.len());
        self.destroy_handles(handles);
    }

    pub fn on_focus_marker(&mut self, lon: f64, lat: f64, zoom: Option<f64>) {
        let center = Coordinate::new(lon, lat);
        if !center.is_finite() {
            warn!("Ignoring focus on non-finite coordinate {center}");
            return;
        }
        let zoom = zoom
            .filter(|zoom| zoom.is_finite())
            .unwrap_or(self.config.focus_zoom);
        self.move_viewport(center, zoom);
    }

    pub fn on_show_nearby_objects(&mut self, complexes: &[ComplexWithObjects]) {
        self.destroy_kind(OverlayKind::Complex);
        self.destroy_kind(OverlayKind::NearbyObject);
        if complexes.is_empty() {
            debug!("No complexes to show nearby objects for");
            return;
        }

        for complex in complexes {
            let spec = MarkerSpec {
                kind: OverlayKind::Complex,
                coordinate: complex.coordinate(),
                label: None,
                title: Some(complex.name.clone()),
                color: self.config.complex_color.clone(),
            };
            self.create_marker(spec, OverlaySource::Complex(complex.clone()));

            for (entity, objects) in &complex.nearest_objects_by_entity {
                for (index, object) in objects.iter().enumerate() {
                    let color = if index == 0 {
                        &self.config.closest_object_color
                    } else {
                        &self.config.object_color
                    };
                    let spec = MarkerSpec {
                        kind: OverlayKind::NearbyObject,
                        coordinate: object.coordinates,
                        label: Some(format!("{:.0} m", object.distance_meters.as_meters())),
                        title: Some(object.name.clone()),
                        color: color.clone(),
                    };
                    let source = OverlaySource::NearbyObject {
                        entity: entity.clone(),
                        object: object.clone(),
                    };
                    self.create_marker(spec, source);
                }
            }
        }
        debug!(
            "Showing {} complexes with {} nearby objects",
            self.count(OverlayKind::Complex),
            self.count(OverlayKind::NearbyObject)
        );

        match complexes
            .iter()
            .map(ComplexWithObjects::coordinate)
            .find(Coordinate::is_finite)
        {
            Some(center) => self.move_viewport(center, self.config.nearby_zoom),
            None => warn!("No finite complex to center the map on"),
        }
    }

    /// Puts the viewport back where a freshly mounted map starts.
    pub fn reset_view(&mut self) {
        self.move_viewport(self.config.initial_center, self.config.initial_zoom);
    }

    /// Starts tracking an asynchronous request whose result will be drawn.
    pub fn begin_request(&self) -> Ticket {
        Ticket {
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation
    }

    /// Draws a route fetched under `ticket`, unless the map was cleared
    /// since. Returns whether the result was applied.
    pub fn complete_draw_route(&mut self, ticket: Ticket, route: &DrawRoute) -> bool {
        if !self.accept(ticket) {
            return false;
        }
        self.on_draw_route(&route.coordinates, route.route_info.as_ref());
        true
    }

    pub fn complete_add_markers(&mut self, ticket: Ticket, points: &[MarkerPoint]) -> bool {
        if !self.accept(ticket) {
            return false;
        }
        self.on_add_markers(points);
        true
    }

    pub fn complete_nearby_objects(
        &mut self,
        ticket: Ticket,
        complexes: &[ComplexWithObjects],
    ) -> bool {
        if !self.accept(ticket) {
            return false;
        }
        self.on_show_nearby_objects(complexes);
        true
    }

    /// Releases every overlay. Also runs on drop.
    pub fn teardown(&mut self) {
        let handles = self.overlays.take_all();
        if !handles.is_empty() {
            debug!("Releasing {} overlays", handles.len());
            self.destroy_handles(handles);
        }
    }

    fn accept(&self, ticket: Ticket) -> bool {
        if self.is_current(ticket) {
            return true;
        }
        warn!(
            "Discarding stale result from generation {} (current {})",
            ticket.generation, self.generation
        );
        false
    }

    fn create_marker(&mut self, spec: MarkerSpec, source: OverlaySource) {
        if !spec.coordinate.is_finite() {
            warn!("Skipping {} at non-finite coordinate", spec.kind);
            return;
        }
        match self.widget.create_marker(&spec) {
            Ok(widget_ref) => self
                .overlays
                .push(OverlayHandle::new(spec.kind, widget_ref, source)),
            Err(err) => error!("Failed to create {} at {}: {err}", spec.kind, spec.coordinate),
        }
    }

    fn destroy_kind(&mut self, kind: OverlayKind) {
        let handles = self.overlays.take(kind);
        self.destroy_handles(handles);
    }

    fn destroy_handles(&mut self, handles: Vec<OverlayHandle<W::Handle>>) {
        for handle in handles {
            let kind = handle.kind;
            if let Err(err) = self.widget.destroy(handle.widget_ref) {
                error!("Failed to destroy {kind}: {err}");
            }
        }
    }

    fn move_viewport(&mut self, center: Coordinate, zoom: f64) {
        if let Err(err) = self.widget.set_center(center) {
            error!("Failed to center map on {center}: {err}");
            return;
        }
        if let Err(err) = self.widget.set_zoom(zoom) {
            error!("Failed to zoom map to {zoom}: {err}");
        }
    }
}

impl<W: MapWidget> Drop for MapSynchronizer<W> {
    fn drop(&mut self) {
        self.teardown();
    }
}
