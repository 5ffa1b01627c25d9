use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
    rc::Rc,
};

use super::{MapWidget, MarkerSpec, PolylineSpec};
use crate::{overlay::OverlayKind, shared::geo::Coordinate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayId(u64);

impl Display for OverlayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedOverlay {
    Marker(MarkerSpec),
    Polyline(PolylineSpec),
}

impl RecordedOverlay {
    pub fn kind(&self) -> OverlayKind {
        match self {
            RecordedOverlay::Marker(marker) => marker.kind,
            RecordedOverlay::Polyline(_) => OverlayKind::Route,
        }
    }
}

/// Everything a [`RecordingWidget`] has drawn so far.
#[derive(Debug, Default)]
pub struct Scene {
    overlays: BTreeMap<OverlayId, RecordedOverlay>,
    next_id: u64,
    creates: usize,
    destroyed: usize,
    failing_creates: BTreeSet<usize>,
    failing_destroys: bool,
    failing_viewport: bool,
    pub center: Option<Coordinate>,
    pub zoom: Option<f64>,
}

impl Scene {
    pub fn live_overlays(&self) -> usize {
        self.overlays.len()
    }

    pub fn live_of_kind(&self, kind: OverlayKind) -> usize {
        self.overlays
            .values()
            .filter(|overlay| overlay.kind() == kind)
            .count()
    }

    pub fn overlays(&self) -> impl Iterator<Item = &RecordedOverlay> {
        self.overlays.values()
    }

    pub fn markers(&self) -> impl Iterator<Item = &MarkerSpec> {
        self.overlays.values().filter_map(|overlay| match overlay {
            RecordedOverlay::Marker(marker) => Some(marker),
            RecordedOverlay::Polyline(_) => None,
        })
    }

    pub fn polylines(&self) -> impl Iterator<Item = &PolylineSpec> {
        self.overlays.values().filter_map(|overlay| match overlay {
            RecordedOverlay::Polyline(polyline) => Some(polyline),
            RecordedOverlay::Marker(_) => None,
        })
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed
    }

    fn insert(&mut self, overlay: RecordedOverlay) -> Result<OverlayId, super::Error> {
        let attempt = self.creates;
        self.creates += 1;
        if self.failing_creates.contains(&attempt) {
            return Err(super::Error::Rejected(format!(
                "create call {attempt} was set up to fail"
            )));
        }
        let id = OverlayId(self.next_id);
        self.next_id += 1;
        self.overlays.insert(id, overlay);
        Ok(id)
    }
}

/// In-memory [`MapWidget`] that records what would have been drawn.
///
/// The scene is shared, so it can still be inspected after the widget has
/// been handed to (and dropped with) a synchronizer.
#[derive(Debug, Clone, Default)]
pub struct RecordingWidget {
    scene: Rc<RefCell<Scene>>,
}

impl RecordingWidget {
    pub fn new() -> Self {
        Default::default()
    }

    /// Makes the create calls at the given 0-based positions fail.
    pub fn failing_creates(self, attempts: impl IntoIterator<Item = usize>) -> Self {
        self.scene.borrow_mut().failing_creates.extend(attempts);
        self
    }

    pub fn failing_destroys(self) -> Self {
        self.scene.borrow_mut().failing_destroys = true;
        self
    }

    pub fn failing_viewport(self) -> Self {
        self.scene.borrow_mut().failing_viewport = true;
        self
    }

    pub fn scene(&self) -> Rc<RefCell<Scene>> {
        self.scene.clone()
    }
}

impl MapWidget for RecordingWidget {
    type Handle = OverlayId;

    fn create_marker(&mut self, marker: &MarkerSpec) -> Result<Self::Handle, super::Error> {
        self.scene
            .borrow_mut()
            .insert(RecordedOverlay::Marker(marker.clone()))
    }

    fn create_polyline(&mut self, polyline: &PolylineSpec) -> Result<Self::Handle, super::Error> {
        self.scene
            .borrow_mut()
            .insert(RecordedOverlay::Polyline(polyline.clone()))
    }

    fn destroy(&mut self, handle: Self::Handle) -> Result<(), super::Error> {
        let mut scene = self.scene.borrow_mut();
        // A failing destroy still releases the overlay, the way an SDK
        // throwing during teardown leaves nothing usable behind.
        let removed = scene.overlays.remove(&handle);
        if removed.is_none() {
            return Err(super::Error::UnknownOverlay(handle.0));
        }
        scene.destroyed += 1;
        if scene.failing_destroys {
            return Err(super::Error::Rejected(format!("destroy {handle}")));
        }
        Ok(())
    }

    fn set_center(&mut self, center: Coordinate) -> Result<(), super::Error> {
        let mut scene = self.scene.borrow_mut();
        if scene.failing_viewport {
            return Err(super::Error::Rejected("set_center".into()));
        }
        scene.center = Some(center);
        Ok(())
    }

    fn set_zoom(&mut self, zoom: f64) -> Result<(), super::Error> {
        let mut scene = self.scene.borrow_mut();
        if scene.failing_viewport {
            return Err(super::Error::Rejected("set_zoom".into()));
        }
        scene.zoom = Some(zoom);
        Ok(())
    }
}

#[test]
fn failing_create_does_not_consume_an_id_test() {
    let mut widget = RecordingWidget::new().failing_creates([0]);
    let spec = PolylineSpec {
        coordinates: vec![],
        color: "#000".into(),
        width: 1.0,
    };
    assert!(widget.create_polyline(&spec).is_err());
    let id = widget.create_polyline(&spec).unwrap();
    assert_eq!(id, OverlayId(0));
    assert_eq!(widget.scene().borrow().live_overlays(), 1);
    widget.destroy(id).unwrap();
    assert_eq!(widget.destroy(id), Err(super::Error::UnknownOverlay(0)));
}
