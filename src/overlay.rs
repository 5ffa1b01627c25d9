use std::fmt::Display;

use crate::{
    events::{ComplexWithObjects, MarkerPoint, NearbyObject},
    routing::RouteGeometry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OverlayKind {
    Marker,
    Complex,
    NearbyObject,
    Route,
}

impl OverlayKind {
    const fn slot(self) -> usize {
        match self {
            OverlayKind::Marker => 0,
            OverlayKind::Complex => 1,
            OverlayKind::NearbyObject => 2,
            OverlayKind::Route => 3,
        }
    }
}

impl Display for OverlayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OverlayKind::Marker => "marker",
            OverlayKind::Complex => "complex",
            OverlayKind::NearbyObject => "nearby-object",
            OverlayKind::Route => "route",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Empty,
    Active,
}

/// What an overlay was drawn from.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlaySource {
    Point(MarkerPoint),
    Complex(ComplexWithObjects),
    NearbyObject { entity: String, object: NearbyObject },
    Route(RouteGeometry),
}

#[derive(Debug)]
pub struct OverlayHandle<H> {
    pub kind: OverlayKind,
    pub widget_ref: H,
    pub source: OverlaySource,
}

impl<H> OverlayHandle<H> {
    pub fn new(kind: OverlayKind, widget_ref: H, source: OverlaySource) -> Self {
        Self {
            kind,
            widget_ref,
            source,
        }
    }
}

/// Overlays currently on the map, grouped by kind.
///
/// The store never talks to the widget itself: removing overlays hands the
/// handles back so the owner can destroy them.
#[derive(Debug)]
pub struct OverlayStore<H> {
    slots: [Vec<OverlayHandle<H>>; 4],
}

impl<H> Default for OverlayStore<H> {
    fn default() -> Self {
        Self {
            slots: Default::default(),
        }
    }
}

impl<H> OverlayStore<H> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, handle: OverlayHandle<H>) {
        self.slots[handle.kind.slot()].push(handle);
    }

    pub fn take(&mut self, kind: OverlayKind) -> Vec<OverlayHandle<H>> {
        std::mem::take(&mut self.slots[kind.slot()])
    }

    pub fn take_all(&mut self) -> Vec<OverlayHandle<H>> {
        self.slots.iter_mut().flat_map(std::mem::take).collect()
    }

    pub fn handles(&self, kind: OverlayKind) -> &[OverlayHandle<H>] {
        &self.slots[kind.slot()]
    }

    pub fn count(&self, kind: OverlayKind) -> usize {
        self.slots[kind.slot()].len()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Vec::is_empty)
    }

    pub fn state(&self, kind: OverlayKind) -> OverlayState {
        if self.slots[kind.slot()].is_empty() {
            OverlayState::Empty
        } else {
            OverlayState::Active
        }
    }
}

#[test]
fn take_only_touches_one_kind_test() {
    let mut store: OverlayStore<u32> = OverlayStore::new();
    store.push(OverlayHandle::new(
        OverlayKind::Marker,
        1,
        OverlaySource::Point(MarkerPoint::new(37.0, 55.0)),
    ));
    store.push(OverlayHandle::new(
        OverlayKind::Route,
        2,
        OverlaySource::Route(RouteGeometry::default()),
    ));
    assert_eq!(store.state(OverlayKind::Marker), OverlayState::Active);

    let markers = store.take(OverlayKind::Marker);
    assert_eq!(markers.len(), 1);
    assert_eq!(store.state(OverlayKind::Marker), OverlayState::Empty);
    assert_eq!(store.state(OverlayKind::Route), OverlayState::Active);

    let rest = store.take_all();
    assert_eq!(rest.len(), 1);
    assert!(store.is_empty());
}
