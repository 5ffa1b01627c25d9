use crate::shared::geo::Coordinate;

/// Viewport and styling constants used by the synchronizer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub initial_center: Coordinate,
    pub initial_zoom: f64,
    pub single_marker_zoom: f64,
    pub multi_marker_zoom: f64,
    pub single_point_route_zoom: f64,
    pub multi_point_route_zoom: f64,
    pub focus_zoom: f64,
    pub nearby_zoom: f64,
    pub route_color: String,
    pub traffic_route_color: String,
    pub route_width: f64,
    pub highway_route_width: f64,
    pub marker_color: String,
    pub complex_color: String,
    pub closest_object_color: String,
    pub object_color: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            initial_center: Coordinate::new(37.6173, 55.7558),
            initial_zoom: 12.0,
            single_marker_zoom: 15.0,
            multi_marker_zoom: 13.0,
            single_point_route_zoom: 15.0,
            multi_point_route_zoom: 12.0,
            focus_zoom: 16.0,
            nearby_zoom: 14.0,
            route_color: "#00a85a".into(),
            traffic_route_color: "#ff6b35".into(),
            route_width: 6.0,
            highway_route_width: 8.0,
            marker_color: "#00a85a".into(),
            complex_color: "#2563eb".into(),
            closest_object_color: "#00a85a".into(),
            object_color: "#6b7280".into(),
        }
    }
}

impl ViewConfig {
    pub fn marker_zoom(&self, count: usize) -> f64 {
        if count == 1 {
            self.single_marker_zoom
        } else {
            self.multi_marker_zoom
        }
    }

    pub fn route_zoom(&self, count: usize) -> f64 {
        if count == 1 {
            self.single_point_route_zoom
        } else {
            self.multi_point_route_zoom
        }
    }
}
