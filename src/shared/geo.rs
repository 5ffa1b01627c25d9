use std::{fmt::Display, iter::Sum, ops::Add};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distance(f64);

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Add for Distance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Distance {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, distance| acc + distance)
    }
}

impl Distance {
    pub const fn from_meters(distance: f64) -> Self {
        Self(distance)
    }

    pub const fn from_kilometers(distance: f64) -> Self {
        Self(distance * 1000.0)
    }

    pub const fn as_meters(&self) -> f64 {
        self.0
    }
}

/// A point on the map. Serialized as a `[lon, lat]` pair, which is the
/// order both the widget SDK and the routing provider use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{} {}", self.longitude, self.latitude))
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((longitude, latitude): (f64, f64)) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(value: Coordinate) -> Self {
        (value.longitude, value.latitude)
    }
}

impl Coordinate {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }

    /// Great-circle distance between two points.
    pub fn distance(&self, coord: &Self) -> Distance {
        const R: f64 = 6371.0;
        let dist_lat = f64::to_radians(coord.latitude - self.latitude);
        let dist_lon = f64::to_radians(coord.longitude - self.longitude);
        let a = f64::powi(f64::sin(dist_lat / 2.0), 2)
            + f64::cos(f64::to_radians(self.latitude))
                * f64::cos(f64::to_radians(coord.latitude))
                * f64::sin(dist_lon / 2.0)
                * f64::sin(dist_lon / 2.0);
        let c = 2.0 * f64::atan2(f64::sqrt(a), f64::sqrt(1.0 - a));
        Distance::from_kilometers(R * c)
    }
}

/// Length of a polyline, following its points in order.
pub fn path_length(points: &[Coordinate]) -> Distance {
    points
        .windows(2)
        .map(|pair| pair[0].distance(&pair[1]))
        .sum()
}

#[test]
fn coordinate_wire_order_test() {
    let coordinate: Coordinate = serde_json::from_str("[37.6, 55.7]").unwrap();
    assert_eq!(coordinate.longitude, 37.6);
    assert_eq!(coordinate.latitude, 55.7);
    assert_eq!(serde_json::to_string(&coordinate).unwrap(), "[37.6,55.7]");
}

#[test]
fn distance_test() {
    let red_square = Coordinate::new(37.6208, 55.7539);
    let kremlin = Coordinate::new(37.6176, 55.7520);
    let d = red_square.distance(&kremlin);
    assert!(d.as_meters() > 200.0 && d.as_meters() < 400.0);
}

#[test]
fn path_length_test() {
    assert_eq!(path_length(&[]), Distance::default());
    assert_eq!(path_length(&[Coordinate::new(37.0, 55.0)]), Distance::default());
    let a = Coordinate::new(37.0, 55.0);
    let b = Coordinate::new(37.1, 55.1);
    let c = Coordinate::new(37.2, 55.2);
    let total = path_length(&[a, b, c]);
    assert_eq!(total, a.distance(&b) + b.distance(&c));
}

#[test]
fn distance_eq_test() {
    let dist_a = Distance::from_meters(1000.0);
    let dist_b = Distance::from_kilometers(1.0);
    assert_eq!(dist_a, dist_b)
}
