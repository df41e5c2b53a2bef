//! Sector polyline for the map card.

use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

/// A GPS coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Bounding box for a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    pub fn from_points(points: &[GpsPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut b = Bounds {
            min_lat: f64::MAX,
            max_lat: f64::MIN,
            min_lng: f64::MAX,
            max_lng: f64::MIN,
        };
        for p in points {
            b.min_lat = b.min_lat.min(p.latitude);
            b.max_lat = b.max_lat.max(p.latitude);
            b.min_lng = b.min_lng.min(p.longitude);
            b.max_lng = b.max_lng.max(p.longitude);
        }
        Some(b)
    }

    pub fn center(&self) -> GpsPoint {
        GpsPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

/// Payload of `GET /api/route/latlon/sector/{sector}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorRoute {
    /// `[lat, lon]` pairs along the sector
    #[serde(default)]
    pub latlon: Vec<[f64; 2]>,
}

impl SectorRoute {
    /// Valid points along the route; malformed coordinates are dropped.
    pub fn points(&self) -> Vec<GpsPoint> {
        self.latlon
            .iter()
            .map(|&[lat, lon]| GpsPoint::new(lat, lon))
            .filter(GpsPoint::is_valid)
            .collect()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.points())
    }

    pub fn center(&self) -> Option<GpsPoint> {
        self.bounds().map(|b| b.center())
    }

    /// Great-circle length of the polyline in metres.
    pub fn length_m(&self) -> f64 {
        self.points()
            .windows(2)
            .map(|w| haversine_distance(&w[0], &w[1]))
            .sum()
    }
}

/// Calculate haversine distance between two GPS points in meters
fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}
