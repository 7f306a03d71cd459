//! Coordinate helpers shared by the interpolator and the splice logic.

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A map coordinate in `(lng, lat)` order, matching the routing
/// collaborator's polyline encoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// Great-circle distance in meters.
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Planar bearing from `a` to `b`, degrees clockwise from north,
/// normalized to `[0, 360)`.
pub fn bearing_deg(a: GeoPoint, b: GeoPoint) -> f64 {
    let dx = b.lng - a.lng;
    let dy = b.lat - a.lat;
    dx.atan2(dy).to_degrees().rem_euclid(360.0)
}

/// Linear interpolation between two coordinates, `t` in `[0, 1]`.
pub fn lerp(a: GeoPoint, b: GeoPoint, t: f64) -> GeoPoint {
    GeoPoint {
        lng: a.lng + (b.lng - a.lng) * t,
        lat: a.lat + (b.lat - a.lat) * t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearing_cardinal_directions() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert_eq!(bearing_deg(origin, GeoPoint::new(0.0, 1.0)), 0.0);
        assert_eq!(bearing_deg(origin, GeoPoint::new(1.0, 0.0)), 90.0);
        assert_eq!(bearing_deg(origin, GeoPoint::new(0.0, -1.0)), 180.0);
        assert_eq!(bearing_deg(origin, GeoPoint::new(-1.0, 0.0)), 270.0);
    }

    #[test]
    fn bearing_always_in_range() {
        let a = GeoPoint::new(-79.38, 43.65);
        let b = GeoPoint::new(-79.40, 43.64);
        let deg = bearing_deg(a, b);
        assert!((0.0..360.0).contains(&deg));
    }

    #[test]
    fn haversine_roughly_one_degree_latitude() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        let d = haversine_m(a, b);
        // One degree of latitude is ~111 km.
        assert!((d - 111_195.0).abs() < 200.0);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = GeoPoint::new(10.0, 20.0);
        let b = GeoPoint::new(12.0, 24.0);
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
        assert_eq!(lerp(a, b, 0.5), GeoPoint::new(11.0, 22.0));
    }
}
