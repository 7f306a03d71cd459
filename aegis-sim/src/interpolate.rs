//! Position interpolation along a route's timeline.

use aegis_core::geo::{self, GeoPoint};
use aegis_core::route::RouteMeta;

/// Exact position on the polyline at one simulated instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub position: GeoPoint,
    /// Degrees clockwise from north, `[0, 360)`.
    pub bearing_deg: f64,
    pub traveled_m: f64,
    pub segment_index: usize,
    /// Set when `sim_time_s >= total_time_s`. A normal terminal
    /// condition, not a failure.
    pub arrived: bool,
}

/// Interpolates the vehicle position at `sim_time_s` seconds into the
/// route. Pure function of route and time.
///
/// Binary search over the cumulative time array keeps the lookup
/// deterministic and bounds worst-case cost on long routes.
pub fn interpolate(route: &RouteMeta, sim_time_s: f64) -> TrackPoint {
    let coords = route.coords();
    let cum_time = route.cum_time_s();
    let cum_dist = route.cum_dist_m();
    let last = coords.len() - 1;

    let t = sim_time_s.max(0.0);
    if t >= route.total_time_s() {
        return TrackPoint {
            position: coords[last],
            bearing_deg: geo::bearing_deg(coords[last - 1], coords[last]),
            traveled_m: route.total_dist_m(),
            segment_index: last - 1,
            arrived: true,
        };
    }

    // Smallest i with cum_time[i] >= t.
    let i = cum_time.partition_point(|&ct| ct < t);
    if i == 0 {
        return TrackPoint {
            position: coords[0],
            bearing_deg: geo::bearing_deg(coords[0], coords[1]),
            traveled_m: 0.0,
            segment_index: 0,
            arrived: false,
        };
    }

    let dt = cum_time[i] - cum_time[i - 1];
    // Zero-duration segment: sit at its start rather than divide by zero.
    let frac = if dt > 0.0 {
        ((t - cum_time[i - 1]) / dt).clamp(0.0, 1.0)
    } else {
        0.0
    };

    TrackPoint {
        position: geo::lerp(coords[i - 1], coords[i], frac),
        bearing_deg: geo::bearing_deg(coords[i - 1], coords[i]),
        traveled_m: cum_dist[i - 1] + (cum_dist[i] - cum_dist[i - 1]) * frac,
        segment_index: i - 1,
        arrived: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn three_point_route() -> RouteMeta {
        RouteMeta::new(
            vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.001, 0.0),
                GeoPoint::new(0.003, 0.0),
            ],
            vec![0.0, 100.0, 300.0],
            vec![0.0, 10.0, 20.0],
            vec![],
            "dijkstra",
        )
        .unwrap()
    }

    #[test]
    fn starts_at_first_coordinate() {
        let route = three_point_route();
        let tp = interpolate(&route, 0.0);
        assert_eq!(tp.position, route.coords()[0]);
        assert_eq!(tp.traveled_m, 0.0);
        assert!(!tp.arrived);
    }

    #[test]
    fn midpoint_of_first_segment() {
        let route = three_point_route();
        let tp = interpolate(&route, 5.0);
        assert!((tp.position.lng - 0.0005).abs() < 1e-12);
        assert_eq!(tp.position.lat, 0.0);
        assert!((tp.traveled_m - 50.0).abs() < 1e-9);
        assert_eq!(tp.segment_index, 0);
    }

    #[test]
    fn ends_at_last_coordinate() {
        let route = three_point_route();
        let tp = interpolate(&route, route.total_time_s());
        assert_eq!(tp.position, route.coords()[2]);
        assert_eq!(tp.traveled_m, route.total_dist_m());
        assert!(tp.arrived);
    }

    #[test]
    fn overshoot_clamps_to_arrival() {
        let route = three_point_route();
        let tp = interpolate(&route, 10_000.0);
        assert_eq!(tp.position, route.coords()[2]);
        assert!(tp.arrived);
    }

    #[test]
    fn negative_time_clamps_to_start() {
        let route = three_point_route();
        let tp = interpolate(&route, -3.0);
        assert_eq!(tp.position, route.coords()[0]);
        assert!(!tp.arrived);
    }

    #[test]
    fn zero_duration_segment_does_not_divide_by_zero() {
        let route = RouteMeta::new(
            vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.001, 0.0),
                GeoPoint::new(0.001, 0.001),
                GeoPoint::new(0.002, 0.001),
            ],
            vec![0.0, 100.0, 100.0, 200.0],
            vec![0.0, 10.0, 10.0, 20.0],
            vec![],
            "dijkstra",
        )
        .unwrap();
        let tp = interpolate(&route, 10.0);
        assert!(tp.traveled_m.is_finite());
        assert!((tp.traveled_m - 100.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn traveled_distance_is_monotonic(t1 in 0.0f64..30.0, t2 in 0.0f64..30.0) {
            let route = three_point_route();
            let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            let a = interpolate(&route, lo);
            let b = interpolate(&route, hi);
            prop_assert!(a.traveled_m <= b.traveled_m + 1e-9);
        }

        #[test]
        fn bearing_stays_normalized(t in -5.0f64..40.0) {
            let route = three_point_route();
            let tp = interpolate(&route, t);
            prop_assert!((0.0..360.0).contains(&tp.bearing_deg));
        }
    }
}
