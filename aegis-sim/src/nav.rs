//! Live navigation state, recomputed every tick from the interpolated
//! position and the route's maneuver steps. Never stored.

use aegis_config::CameraConfig;
use aegis_core::route::{ManeuverKind, ManeuverStep, RouteMeta};

const FALLBACK_STREET: &str = "Unnamed road";
const ARRIVE_INSTRUCTION: &str = "Arrive at destination";

/// Navigation snapshot delivered to the render sink.
#[derive(Debug, Clone, PartialEq)]
pub struct NavLive {
    pub current_street: String,
    pub next_instruction: String,
    pub distance_to_next_m: f64,
    pub eta_remaining_s: f64,
    pub remaining_distance_m: f64,
    pub total_distance_m: f64,
    pub total_time_s: f64,
    pub algorithm: String,
    pub sim_speedup: f64,
    /// Whether the upcoming maneuver is a turn (drives the camera
    /// zoom hint).
    pub approaching_turn: bool,
}

/// Derives the live navigation snapshot.
///
/// `arrival_threshold_m` is the distance under which the deriver stops
/// promising further maneuvers and reports arrival instead.
pub fn derive_nav(
    route: &RouteMeta,
    traveled_m: f64,
    sim_time_s: f64,
    speedup: f64,
    arrival_threshold_m: f64,
) -> NavLive {
    let steps = route.steps();

    // Current street: the step whose half-open interval contains the
    // traveled distance, first step as fallback.
    let current = steps
        .iter()
        .find(|s| s.contains(traveled_m))
        .or_else(|| steps.first());
    let current_street = current
        .map(|s| s.street.clone())
        .unwrap_or_else(|| FALLBACK_STREET.to_string());

    let remaining_distance_m = (route.total_dist_m() - traveled_m).max(0.0);
    let eta_remaining_s = (route.total_time_s() - sim_time_s).max(0.0);

    let upcoming = next_step(steps, traveled_m);
    let (next_instruction, distance_to_next_m, approaching_turn) = match upcoming {
        Some(step) => (
            step.instruction.clone(),
            step.start_dist_m - traveled_m,
            step.kind == ManeuverKind::Turn,
        ),
        None if remaining_distance_m < arrival_threshold_m => {
            (ARRIVE_INSTRUCTION.to_string(), 0.0, false)
        }
        None => (
            // No qualifying step and not yet at the destination:
            // repeat the current step as a "proceed" fallback.
            current
                .map(|s| s.instruction.clone())
                .unwrap_or_else(|| "Proceed to destination".to_string()),
            remaining_distance_m,
            false,
        ),
    };

    NavLive {
        current_street,
        next_instruction,
        distance_to_next_m,
        eta_remaining_s,
        remaining_distance_m,
        total_distance_m: route.total_dist_m(),
        total_time_s: route.total_time_s(),
        algorithm: route.algorithm().to_string(),
        sim_speedup: speedup,
        approaching_turn,
    }
}

fn next_step(steps: &[ManeuverStep], traveled_m: f64) -> Option<&ManeuverStep> {
    steps
        .iter()
        .find(|s| s.kind != ManeuverKind::Depart && s.start_dist_m > traveled_m)
}

/// Camera zoom hint: ramps smoothly from the cruising zoom toward the
/// turn zoom as the distance to a turn-type maneuver shrinks under the
/// approach threshold.
pub fn camera_zoom_hint(nav: &NavLive, camera: &CameraConfig) -> f64 {
    if !nav.approaching_turn || nav.distance_to_next_m >= camera.approach_threshold_m {
        return camera.base_zoom;
    }
    let closeness = 1.0 - (nav.distance_to_next_m / camera.approach_threshold_m).clamp(0.0, 1.0);
    camera.base_zoom + (camera.turn_zoom - camera.base_zoom) * closeness
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::geo::GeoPoint;
    use proptest::prelude::*;

    fn route_with_steps() -> RouteMeta {
        let coords: Vec<GeoPoint> = (0..5).map(|i| GeoPoint::new(i as f64 * 0.001, 0.0)).collect();
        RouteMeta::new(
            coords,
            vec![0.0, 250.0, 500.0, 750.0, 1000.0],
            vec![0.0, 25.0, 50.0, 75.0, 100.0],
            vec![
                ManeuverStep {
                    instruction: "Head east on Main St".into(),
                    street: "Main St".into(),
                    start_dist_m: 0.0,
                    end_dist_m: 400.0,
                    kind: ManeuverKind::Depart,
                },
                ManeuverStep {
                    instruction: "Turn left onto Oak Ave".into(),
                    street: "Oak Ave".into(),
                    start_dist_m: 400.0,
                    end_dist_m: 1000.0,
                    kind: ManeuverKind::Turn,
                },
            ],
            "dijkstra",
        )
        .unwrap()
    }

    #[test]
    fn reports_current_street_and_next_turn() {
        let route = route_with_steps();
        let nav = derive_nav(&route, 100.0, 10.0, 10.0, 15.0);
        assert_eq!(nav.current_street, "Main St");
        assert_eq!(nav.next_instruction, "Turn left onto Oak Ave");
        assert!((nav.distance_to_next_m - 300.0).abs() < 1e-9);
        assert!(nav.approaching_turn);
    }

    #[test]
    fn falls_back_to_first_step_when_no_interval_matches() {
        let route = route_with_steps();
        // Past the last interval end.
        let nav = derive_nav(&route, 1000.0, 100.0, 10.0, 15.0);
        assert_eq!(nav.current_street, "Main St");
    }

    #[test]
    fn arrival_threshold_reports_arrive() {
        let route = route_with_steps();
        let nav = derive_nav(&route, 990.0, 99.0, 10.0, 15.0);
        assert_eq!(nav.next_instruction, "Arrive at destination");
        assert_eq!(nav.distance_to_next_m, 0.0);
    }

    #[test]
    fn repeats_current_step_when_no_upcoming_step() {
        let route = route_with_steps();
        // Past the turn's start, far from arrival.
        let nav = derive_nav(&route, 500.0, 50.0, 10.0, 15.0);
        assert_eq!(nav.next_instruction, "Turn left onto Oak Ave");
        assert!((nav.distance_to_next_m - 500.0).abs() < 1e-9);
    }

    #[test]
    fn empty_steps_use_fallbacks() {
        let route = RouteMeta::new(
            vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.001, 0.0)],
            vec![0.0, 100.0],
            vec![0.0, 10.0],
            vec![],
            "dijkstra",
        )
        .unwrap();
        let nav = derive_nav(&route, 0.0, 0.0, 1.0, 15.0);
        assert_eq!(nav.current_street, FALLBACK_STREET);
        assert_eq!(nav.next_instruction, "Proceed to destination");
    }

    #[test]
    fn zoom_ramps_up_near_turn() {
        let route = route_with_steps();
        let camera = CameraConfig::default();

        let far = derive_nav(&route, 100.0, 10.0, 10.0, 15.0);
        assert_eq!(camera_zoom_hint(&far, &camera), camera.base_zoom);

        let near = derive_nav(&route, 350.0, 35.0, 10.0, 15.0);
        let zoom = camera_zoom_hint(&near, &camera);
        assert!(zoom > camera.base_zoom);
        assert!(zoom <= camera.turn_zoom);

        let at_turn = derive_nav(&route, 399.9, 39.99, 10.0, 15.0);
        assert!(camera_zoom_hint(&at_turn, &camera) > zoom);
    }

    proptest! {
        #[test]
        fn eta_and_remaining_never_negative(
            traveled in -100.0f64..5000.0,
            sim_time in -100.0f64..5000.0,
        ) {
            let route = route_with_steps();
            let nav = derive_nav(&route, traveled, sim_time, 10.0, 15.0);
            prop_assert!(nav.eta_remaining_s >= 0.0);
            prop_assert!(nav.remaining_distance_m >= 0.0);
        }
    }
}
