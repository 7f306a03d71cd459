//! Logging render sink.
//!
//! Stands in for the map frontend: routes, throttled vehicle frames,
//! race phase transitions, and status lines all go to tracing.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::info;

use aegis_core::route::RouteMeta;
use aegis_engine::{RenderSink, VehicleFrame};
use aegis_sim::{NavLive, RaceFrame, RacePhase};

/// Log one vehicle frame out of this many. At 60 ticks/sec this keeps
/// the log at two lines a second.
const FRAME_LOG_STRIDE: u64 = 30;

#[derive(Default)]
pub struct LogRenderSink {
    frames_seen: AtomicU64,
    last_phase: Mutex<Option<RacePhase>>,
}

impl RenderSink for LogRenderSink {
    fn route_changed(&self, route: &RouteMeta) {
        info!(
            algorithm = route.algorithm(),
            points = route.len(),
            dist_m = format!("{:.0}", route.total_dist_m()),
            "Active route changed"
        );
    }

    fn vehicle_frame(&self, frame: &VehicleFrame, nav: &NavLive) {
        let n = self.frames_seen.fetch_add(1, Ordering::Relaxed);
        if n % FRAME_LOG_STRIDE != 0 && !frame.arrived {
            return;
        }
        info!(
            lng = format!("{:.5}", frame.position.lng),
            lat = format!("{:.5}", frame.position.lat),
            bearing = format!("{:.0}", frame.bearing_deg),
            street = %nav.current_street,
            next = %nav.next_instruction,
            in_m = format!("{:.0}", nav.distance_to_next_m),
            eta_s = format!("{:.0}", nav.eta_remaining_s),
            "Vehicle frame"
        );
    }

    fn race_frame(&self, frame: &RaceFrame) {
        let mut last = self.last_phase.lock();
        if *last == Some(frame.phase) {
            return;
        }
        *last = Some(frame.phase);
        info!(
            phase = ?frame.phase,
            left_explored = frame.left.explored_visible,
            right_explored = frame.right.explored_visible,
            left_route = frame.left.route_points_visible,
            right_route = frame.right.route_points_visible,
            "Race phase"
        );
    }

    fn status(&self, message: &str) {
        info!("{message}");
    }
}
