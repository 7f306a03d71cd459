//! Render sink boundary.
//!
//! Map rendering, camera control, and HUD display live outside this
//! repository; the session only ever pushes snapshots through this
//! trait. The snapshot and the position frame delivered on one tick
//! are always computed from the same tick.

use aegis_core::geo::GeoPoint;
use aegis_core::route::RouteMeta;
use aegis_sim::{NavLive, RaceFrame};

/// Raw vehicle pose for marker and camera updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleFrame {
    pub position: GeoPoint,
    pub bearing_deg: f64,
    /// Increases smoothly when approaching a turn.
    pub camera_zoom: f64,
    pub arrived: bool,
}

/// Consumer of simulation output.
pub trait RenderSink: Send + Sync {
    /// A new or spliced route became active.
    fn route_changed(&self, route: &RouteMeta);

    /// Per-tick vehicle pose plus the navigation snapshot derived from
    /// the same tick.
    fn vehicle_frame(&self, frame: &VehicleFrame, nav: &NavLive);

    /// Per-tick race replay state while a race is active.
    fn race_frame(&self, frame: &RaceFrame);

    /// User-visible status line (fetch failures, arrival, ...).
    fn status(&self, message: &str);
}
