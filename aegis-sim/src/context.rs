//! Mutable simulation state, owned exclusively by one running session.
//!
//! All mutation is funneled through the single-threaded tick/command
//! path; the context is replaced wholesale when a scenario changes,
//! never shared across sessions.

use std::time::Instant;

use aegis_core::clock::SimClock;
use aegis_core::geo::GeoPoint;
use aegis_core::route::RouteMeta;

/// Trip-level state of the disruption machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    FrozenAwaitingReroute,
    /// Trip complete or cancelled.
    Idle,
}

/// An injected obstruction, cleared when its reroute is applied or the
/// scenario resets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Roadblock {
    pub location: GeoPoint,
    /// Index into the active route's coords at time of injection.
    pub stop_index: usize,
}

/// State for one active trip.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub active_route: RouteMeta,
    pub clock: SimClock,
    pub state: SessionState,
    pub frozen: bool,
    /// Index beyond which position must not advance while frozen.
    pub freeze_stop_index: Option<usize>,
    /// Computed but not yet applied replacement route.
    pub pending_reroute: Option<RouteMeta>,
    pub roadblock: Option<Roadblock>,
}

impl SimulationContext {
    /// Starts a fresh trip on `route` at simulated time zero.
    pub fn new(route: RouteMeta, now: Instant, speedup: f64) -> Self {
        Self {
            active_route: route,
            clock: SimClock::start(now, speedup),
            state: SessionState::Running,
            frozen: false,
            freeze_stop_index: None,
            pending_reroute: None,
            roadblock: None,
        }
    }
}
