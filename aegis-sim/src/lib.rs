//! # Aegis Simulator
//!
//! The Aegis simulator drives a simulated emergency vehicle along a
//! precomputed route in real time, derives turn-by-turn navigation
//! state from that position, and manages live disruptions by splicing
//! a background-computed alternate route into the running simulation
//! without teleporting the vehicle.
//!
//! ## Key Components:
//! - **Position Interpolator:** Exact position/bearing on the polyline
//!   for a given simulated time, pure and deterministic.
//! - **Navigation Deriver:** Live snapshot (current street, next
//!   maneuver, ETA) recomputed every tick, never stored.
//! - **Disruption Manager:** Freeze / background reroute / backtrack
//!   splice state machine.
//! - **Race Animator:** Side-by-side replay of two algorithms'
//!   exploration, scaled by their measured execution times.

pub mod context;
pub mod disruption;
pub mod interpolate;
pub mod nav;
pub mod race;
pub mod splice;

pub use context::{Roadblock, SessionState, SimulationContext};
pub use disruption::{
    apply_pending, apply_roadblock, hold_frozen, plan_roadblock, RoadblockPlan,
};
pub use interpolate::{interpolate, TrackPoint};
pub use nav::{camera_zoom_hint, derive_nav, NavLive};
pub use race::{AlgoReplay, LaneFrame, RaceAnimator, RaceData, RaceFrame, RacePhase};
pub use splice::{splice_routes, LeadIn, SpliceOutcome};
