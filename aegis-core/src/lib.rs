//! # aegis-core
//!
//! Foundation layer for the emergency-vehicle simulation: route value
//! objects, geodesic helpers, and the explicit simulation clock.
//! Built with determinism and temporal consistency as primary design
//! constraints.
//!
//! ### Key Submodules:
//! - `route`: `RouteMeta` polyline + cumulative arrays + maneuver steps,
//!   validated once at construction and immutable afterwards
//! - `geo`: planar bearing, haversine distance, coordinate lerp
//! - `clock`: `SimClock` as an `(origin, speedup)` pair, recomputed
//!   fresh from one authoritative `now` read per tick

pub mod clock;
pub mod error;
pub mod geo;
pub mod route;

pub mod prelude {
    pub use crate::clock::SimClock;
    pub use crate::error::RouteError;
    pub use crate::geo::GeoPoint;
    pub use crate::route::{ManeuverKind, ManeuverStep, RouteMeta};
}

pub use error::RouteError;
