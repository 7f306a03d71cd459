//! # aegis-routing
//!
//! Interface to the external routing collaborator. The shortest-path
//! algorithms themselves live behind an HTTP boundary; this crate owns
//! the wire shapes, the async provider trait, and validated conversion
//! of responses into [`aegis_core::route::RouteMeta`] values.
//!
//! A response missing any of `path_coordinates` / `cum_distance_m` /
//! `cum_time_s` is a fetch failure, never a partially usable result.

mod error;
mod provider;
mod wire;

pub use error::RoutingError;
pub use provider::{compare_algorithms, HttpRouteProvider, RouteProvider};
pub use wire::{Algorithm, LatLng, RouteRequest, RouteResponse, WireStep};
