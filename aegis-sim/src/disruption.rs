//! Roadblock injection and the freeze half of the disruption machine.
//!
//! Injecting a roadblock picks an obstruction point ~600 m ahead of
//! the vehicle, freezes the simulation a few route points before it,
//! and hands the caller everything needed to start the background
//! reroute. The splice itself lives in [`crate::splice`].

use std::time::Instant;

use tracing::debug;

use aegis_config::RoadblockConfig;
use aegis_core::geo::{self, GeoPoint};
use aegis_core::route::RouteMeta;

use crate::context::{Roadblock, SessionState, SimulationContext};
use crate::interpolate::{interpolate, TrackPoint};

/// Everything decided at injection time: where the obstruction sits,
/// where the vehicle freezes, and what the background reroute request
/// needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadblockPlan {
    pub roadblock: Roadblock,
    pub freeze_stop_index: usize,
    /// Reroute start: the frozen stop point.
    pub reroute_start: GeoPoint,
    /// Trip destination, unchanged by the disruption.
    pub reroute_end: GeoPoint,
}

/// Index of the route coordinate closest to `position`.
pub fn closest_index(route: &RouteMeta, position: GeoPoint) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, &coord) in route.coords().iter().enumerate() {
        let d = geo::haversine_m(position, coord);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// Plans a roadblock ahead of the current position.
///
/// Walks the cumulative distance array forward by
/// `config.ahead_distance_m` from the closest route point, clamped so
/// the obstruction never lands within the last few points of the
/// route. Returns `None` when the trip is not running or the route is
/// too short to place an obstruction and still stop before it.
pub fn plan_roadblock(
    ctx: &SimulationContext,
    now: Instant,
    config: &RoadblockConfig,
) -> Option<RoadblockPlan> {
    if ctx.state != SessionState::Running || ctx.frozen {
        return None;
    }

    let route = &ctx.active_route;
    let len = route.len();
    if len <= config.tail_guard_points + 1 {
        return None;
    }

    let sim_s = ctx.clock.elapsed_sim_s(now);
    let position = interpolate(route, sim_s).position;
    let here = closest_index(route, position);

    let cum = route.cum_dist_m();
    // Last index still within the ahead distance of the vehicle.
    let mut obstruction = here;
    while obstruction + 1 < len && cum[obstruction + 1] - cum[here] <= config.ahead_distance_m {
        obstruction += 1;
    }
    // Never within the last handful of points of the route.
    obstruction = obstruction.min(len - 1 - config.tail_guard_points);
    if obstruction <= here {
        return None;
    }

    let freeze_stop_index = obstruction.saturating_sub(config.stop_back_points).max(here);

    debug!(
        here,
        obstruction,
        freeze_stop_index,
        ahead_m = cum[obstruction] - cum[here],
        "Planned roadblock"
    );

    Some(RoadblockPlan {
        roadblock: Roadblock {
            location: route.coords()[obstruction],
            stop_index: obstruction,
        },
        freeze_stop_index,
        reroute_start: route.coords()[freeze_stop_index],
        reroute_end: route.last(),
    })
}

/// Applies a planned roadblock: the context freezes and awaits the
/// background reroute.
pub fn apply_roadblock(ctx: &mut SimulationContext, plan: &RoadblockPlan) {
    ctx.roadblock = Some(plan.roadblock);
    ctx.freeze_stop_index = Some(plan.freeze_stop_index);
    ctx.frozen = true;
    ctx.state = SessionState::FrozenAwaitingReroute;
}

/// One frozen tick: clamps the reported position to the stop point and
/// stalls the clock so resuming does not jump simulated time forward.
///
/// Returns the clamped track point, or `None` if the context is not
/// actually frozen.
pub fn hold_frozen(ctx: &mut SimulationContext, now: Instant) -> Option<TrackPoint> {
    let stop = ctx.freeze_stop_index?;
    if !ctx.frozen {
        return None;
    }

    let route = &ctx.active_route;
    let coords = route.coords();
    let held_sim_s = route.cum_time_s()[stop];
    ctx.clock.stall(now, held_sim_s);

    let bearing = if stop + 1 < coords.len() {
        geo::bearing_deg(coords[stop], coords[stop + 1])
    } else {
        geo::bearing_deg(coords[stop - 1], coords[stop])
    };

    Some(TrackPoint {
        position: coords[stop],
        bearing_deg: bearing,
        traveled_m: route.cum_dist_m()[stop],
        segment_index: stop.min(coords.len() - 2),
        arrived: false,
    })
}

/// Applies a pending reroute if one has arrived: the spliced route
/// becomes active, the clock restarts at simulated time zero, and all
/// frozen state clears. Returns whether a reroute was applied.
pub fn apply_pending(ctx: &mut SimulationContext, now: Instant) -> bool {
    let Some(reroute) = ctx.pending_reroute.take() else {
        return false;
    };
    ctx.active_route = reroute;
    ctx.clock.restart(now);
    ctx.frozen = false;
    ctx.freeze_stop_index = None;
    ctx.roadblock = None;
    ctx.state = SessionState::Running;
    true
}
