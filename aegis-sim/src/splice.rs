//! Backtrack splice: joining a background-computed reroute onto the
//! frozen end of the old route.
//!
//! The routing engine snaps the requested start to its own graph, so
//! the new route's first coordinate rarely coincides with the frozen
//! stop point. The splice bridges that gap with a synthetic lead-in:
//! either driving back along the old route to a junction near the new
//! start, or a direct connector when no backtrack point exists. A
//! residual jump of up to the snap radius at the junction is accepted
//! as-is; the original system tolerates it deliberately and the splice
//! does not de-duplicate the junction points.

use tracing::debug;

use aegis_config::SpliceConfig;
use aegis_core::geo::{self, GeoPoint};
use aegis_core::route::{ManeuverKind, ManeuverStep, RouteMeta};
use aegis_core::RouteError;

/// How the gap between old and new route was bridged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeadIn {
    /// Gap under threshold, new route applied as-is.
    None,
    /// Reversed old-route segment back to a junction.
    Backtrack {
        points: usize,
        distance_m: f64,
        duration_s: f64,
    },
    /// Straight two-point connector.
    Connector { distance_m: f64, duration_s: f64 },
}

#[derive(Debug, Clone)]
pub struct SpliceOutcome {
    pub route: RouteMeta,
    pub lead_in: LeadIn,
}

/// Builds the replacement route applied after a reroute completes.
///
/// `stop_index` is the frozen stop point on `old`; `new_route` is the
/// background-computed route starting from (roughly) that point. The
/// returned route's cumulative arrays are the concatenation of the
/// lead-in and the offset new route and stay monotonically
/// non-decreasing.
pub fn splice_routes(
    old: &RouteMeta,
    stop_index: usize,
    new_route: RouteMeta,
    config: &SpliceConfig,
) -> Result<SpliceOutcome, RouteError> {
    if stop_index >= old.len() {
        return Err(RouteError::Malformed(format!(
            "stop index {} outside route of {} points",
            stop_index,
            old.len()
        )));
    }

    let stop = old.coords()[stop_index];
    let new_start = new_route.first();
    let gap_m = geo::haversine_m(stop, new_start);

    if gap_m <= config.gap_threshold_m {
        debug!(gap_m, "Reroute start close enough, no lead-in");
        return Ok(SpliceOutcome {
            route: new_route,
            lead_in: LeadIn::None,
        });
    }

    let window_floor = stop_index.saturating_sub(config.backtrack_window);
    let junction = (window_floor..stop_index)
        .rev()
        .find(|&k| geo::haversine_m(old.coords()[k], new_start) <= config.snap_radius_m);

    let (lead_coords, lead_cum_dist, lead_dist_m, lead_time_s, lead_in) = match junction {
        Some(k) => {
            // Driving back to the junction: the old route's own points
            // between k and the stop index, reversed, with distances
            // taken from the old route's cumulative array.
            let coords: Vec<GeoPoint> = old.coords()[k..=stop_index].iter().rev().copied().collect();
            let old_cum = old.cum_dist_m();
            let total = old_cum[stop_index] - old_cum[k];
            let mut cum = Vec::with_capacity(coords.len());
            cum.push(0.0);
            for j in (k + 1..=stop_index).rev() {
                let step = old_cum[j] - old_cum[j - 1];
                cum.push(cum.last().copied().unwrap_or(0.0) + step);
            }
            let duration = (total / config.maneuver_speed_mps).max(config.min_leadin_s);
            let lead_in = LeadIn::Backtrack {
                points: coords.len(),
                distance_m: total,
                duration_s: duration,
            };
            (coords, cum, total, duration, lead_in)
        }
        None => {
            // No junction within the window: straight connector whose
            // distance is the straight-line gap. The new route's first
            // point becomes the connector's far end.
            let duration = (gap_m / config.maneuver_speed_mps).max(config.min_leadin_s);
            let lead_in = LeadIn::Connector {
                distance_m: gap_m,
                duration_s: duration,
            };
            (vec![stop], vec![0.0], gap_m, duration, lead_in)
        }
    };

    let lead_points = lead_coords.len();
    let lead_time_of = |cum_d: f64| -> f64 {
        if lead_dist_m > 0.0 {
            lead_time_s * (cum_d / lead_dist_m)
        } else {
            0.0
        }
    };

    let mut coords = lead_coords;
    coords.extend_from_slice(new_route.coords());

    let mut cum_dist: Vec<f64> = lead_cum_dist.clone();
    cum_dist.extend(new_route.cum_dist_m().iter().map(|d| d + lead_dist_m));

    let mut cum_time: Vec<f64> = lead_cum_dist.iter().map(|&d| lead_time_of(d)).collect();
    // Degenerate zero-distance backtrack still takes the floor time.
    if lead_dist_m <= 0.0 && lead_points > 1 {
        for (i, t) in cum_time.iter_mut().enumerate() {
            *t = lead_time_s * i as f64 / (lead_points - 1) as f64;
        }
    }
    cum_time.extend(new_route.cum_time_s().iter().map(|t| t + lead_time_s));

    let mut steps = Vec::with_capacity(new_route.steps().len() + 1);
    let lead_street = old
        .steps()
        .iter()
        .find(|s| s.contains(old.cum_dist_m()[stop_index]))
        .or_else(|| old.steps().first())
        .map(|s| s.street.clone())
        .unwrap_or_default();
    steps.push(ManeuverStep {
        instruction: "Double back and rejoin the road network".into(),
        street: lead_street,
        start_dist_m: 0.0,
        end_dist_m: lead_dist_m,
        kind: ManeuverKind::Depart,
    });
    steps.extend(new_route.steps().iter().map(|s| ManeuverStep {
        instruction: s.instruction.clone(),
        street: s.street.clone(),
        start_dist_m: s.start_dist_m + lead_dist_m,
        end_dist_m: s.end_dist_m + lead_dist_m,
        kind: s.kind,
    }));

    debug!(?lead_in, gap_m, "Spliced reroute onto frozen route");

    let algorithm = new_route.algorithm().to_string();
    Ok(SpliceOutcome {
        route: RouteMeta::new(coords, cum_dist, cum_time, steps, algorithm)?,
        lead_in,
    })
}
