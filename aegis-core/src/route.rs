//! Route value objects.
//!
//! A `RouteMeta` is immutable once constructed: the disruption logic
//! never mutates one in place, it only builds new instances and swaps
//! the pointer held by the simulation context.

use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::geo::GeoPoint;

/// Turn kind associated with a maneuver step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManeuverKind {
    Depart,
    Turn,
    Continue,
    Arrive,
}

/// An instruction segment of a route, valid over the half-open
/// distance interval `[start_dist_m, end_dist_m)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManeuverStep {
    pub instruction: String,
    pub street: String,
    pub start_dist_m: f64,
    pub end_dist_m: f64,
    pub kind: ManeuverKind,
}

impl ManeuverStep {
    pub fn contains(&self, traveled_m: f64) -> bool {
        traveled_m >= self.start_dist_m && traveled_m < self.end_dist_m
    }
}

/// An ordered polyline with parallel cumulative distance/time arrays
/// and maneuver steps, covering one trip from start to destination.
///
/// Invariants, enforced at construction:
/// - `coords`, `cum_dist_m`, `cum_time_s` have equal length >= 2
/// - both cumulative arrays start at 0 and are non-decreasing
///
/// Totals are derived from the last cumulative entries so they can
/// never disagree with the arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMeta {
    coords: Vec<GeoPoint>,
    cum_dist_m: Vec<f64>,
    cum_time_s: Vec<f64>,
    total_dist_m: f64,
    total_time_s: f64,
    steps: Vec<ManeuverStep>,
    algorithm: String,
}

impl RouteMeta {
    pub fn new(
        coords: Vec<GeoPoint>,
        cum_dist_m: Vec<f64>,
        cum_time_s: Vec<f64>,
        steps: Vec<ManeuverStep>,
        algorithm: impl Into<String>,
    ) -> Result<Self, RouteError> {
        if coords.len() < 2 {
            return Err(RouteError::Malformed(format!(
                "route needs at least 2 coordinates, got {}",
                coords.len()
            )));
        }
        if coords.len() != cum_dist_m.len() || coords.len() != cum_time_s.len() {
            return Err(RouteError::Malformed(format!(
                "array length mismatch: {} coords, {} distances, {} times",
                coords.len(),
                cum_dist_m.len(),
                cum_time_s.len()
            )));
        }
        for (name, cum) in [("cum_dist_m", &cum_dist_m), ("cum_time_s", &cum_time_s)] {
            if cum[0] != 0.0 {
                return Err(RouteError::Malformed(format!(
                    "{name} must start at 0, got {}",
                    cum[0]
                )));
            }
            if cum.windows(2).any(|w| w[1] < w[0]) {
                return Err(RouteError::Malformed(format!("{name} is not non-decreasing")));
            }
        }

        let total_dist_m = *cum_dist_m.last().unwrap_or(&0.0);
        let total_time_s = *cum_time_s.last().unwrap_or(&0.0);
        Ok(Self {
            coords,
            cum_dist_m,
            cum_time_s,
            total_dist_m,
            total_time_s,
            steps,
            algorithm: algorithm.into(),
        })
    }

    pub fn coords(&self) -> &[GeoPoint] {
        &self.coords
    }

    pub fn cum_dist_m(&self) -> &[f64] {
        &self.cum_dist_m
    }

    pub fn cum_time_s(&self) -> &[f64] {
        &self.cum_time_s
    }

    pub fn total_dist_m(&self) -> f64 {
        self.total_dist_m
    }

    pub fn total_time_s(&self) -> f64 {
        self.total_time_s
    }

    pub fn steps(&self) -> &[ManeuverStep] {
        &self.steps
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn first(&self) -> GeoPoint {
        self.coords[0]
    }

    pub fn last(&self) -> GeoPoint {
        self.coords[self.coords.len() - 1]
    }
}
