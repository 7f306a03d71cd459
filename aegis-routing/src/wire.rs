//! Wire shapes for the routing collaborator's JSON API.

use serde::{Deserialize, Serialize};

use aegis_core::geo::GeoPoint;
use aegis_core::route::{ManeuverKind, ManeuverStep, RouteMeta};

use crate::error::RoutingError;

/// A coordinate in `{lat, lng}` object form, as the request body uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Path-finding algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Dijkstra,
    Bmsssp,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::Bmsssp => "bmsssp",
        }
    }
}

/// One route-compute request.
#[derive(Debug, Clone, Serialize)]
pub struct RouteRequest {
    pub start: LatLng,
    pub end: LatLng,
    pub scenario_type: String,
    pub algorithm: Algorithm,
    /// Blocked edges as `[lat, lng]` pairs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_edges: Option<Vec<[f64; 2]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_exploration: Option<bool>,
}

/// A maneuver step as delivered on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireStep {
    pub instruction: String,
    pub street: String,
    pub start_distance_m: f64,
    pub end_distance_m: f64,
    pub maneuver: String,
}

impl WireStep {
    fn kind(&self) -> ManeuverKind {
        match self.maneuver.as_str() {
            "depart" => ManeuverKind::Depart,
            "arrive" => ManeuverKind::Arrive,
            "continue" => ManeuverKind::Continue,
            m if m.contains("turn") => ManeuverKind::Turn,
            _ => ManeuverKind::Continue,
        }
    }
}

/// One route-compute response. Coordinates arrive in `[lng, lat]`
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub path_coordinates: Option<Vec<[f64; 2]>>,
    #[serde(default)]
    pub snapped_start: Option<LatLng>,
    #[serde(default)]
    pub snapped_end: Option<LatLng>,
    pub algorithm: String,
    #[serde(default)]
    pub execution_time_ms: f64,
    #[serde(default)]
    pub total_distance_m: Option<f64>,
    #[serde(default)]
    pub total_time_s: Option<f64>,
    #[serde(default)]
    pub cum_distance_m: Option<Vec<f64>>,
    #[serde(default)]
    pub cum_time_s: Option<Vec<f64>>,
    #[serde(default)]
    pub steps: Vec<WireStep>,
    /// Explored graph edges as `[[lng, lat], [lng, lat]]` pairs,
    /// present when `include_exploration` was requested.
    #[serde(default)]
    pub explored_coords: Option<Vec<[[f64; 2]; 2]>>,
}

impl RouteResponse {
    /// Converts the response into a validated route value.
    ///
    /// Any of the three required arrays missing fails the whole fetch;
    /// the remaining invariants are enforced by `RouteMeta::new`.
    pub fn into_route_meta(self) -> Result<RouteMeta, RoutingError> {
        let coords = self
            .path_coordinates
            .ok_or_else(|| RoutingError::Malformed("missing path_coordinates".into()))?;
        let cum_dist = self
            .cum_distance_m
            .ok_or_else(|| RoutingError::Malformed("missing cum_distance_m".into()))?;
        let cum_time = self
            .cum_time_s
            .ok_or_else(|| RoutingError::Malformed("missing cum_time_s".into()))?;

        let coords: Vec<GeoPoint> = coords
            .into_iter()
            .map(|[lng, lat]| GeoPoint::new(lng, lat))
            .collect();
        let steps: Vec<ManeuverStep> = self
            .steps
            .iter()
            .map(|s| ManeuverStep {
                instruction: s.instruction.clone(),
                street: s.street.clone(),
                start_dist_m: s.start_distance_m,
                end_dist_m: s.end_distance_m,
                kind: s.kind(),
            })
            .collect();

        Ok(RouteMeta::new(
            coords,
            cum_dist,
            cum_time,
            steps,
            self.algorithm,
        )?)
    }

    /// Explored edges as coordinate pairs, empty when exploration was
    /// not requested.
    pub fn explored_segments(&self) -> Vec<(GeoPoint, GeoPoint)> {
        self.explored_coords
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|[[alng, alat], [blng, blat]]| {
                (GeoPoint::new(*alng, *alat), GeoPoint::new(*blng, *blat))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_response() -> RouteResponse {
        serde_json::from_value(serde_json::json!({
            "path_coordinates": [[-79.38, 43.65], [-79.39, 43.66], [-79.40, 43.67]],
            "algorithm": "dijkstra",
            "execution_time_ms": 42.5,
            "total_distance_m": 300.0,
            "total_time_s": 20.0,
            "cum_distance_m": [0.0, 100.0, 300.0],
            "cum_time_s": [0.0, 10.0, 20.0],
            "steps": [
                {"instruction": "Head north", "street": "Bay St",
                 "start_distance_m": 0.0, "end_distance_m": 150.0, "maneuver": "depart"},
                {"instruction": "Turn left onto Queen St", "street": "Queen St",
                 "start_distance_m": 150.0, "end_distance_m": 300.0, "maneuver": "turn-left"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn converts_full_response() {
        let route = full_response().into_route_meta().unwrap();
        assert_eq!(route.len(), 3);
        assert_eq!(route.total_dist_m(), 300.0);
        assert_eq!(route.steps().len(), 2);
        assert_eq!(route.steps()[1].kind, ManeuverKind::Turn);
        assert_eq!(route.algorithm(), "dijkstra");
    }

    #[test]
    fn missing_cum_time_fails_the_fetch() {
        let mut response = full_response();
        response.cum_time_s = None;
        assert!(matches!(
            response.into_route_meta(),
            Err(RoutingError::Malformed(_))
        ));
    }

    #[test]
    fn missing_path_fails_the_fetch() {
        let mut response = full_response();
        response.path_coordinates = None;
        assert!(matches!(
            response.into_route_meta(),
            Err(RoutingError::Malformed(_))
        ));
    }

    #[test]
    fn unknown_maneuver_defaults_to_continue() {
        let step = WireStep {
            instruction: "x".into(),
            street: "y".into(),
            start_distance_m: 0.0,
            end_distance_m: 1.0,
            maneuver: "roundabout-exit-3".into(),
        };
        assert_eq!(step.kind(), ManeuverKind::Continue);
    }

    #[test]
    fn explored_segments_default_empty() {
        assert!(full_response().explored_segments().is_empty());
    }
}
