//! Simulation tuning parameters.
//!
//! Everything the disruption manager, interpolator consumers, and race
//! animator treat as a constant lives here so tests and deployments can
//! override it without touching code.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Simulation tuning parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct SimulationConfig {
    /// Simulated-seconds-per-wall-second multiplier.
    #[serde(default = "default_speedup")]
    #[validate(range(min = 0.1, max = 1000.0))]
    pub speedup: f64,

    /// Frame-callback frequency driving the tick loop.
    #[serde(default = "default_tick_hz")]
    #[validate(range(min = 1, max = 240))]
    pub tick_hz: u32,

    /// Distance below which the deriver reports arrival.
    #[serde(default = "default_arrival_threshold")]
    #[validate(range(min = 1.0, max = 100.0))]
    pub arrival_threshold_m: f64,

    /// Camera zoom hint parameters.
    #[validate(nested)]
    #[serde(default)]
    pub camera: CameraConfig,

    /// Roadblock injection parameters.
    #[validate(nested)]
    #[serde(default)]
    pub roadblock: RoadblockConfig,

    /// Backtrack splice parameters.
    #[validate(nested)]
    #[serde(default)]
    pub splice: SpliceConfig,

    /// Algorithm race replay parameters.
    #[validate(nested)]
    #[serde(default)]
    pub race: RaceConfig,
}

fn default_speedup() -> f64 {
    10.0
}

fn default_tick_hz() -> u32 {
    60
}

fn default_arrival_threshold() -> f64 {
    15.0
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            speedup: default_speedup(),
            tick_hz: default_tick_hz(),
            arrival_threshold_m: default_arrival_threshold(),
            camera: CameraConfig::default(),
            roadblock: RoadblockConfig::default(),
            splice: SpliceConfig::default(),
            race: RaceConfig::default(),
        }
    }
}

/// Camera zoom hint configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CameraConfig {
    /// Distance to the next turn at which zoom starts ramping up.
    #[validate(range(min = 10.0, max = 1000.0))]
    pub approach_threshold_m: f64,

    /// Zoom level while cruising.
    #[validate(range(min = 1.0, max = 22.0))]
    pub base_zoom: f64,

    /// Zoom level reached right at the turn.
    #[validate(range(min = 1.0, max = 22.0))]
    pub turn_zoom: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            approach_threshold_m: 100.0,
            base_zoom: 15.5,
            turn_zoom: 17.0,
        }
    }
}

/// Roadblock injection configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct RoadblockConfig {
    /// How far ahead of the vehicle the obstruction is placed.
    #[validate(range(min = 50.0, max = 5000.0))]
    pub ahead_distance_m: f64,

    /// How many route points before the obstruction the vehicle stops.
    #[validate(range(min = 1, max = 20))]
    pub stop_back_points: usize,

    /// The obstruction is never placed within this many points of the
    /// route's end.
    #[validate(range(min = 2, max = 50))]
    pub tail_guard_points: usize,
}

impl Default for RoadblockConfig {
    fn default() -> Self {
        Self {
            ahead_distance_m: 600.0,
            stop_back_points: 3,
            tail_guard_points: 5,
        }
    }
}

/// Backtrack splice configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct SpliceConfig {
    /// Gap between stop point and new route start above which a lead-in
    /// segment is synthesized.
    #[validate(range(min = 1.0, max = 100.0))]
    pub gap_threshold_m: f64,

    /// Radius within which an old-route point counts as reaching the
    /// new route's start.
    #[validate(range(min = 1.0, max = 200.0))]
    pub snap_radius_m: f64,

    /// How many points behind the stop index the backtrack search
    /// walks.
    #[validate(range(min = 5, max = 500))]
    pub backtrack_window: usize,

    /// Assumed speed while maneuvering back to the junction.
    #[validate(range(min = 1.0, max = 30.0))]
    pub maneuver_speed_mps: f64,

    /// Lead-in duration floor.
    #[validate(range(min = 0.5, max = 30.0))]
    pub min_leadin_s: f64,
}

impl Default for SpliceConfig {
    fn default() -> Self {
        Self {
            gap_threshold_m: 10.0,
            snap_radius_m: 20.0,
            backtrack_window: 50,
            maneuver_speed_mps: 8.3,
            min_leadin_s: 2.0,
        }
    }
}

/// Algorithm race replay configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct RaceConfig {
    /// Shared wall-clock duration of one race replay.
    #[validate(range(min = 1.0, max = 60.0))]
    pub total_duration_s: f64,

    /// Share of each algorithm's lane spent on exploration; the rest
    /// reveals the final route.
    #[validate(custom(function = validation::validate_fraction))]
    pub explore_fraction: f64,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            total_duration_s: 5.0,
            explore_fraction: 0.6,
        }
    }
}
