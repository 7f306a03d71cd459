//! Side-by-side replay of two path-finding algorithms.
//!
//! Both algorithms replay on one shared wall-clock timeline; each
//! lane's own duration is scaled by its measured execution time so the
//! faster algorithm visibly finishes first while total demo time stays
//! bounded. Frames are pure functions of `(start, now)`, so once a
//! lane completes its frame simply stops changing and the final frame
//! is held until a new race replaces the animator.

use std::time::Instant;

use aegis_config::RaceConfig;
use aegis_core::geo::GeoPoint;

/// One algorithm's recorded run.
#[derive(Debug, Clone)]
pub struct AlgoReplay {
    pub algorithm: String,
    pub final_coords: Vec<GeoPoint>,
    pub explored: Vec<(GeoPoint, GeoPoint)>,
    pub exec_ms: f64,
}

/// Immutable input for exactly one replay.
#[derive(Debug, Clone)]
pub struct RaceData {
    pub left: AlgoReplay,
    pub right: AlgoReplay,
}

/// Overall animation phase across both lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RacePhase {
    Exploring,
    Routing,
    Done,
}

/// Render state for one lane at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneFrame {
    /// How many explored segments are visible.
    pub explored_visible: usize,
    pub exploration_complete: bool,
    /// How many points of the final polyline are drawn.
    pub route_points_visible: usize,
    pub done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceFrame {
    pub left: LaneFrame,
    pub right: LaneFrame,
    pub phase: RacePhase,
}

/// Replays one `RaceData` on its own timeline, independent of the main
/// simulation.
#[derive(Debug, Clone)]
pub struct RaceAnimator {
    data: RaceData,
    total_s: f64,
    explore_fraction: f64,
    started_at: Instant,
}

impl RaceAnimator {
    pub fn start(data: RaceData, config: &RaceConfig, now: Instant) -> Self {
        Self {
            data,
            total_s: config.total_duration_s,
            explore_fraction: config.explore_fraction,
            started_at: now,
        }
    }

    pub fn data(&self) -> &RaceData {
        &self.data
    }

    /// Wall-clock duration allotted to one lane:
    /// `total * own_exec / max(exec)`, preserving the ratio of the real
    /// execution times.
    fn lane_duration_s(&self, exec_ms: f64) -> f64 {
        let slowest = self.data.left.exec_ms.max(self.data.right.exec_ms);
        if slowest <= 0.0 {
            return 0.0;
        }
        self.total_s * (exec_ms.max(0.0) / slowest)
    }

    fn lane_frame(&self, replay: &AlgoReplay, elapsed_s: f64) -> LaneFrame {
        let duration_s = self.lane_duration_s(replay.exec_ms);
        let segments = replay.explored.len();
        let points = replay.final_coords.len();

        if duration_s <= 0.0 || elapsed_s >= duration_s {
            return LaneFrame {
                explored_visible: segments,
                exploration_complete: true,
                route_points_visible: points,
                done: true,
            };
        }

        let explore_s = duration_s * self.explore_fraction;
        if elapsed_s < explore_s {
            let progress = elapsed_s / explore_s;
            return LaneFrame {
                explored_visible: ((segments as f64) * progress) as usize,
                exploration_complete: false,
                route_points_visible: 0,
                done: false,
            };
        }

        // Reveal phase: all exploration shown at once, the final route
        // drawn progressively first point to last.
        let reveal_s = duration_s - explore_s;
        let progress = if reveal_s > 0.0 {
            ((elapsed_s - explore_s) / reveal_s).clamp(0.0, 1.0)
        } else {
            1.0
        };
        LaneFrame {
            explored_visible: segments,
            exploration_complete: true,
            route_points_visible: ((points as f64) * progress) as usize,
            done: false,
        }
    }

    /// Frame at `now`. Pure: holds the final frame forever once both
    /// lanes complete.
    pub fn frame(&self, now: Instant) -> RaceFrame {
        let elapsed_s = now.saturating_duration_since(self.started_at).as_secs_f64();
        let left = self.lane_frame(&self.data.left, elapsed_s);
        let right = self.lane_frame(&self.data.right, elapsed_s);

        let phase = if !left.exploration_complete || !right.exploration_complete {
            RacePhase::Exploring
        } else if !left.done || !right.done {
            RacePhase::Routing
        } else {
            RacePhase::Done
        };

        RaceFrame { left, right, phase }
    }

    pub fn is_done(&self, now: Instant) -> bool {
        self.frame(now).phase == RacePhase::Done
    }
}
