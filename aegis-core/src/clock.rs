//! ## aegis-core::clock
//! **Explicit simulation clock**
//!
//! The clock is an `(origin, speedup)` pair. Simulated elapsed time is
//! always recomputed fresh from a single authoritative `now` read taken
//! once per tick, never accumulated incrementally, so repeated
//! wall-clock deltas cannot drift.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct SimClock {
    origin: Instant,
    speedup: f64,
}

impl SimClock {
    /// Starts a clock at simulated time zero.
    ///
    /// `speedup` must be > 0; it is clamped to a small positive floor
    /// rather than allowed to freeze or reverse time.
    pub fn start(now: Instant, speedup: f64) -> Self {
        Self {
            origin: now,
            speedup: speedup.max(f64::MIN_POSITIVE),
        }
    }

    pub fn speedup(&self) -> f64 {
        self.speedup
    }

    /// Simulated seconds elapsed as of `now`.
    pub fn elapsed_sim_s(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.origin).as_secs_f64() * self.speedup
    }

    /// Re-anchors the origin so that `elapsed_sim_s(now)` reads exactly
    /// `held_sim_s`. Called every tick while frozen: resuming later does
    /// not jump simulated time forward over the stall.
    pub fn stall(&mut self, now: Instant, held_sim_s: f64) {
        let wall_offset = Duration::from_secs_f64(held_sim_s.max(0.0) / self.speedup);
        self.origin = now - wall_offset;
    }

    /// Restarts simulated time at zero, used when a spliced route is
    /// applied and the new route's timeline begins.
    pub fn restart(&mut self, now: Instant) {
        self.origin = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_scales_with_speedup() {
        let t0 = Instant::now();
        let clock = SimClock::start(t0, 8.0);
        let later = t0 + Duration::from_secs(2);
        assert!((clock.elapsed_sim_s(later) - 16.0).abs() < 1e-9);
    }

    #[test]
    fn elapsed_is_zero_before_origin() {
        let t0 = Instant::now() + Duration::from_secs(10);
        let clock = SimClock::start(t0, 4.0);
        assert_eq!(clock.elapsed_sim_s(Instant::now()), 0.0);
    }

    #[test]
    fn stall_holds_sim_time_across_wall_time() {
        let t0 = Instant::now();
        let mut clock = SimClock::start(t0, 10.0);

        let t1 = t0 + Duration::from_secs(3);
        let held = clock.elapsed_sim_s(t1);

        // Wall time keeps advancing while frozen; re-anchoring each
        // tick keeps the simulated reading pinned.
        for extra in 1..5u64 {
            let tn = t1 + Duration::from_secs(extra);
            clock.stall(tn, held);
            assert!((clock.elapsed_sim_s(tn) - held).abs() < 1e-9);
        }
    }

    #[test]
    fn restart_returns_to_zero() {
        let t0 = Instant::now();
        let mut clock = SimClock::start(t0, 2.0);
        let t1 = t0 + Duration::from_secs(5);
        clock.restart(t1);
        assert_eq!(clock.elapsed_sim_s(t1), 0.0);
        assert!((clock.elapsed_sim_s(t1 + Duration::from_secs(1)) - 2.0).abs() < 1e-9);
    }
}
