//! The simulation session: one tick loop, one command channel, one
//! outcome channel for background fetches.
//!
//! All simulation state lives on the loop task; background work only
//! ever reports back through `FetchOutcome` messages tagged with a
//! generation counter, so a superseded fetch can never mutate state it
//! no longer owns.

use std::sync::Arc;
use std::time::Instant;

use opentelemetry::KeyValue;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

use aegis_config::{AegisConfig, SimulationConfig};
use aegis_core::geo::GeoPoint;
use aegis_routing::{
    compare_algorithms, Algorithm, LatLng, RouteProvider, RouteRequest, RouteResponse,
    RoutingError,
};
use aegis_sim::{
    apply_pending, apply_roadblock, camera_zoom_hint, derive_nav, hold_frozen, interpolate,
    plan_roadblock, splice_routes, AlgoReplay, NavLive, RaceAnimator, RaceData, SessionState,
    SimulationContext, TrackPoint,
};
use aegis_telemetry::{EventLogger, MetricsRecorder};

use crate::error::SessionError;
use crate::sink::{RenderSink, VehicleFrame};

/// Everything the outside world may ask of a running session.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Fetch the scenario's route and start driving it.
    ApplyScenario { key: String },
    /// Place an obstruction ahead of the vehicle on the active trip.
    InjectRoadblock,
    /// Fetch both algorithms' routes for the scenario and replay them.
    StartRace { key: String },
    /// Drop the active trip and cancel in-flight route fetches.
    CancelRoute,
}

/// Settled result of a background fetch, delivered back to the loop.
enum FetchOutcome {
    InitialRoute {
        generation: u64,
        result: Result<RouteResponse, RoutingError>,
    },
    Reroute {
        generation: u64,
        started: Instant,
        result: Result<RouteResponse, RoutingError>,
    },
    Race {
        generation: u64,
        result: Result<(RouteResponse, RouteResponse), RoutingError>,
    },
}

/// Cloneable sender half used to drive a running session.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub async fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::ChannelClosed)
    }
}

/// Owns all mutable simulation state. Consumed by [`run`](Self::run);
/// the session ends when every [`SessionHandle`] is dropped.
pub struct SimulationSession {
    config: Arc<AegisConfig>,
    provider: Arc<dyn RouteProvider>,
    sink: Arc<dyn RenderSink>,
    metrics: MetricsRecorder,

    commands: mpsc::Receiver<SessionCommand>,
    outcomes_tx: mpsc::Sender<FetchOutcome>,
    outcomes_rx: mpsc::Receiver<FetchOutcome>,

    ctx: Option<SimulationContext>,
    race: Option<RaceAnimator>,
    scenario_key: Option<String>,
    /// Effective clock speedup for the current scenario.
    speedup: f64,

    route_generation: u64,
    reroute_generation: u64,
    race_generation: u64,
    route_task: Option<JoinHandle<()>>,
    reroute_task: Option<JoinHandle<()>>,
    race_task: Option<JoinHandle<()>>,
}

impl SimulationSession {
    pub fn new(
        config: AegisConfig,
        provider: Arc<dyn RouteProvider>,
        sink: Arc<dyn RenderSink>,
        metrics: MetricsRecorder,
    ) -> (Self, SessionHandle) {
        let (commands_tx, commands_rx) = mpsc::channel(32);
        let (outcomes_tx, outcomes_rx) = mpsc::channel(8);
        let speedup = config.simulation.speedup;
        let session = Self {
            config: Arc::new(config),
            provider,
            sink,
            metrics,
            commands: commands_rx,
            outcomes_tx,
            outcomes_rx,
            ctx: None,
            race: None,
            scenario_key: None,
            speedup,
            route_generation: 0,
            reroute_generation: 0,
            race_generation: 0,
            route_task: None,
            reroute_task: None,
            race_task: None,
        };
        (session, SessionHandle { commands: commands_tx })
    }

    /// Runs the session to completion: ticks at `tick_hz`, interleaved
    /// with commands and settled fetch outcomes on the same task.
    #[instrument(skip(self))]
    pub async fn run(mut self) -> Result<(), SessionError> {
        let period =
            std::time::Duration::from_secs_f64(1.0 / f64::from(self.config.simulation.tick_hz));
        let mut frames = tokio::time::interval(period);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            tick_hz = self.config.simulation.tick_hz,
            "Simulation session started"
        );
        loop {
            tokio::select! {
                _ = frames.tick() => self.on_tick(Instant::now()),
                outcome = self.outcomes_rx.recv() => {
                    if let Some(outcome) = outcome {
                        self.on_outcome(outcome, Instant::now()).await;
                    }
                }
                command = self.commands.recv() => match command {
                    Some(command) => self.on_command(command, Instant::now()).await,
                    None => break,
                },
            }
        }
        self.abort_fetches();
        info!("Simulation session ended");
        Ok(())
    }

    fn on_tick(&mut self, now: Instant) {
        self.metrics.inc_ticks();
        self.drive_tick(now);
        self.race_tick(now);
    }

    /// Advances the active trip by one frame. Exactly one vehicle frame
    /// (or none, when idle) leaves the session per tick, and the nav
    /// snapshot sent with it is derived from the same tick.
    fn drive_tick(&mut self, now: Instant) {
        let cfg = &self.config.simulation;
        let mut applied = None;
        let mut output = None;

        if let Some(ctx) = self.ctx.as_mut() {
            match ctx.state {
                SessionState::Idle => {}
                SessionState::FrozenAwaitingReroute => {
                    if apply_pending(ctx, now) {
                        // Spliced route active, clock back at simulated
                        // time zero. Emit the first frame of it on this
                        // same tick.
                        applied = Some(ctx.active_route.clone());
                        output = Some(Self::snapshot(ctx, now, cfg));
                    } else if let Some(track) = hold_frozen(ctx, now) {
                        let nav = Self::nav_for(ctx, &track, now, cfg);
                        output = Some((track, nav));
                    }
                }
                SessionState::Running => {
                    let (track, nav) = Self::snapshot(ctx, now, cfg);
                    if track.arrived {
                        ctx.state = SessionState::Idle;
                    }
                    output = Some((track, nav));
                }
            }
        }

        if let Some(route) = applied {
            self.metrics.reroutes.inc();
            info!(algorithm = route.algorithm(), "Reroute applied");
            self.sink.route_changed(&route);
        }
        if let Some((track, nav)) = output {
            let frame = VehicleFrame {
                position: track.position,
                bearing_deg: track.bearing_deg,
                camera_zoom: camera_zoom_hint(&nav, &cfg.camera),
                arrived: track.arrived,
            };
            self.sink.vehicle_frame(&frame, &nav);
            if track.arrived {
                info!("Trip complete");
                self.sink.status("Arrived at destination");
            }
        }
    }

    fn snapshot(
        ctx: &SimulationContext,
        now: Instant,
        cfg: &SimulationConfig,
    ) -> (TrackPoint, NavLive) {
        let sim_s = ctx.clock.elapsed_sim_s(now);
        let track = interpolate(&ctx.active_route, sim_s);
        let nav = Self::nav_for(ctx, &track, now, cfg);
        (track, nav)
    }

    fn nav_for(
        ctx: &SimulationContext,
        track: &TrackPoint,
        now: Instant,
        cfg: &SimulationConfig,
    ) -> NavLive {
        derive_nav(
            &ctx.active_route,
            track.traveled_m,
            ctx.clock.elapsed_sim_s(now),
            ctx.clock.speedup(),
            cfg.arrival_threshold_m,
        )
    }

    fn race_tick(&self, now: Instant) {
        if let Some(race) = &self.race {
            self.sink.race_frame(&race.frame(now));
        }
    }

    async fn on_command(&mut self, command: SessionCommand, now: Instant) {
        match command {
            SessionCommand::ApplyScenario { key } => self.apply_scenario(key),
            SessionCommand::InjectRoadblock => self.inject_roadblock(now).await,
            SessionCommand::StartRace { key } => self.start_race(key),
            SessionCommand::CancelRoute => self.cancel_route(),
        }
    }

    /// Looks up the scenario and kicks off its route fetch. The trip
    /// starts when the outcome arrives; any previous trip is dropped
    /// immediately.
    fn apply_scenario(&mut self, key: String) {
        let scenario = match self.config.scenario(&key) {
            Ok(scenario) => scenario.clone(),
            Err(e) => {
                warn!("{e}");
                self.sink.status(&e.to_string());
                return;
            }
        };

        self.cancel_route();
        self.speedup = scenario.speedup.unwrap_or(self.config.simulation.speedup);
        self.scenario_key = Some(key.clone());

        self.route_generation += 1;
        let generation = self.route_generation;
        let request = RouteRequest {
            start: LatLng {
                lat: scenario.start.lat,
                lng: scenario.start.lng,
            },
            end: LatLng {
                lat: scenario.end.lat,
                lng: scenario.end.lng,
            },
            scenario_type: key.clone(),
            algorithm: Algorithm::Dijkstra,
            blocked_edges: None,
            include_exploration: None,
        };

        info!(scenario = %key, label = %scenario.label, "Fetching scenario route");
        let provider = Arc::clone(&self.provider);
        let outcomes = self.outcomes_tx.clone();
        self.route_task = Some(tokio::spawn(async move {
            let result = provider.compute_route(request).await;
            let _ = outcomes
                .send(FetchOutcome::InitialRoute { generation, result })
                .await;
        }));
    }

    /// Plans and applies a roadblock, then starts the background
    /// reroute fetch from the freeze stop point with the obstructed
    /// location blocked.
    async fn inject_roadblock(&mut self, now: Instant) {
        let Some(ctx) = self.ctx.as_mut() else {
            self.sink.status("No active trip to disrupt");
            return;
        };
        let Some(plan) = plan_roadblock(ctx, now, &self.config.simulation.roadblock) else {
            warn!("Roadblock rejected: trip not running or too near the destination");
            return;
        };
        apply_roadblock(ctx, &plan);

        if let Some(task) = self.reroute_task.take() {
            task.abort();
        }
        self.reroute_generation += 1;
        let generation = self.reroute_generation;
        let request = RouteRequest {
            start: LatLng {
                lat: plan.reroute_start.lat,
                lng: plan.reroute_start.lng,
            },
            end: LatLng {
                lat: plan.reroute_end.lat,
                lng: plan.reroute_end.lng,
            },
            scenario_type: self.scenario_key.clone().unwrap_or_default(),
            algorithm: Algorithm::Dijkstra,
            blocked_edges: Some(vec![[plan.roadblock.location.lat, plan.roadblock.location.lng]]),
            include_exploration: None,
        };

        self.sink
            .status("Roadblock reported, computing alternate route");
        let provider = Arc::clone(&self.provider);
        let outcomes = self.outcomes_tx.clone();
        let started = Instant::now();
        self.reroute_task = Some(tokio::spawn(async move {
            let result = provider.compute_route(request).await;
            let _ = outcomes
                .send(FetchOutcome::Reroute {
                    generation,
                    started,
                    result,
                })
                .await;
        }));

        EventLogger::log_event(
            "roadblock_injected",
            vec![
                KeyValue::new("stop_index", plan.freeze_stop_index as i64),
                KeyValue::new("block_lat", plan.roadblock.location.lat),
                KeyValue::new("block_lng", plan.roadblock.location.lng),
            ],
        )
        .await;
    }

    /// Fetches both algorithms for the scenario and replays them when
    /// the results land. Independent of the driving trip.
    fn start_race(&mut self, key: String) {
        let scenario = match self.config.scenario(&key) {
            Ok(scenario) => scenario.clone(),
            Err(e) => {
                warn!("{e}");
                self.sink.status(&e.to_string());
                return;
            }
        };

        if let Some(task) = self.race_task.take() {
            task.abort();
        }
        self.race = None;
        self.race_generation += 1;
        let generation = self.race_generation;

        let start = LatLng {
            lat: scenario.start.lat,
            lng: scenario.start.lng,
        };
        let end = LatLng {
            lat: scenario.end.lat,
            lng: scenario.end.lng,
        };

        info!(scenario = %key, "Fetching algorithm comparison");
        let provider = Arc::clone(&self.provider);
        let outcomes = self.outcomes_tx.clone();
        self.race_task = Some(tokio::spawn(async move {
            let result = compare_algorithms(provider.as_ref(), start, end, &key).await;
            let _ = outcomes
                .send(FetchOutcome::Race { generation, result })
                .await;
        }));
    }

    /// Drops the active trip. Fetches already in flight are aborted and
    /// their generations bumped, so even an already-queued outcome is
    /// discarded. A running race is unaffected.
    fn cancel_route(&mut self) {
        if let Some(task) = self.route_task.take() {
            task.abort();
        }
        if let Some(task) = self.reroute_task.take() {
            task.abort();
        }
        self.route_generation += 1;
        self.reroute_generation += 1;
        if self.ctx.take().is_some() {
            info!("Route cancelled");
        }
        self.scenario_key = None;
    }

    async fn on_outcome(&mut self, outcome: FetchOutcome, now: Instant) {
        match outcome {
            FetchOutcome::InitialRoute { generation, result } => {
                if generation != self.route_generation {
                    debug!("Discarding superseded route response");
                    return;
                }
                match result.and_then(RouteResponse::into_route_meta) {
                    Ok(route) => {
                        info!(
                            points = route.len(),
                            dist_m = route.total_dist_m(),
                            "Route loaded, trip running"
                        );
                        self.sink.route_changed(&route);
                        self.ctx = Some(SimulationContext::new(route, now, self.speedup));
                    }
                    Err(e) => {
                        error!("Route fetch failed: {e}");
                        self.sink.status(&format!("Route error: {e}"));
                    }
                }
            }
            FetchOutcome::Reroute {
                generation,
                started,
                result,
            } => {
                if generation != self.reroute_generation {
                    debug!("Discarding superseded reroute response");
                    return;
                }
                self.metrics
                    .reroute_latency
                    .observe(started.elapsed().as_secs_f64() * 1_000.0);

                let Some(ctx) = self.ctx.as_mut() else {
                    debug!("Reroute arrived with no active trip, ignoring");
                    return;
                };
                let Some(stop_index) = ctx.freeze_stop_index else {
                    debug!("Reroute arrived after unfreeze, ignoring");
                    return;
                };

                let spliced = result.and_then(RouteResponse::into_route_meta).and_then(
                    |new_route| {
                        splice_routes(
                            &ctx.active_route,
                            stop_index,
                            new_route,
                            &self.config.simulation.splice,
                        )
                        .map_err(RoutingError::from)
                    },
                );
                match spliced {
                    Ok(outcome) => {
                        info!(lead_in = ?outcome.lead_in, "Reroute ready, applying on next tick");
                        ctx.pending_reroute = Some(outcome.route);
                    }
                    Err(e) => {
                        // Stay frozen on the old route; a later
                        // roadblock injection retries the fetch.
                        warn!("Background reroute failed: {e}");
                        self.sink.status("Reroute failed, holding position");
                    }
                }
            }
            FetchOutcome::Race { generation, result } => {
                if generation != self.race_generation {
                    debug!("Discarding superseded race response");
                    return;
                }
                match result.and_then(|(left, right)| {
                    Ok(RaceData {
                        left: Self::replay_lane(left)?,
                        right: Self::replay_lane(right)?,
                    })
                }) {
                    Ok(data) => {
                        self.metrics.races.inc();
                        EventLogger::log_event(
                            "race_started",
                            vec![
                                KeyValue::new("left_exec_ms", data.left.exec_ms),
                                KeyValue::new("right_exec_ms", data.right.exec_ms),
                            ],
                        )
                        .await;
                        self.race = Some(RaceAnimator::start(
                            data,
                            &self.config.simulation.race,
                            now,
                        ));
                    }
                    Err(e) => {
                        error!("Race fetch failed: {e}");
                        self.sink.status(&format!("Race error: {e}"));
                    }
                }
            }
        }
    }

    fn replay_lane(response: RouteResponse) -> Result<AlgoReplay, RoutingError> {
        let explored = response.explored_segments();
        let final_coords: Vec<GeoPoint> = response
            .path_coordinates
            .ok_or_else(|| RoutingError::Malformed("missing path_coordinates".into()))?
            .into_iter()
            .map(|[lng, lat]| GeoPoint::new(lng, lat))
            .collect();
        Ok(AlgoReplay {
            algorithm: response.algorithm,
            final_coords,
            explored,
            exec_ms: response.execution_time_ms,
        })
    }

    fn abort_fetches(&mut self) {
        for task in [
            self.route_task.take(),
            self.reroute_task.take(),
            self.race_task.take(),
        ]
        .into_iter()
        .flatten()
        {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use aegis_config::{EndpointConfig, ScenarioConfig};
    use aegis_core::route::RouteMeta;
    use aegis_sim::RaceFrame;

    /// Longitude degrees per meter along the equator.
    const DEG_PER_M: f64 = 1.0 / 111_195.0;

    fn pt(x_m: f64) -> [f64; 2] {
        [x_m * DEG_PER_M, 0.0]
    }

    /// 2000 m trip, 21 points spaced 100 m, 10 m/s.
    fn drive_response() -> RouteResponse {
        let n = 21;
        RouteResponse {
            path_coordinates: Some((0..n).map(|i| pt(f64::from(i) * 100.0)).collect()),
            snapped_start: None,
            snapped_end: None,
            algorithm: "dijkstra".into(),
            execution_time_ms: 12.0,
            total_distance_m: Some(2_000.0),
            total_time_s: Some(200.0),
            cum_distance_m: Some((0..n).map(|i| f64::from(i) * 100.0).collect()),
            cum_time_s: Some((0..n).map(|i| f64::from(i) * 10.0).collect()),
            steps: vec![],
            explored_coords: None,
        }
    }

    /// Alternate route starting exactly at the 300 m freeze stop point
    /// of the drive route, so no lead-in is needed.
    fn reroute_response() -> RouteResponse {
        let n = 5;
        RouteResponse {
            path_coordinates: Some((0..n).map(|i| pt(300.0 + f64::from(i) * 100.0)).collect()),
            snapped_start: None,
            snapped_end: None,
            algorithm: "dijkstra".into(),
            execution_time_ms: 8.0,
            total_distance_m: Some(400.0),
            total_time_s: Some(40.0),
            cum_distance_m: Some((0..n).map(|i| f64::from(i) * 100.0).collect()),
            cum_time_s: Some((0..n).map(|i| f64::from(i) * 10.0).collect()),
            steps: vec![],
            explored_coords: None,
        }
    }

    fn race_response(algorithm: Algorithm) -> RouteResponse {
        let exec = match algorithm {
            Algorithm::Dijkstra => 100.0,
            Algorithm::Bmsssp => 40.0,
        };
        RouteResponse {
            execution_time_ms: exec,
            algorithm: algorithm.as_str().into(),
            explored_coords: Some(vec![[pt(0.0), pt(50.0)], [pt(50.0), pt(100.0)]]),
            ..drive_response()
        }
    }

    struct ScriptedProvider;

    #[async_trait]
    impl RouteProvider for ScriptedProvider {
        async fn compute_route(
            &self,
            request: RouteRequest,
        ) -> Result<RouteResponse, RoutingError> {
            if request.blocked_edges.is_some() {
                Ok(reroute_response())
            } else if request.include_exploration == Some(true) {
                Ok(race_response(request.algorithm))
            } else {
                Ok(drive_response())
            }
        }
    }

    #[derive(Default)]
    struct TestSink {
        routes: Mutex<Vec<RouteMeta>>,
        frames: Mutex<Vec<(VehicleFrame, NavLive)>>,
        race_frames: Mutex<Vec<RaceFrame>>,
        statuses: Mutex<Vec<String>>,
    }

    impl RenderSink for TestSink {
        fn route_changed(&self, route: &RouteMeta) {
            self.routes.lock().push(route.clone());
        }
        fn vehicle_frame(&self, frame: &VehicleFrame, nav: &NavLive) {
            self.frames.lock().push((*frame, nav.clone()));
        }
        fn race_frame(&self, frame: &RaceFrame) {
            self.race_frames.lock().push(*frame);
        }
        fn status(&self, message: &str) {
            self.statuses.lock().push(message.to_string());
        }
    }

    fn test_config() -> AegisConfig {
        let mut config = AegisConfig::default();
        config.scenarios.insert(
            "demo".into(),
            ScenarioConfig {
                label: "Demo run".into(),
                start: EndpointConfig { lat: 0.0, lng: 0.0 },
                end: EndpointConfig {
                    lat: 0.0,
                    lng: 2_000.0 * DEG_PER_M,
                },
                speedup: Some(10.0),
            },
        );
        config
    }

    fn session() -> (SimulationSession, Arc<TestSink>) {
        let sink = Arc::new(TestSink::default());
        let (session, _handle) = SimulationSession::new(
            test_config(),
            Arc::new(ScriptedProvider),
            Arc::clone(&sink) as Arc<dyn RenderSink>,
            MetricsRecorder::new(),
        );
        (session, sink)
    }

    async fn settle(session: &mut SimulationSession, now: Instant) {
        let outcome = session.outcomes_rx.recv().await.unwrap();
        session.on_outcome(outcome, now).await;
    }

    #[tokio::test]
    async fn scenario_fetch_starts_trip() {
        let (mut session, sink) = session();
        let t0 = Instant::now();

        session.apply_scenario("demo".into());
        settle(&mut session, t0).await;

        let ctx = session.ctx.as_ref().unwrap();
        assert_eq!(ctx.state, SessionState::Running);
        assert_eq!(sink.routes.lock().len(), 1);

        session.on_tick(t0);
        let frames = sink.frames.lock();
        assert_eq!(frames.len(), 1);
        let (frame, nav) = &frames[0];
        assert!(frame.position.lng.abs() < 1e-9);
        assert!(!frame.arrived);
        assert_eq!(nav.total_distance_m, 2_000.0);
    }

    #[tokio::test]
    async fn unknown_scenario_reports_status_without_fetching() {
        let (mut session, sink) = session();
        session.apply_scenario("missing".into());
        assert!(session.route_task.is_none());
        assert!(sink.statuses.lock().iter().any(|s| s.contains("missing")));
    }

    #[tokio::test]
    async fn roadblock_freezes_then_reroute_applies_at_time_zero() {
        let (mut session, sink) = session();
        let t0 = Instant::now();

        session.apply_scenario("demo".into());
        settle(&mut session, t0).await;

        // Vehicle near the start: obstruction at 600 m, stop at 300 m.
        session.inject_roadblock(t0).await;
        let ctx = session.ctx.as_ref().unwrap();
        assert_eq!(ctx.state, SessionState::FrozenAwaitingReroute);
        assert_eq!(ctx.freeze_stop_index, Some(3));

        // Frozen tick pins the vehicle exactly on the stop point.
        session.on_tick(t0 + Duration::from_secs(60));
        let stop = GeoPoint::new(300.0 * DEG_PER_M, 0.0);
        assert_eq!(sink.frames.lock().last().unwrap().0.position, stop);

        settle(&mut session, t0).await;
        assert!(session.ctx.as_ref().unwrap().pending_reroute.is_some());

        // Next tick swaps the route in and restarts at sim time zero.
        let t1 = t0 + Duration::from_secs(61);
        session.on_tick(t1);
        let ctx = session.ctx.as_ref().unwrap();
        assert_eq!(ctx.state, SessionState::Running);
        assert!(ctx.roadblock.is_none());
        assert!(ctx.clock.elapsed_sim_s(t1) < 1e-6);
        assert_eq!(session.metrics.reroutes.get() as u64, 1);
        assert_eq!(sink.routes.lock().len(), 2);
        assert_eq!(sink.frames.lock().last().unwrap().0.position, stop);
    }

    #[tokio::test]
    async fn stale_reroute_outcome_is_discarded() {
        let (mut session, _sink) = session();
        let t0 = Instant::now();

        session.apply_scenario("demo".into());
        settle(&mut session, t0).await;
        session.inject_roadblock(t0).await;
        settle(&mut session, t0).await;
        assert!(session.ctx.as_ref().unwrap().pending_reroute.is_some());

        // A response from a fetch that was since superseded.
        session.ctx.as_mut().unwrap().pending_reroute = None;
        session
            .on_outcome(
                FetchOutcome::Reroute {
                    generation: 0,
                    started: t0,
                    result: Ok(reroute_response()),
                },
                t0,
            )
            .await;
        assert!(session.ctx.as_ref().unwrap().pending_reroute.is_none());
    }

    #[tokio::test]
    async fn cancel_drops_trip_and_late_route_response() {
        let (mut session, sink) = session();
        let t0 = Instant::now();

        session.apply_scenario("demo".into());
        settle(&mut session, t0).await;
        assert!(session.ctx.is_some());

        session.cancel_route();
        assert!(session.ctx.is_none());

        // A late response from the cancelled fetch must not revive the
        // trip.
        session
            .on_outcome(
                FetchOutcome::InitialRoute {
                    generation: 1,
                    result: Ok(drive_response()),
                },
                t0,
            )
            .await;
        assert!(session.ctx.is_none());

        let before = sink.frames.lock().len();
        session.on_tick(t0);
        assert_eq!(sink.frames.lock().len(), before);
    }

    #[tokio::test]
    async fn arrival_goes_idle_after_final_frame() {
        let (mut session, sink) = session();
        let t0 = Instant::now();

        session.apply_scenario("demo".into());
        settle(&mut session, t0).await;

        // 200 sim seconds at 10x is 20 wall seconds.
        session.on_tick(t0 + Duration::from_secs(25));
        {
            let frames = sink.frames.lock();
            let (frame, nav) = frames.last().unwrap();
            assert!(frame.arrived);
            assert_eq!(nav.remaining_distance_m, 0.0);
        }
        assert_eq!(session.ctx.as_ref().unwrap().state, SessionState::Idle);
        assert!(sink
            .statuses
            .lock()
            .iter()
            .any(|s| s == "Arrived at destination"));

        // Idle trips emit nothing further.
        let before = sink.frames.lock().len();
        session.on_tick(t0 + Duration::from_secs(26));
        assert_eq!(sink.frames.lock().len(), before);
    }

    #[tokio::test]
    async fn race_outcome_starts_animator_and_emits_frames() {
        let (mut session, sink) = session();
        let t0 = Instant::now();

        session.start_race("demo".into());
        settle(&mut session, t0).await;

        let race = session.race.as_ref().unwrap();
        assert_eq!(race.data().left.algorithm, "dijkstra");
        assert_eq!(race.data().right.algorithm, "bmsssp");
        assert_eq!(session.metrics.races.get() as u64, 1);

        session.on_tick(t0);
        assert_eq!(sink.race_frames.lock().len(), 1);
    }
}
