use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use aegis_config::AegisConfig;
use aegis_engine::{SessionCommand, SimulationSession};
use aegis_routing::HttpRouteProvider;
use aegis_telemetry::{EventLogger, MetricsRecorder};

use crate::sink::LogRenderSink;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drive a scenario, optionally disrupting it mid-trip
    Drive(DriveArgs),
    /// Replay both algorithms racing on a scenario
    Race(RaceArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DriveArgs {
    /// Scenario key from the configured scenario table
    #[arg(short, long)]
    pub scenario: String,
    /// Configuration file; defaults to config/aegis.yaml + environment
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Inject a roadblock this many wall-clock seconds into the trip
    #[arg(long)]
    pub roadblock_after_s: Option<f64>,
    /// How long to keep the session alive
    #[arg(long, default_value_t = 30.0)]
    pub duration_s: f64,
    /// Dump the Prometheus registry on exit
    #[arg(long, default_value_t = false)]
    pub dump_metrics: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RaceArgs {
    /// Scenario key from the configured scenario table
    #[arg(short, long)]
    pub scenario: String,
    /// Configuration file; defaults to config/aegis.yaml + environment
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

type CliError = Box<dyn std::error::Error + Send + Sync>;

fn load_config(path: Option<&PathBuf>) -> Result<AegisConfig, CliError> {
    Ok(match path {
        Some(path) => AegisConfig::load_from_path(path)?,
        None => AegisConfig::load()?,
    })
}

pub async fn run_drive_mode(args: DriveArgs, metrics: MetricsRecorder) -> Result<(), CliError> {
    let config = load_config(args.config.as_ref())?;
    EventLogger::init_with_filter(&config.telemetry.log_filter);
    let dump_metrics = args.dump_metrics || config.telemetry.dump_metrics;
    let provider = Arc::new(HttpRouteProvider::new(&config.routing)?);
    let sink = Arc::new(LogRenderSink::default());

    let (session, handle) = SimulationSession::new(config, provider, sink, metrics.clone());
    let runner = tokio::spawn(session.run());

    handle
        .send(SessionCommand::ApplyScenario {
            key: args.scenario.clone(),
        })
        .await?;

    let mut remaining_s = args.duration_s;
    if let Some(after_s) = args.roadblock_after_s {
        let after_s = after_s.min(remaining_s);
        tokio::time::sleep(Duration::from_secs_f64(after_s)).await;
        handle.send(SessionCommand::InjectRoadblock).await?;
        remaining_s -= after_s;
    }
    tokio::time::sleep(Duration::from_secs_f64(remaining_s.max(0.0))).await;

    // Dropping the last handle ends the session loop.
    drop(handle);
    runner.await??;

    if dump_metrics {
        println!("{}", metrics.gather_metrics()?);
    }
    Ok(())
}

pub async fn run_race_mode(args: RaceArgs, metrics: MetricsRecorder) -> Result<(), CliError> {
    let config = load_config(args.config.as_ref())?;
    EventLogger::init_with_filter(&config.telemetry.log_filter);
    // Watch for the full replay plus a margin for the fetch itself.
    let watch_s = config.simulation.race.total_duration_s + 2.0;
    let provider = Arc::new(HttpRouteProvider::new(&config.routing)?);
    let sink = Arc::new(LogRenderSink::default());

    let (session, handle) = SimulationSession::new(config, provider, sink, metrics);
    let runner = tokio::spawn(session.run());

    handle
        .send(SessionCommand::StartRace {
            key: args.scenario.clone(),
        })
        .await?;
    tokio::time::sleep(Duration::from_secs_f64(watch_s)).await;

    drop(handle);
    runner.await??;
    Ok(())
}
