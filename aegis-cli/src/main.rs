//! ## aegis-cli
//! **Operational interface for the simulation core**
//!
//! Drives a scenario (optionally with a mid-trip roadblock) or replays
//! an algorithm race, rendering through the logging sink. The real
//! map frontend talks to the engine crate directly; this binary exists
//! for demos and smoke runs against a live routing service.

use clap::Parser;

use aegis_telemetry::MetricsRecorder;

mod commands;
mod sink;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let metrics = MetricsRecorder::new();
    let cli = Cli::parse();

    match cli.command {
        Commands::Drive(drive_args) => commands::run_drive_mode(drive_args, metrics).await,
        Commands::Race(race_args) => commands::run_race_mode(race_args, metrics).await,
    }
}
