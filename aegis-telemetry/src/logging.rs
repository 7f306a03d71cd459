//! ## aegis-telemetry::logging
//! **Structured logging for the simulation runtime**
//!
//! ### Expectations:
//! - Negligible overhead at frame-callback rates (60 ticks/sec)
//! - Structured domain events with OpenTelemetry attributes
//! - `RUST_LOG`-driven filtering, `info` by default

use opentelemetry::KeyValue;
use tracing::{info_span, Instrument};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    pub fn init() {
        Self::init_with_filter("info")
    }

    /// Installs the subscriber with a fallback filter, typically the
    /// configured `telemetry.log_filter`. `RUST_LOG` still wins when
    /// set.
    pub fn init_with_filter(default_filter: &str) {
        fmt()
            .with_env_filter(filter_from_env_or(default_filter))
            .with_thread_names(true)
            .with_span_events(FmtSpan::ENTER)
            .init()
    }

    /// Emits a structured simulation event (roadblock injected, reroute
    /// applied, race finished, ...) under a dedicated span.
    pub async fn log_event(event_type: &str, metadata: Vec<KeyValue>) {
        let span = info_span!(
            "simulation_event",
            event_type = event_type,
            otel.kind = "INTERNAL"
        );

        async {
            tracing::info!(
                metadata = ?metadata,
                "Simulation event occurred"
            );
        }
        .instrument(span)
        .await
    }
}

fn filter_from_env_or(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_logging() {
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(EventLogger::log_event(
                "test",
                vec![KeyValue::new("key", "value")],
            ));
        assert!(logs_contain("Simulation event occurred"));
    }

    #[test]
    fn configured_filter_applies_when_env_is_unset() {
        std::env::remove_var("RUST_LOG");
        let filter = filter_from_env_or("aegis_engine=debug");
        assert_eq!(filter.to_string(), "aegis_engine=debug");
    }
}
