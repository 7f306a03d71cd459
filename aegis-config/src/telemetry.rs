//! Observability configuration.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

/// Telemetry configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct TelemetryConfig {
    /// Whether the CLI dumps the Prometheus registry on session end.
    #[serde(default)]
    pub dump_metrics: bool,

    /// Default log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    #[validate(length(min = 1))]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "info".into()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            dump_metrics: false,
            log_filter: default_log_filter(),
        }
    }
}
