//! Scenario table configuration.
//!
//! Scenarios (route endpoints plus presentation metadata) are injected
//! into the session at construction rather than referenced as ambient
//! globals.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// One canned emergency scenario.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ScenarioConfig {
    /// Human-readable label shown by the render sink.
    #[validate(length(min = 1))]
    pub label: String,

    /// Trip start.
    #[validate(nested)]
    pub start: EndpointConfig,

    /// Trip destination.
    #[validate(nested)]
    pub end: EndpointConfig,

    /// Optional per-scenario speedup override.
    #[validate(range(min = 0.1, max = 1000.0))]
    pub speedup: Option<f64>,
}

/// A trip endpoint in degrees.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, Copy)]
pub struct EndpointConfig {
    #[validate(custom(function = validation::validate_latitude))]
    pub lat: f64,

    #[validate(custom(function = validation::validate_longitude))]
    pub lng: f64,
}
