//! Routing collaborator endpoint configuration.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

/// Routing service connection parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct RoutingConfig {
    /// Base URL of the routing collaborator, e.g.
    /// `http://localhost:8000/api/algo`.
    #[validate(length(min = 1))]
    pub base_url: String,

    /// Per-request timeout.
    #[validate(range(min = 100, max = 60000))]
    pub timeout_ms: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/algo".into(),
            timeout_ms: 5000,
        }
    }
}
