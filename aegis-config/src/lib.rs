//! # Aegis Configuration System
//!
//! Hierarchical configuration management for the Aegis simulation core.
//!
//! ## Features
//! - **Unified Configuration**: Single source of truth across all components
//! - **Validation**: Runtime validation of critical parameters
//! - **Environment Awareness**: Automatic configuration for deployment/simulation
//! - **Injected Scenarios**: The scenario table is configuration data, not code

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod routing;
mod scenario;
mod simulation;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use routing::RoutingConfig;
pub use scenario::{EndpointConfig, ScenarioConfig};
pub use simulation::{
    CameraConfig, RaceConfig, RoadblockConfig, SimulationConfig, SpliceConfig,
};
pub use telemetry::TelemetryConfig;

/// Top-level configuration container for all Aegis components.
#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct AegisConfig {
    /// Simulation tuning (clock, roadblock, splice, race).
    #[validate(nested)]
    pub simulation: SimulationConfig,

    /// Routing collaborator endpoint.
    #[validate(nested)]
    pub routing: RoutingConfig,

    /// Telemetry and observability configuration.
    #[validate(nested)]
    pub telemetry: TelemetryConfig,

    /// Scenario table: key -> trip endpoints and presentation metadata.
    /// Validated entry-by-entry in [`AegisConfig::load`].
    #[serde(default)]
    pub scenarios: HashMap<String, ScenarioConfig>,
}

impl AegisConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/aegis.yaml` - base settings. If missing, defaults are used.
    /// 3. `config/<environment>.yaml` - environment-specific overrides.
    /// 4. `AEGIS_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Start with defaults.
        let mut figment = Figment::from(Serialized::defaults(AegisConfig::default()));

        if Path::new("config/aegis.yaml").exists() {
            figment = figment.merge(Yaml::file("config/aegis.yaml"));
        }

        let env = std::env::var("AEGIS_ENV").unwrap_or_else(|_| "simulation".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        figment
            .merge(Env::prefixed("AEGIS_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(Self::validated)
    }

    /// Load configuration from a specific path for testing/validation.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(
                path.to_string_lossy().to_string(),
            )));
        }

        Figment::from(Serialized::defaults(AegisConfig::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("AEGIS_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(Self::validated)
    }

    /// Resolve a scenario by key.
    pub fn scenario(&self, key: &str) -> Result<&ScenarioConfig, ConfigError> {
        self.scenarios
            .get(key)
            .ok_or_else(|| ConfigError::UnknownScenario(key.to_string()))
    }

    fn validated(config: Self) -> Result<Self, ConfigError> {
        config.validate()?;
        for (key, scenario) in &config.scenarios {
            if let Err(e) = validation::validate_scenario_key(key) {
                let mut errors = validator::ValidationErrors::new();
                errors.add("scenarios", e);
                return Err(errors.into());
            }
            scenario.validate()?;
        }
        Ok(config)
    }
}
