use thiserror::Error;

use aegis_config::ConfigError;
use aegis_routing::RoutingError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),

    #[error("Session command channel closed")]
    ChannelClosed,
}
