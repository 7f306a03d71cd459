use aegis_core::RouteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("Route request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed route response: {0}")]
    Malformed(String),
}

impl From<RouteError> for RoutingError {
    fn from(err: RouteError) -> Self {
        RoutingError::Malformed(err.to_string())
    }
}
