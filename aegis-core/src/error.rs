use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Malformed route metadata: {0}")]
    Malformed(String),
}
