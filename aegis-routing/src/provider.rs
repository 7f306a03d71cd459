//! Async provider trait and the reqwest-backed HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use aegis_config::RoutingConfig;

use crate::error::RoutingError;
use crate::wire::{Algorithm, LatLng, RouteRequest, RouteResponse};

/// Source of computed routes. The simulation session only ever talks
/// to this trait, so tests substitute an in-memory provider.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn compute_route(&self, request: RouteRequest) -> Result<RouteResponse, RoutingError>;
}

/// HTTP client for the routing collaborator.
pub struct HttpRouteProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRouteProvider {
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn route_url(&self) -> String {
        format!("{}/calculate-pivot-route", self.base_url)
    }
}

#[async_trait]
impl RouteProvider for HttpRouteProvider {
    #[instrument(skip_all, fields(algorithm = request.algorithm.as_str()))]
    async fn compute_route(&self, request: RouteRequest) -> Result<RouteResponse, RoutingError> {
        let url = self.route_url();
        debug!("Requesting route from {url}");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<RouteResponse>()
            .await?;

        debug!(
            "Route computed in {:.1}ms ({} points)",
            response.execution_time_ms,
            response
                .path_coordinates
                .as_ref()
                .map(Vec::len)
                .unwrap_or(0)
        );
        Ok(response)
    }
}

/// Fetches both algorithms' routes for the same trip concurrently,
/// with exploration traces included, for the race animator.
pub async fn compare_algorithms(
    provider: &dyn RouteProvider,
    start: LatLng,
    end: LatLng,
    scenario_type: &str,
) -> Result<(RouteResponse, RouteResponse), RoutingError> {
    let request_for = |algorithm| RouteRequest {
        start,
        end,
        scenario_type: scenario_type.to_string(),
        algorithm,
        blocked_edges: None,
        include_exploration: Some(true),
    };

    tokio::try_join!(
        provider.compute_route(request_for(Algorithm::Dijkstra)),
        provider.compute_route(request_for(Algorithm::Bmsssp)),
    )
}
