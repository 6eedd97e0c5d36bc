//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build upstream clients and aggregators from config
//! - Create the Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, metrics)
//! - Serve on a listener until shutdown is signalled

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use url::Url;

use crate::aggregation::{CountryInfoAggregator, PopulationStatistics};
use crate::config::ServiceConfig;
use crate::health::{ServiceContext, UpstreamHealthProbe};
use crate::http::handlers;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::observability::metrics;
use crate::upstream::{CountriesNowClient, RestCountriesClient, UpstreamClient};

/// Errors raised while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid upstream URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub info: CountryInfoAggregator,
    pub statistics: PopulationStatistics,
    pub probe: Arc<UpstreamHealthProbe>,
    pub default_city_limit: usize,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Wire the reqwest-backed providers described by `config`.
    pub fn from_config(
        config: &ServiceConfig,
        context: Arc<ServiceContext>,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self, ServerError> {
        let client = UpstreamClient::new(Duration::from_secs(config.upstreams.request_timeout_secs))?;

        let countries = Arc::new(RestCountriesClient::new(
            client.clone(),
            parse_base_url(&config.upstreams.countries_base_url)?,
        ));
        let countries_now = Arc::new(CountriesNowClient::new(
            client,
            parse_base_url(&config.upstreams.cities_base_url)?,
        ));

        Ok(Self {
            info: CountryInfoAggregator::new(countries.clone(), countries_now.clone()),
            statistics: PopulationStatistics::new(countries, countries_now),
            probe: Arc::new(UpstreamHealthProbe::new(
                &config.health,
                &config.upstreams,
                context,
            )),
            default_city_limit: config.defaults.city_limit,
            metrics,
        })
    }
}

fn parse_base_url(url: &str) -> Result<Url, ServerError> {
    Url::parse(url).map_err(|source| ServerError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

/// HTTP server for the country info API.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig, metrics: Option<PrometheusHandle>) -> Result<Self, ServerError> {
        let context = Arc::new(ServiceContext::new());
        let state = AppState::from_config(&config, context, metrics)?;
        Ok(Self::with_state(config, state))
    }

    /// Create a server around pre-built state.
    pub fn with_state(config: ServiceConfig, state: AppState) -> Self {
        let router = build_router(state, Duration::from_secs(config.timeouts.request_secs));
        Self { router, config }
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            countries = %self.config.upstreams.countries_base_url,
            cities = %self.config.upstreams.cities_base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The assembled router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/countryinfo/v1/info/{code}", get(handlers::country_info))
        .route("/countryinfo/v1/info/{code}/", get(handlers::country_info))
        .route("/countryinfo/v1/info", get(handlers::missing_code))
        .route("/countryinfo/v1/info/", get(handlers::missing_code))
        .route("/countryinfo/v1/population/{code}", get(handlers::population))
        .route("/countryinfo/v1/population/{code}/", get(handlers::population))
        .route("/countryinfo/v1/population", get(handlers::missing_code))
        .route("/countryinfo/v1/population/", get(handlers::missing_code))
        .route("/countryinfo/v1/status", get(handlers::status))
        .route("/countryinfo/v1/status/", get(handlers::status))
        .route("/metrics", get(handlers::metrics))
        .route_layer(middleware::from_fn(track_metrics))
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(set_request_id_layer())
}

async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_request(&route, response.status().as_u16(), start);
    response
}
