//! Metrics collection and exposition.
//!
//! # Metrics
//! - `countryinfo_requests_total` (counter): inbound requests by route, status
//! - `countryinfo_request_duration_seconds` (histogram): inbound latency by route
//! - `countryinfo_upstream_calls_total` (counter): upstream calls by provider, outcome
//! - `countryinfo_upstream_duration_seconds` (histogram): upstream latency by provider
//! - `countryinfo_provider_reachable` (gauge): 1=reachable, 0=unreachable at last probe
//!
//! Without an installed recorder every helper is a no-op.

use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return the handle used to render
/// `/metrics`.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Prometheus recorder installed");
    Ok(handle)
}

/// Record one handled inbound request.
pub fn record_request(route: &str, status: u16, start: Instant) {
    counter!(
        "countryinfo_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("countryinfo_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record one upstream call and its outcome (`ok` or an error kind).
pub fn record_upstream_call(provider: &'static str, outcome: &'static str, start: Instant) {
    counter!(
        "countryinfo_upstream_calls_total",
        "provider" => provider,
        "outcome" => outcome
    )
    .increment(1);
    histogram!("countryinfo_upstream_duration_seconds", "provider" => provider)
        .record(start.elapsed().as_secs_f64());
}

/// Record the latest probe classification of a provider.
pub fn record_provider_health(provider: &'static str, reachable: bool) {
    gauge!("countryinfo_provider_reachable", "provider" => provider)
        .set(if reachable { 1.0 } else { 0.0 });
}
