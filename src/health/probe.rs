//! Upstream availability probe backing `GET /status`.
//!
//! # Responsibilities
//! - GET the country metadata provider, POST a sample body to the city provider
//! - Bound each check by the probe timeout on a dedicated client
//! - Classify each provider independently as reachable or unreachable
//! - Count status reports and report uptime

use std::sync::Arc;
use std::time::Duration;

use reqwest::RequestBuilder;
use serde::Serialize;
use serde_json::json;
use tokio::time;
use url::Url;

use crate::config::{HealthProbeConfig, UpstreamConfig};
use crate::health::state::ServiceContext;
use crate::observability::metrics;
use crate::upstream::client::endpoint;
use crate::upstream::Provider;

/// Version reported by the status endpoint.
pub const API_VERSION: &str = "v1";

/// Binary availability of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProviderStatus {
    #[serde(rename = "opp")]
    Reachable,
    #[serde(rename = "ned")]
    Unreachable,
}

impl ProviderStatus {
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProviderStatus::Reachable)
    }
}

/// Response body of `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    #[serde(rename = "countriesnowapi")]
    pub cities_provider: ProviderStatus,
    #[serde(rename = "restcountriesapi")]
    pub rest_provider: ProviderStatus,
    pub version: &'static str,
    #[serde(rename = "uptime")]
    pub uptime_seconds: u64,
    pub request_count: u64,
}

pub struct UpstreamHealthProbe {
    client: Option<reqwest::Client>,
    timeout: Duration,
    countries_url: Option<Url>,
    cities_url: Option<Url>,
    sample_country: String,
    context: Arc<ServiceContext>,
}

impl UpstreamHealthProbe {
    pub fn new(
        config: &HealthProbeConfig,
        upstreams: &UpstreamConfig,
        context: Arc<ServiceContext>,
    ) -> Self {
        let client = match reqwest::Client::builder()
            .user_agent("countryinfo-health-check")
            .build()
        {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::error!(error = %e, "Failed to build health check client, providers will report unreachable");
                None
            }
        };

        Self {
            client,
            timeout: Duration::from_secs(config.timeout_secs),
            countries_url: probe_url(
                Provider::RestCountries,
                &upstreams.countries_base_url,
                &path_segments(&config.countries_probe_path),
            ),
            cities_url: probe_url(
                Provider::CountriesNow,
                &upstreams.cities_base_url,
                &["api", "v0.1", "countries", "cities"],
            ),
            sample_country: config.sample_country.clone(),
            context,
        }
    }

    /// Produce a status report. Never fails.
    pub async fn probe(&self) -> HealthReport {
        let request_count = self.context.record_request();
        let uptime_seconds = self.context.uptime().as_secs();

        let (rest_provider, cities_provider) =
            tokio::join!(self.check_countries(), self.check_cities());

        metrics::record_provider_health(Provider::RestCountries.as_str(), rest_provider.is_reachable());
        metrics::record_provider_health(Provider::CountriesNow.as_str(), cities_provider.is_reachable());

        HealthReport {
            cities_provider,
            rest_provider,
            version: API_VERSION,
            uptime_seconds,
            request_count,
        }
    }

    async fn check_countries(&self) -> ProviderStatus {
        let Some((client, url)) = self.client.as_ref().zip(self.countries_url.as_ref()) else {
            return ProviderStatus::Unreachable;
        };
        self.check(Provider::RestCountries, url, client.get(url.clone())).await
    }

    async fn check_cities(&self) -> ProviderStatus {
        let Some((client, url)) = self.client.as_ref().zip(self.cities_url.as_ref()) else {
            return ProviderStatus::Unreachable;
        };
        let request = client
            .post(url.clone())
            .json(&json!({ "country": self.sample_country }));
        self.check(Provider::CountriesNow, url, request).await
    }

    async fn check(&self, provider: Provider, url: &Url, request: RequestBuilder) -> ProviderStatus {
        match time::timeout(self.timeout, request.send()).await {
            Ok(Ok(response)) if response.status().is_success() => ProviderStatus::Reachable,
            Ok(Ok(response)) => {
                tracing::warn!(provider = %provider, url = %url, status = %response.status(), "Health check failed: non-success status");
                ProviderStatus::Unreachable
            }
            Ok(Err(e)) => {
                tracing::warn!(provider = %provider, url = %url, error = %e, "Health check failed: connection error");
                ProviderStatus::Unreachable
            }
            Err(_) => {
                tracing::warn!(provider = %provider, url = %url, timeout = ?self.timeout, "Health check failed: timeout");
                ProviderStatus::Unreachable
            }
        }
    }
}

/// Join probe segments onto a base URL the same way the lookup clients do.
fn probe_url(provider: Provider, base: &str, segments: &[&str]) -> Option<Url> {
    match Url::parse(base) {
        Ok(base) => Some(endpoint(&base, segments)),
        Err(e) => {
            tracing::warn!(provider = %provider, base = %base, error = %e, "Invalid base URL, provider will report unreachable");
            None
        }
    }
}

fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_wire_format() {
        let report = HealthReport {
            cities_provider: ProviderStatus::Unreachable,
            rest_provider: ProviderStatus::Reachable,
            version: API_VERSION,
            uptime_seconds: 12,
            request_count: 3,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({
                "countriesnowapi": "ned",
                "restcountriesapi": "opp",
                "version": "v1",
                "uptime": 12,
                "request_count": 3
            })
        );
    }

    #[test]
    fn test_probe_urls() {
        let upstreams = UpstreamConfig {
            countries_base_url: "http://countries.local/".into(),
            cities_base_url: "http://cities.local".into(),
            request_timeout_secs: 30,
        };
        let probe = UpstreamHealthProbe::new(
            &HealthProbeConfig::default(),
            &upstreams,
            Arc::new(ServiceContext::new()),
        );
        assert_eq!(
            probe.countries_url.as_ref().map(Url::as_str),
            Some("http://countries.local/v3.1/alpha/no")
        );
        assert_eq!(
            probe.cities_url.as_ref().map(Url::as_str),
            Some("http://cities.local/api/v0.1/countries/cities")
        );
    }

    #[test]
    fn test_probe_urls_keep_base_path() {
        let upstreams = UpstreamConfig {
            countries_base_url: "http://gateway.local/rest".into(),
            cities_base_url: "http://gateway.local/now/".into(),
            request_timeout_secs: 30,
        };
        let health = HealthProbeConfig {
            countries_probe_path: "//v3.1/alpha/se/".into(),
            ..HealthProbeConfig::default()
        };
        let probe = UpstreamHealthProbe::new(&health, &upstreams, Arc::new(ServiceContext::new()));

        assert_eq!(
            probe.countries_url.as_ref().map(Url::as_str),
            Some("http://gateway.local/rest/v3.1/alpha/se")
        );
        assert_eq!(
            probe.cities_url.as_ref().map(Url::as_str),
            Some("http://gateway.local/now/api/v0.1/countries/cities")
        );
    }

    #[test]
    fn test_invalid_base_has_no_url() {
        let upstreams = UpstreamConfig {
            countries_base_url: "not a url".into(),
            cities_base_url: "http://cities.local".into(),
            request_timeout_secs: 30,
        };
        let probe = UpstreamHealthProbe::new(
            &HealthProbeConfig::default(),
            &upstreams,
            Arc::new(ServiceContext::new()),
        );
        assert!(probe.countries_url.is_none());
        assert!(probe.cities_url.is_some());
    }

    #[tokio::test]
    async fn test_unroutable_url_is_unreachable() {
        let upstreams = UpstreamConfig {
            countries_base_url: "not a url".into(),
            cities_base_url: "http://127.0.0.1:1".into(),
            request_timeout_secs: 30,
        };
        let context = Arc::new(ServiceContext::new());
        let probe = UpstreamHealthProbe::new(&HealthProbeConfig::default(), &upstreams, context.clone());

        let report = probe.probe().await;
        assert_eq!(report.rest_provider, ProviderStatus::Unreachable);
        assert_eq!(report.cities_provider, ProviderStatus::Unreachable);
        assert_eq!(report.request_count, 1);
        assert_eq!(context.request_count(), 1);
    }
}
