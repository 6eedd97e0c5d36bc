//! Shared HTTP client for upstream lookups.
//!
//! # Responsibilities
//! - Own the pooled reqwest client and its per-call timeout
//! - Map transport, status and decode failures onto [`UpstreamError`]
//! - Record per-provider call outcomes

use std::time::{Duration, Instant};

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use url::Url;

use crate::observability::metrics;
use crate::upstream::types::{Provider, UpstreamError, UpstreamResult};

/// Pooled client used by the provider adapters.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
}

impl UpstreamClient {
    /// Create a client whose calls fail after `timeout`.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("countryinfo-service/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Send a request and decode a successful JSON body into `T`.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        provider: Provider,
        request: RequestBuilder,
    ) -> UpstreamResult<T> {
        let start = Instant::now();
        let result = Self::send_and_decode(provider, request).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::record_upstream_call(provider.as_str(), outcome, start);

        result
    }

    async fn send_and_decode<T: DeserializeOwned>(
        provider: Provider,
        request: RequestBuilder,
    ) -> UpstreamResult<T> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(provider = %provider, error = %e, "Upstream request failed");
            UpstreamError::Unreachable {
                provider,
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(provider = %provider, status = %status, "Upstream returned non-success status");
            return Err(UpstreamError::Status {
                provider,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| UpstreamError::Unreachable {
            provider,
            reason: format!("failed to read body: {}", e),
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(provider = %provider, error = %e, "Upstream payload could not be decoded");
            UpstreamError::malformed(provider, e.to_string())
        })
    }
}

/// Append path segments to a provider base URL.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let base = Url::parse("http://127.0.0.1:3500").unwrap();
        let url = endpoint(&base, &["api", "v0.1", "countries", "cities"]);
        assert_eq!(url.as_str(), "http://127.0.0.1:3500/api/v0.1/countries/cities");
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes() {
        let base = Url::parse("https://example.com/proxy/").unwrap();
        let url = endpoint(&base, &["v3.1", "alpha", "n o"]);
        assert_eq!(url.as_str(), "https://example.com/proxy/v3.1/alpha/n%20o");
    }
}
