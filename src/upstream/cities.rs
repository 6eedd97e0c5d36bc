//! City listings from the CountriesNow provider.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::upstream::client::{endpoint, UpstreamClient};
use crate::upstream::types::{Provider, UpstreamError, UpstreamResult};

const PROVIDER: Provider = Provider::CountriesNow;

/// Looks up the known cities of a country by its common name.
#[async_trait]
pub trait CityDirectory: Send + Sync {
    /// Cities for `country_name`, unsorted and unlimited.
    async fn cities_for(&self, country_name: &str) -> UpstreamResult<Vec<String>>;
}

/// Client for the CountriesNow city and population endpoints.
#[derive(Debug, Clone)]
pub struct CountriesNowClient {
    pub(crate) client: UpstreamClient,
    pub(crate) base_url: Url,
}

impl CountriesNowClient {
    pub fn new(client: UpstreamClient, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub(crate) fn countries_endpoint(&self, resource: &str) -> Url {
        endpoint(&self.base_url, &["api", "v0.1", "countries", resource])
    }
}

#[derive(Debug, Deserialize)]
struct CitiesEnvelope {
    data: Option<Vec<String>>,
}

#[async_trait]
impl CityDirectory for CountriesNowClient {
    async fn cities_for(&self, country_name: &str) -> UpstreamResult<Vec<String>> {
        let url = self.countries_endpoint("cities");
        tracing::debug!(country = %country_name, url = %url, "Fetching cities");

        let envelope: CitiesEnvelope = self
            .client
            .fetch(
                PROVIDER,
                self.client.http().post(url).json(&json!({ "country": country_name })),
            )
            .await?;

        envelope
            .data
            .ok_or_else(|| UpstreamError::malformed(PROVIDER, "missing data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shapes() {
        let ok: CitiesEnvelope =
            serde_json::from_str(r#"{"error":false,"msg":"cities in Norway retrieved","data":["Oslo","Bergen"]}"#)
                .unwrap();
        assert_eq!(ok.data.unwrap(), vec!["Oslo", "Bergen"]);

        let missing: CitiesEnvelope = serde_json::from_str(r#"{"error":true}"#).unwrap();
        assert!(missing.data.is_none());

        let wrong: Result<CitiesEnvelope, _> = serde_json::from_str(r#"{"data":[1,2,3]}"#);
        assert!(wrong.is_err());
    }
}
