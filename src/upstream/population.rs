//! Population series from the CountriesNow provider.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::upstream::cities::CountriesNowClient;
use crate::upstream::types::{PopulationPoint, PopulationSeries, Provider, UpstreamError, UpstreamResult};

/// Fetches the yearly population series of a country by ISO3 code.
#[async_trait]
pub trait PopulationSeriesProvider: Send + Sync {
    async fn series_for(&self, iso3: &str) -> UpstreamResult<PopulationSeries>;
}

#[derive(Debug, Deserialize)]
struct PopulationEnvelope {
    #[serde(default)]
    error: bool,
    data: Option<PopulationData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PopulationData {
    #[serde(default)]
    population_counts: Vec<PopulationPoint>,
}

impl PopulationEnvelope {
    fn into_series(self, iso3: &str) -> UpstreamResult<PopulationSeries> {
        if self.error {
            return Err(UpstreamError::NoData(iso3.to_string()));
        }
        match self.data {
            Some(data) if !data.population_counts.is_empty() => Ok(data.population_counts),
            _ => Err(UpstreamError::NoData(iso3.to_string())),
        }
    }
}

#[async_trait]
impl PopulationSeriesProvider for CountriesNowClient {
    async fn series_for(&self, iso3: &str) -> UpstreamResult<PopulationSeries> {
        let url = self.countries_endpoint("population");
        tracing::debug!(iso3 = %iso3, url = %url, "Fetching population series");

        let envelope: PopulationEnvelope = self
            .client
            .fetch(
                Provider::CountriesNow,
                self.client.http().post(url).json(&json!({ "iso3": iso3 })),
            )
            .await?;

        let series = envelope.into_series(iso3);
        if let Err(UpstreamError::NoData(_)) = &series {
            tracing::info!(iso3 = %iso3, "Provider has no population data");
        }
        series
    }
}
