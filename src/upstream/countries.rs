//! Country identity lookups against the REST Countries provider.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::upstream::client::{endpoint, UpstreamClient};
use crate::upstream::types::{CountryIdentity, Provider, UpstreamError, UpstreamResult};

const PROVIDER: Provider = Provider::RestCountries;

/// Resolves a country code to its canonical identity.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Fetch the full identity for `code`.
    async fn resolve(&self, code: &str) -> UpstreamResult<CountryIdentity>;

    /// Fetch only the ISO3 code for `code`.
    async fn resolve_iso3(&self, code: &str) -> UpstreamResult<String> {
        self.resolve(code).await.map(|identity| identity.iso3)
    }
}

/// `GET {base}/v3.1/alpha/{code}`.
#[derive(Debug, Clone)]
pub struct RestCountriesClient {
    client: UpstreamClient,
    base_url: Url,
}

impl RestCountriesClient {
    pub fn new(client: UpstreamClient, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl IdentityResolver for RestCountriesClient {
    async fn resolve(&self, code: &str) -> UpstreamResult<CountryIdentity> {
        let url = endpoint(&self.base_url, &["v3.1", "alpha", code]);
        tracing::debug!(code = %code, url = %url, "Resolving country identity");

        let records: Vec<CountryRecord> = self
            .client
            .fetch(PROVIDER, self.client.http().get(url))
            .await?;

        let identity = records
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::NotFound(code.to_string()))?
            .into_identity(code)?;

        tracing::debug!(code = %code, name = %identity.name, iso3 = %identity.iso3, "Resolved country identity");
        Ok(identity)
    }
}

#[derive(Debug, Deserialize)]
struct CountryRecord {
    name: Option<CountryName>,
    cca3: Option<String>,
    #[serde(default)]
    continents: Vec<String>,
    #[serde(default)]
    population: u64,
    #[serde(default)]
    languages: BTreeMap<String, String>,
    #[serde(default)]
    borders: Vec<String>,
    flags: Option<Flags>,
    capital: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct CountryName {
    common: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Flags {
    png: Option<String>,
}

impl CountryRecord {
    fn into_identity(self, code: &str) -> UpstreamResult<CountryIdentity> {
        let name = self
            .name
            .and_then(|n| n.common)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| UpstreamError::malformed(PROVIDER, "missing name.common"))?;
        let iso3 = self
            .cca3
            .filter(|c| !c.is_empty())
            .ok_or_else(|| UpstreamError::malformed(PROVIDER, "missing cca3"))?;
        let flag_url = self
            .flags
            .and_then(|f| f.png)
            .ok_or_else(|| UpstreamError::malformed(PROVIDER, "missing flags.png"))?;
        let capital = self
            .capital
            .and_then(|c| c.into_iter().next())
            .ok_or_else(|| UpstreamError::malformed(PROVIDER, "missing capital"))?;

        Ok(CountryIdentity {
            code: code.to_string(),
            name,
            iso3,
            continents: self.continents,
            population: self.population,
            languages: self.languages,
            borders: self.borders,
            flag_url,
            capital,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> UpstreamResult<CountryIdentity> {
        let record: CountryRecord = serde_json::from_value(value).unwrap();
        record.into_identity("no")
    }

    #[test]
    fn test_full_record() {
        let identity = decode(json!({
            "name": {"common": "Norway", "official": "Kingdom of Norway"},
            "cca3": "NOR",
            "continents": ["Europe"],
            "population": 5379475,
            "languages": {"nno": "Norwegian Nynorsk", "nob": "Norwegian Bokmål", "smi": "Sami"},
            "borders": ["FIN", "SWE", "RUS"],
            "flags": {"png": "https://flagcdn.com/w320/no.png"},
            "capital": ["Oslo"]
        }))
        .unwrap();

        assert_eq!(identity.code, "no");
        assert_eq!(identity.name, "Norway");
        assert_eq!(identity.iso3, "NOR");
        assert_eq!(identity.capital, "Oslo");
        assert_eq!(identity.borders, vec!["FIN", "SWE", "RUS"]);
        assert_eq!(identity.languages.len(), 3);
    }

    #[test]
    fn test_optional_fields_default() {
        let identity = decode(json!({
            "name": {"common": "Iceland"},
            "cca3": "ISL",
            "flags": {"png": "url"},
            "capital": ["Reykjavik"]
        }))
        .unwrap();

        assert!(identity.borders.is_empty());
        assert!(identity.languages.is_empty());
        assert_eq!(identity.population, 0);
    }

    #[test]
    fn test_missing_capital_is_malformed() {
        let err = decode(json!({
            "name": {"common": "Antarctica"},
            "cca3": "ATA",
            "flags": {"png": "url"}
        }))
        .unwrap_err();
        assert!(matches!(err, UpstreamError::Malformed { .. }));

        let err = decode(json!({
            "name": {"common": "Antarctica"},
            "cca3": "ATA",
            "flags": {"png": "url"},
            "capital": []
        }))
        .unwrap_err();
        assert!(err.to_string().contains("capital"));
    }

    #[test]
    fn test_empty_iso3_is_malformed() {
        let err = decode(json!({
            "name": {"common": "Norway"},
            "cca3": "",
            "flags": {"png": "url"},
            "capital": ["Oslo"]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("cca3"));
    }

    #[test]
    fn test_wrong_shape_fails_to_decode() {
        let result: Result<CountryRecord, _> =
            serde_json::from_value(json!({"name": "Norway", "capital": "Oslo"}));
        assert!(result.is_err());
    }
}
