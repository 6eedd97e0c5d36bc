//! Country info aggregation: identity plus a sorted, bounded city list.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::upstream::{CityDirectory, CountryIdentity, IdentityResolver, UpstreamResult};

/// Cities returned when the caller gives no usable `limit`.
pub const DEFAULT_CITY_LIMIT: usize = 10;

/// Parse a raw `limit` query value.
///
/// Anything that is not a positive integer falls back to `default`.
pub fn parse_city_limit(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

/// Sort city names by byte order and keep the first `limit`.
///
/// Byte order means non-ASCII names ("Ålesund") sort after all ASCII
/// letters; no locale collation is applied.
pub fn sort_and_truncate(mut cities: Vec<String>, limit: usize) -> Vec<String> {
    cities.sort_unstable();
    cities.truncate(limit);
    cities
}

/// Response body of `GET /info/{code}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryInfo {
    pub name: String,
    pub continents: Vec<String>,
    pub population: u64,
    pub languages: BTreeMap<String, String>,
    pub borders: Vec<String>,
    pub flag: String,
    pub capital: String,
    pub cities: Vec<String>,
    /// Non-fatal problems hit while assembling the record.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl CountryInfo {
    fn new(identity: CountryIdentity, cities: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            name: identity.name,
            continents: identity.continents,
            population: identity.population,
            languages: identity.languages,
            borders: identity.borders,
            flag: identity.flag_url,
            capital: identity.capital,
            cities,
            warnings,
        }
    }
}

/// Composes identity and city lookups into one [`CountryInfo`].
#[derive(Clone)]
pub struct CountryInfoAggregator {
    identity: Arc<dyn IdentityResolver>,
    cities: Arc<dyn CityDirectory>,
}

impl CountryInfoAggregator {
    pub fn new(identity: Arc<dyn IdentityResolver>, cities: Arc<dyn CityDirectory>) -> Self {
        Self { identity, cities }
    }

    /// Resolve `code` and attach at most `limit` cities.
    ///
    /// Identity failures are returned; city failures degrade to an empty
    /// list with a warning.
    pub async fn build(&self, code: &str, limit: usize) -> UpstreamResult<CountryInfo> {
        let identity = self.identity.resolve(code).await?;

        let mut warnings = Vec::new();
        let cities = match self.cities.cities_for(&identity.name).await {
            Ok(cities) => sort_and_truncate(cities, limit),
            Err(e) => {
                tracing::warn!(
                    code = %code,
                    country = %identity.name,
                    error = %e,
                    "City lookup failed, returning country info without cities"
                );
                warnings.push(format!("cities unavailable for {}: {}", identity.name, e));
                Vec::new()
            }
        };

        Ok(CountryInfo::new(identity, cities, warnings))
    }
}
