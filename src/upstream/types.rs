//! Provider identifiers, upstream error taxonomy and the domain records
//! produced by upstream lookups.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two upstream data providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// Country metadata (REST Countries).
    RestCountries,
    /// Cities and population series (CountriesNow).
    CountriesNow,
}

impl Provider {
    /// Stable label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::RestCountries => "restcountries",
            Provider::CountriesNow => "countriesnow",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while talking to an upstream provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    /// Connection could not be established or timed out.
    #[error("{provider} unreachable: {reason}")]
    Unreachable { provider: Provider, reason: String },

    /// Provider answered with a non-success HTTP status.
    #[error("{provider} returned status {status}")]
    Status { provider: Provider, status: u16 },

    /// Body could not be decoded or lacks a required field.
    #[error("{provider} returned a malformed payload: {reason}")]
    Malformed { provider: Provider, reason: String },

    /// No country matched the code.
    #[error("no country found for code '{0}'")]
    NotFound(String),

    /// Provider answered, but has no population series for the country.
    #[error("no population data for '{0}'")]
    NoData(String),
}

impl UpstreamError {
    pub(crate) fn malformed(provider: Provider, reason: impl Into<String>) -> Self {
        UpstreamError::Malformed {
            provider,
            reason: reason.into(),
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Unreachable { .. } => "unreachable",
            UpstreamError::Status { .. } => "status",
            UpstreamError::Malformed { .. } => "malformed",
            UpstreamError::NotFound(_) => "not_found",
            UpstreamError::NoData(_) => "no_data",
        }
    }
}

/// Result type for upstream lookups.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Canonical identity of a country as reported by the metadata provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryIdentity {
    /// Code the caller asked for.
    pub code: String,
    /// Common name; non-empty.
    pub name: String,
    /// ISO 3166-1 alpha-3 code; non-empty.
    pub iso3: String,
    pub continents: Vec<String>,
    pub population: u64,
    /// Language code → display name.
    pub languages: BTreeMap<String, String>,
    /// Alpha-3 codes of neighbouring countries.
    pub borders: Vec<String>,
    pub flag_url: String,
    pub capital: String,
}

/// One year of a population series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PopulationPoint {
    pub year: i32,
    pub value: u64,
}

/// Yearly population counts, in the order the provider returned them.
pub type PopulationSeries = Vec<PopulationPoint>;
