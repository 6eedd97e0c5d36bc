//! Population statistics: year-range filtering and an integer mean.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::upstream::{IdentityResolver, PopulationPoint, PopulationSeriesProvider, UpstreamError};

/// Inclusive year interval parsed from `start-end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// Parse `start-end`. Anything other than exactly two integer parts
    /// yields `None`, which disables filtering.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split('-');
        let start = parts.next()?.parse().ok()?;
        let end = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { start, end })
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}

/// A kept point, stringified for transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopulationValue {
    pub year: String,
    pub value: String,
}

/// Response body of `GET /population/{code}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopulationStatisticsResult {
    pub mean: u64,
    pub values: Vec<PopulationValue>,
}

/// Filter `series` by `range` and compute the truncated mean of what is left.
pub fn summarize(series: &[PopulationPoint], range: Option<YearRange>) -> PopulationStatisticsResult {
    let kept: Vec<&PopulationPoint> = series
        .iter()
        .filter(|p| range.map_or(true, |r| r.contains(p.year)))
        .collect();

    let sum: u128 = kept.iter().map(|p| u128::from(p.value)).sum();
    let mean = match kept.len() {
        0 => 0,
        count => (sum / count as u128) as u64,
    };

    PopulationStatisticsResult {
        mean,
        values: kept
            .into_iter()
            .map(|p| PopulationValue {
                year: p.year.to_string(),
                value: p.value.to_string(),
            })
            .collect(),
    }
}

/// Errors from [`PopulationStatistics::build`].
#[derive(Debug, Clone, Error)]
pub enum StatisticsError {
    /// The country code could not be turned into an ISO3 code.
    #[error("no population data for '{code}': {source}")]
    Resolution {
        code: String,
        #[source]
        source: UpstreamError,
    },

    /// The population series could not be fetched.
    #[error("population lookup for '{iso3}' failed: {source}")]
    Series {
        iso3: String,
        #[source]
        source: UpstreamError,
    },
}

/// Composes ISO3 resolution and the population series.
#[derive(Clone)]
pub struct PopulationStatistics {
    identity: Arc<dyn IdentityResolver>,
    series: Arc<dyn PopulationSeriesProvider>,
}

impl PopulationStatistics {
    pub fn new(
        identity: Arc<dyn IdentityResolver>,
        series: Arc<dyn PopulationSeriesProvider>,
    ) -> Self {
        Self { identity, series }
    }

    /// Summarize the series of `code`, filtered by the raw `start-end` range.
    pub async fn build(
        &self,
        code: &str,
        year_range: Option<&str>,
    ) -> Result<PopulationStatisticsResult, StatisticsError> {
        let range = year_range.and_then(YearRange::parse);
        tracing::debug!(code = %code, raw_range = ?year_range, range = ?range, "Building population statistics");

        let iso3 = self
            .identity
            .resolve_iso3(code)
            .await
            .map_err(|source| StatisticsError::Resolution {
                code: code.to_string(),
                source,
            })?;

        let series = self
            .series
            .series_for(&iso3)
            .await
            .map_err(|source| StatisticsError::Series {
                iso3: iso3.clone(),
                source,
            })?;

        Ok(summarize(&series, range))
    }
}
