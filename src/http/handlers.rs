//! Endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use crate::aggregation::{parse_city_limit, CountryInfo, PopulationStatisticsResult};
use crate::health::HealthReport;
use crate::http::response::ApiError;
use crate::http::server::AppState;

/// Raw query pairs. Values stay strings so bad input falls back to defaults.
type QueryPairs = Vec<(String, String)>;

/// First value of `?limit=`; repeated parameters are ignored after the first.
pub fn first_limit(pairs: &[(String, String)]) -> Option<&str> {
    pairs
        .iter()
        .find(|(key, _)| key == "limit")
        .map(|(_, value)| value.as_str())
}

fn require_code(code: &str, example: &str) -> Result<(), ApiError> {
    if code.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!(
            "country code is required, e.g. {}",
            example
        )));
    }
    Ok(())
}

/// `GET /countryinfo/v1/info/{code}?limit=n`
pub async fn country_info(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<QueryPairs>,
) -> Result<Json<CountryInfo>, ApiError> {
    require_code(&code, "/countryinfo/v1/info/no")?;
    let limit = parse_city_limit(first_limit(&query), state.default_city_limit);

    let info = state
        .info
        .build(&code, limit)
        .await
        .map_err(|source| ApiError::CountryLookup {
            code: code.clone(),
            source,
        })?;

    tracing::info!(code = %code, limit, cities = info.cities.len(), "Served country info");
    Ok(Json(info))
}

/// `GET /countryinfo/v1/population/{code}?limit=start-end`
pub async fn population(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<QueryPairs>,
) -> Result<Json<PopulationStatisticsResult>, ApiError> {
    require_code(&code, "/countryinfo/v1/population/no")?;

    let result = state
        .statistics
        .build(&code, first_limit(&query))
        .await
        .map_err(|e| ApiError::from_statistics(&code, e))?;

    tracing::info!(code = %code, mean = result.mean, points = result.values.len(), "Served population statistics");
    Ok(Json(result))
}

/// `GET /countryinfo/v1/status`
pub async fn status(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.probe.probe().await)
}

/// Info or population endpoint called without a country code.
pub async fn missing_code() -> ApiError {
    ApiError::InvalidInput(
        "country code is required, e.g. /countryinfo/v1/info/no or /countryinfo/v1/population/no"
            .to_string(),
    )
}

/// `GET /metrics`
pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}

/// `GET /`
pub async fn index() -> Html<&'static str> {
    Html(concat!(
        "<h1>Welcome to the Country Info API!</h1>\n",
        "<p>Use the following endpoints to get data:</p>\n",
        "<ul>\n",
        "<li><a href='/countryinfo/v1/info/no'>/countryinfo/v1/info/{country_code}</a> - Get country info</li>\n",
        "<li><a href='/countryinfo/v1/population/no'>/countryinfo/v1/population/{country_code}</a> - Get population data</li>\n",
        "<li><a href='/countryinfo/v1/status'>/countryinfo/v1/status</a> - Check API status</li>\n",
        "</ul>\n",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> QueryPairs {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_first_limit_wins() {
        assert_eq!(first_limit(&pairs(&[("limit", "2"), ("limit", "5")])), Some("2"));
        assert_eq!(first_limit(&pairs(&[("page", "1"), ("limit", "2000-2005")])), Some("2000-2005"));
    }

    #[test]
    fn test_first_limit_absent() {
        assert_eq!(first_limit(&pairs(&[])), None);
        assert_eq!(first_limit(&pairs(&[("Limit", "3")])), None);
    }
}
