//! Error responses.
//!
//! # Status Mapping
//! - Missing country code → 400
//! - Identity lookup failure on `/info` → 500
//! - Identity failure or provider `NoData` on `/population` → 404
//! - Other population series failures → 500

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::aggregation::StatisticsError;
use crate::upstream::UpstreamError;

/// Errors surfaced to API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("could not fetch data for country code {code}: {source}")]
    CountryLookup {
        code: String,
        #[source]
        source: UpstreamError,
    },

    #[error("no population data available for {code}: {reason}")]
    NoPopulationData { code: String, reason: String },

    #[error("population lookup for {code} failed: {source}")]
    PopulationLookup {
        code: String,
        #[source]
        source: UpstreamError,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::CountryLookup { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NoPopulationData { .. } => StatusCode::NOT_FOUND,
            ApiError::PopulationLookup { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a statistics failure for `code` onto the client-facing error.
    pub fn from_statistics(code: &str, err: StatisticsError) -> Self {
        match err {
            StatisticsError::Resolution { source, .. } => ApiError::NoPopulationData {
                code: code.to_string(),
                reason: source.to_string(),
            },
            StatisticsError::Series {
                source: source @ UpstreamError::NoData(_),
                ..
            } => ApiError::NoPopulationData {
                code: code.to_string(),
                reason: source.to_string(),
            },
            StatisticsError::Series { source, .. } => ApiError::PopulationLookup {
                code: code.to_string(),
                source,
            },
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: u16,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::info!(status = %status, error = %self, "Request rejected");
        }

        let body = ErrorBody {
            status: status.as_u16(),
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
