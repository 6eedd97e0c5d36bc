//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::aggregation::DEFAULT_CITY_LIMIT;

/// Root configuration for the country info service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream provider endpoints.
    pub upstreams: UpstreamConfig,

    /// Upstream health probe settings.
    pub health: HealthProbeConfig,

    /// Timeout configuration for inbound requests.
    pub timeouts: TimeoutConfig,

    /// Defaults applied to query parameters.
    pub defaults: DefaultsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Base URLs of the two upstream providers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Country metadata provider (REST Countries).
    pub countries_base_url: String,

    /// City and population provider (CountriesNow).
    pub cities_base_url: String,

    /// Per-call timeout for regular upstream lookups, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            countries_base_url: "https://restcountries.com".to_string(),
            cities_base_url: "https://countriesnow.space".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthProbeConfig {
    /// Probe timeout in seconds.
    pub timeout_secs: u64,

    /// Path requested with GET on the country metadata provider.
    pub countries_probe_path: String,

    /// Country name sent in the POST probe to the city provider.
    pub sample_country: String,
}

impl Default for HealthProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            countries_probe_path: "/v3.1/alpha/no".to_string(),
            sample_country: "Norway".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Defaults for optional query parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Number of cities returned when `limit` is absent or invalid.
    pub city_limit: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            city_limit: DEFAULT_CITY_LIMIT,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output (development).
    #[default]
    Pretty,
    /// JSON structured output (production).
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Expose Prometheus metrics on `/metrics`.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
        }
    }
}
