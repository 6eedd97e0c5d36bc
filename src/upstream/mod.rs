//! Upstream provider subsystem.
//!
//! # Data Flow
//! ```text
//! country code
//!     → countries.rs (REST Countries: GET /v3.1/alpha/{code})
//!     → CountryIdentity { name, iso3, ... }
//!
//! country name
//!     → cities.rs (CountriesNow: POST /api/v0.1/countries/cities)
//!
//! ISO3 code
//!     → population.rs (CountriesNow: POST /api/v0.1/countries/population)
//!
//! all calls
//!     → client.rs (pooled reqwest client, timeout, status + decode checks)
//! ```
//!
//! # Design Decisions
//! - Each upstream payload has its own schema struct; shape mismatches become
//!   `UpstreamError::Malformed`, never a panic
//! - Lookups sit behind traits so aggregators can be exercised without a network
//! - `NoData` is distinct from transport failures

pub mod cities;
pub mod client;
pub mod countries;
pub mod population;
pub mod types;

pub use cities::{CityDirectory, CountriesNowClient};
pub use client::UpstreamClient;
pub use countries::{IdentityResolver, RestCountriesClient};
pub use population::PopulationSeriesProvider;
pub use types::{
    CountryIdentity, PopulationPoint, PopulationSeries, Provider, UpstreamError, UpstreamResult,
};
