//! Aggregation subsystem.
//!
//! # Data Flow
//! ```text
//! GET /info/{code}?limit=n
//!     → info.rs: resolve identity (fatal)
//!     → fetch cities by country name (non-fatal, warning on failure)
//!     → sort (byte order) → truncate → CountryInfo
//!
//! GET /population/{code}?limit=start-end
//!     → statistics.rs: resolve ISO3 (fatal)
//!     → fetch series (fatal)
//!     → filter by inclusive year range → integer mean → stringified values
//! ```
//!
//! # Design Decisions
//! - Identity is fetched exactly once per request
//! - City degradation is visible in the result, not only in logs
//! - The mean is the plain arithmetic mean of the kept points

pub mod info;
pub mod statistics;

pub use info::{parse_city_limit, CountryInfo, CountryInfoAggregator, DEFAULT_CITY_LIMIT};
pub use statistics::{
    PopulationStatistics, PopulationStatisticsResult, PopulationValue, StatisticsError, YearRange,
};
