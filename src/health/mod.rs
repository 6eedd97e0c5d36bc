//! Health reporting subsystem.
//!
//! # Data Flow
//! ```text
//! GET /status
//!     → probe.rs: bump request counter, read uptime (state.rs)
//!     → GET  country metadata provider  ┐ concurrently,
//!     → POST city provider (sample body) ┘ each bounded by the probe timeout
//!     → classify each: 2xx = reachable, anything else = unreachable
//!     → HealthReport
//! ```
//!
//! # Design Decisions
//! - The probe never fails; every error collapses to `unreachable`
//! - Checks use a dedicated client, separate from the lookup client
//! - Start time and counter live in an explicit `ServiceContext`

pub mod probe;
pub mod state;

pub use probe::{HealthReport, ProviderStatus, UpstreamHealthProbe, API_VERSION};
pub use state::ServiceContext;
