//! Country info service library.
//!
//! Aggregates country metadata, city listings and population series from two
//! upstream providers behind a small read-only HTTP API.

// Core pipeline
pub mod aggregation;
pub mod health;
pub mod upstream;

// Transport and cross-cutting concerns
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
