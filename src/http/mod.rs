//! HTTP transport shell.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (x-request-id, request span)
//!     → handlers.rs (parse path + query, call aggregators / probe)
//!     → response.rs (map failures to 400 / 404 / 500)
//!     → JSON to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::{build_router, AppState, HttpServer, ServerError};
