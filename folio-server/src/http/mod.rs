//! HTTP server layer
//!
//! Axum server with:
//! - JSON API under `/api`
//! - Admin UI behind the session gatekeeper
//! - Static public site and uploaded files
//! - Request tracing, CORS, graceful shutdown

pub mod server;
pub mod error;
pub mod extractors;
pub mod gatekeeper;
pub mod routes;

pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
pub use error::ApiError;
