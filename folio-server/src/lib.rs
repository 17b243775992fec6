//! folio-server: HTTP server for the portfolio site
//!
//! Serves the public site and admin UI from disk, and exposes JSON
//! endpoints under `/api` for about text, site stats, categories,
//! projects, technologies and image uploads. Mutations require an admin
//! session cookie issued by `/api/auth/login`.

pub mod auth;
pub mod db;
pub mod http;
pub mod models;

pub use auth::{AdminSession, AuthError, AuthService};
pub use http::{build_router, run_server, AppState, ServerConfig};
