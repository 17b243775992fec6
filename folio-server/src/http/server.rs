//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - JSON API nested under `/api`
//! - Admin UI behind the session gatekeeper, uploads and public site from disk
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{middleware, Router};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::{gatekeeper, routes};
use crate::auth::{AuthError, AuthService};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3000)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,

    /// Public site files, served for every path not matched elsewhere
    pub static_dir: PathBuf,

    /// Admin UI files, served under `/admin`
    pub admin_dir: PathBuf,

    /// Uploaded images, written by `/api/upload` and served under `/uploads`
    pub upload_dir: PathBuf,

    /// Production mode marks the session cookie `Secure`
    pub production: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_permissive: false,
            static_dir: PathBuf::from("public"),
            admin_dir: PathBuf::from("admin"),
            upload_dir: PathBuf::from("public/uploads"),
            production: false,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth: AuthService,
    pub upload_dir: PathBuf,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(pool: PgPool, auth: AuthService, config: &ServerConfig) -> Self {
        Self {
            pool,
            auth,
            upload_dir: config.upload_dir.clone(),
            secure_cookies: config.production,
        }
    }
}

/// Assemble the full application router.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let state = Arc::new(state);

    let cors = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let api = Router::new()
        .merge(routes::health::router())
        .merge(routes::auth::router())
        .merge(routes::about::router())
        .merge(routes::stats::router())
        .merge(routes::categories::router())
        .merge(routes::projects::router())
        .merge(routes::technologies::router())
        .merge(routes::upload::router());

    let admin_ui = ServiceBuilder::new()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gatekeeper::require_session,
        ))
        .service(ServeDir::new(&config.admin_dir));

    Router::new()
        .nest("/api", api)
        .nest_service("/uploads", ServeDir::new(&state.upload_dir))
        .nest_service("/admin", admin_ui)
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// let auth = AuthService::new(&jwt_secret)?;
/// run_server(pool, auth, ServerConfig::default()).await?;
/// ```
pub async fn run_server(
    pool: PgPool,
    auth: AuthService,
    config: ServerConfig,
) -> Result<(), ServerError> {
    tracing::info!(
        static_dir = %config.static_dir.display(),
        admin_dir = %config.admin_dir.display(),
        upload_dir = %config.upload_dir.display(),
        production = config.production,
        "serving directories"
    );

    let state = AppState::new(pool, auth, &config);
    let app = build_router(state, &config);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("auth setup failed: {0}")]
    Auth(#[from] AuthError),
}
