//! HTTP server command
//!
//! Applies migrations, then serves the public site, admin UI and JSON API.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use folio_server::db::migrations;
use folio_server::http::{run_server, ServerConfig};
use folio_server::AuthService;

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "FOLIO_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Secret used to sign session tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Directory with the public site
    #[arg(long, env = "FOLIO_STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,

    /// Directory with the admin UI
    #[arg(long, env = "FOLIO_ADMIN_DIR", default_value = "admin")]
    pub admin_dir: PathBuf,

    /// Directory where uploaded images are stored
    #[arg(long, env = "FOLIO_UPLOAD_DIR", default_value = "public/uploads")]
    pub upload_dir: PathBuf,

    /// Production mode (Secure session cookie); also set by FOLIO_ENV=production
    #[arg(long)]
    pub production: bool,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

/// Whether the server runs in production mode.
fn is_production(flag: bool, env: Option<&str>) -> bool {
    flag || env.is_some_and(|v| v.trim().eq_ignore_ascii_case("production"))
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let secret = args
        .jwt_secret
        .as_deref()
        .context("JWT_SECRET not set. Set via --jwt-secret, JWT_SECRET env, or .env")?;
    let auth = AuthService::new(secret).context("Invalid JWT_SECRET")?;

    let pool = args.database.connect().await?;
    migrations::run(&pool)
        .await
        .context("Failed to apply migrations")?;

    let production = is_production(
        args.production,
        std::env::var("FOLIO_ENV").ok().as_deref(),
    );
    tracing::info!(bind = %args.bind, production, "Starting folio server");

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        static_dir: args.static_dir,
        admin_dir: args.admin_dir,
        upload_dir: args.upload_dir,
        production,
    };

    // Run server (blocks until shutdown)
    run_server(pool, auth, config)
        .await
        .context("Server error")?;

    Ok(())
}
