//! Command implementations for the folio CLI

pub mod admin;
pub mod migrate;
pub mod seed;
pub mod serve;

// Re-export main dispatcher functions for flat access from main.rs
pub use admin::run_admin;
pub use migrate::run_migrate;
pub use seed::run_seed;
pub use serve::run_serve;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use folio_server::db::{PgPool, PoolSettings};

/// Database connection flags shared by every command
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Database URL (overrides environment)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled connections
    #[arg(long, env = "FOLIO_DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub db_max_connections: u32,

    /// Seconds to wait for a pooled connection
    #[arg(long, env = "FOLIO_DB_ACQUIRE_TIMEOUT", default_value_t = 10)]
    pub db_acquire_timeout: u64,
}

impl DatabaseArgs {
    /// Connect, failing with a hint when no URL is configured.
    pub async fn connect(&self) -> Result<PgPool> {
        let url = self
            .database_url
            .as_deref()
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

        let settings = PoolSettings {
            max_connections: self.db_max_connections,
            acquire_timeout: Duration::from_secs(self.db_acquire_timeout),
            ..PoolSettings::default()
        };
        settings
            .connect(url)
            .await
            .context("Failed to create database pool")
    }
}
