//! folio CLI - portfolio site server and admin tooling
//!
//! - `serve`: run the HTTP server (public site, admin UI, JSON API)
//! - `migrate`: create or update the database schema
//! - `seed`: fill the database with initial content
//! - `admin`: manage admin accounts

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "folio",
    author,
    version,
    about = "Portfolio site server with an admin content API",
    long_about = "Serve a static portfolio site and its admin UI, backed by a PostgreSQL \
                  content store editable through authenticated JSON endpoints."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
    /// Apply database migrations
    Migrate(commands::migrate::MigrateArgs),
    /// Seed technologies, default content and optionally an admin
    Seed(commands::seed::SeedArgs),
    /// Manage admin accounts (create, passwd, hash-password)
    Admin(commands::admin::AdminArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Migrate(args) => commands::run_migrate(args).await?,
        Commands::Seed(args) => commands::run_seed(args).await?,
        Commands::Admin(args) => commands::run_admin(args).await?,
    }

    Ok(())
}
