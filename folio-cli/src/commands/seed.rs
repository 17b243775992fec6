//! Seed command
//!
//! Inserts the technology catalog and default about/stats content, and
//! optionally an admin account and sample projects. Existing rows are kept.

use anyhow::{Context, Result};
use clap::Parser;

use folio_server::auth::hash_password;
use folio_server::db::migrations;
use folio_server::db::seed::{self, SeedOptions};

use super::DatabaseArgs;

#[derive(Parser, Debug)]
pub struct SeedArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Username for an initial admin account
    #[arg(long, env = "FOLIO_ADMIN_USERNAME", requires = "admin_password")]
    pub admin_username: Option<String>,

    /// Password for the initial admin account
    #[arg(long, env = "FOLIO_ADMIN_PASSWORD", hide_env_values = true, requires = "admin_username")]
    pub admin_password: Option<String>,

    /// Insert placeholder projects when none exist
    #[arg(long)]
    pub sample_projects: bool,
}

pub async fn run_seed(args: SeedArgs) -> Result<()> {
    let admin = match (args.admin_username, args.admin_password) {
        (Some(username), Some(password)) => {
            let hash = hash_password(&password).context("Failed to hash admin password")?;
            Some((username, hash))
        }
        _ => None,
    };

    let pool = args.database.connect().await?;
    migrations::run(&pool)
        .await
        .context("Failed to apply migrations")?;

    let report = seed::run(
        &pool,
        SeedOptions {
            admin,
            sample_projects: args.sample_projects,
        },
    )
    .await
    .context("Seeding failed")?;

    println!("Seeded:");
    println!("  technologies  {}", report.technologies);
    println!("  admin         {}", if report.admin_created { "created" } else { "unchanged" });
    println!("  about         {}", if report.about_created { "created" } else { "unchanged" });
    println!("  stats         {}", if report.stats_created { "created" } else { "unchanged" });
    println!("  projects      {}", report.projects);

    Ok(())
}
