//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use folio_server::db::migrations;

use super::DatabaseArgs;

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let pool = args.database.connect().await?;
    migrations::run(&pool)
        .await
        .context("Failed to apply migrations")?;

    println!("Migrations applied");
    Ok(())
}
