//! Admin account management

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use folio_server::auth::hash_password;
use folio_server::db::{AdminRepo, DbError};

use super::DatabaseArgs;

#[derive(Parser, Debug)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommands,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Create an admin account
    Create(CreateArgs),
    /// Change an admin's password
    Passwd(PasswdArgs),
    /// Print an Argon2 hash for a password
    HashPassword(HashPasswordArgs),
}

#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Login name
    pub username: String,

    /// Password (read from stdin when omitted)
    #[arg(long)]
    pub password: Option<String>,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

#[derive(Parser, Debug)]
pub struct PasswdArgs {
    /// Login name
    pub username: String,

    /// New password (read from stdin when omitted)
    #[arg(long)]
    pub password: Option<String>,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

#[derive(Parser, Debug)]
pub struct HashPasswordArgs {
    /// Password (read from stdin when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

pub async fn run_admin(args: AdminArgs) -> Result<()> {
    match args.command {
        AdminCommands::Create(args) => run_create(args).await,
        AdminCommands::Passwd(args) => run_passwd(args).await,
        AdminCommands::HashPassword(args) => run_hash_password(args),
    }
}

async fn run_create(args: CreateArgs) -> Result<()> {
    let username = args.username.trim().to_owned();
    if username.is_empty() {
        bail!("username must not be empty");
    }
    let password = resolve_password(args.password)?;
    let hash = hash_password(&password).context("Failed to hash password")?;

    let pool = args.database.connect().await?;
    match AdminRepo::new(&pool).create(&username, &hash).await {
        Ok(admin) => {
            tracing::info!(id = admin.id, username = %admin.username, "admin created");
            println!("Created admin '{}' (id {})", admin.username, admin.id);
            Ok(())
        }
        Err(DbError::Conflict(_)) => bail!("admin '{}' already exists", username),
        Err(e) => Err(anyhow::Error::new(e).context("Failed to create admin")),
    }
}

async fn run_passwd(args: PasswdArgs) -> Result<()> {
    let password = resolve_password(args.password)?;
    let hash = hash_password(&password).context("Failed to hash password")?;

    let pool = args.database.connect().await?;
    AdminRepo::new(&pool)
        .update_password(args.username.trim(), &hash)
        .await
        .with_context(|| format!("Failed to update password for '{}'", args.username))?;

    println!("Password updated for '{}'", args.username.trim());
    Ok(())
}

fn run_hash_password(args: HashPasswordArgs) -> Result<()> {
    let password = resolve_password(args.password)?;
    println!("{}", hash_password(&password).context("Failed to hash password")?);
    Ok(())
}

/// Use the flag value, or read one line from stdin.
fn resolve_password(flag: Option<String>) -> Result<String> {
    let password = match flag {
        Some(p) => p,
        None => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                eprint!("Password: ");
                io::stderr().flush().ok();
            }
            let mut line = String::new();
            stdin
                .lock()
                .read_line(&mut line)
                .context("Failed to read password from stdin")?;
            line.trim_end_matches(['\r', '\n']).to_owned()
        }
    };

    validate_password(&password)?;
    Ok(password)
}

fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        bail!("password must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_password_is_used_verbatim() {
        assert_eq!(resolve_password(Some("s3cret ".into())).unwrap(), "s3cret ");
    }

    #[test]
    fn empty_password_rejected() {
        assert!(validate_password("").is_err());
        assert!(resolve_password(Some(String::new())).is_err());
    }
}
