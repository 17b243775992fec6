//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Fetches relations with set-based queries (no N+1)
//! - Lets constraints reject duplicates (no check-then-insert)
//! - Uses transactions for multi-step operations

pub mod admins;
pub mod about;
pub mod stats;
pub mod categories;
pub mod technologies;
pub mod projects;

pub use admins::{Admin, AdminRepo};
pub use about::{AboutContent, AboutRepo};
pub use stats::{SiteStats, StatsRepo};
pub use categories::{Category, CategoryRepo, CategoryUpdate, NewCategory};
pub use technologies::{Technology, TechnologyRepo};
pub use projects::{NewProject, Project, ProjectDetail, ProjectRepo, ProjectUpdate};

use sqlx::error::ErrorKind;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// Unique constraint violated
    #[error("already exists: {0}")]
    Conflict(String),

    /// Foreign key points at a missing row
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            let constraint = db.constraint().unwrap_or("constraint").to_owned();
            match db.kind() {
                ErrorKind::UniqueViolation => return Self::Conflict(constraint),
                ErrorKind::ForeignKeyViolation => return Self::InvalidReference(constraint),
                _ => {}
            }
        }
        Self::Sqlx(e)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared fixture for repository tests against `DATABASE_URL`.

    use once_cell::sync::Lazy;
    use sqlx::PgPool;
    use tokio::sync::{Mutex, MutexGuard};

    static DB_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    /// Migrated, emptied database. Hold the guard for the whole test so
    /// concurrently running tests don't truncate each other's rows.
    pub async fn fresh_db() -> (PgPool, MutexGuard<'static, ()>) {
        let guard = DB_LOCK.lock().await;
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");
        crate::db::migrations::run(&pool).await.expect("migrations failed");
        sqlx::query(
            "TRUNCATE admins, technologies, categories, projects, project_technologies, \
             about_content, site_stats RESTART IDENTITY CASCADE",
        )
        .execute(&pool)
        .await
        .expect("truncate failed");
        (pool, guard)
    }
}
