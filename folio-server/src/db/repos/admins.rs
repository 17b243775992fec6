//! Admin credential store

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::DbError;

/// Admin record from database. `password` is an Argon2 PHC string.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Admin repository
pub struct AdminRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, DbError> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, username, password, created_at FROM admins WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(admin)
    }

    /// Create an admin from an already hashed password.
    pub async fn create(&self, username: &str, password_hash: &str) -> Result<Admin, DbError> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (username, password)
            VALUES ($1, $2)
            RETURNING id, username, password, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await?;

        Ok(admin)
    }

    pub async fn update_password(&self, username: &str, password_hash: &str) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE admins SET password = $2 WHERE username = $1")
            .bind(username)
            .bind(password_hash)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "admin",
                id: username.to_owned(),
            });
        }
        Ok(())
    }
}
