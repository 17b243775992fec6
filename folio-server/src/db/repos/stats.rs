//! Site statistics singleton

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::models::RequiredText;
use super::DbError;

/// Site stats record. Values are display strings such as "5+".
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteStats {
    pub id: i32,
    pub years_experience: String,
    pub projects_completed: String,
    pub updated_at: DateTime<Utc>,
}

/// Stats repository
pub struct StatsRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> StatsRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self) -> Result<Option<SiteStats>, DbError> {
        let row = sqlx::query_as::<_, SiteStats>(
            "SELECT id, years_experience, projects_completed, updated_at FROM site_stats LIMIT 1",
        )
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Create or replace the stats row.
    pub async fn upsert(
        &self,
        years_experience: &RequiredText,
        projects_completed: &RequiredText,
    ) -> Result<SiteStats, DbError> {
        let row = sqlx::query_as::<_, SiteStats>(
            r#"
            INSERT INTO site_stats (years_experience, projects_completed)
            VALUES ($1, $2)
            ON CONFLICT (singleton) DO UPDATE
            SET years_experience = EXCLUDED.years_experience,
                projects_completed = EXCLUDED.projects_completed,
                updated_at = NOW()
            RETURNING id, years_experience, projects_completed, updated_at
            "#,
        )
        .bind(years_experience.as_str())
        .bind(projects_completed.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::test_support::fresh_db;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn upsert_replaces_values() {
        let (pool, _guard) = fresh_db().await;
        let repo = StatsRepo::new(&pool);
        let text = |s: &str| RequiredText::new("field", Some(s)).unwrap();

        repo.upsert(&text("5+"), &text("50+")).await.unwrap();
        repo.upsert(&text("6+"), &text("60+")).await.unwrap();

        let stats = repo.get().await.unwrap().unwrap();
        assert_eq!(stats.years_experience, "6+");
        assert_eq!(stats.projects_completed, "60+");
    }
}
