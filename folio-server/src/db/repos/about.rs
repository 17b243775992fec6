//! About-page singleton
//!
//! The table holds at most one row (unique `singleton` column), so writes
//! are upserts on that column rather than select-then-insert.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use crate::models::{Paragraphs, RequiredText};
use super::DbError;

/// About content record
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutContent {
    pub id: i32,
    pub title: String,
    pub subtitle: String,
    pub paragraphs: Json<Vec<String>>,
    pub updated_at: DateTime<Utc>,
}

/// About repository
pub struct AboutRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> AboutRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self) -> Result<Option<AboutContent>, DbError> {
        let row = sqlx::query_as::<_, AboutContent>(
            "SELECT id, title, subtitle, paragraphs, updated_at FROM about_content LIMIT 1",
        )
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Create or replace the about content.
    pub async fn upsert(
        &self,
        title: &RequiredText,
        subtitle: &RequiredText,
        paragraphs: &Paragraphs,
    ) -> Result<AboutContent, DbError> {
        let row = sqlx::query_as::<_, AboutContent>(
            r#"
            INSERT INTO about_content (title, subtitle, paragraphs)
            VALUES ($1, $2, $3)
            ON CONFLICT (singleton) DO UPDATE
            SET title = EXCLUDED.title,
                subtitle = EXCLUDED.subtitle,
                paragraphs = EXCLUDED.paragraphs,
                updated_at = NOW()
            RETURNING id, title, subtitle, paragraphs, updated_at
            "#,
        )
        .bind(title.as_str())
        .bind(subtitle.as_str())
        .bind(Json(paragraphs.as_slice()))
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::test_support::fresh_db;

    fn text(s: &str) -> RequiredText {
        RequiredText::new("field", Some(s)).unwrap()
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn missing_until_first_upsert() {
        let (pool, _guard) = fresh_db().await;
        assert!(AboutRepo::new(&pool).get().await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn upsert_keeps_a_single_row() {
        let (pool, _guard) = fresh_db().await;
        let repo = AboutRepo::new(&pool);
        let paragraphs = Paragraphs::new(Some(vec!["one".into(), "two".into()])).unwrap();

        let first = repo.upsert(&text("About"), &text("Dev"), &paragraphs).await.unwrap();
        let second = repo.upsert(&text("About Me"), &text("Dev"), &paragraphs).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.title, "About Me");
        assert_eq!(second.paragraphs.0, vec!["one".to_string(), "two".to_string()]);

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM about_content")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }
}
