//! Technology repository
//!
//! Technologies are read-only over HTTP; rows come from `folio seed`.

use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::models::{RequiredText, Slug};
use super::DbError;

/// Technology record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Technology {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

/// Technology repository
pub struct TechnologyRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TechnologyRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all technologies alphabetically.
    pub async fn list(&self) -> Result<Vec<Technology>, DbError> {
        let rows = sqlx::query_as::<_, Technology>(
            "SELECT id, name, slug FROM technologies ORDER BY name ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert a technology unless its name or slug is already taken.
    ///
    /// Returns `None` when the row already existed.
    pub async fn insert_if_absent(
        &self,
        name: &RequiredText,
        slug: &Slug,
    ) -> Result<Option<Technology>, DbError> {
        let row = sqlx::query_as::<_, Technology>(
            r#"
            INSERT INTO technologies (name, slug)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            RETURNING id, name, slug
            "#,
        )
        .bind(name.as_str())
        .bind(slug.as_str())
        .fetch_optional(self.pool)
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
    async fn insert_if_absent_is_idempotent_and_list_is_sorted() {
        let (pool, _guard) = fresh_db().await;
        let repo = TechnologyRepo::new(&pool);

        let react = RequiredText::new("name", Some("React")).unwrap();
        let react_slug = Slug::new("react").unwrap();
        let aws = RequiredText::new("name", Some("AWS")).unwrap();
        let aws_slug = Slug::new("aws").unwrap();

        assert!(repo.insert_if_absent(&react, &react_slug).await.unwrap().is_some());
        assert!(repo.insert_if_absent(&react, &react_slug).await.unwrap().is_none());
        repo.insert_if_absent(&aws, &aws_slug).await.unwrap();

        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, ["AWS", "React"]);
    }
}
