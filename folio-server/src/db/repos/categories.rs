//! Category repository
//!
//! Categories group projects. Deleting one leaves its projects in place
//! with `category_id` cleared by the `ON DELETE SET NULL` foreign key.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::models::{RequiredText, Slug};
use super::DbError;

/// Category record from database
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new category
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: RequiredText,
    pub slug: Slug,
    pub order: i32,
}

/// Validated input for replacing a category; `order` keeps its value when absent
#[derive(Debug, Clone)]
pub struct CategoryUpdate {
    pub name: RequiredText,
    pub slug: Slug,
    pub order: Option<i32>,
}

/// Category repository
pub struct CategoryRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List categories by display order, ties broken by name.
    pub async fn list(&self) -> Result<Vec<Category>, DbError> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, "order", created_at
            FROM categories
            ORDER BY "order" ASC, name ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert a category. Duplicate name or slug surfaces as `DbError::Conflict`.
    pub async fn create(&self, input: NewCategory) -> Result<Category, DbError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, slug, "order")
            VALUES ($1, $2, $3)
            RETURNING id, name, slug, "order", created_at
            "#,
        )
        .bind(input.name.as_str())
        .bind(input.slug.as_str())
        .bind(input.order)
        .fetch_one(self.pool)
        .await?;

        Ok(category)
    }

    pub async fn update(&self, id: i32, input: CategoryUpdate) -> Result<Category, DbError> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $2, slug = $3, "order" = COALESCE($4, "order")
            WHERE id = $1
            RETURNING id, name, slug, "order", created_at
            "#,
        )
        .bind(id)
        .bind(input.name.as_str())
        .bind(input.slug.as_str())
        .bind(input.order)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "category",
            id: id.to_string(),
        })
    }

    /// Delete a category, returning whether a row was removed.
    pub async fn delete(&self, id: i32) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
