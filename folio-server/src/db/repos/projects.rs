//! Project repository
//!
//! Projects carry a many-to-many link to technologies through
//! `project_technologies`. Writes that touch both tables run in a single
//! transaction, so a failed re-association never leaves a half-updated
//! project behind.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Row, Transaction};

use crate::models::{RequiredText, TechnologyIds};
use super::{Category, DbError, Technology};

/// Project record from database
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub demo_url: String,
    pub category_id: Option<i32>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project with its technologies and category
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub technologies: Vec<Technology>,
    pub category: Option<Category>,
}

/// Validated input for a new project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: RequiredText,
    pub description: RequiredText,
    pub image_url: RequiredText,
    pub demo_url: RequiredText,
    pub category_id: Option<i32>,
    pub technology_ids: TechnologyIds,
}

/// Partial update. `None` leaves a column untouched; for `category_id`,
/// `Some(None)` clears the category. `technology_ids` replaces the whole
/// association set when present.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub title: Option<RequiredText>,
    pub description: Option<RequiredText>,
    pub image_url: Option<RequiredText>,
    pub demo_url: Option<RequiredText>,
    pub category_id: Option<Option<i32>>,
    pub technology_ids: Option<TechnologyIds>,
}

const PROJECT_COLUMNS: &str = r#"id, title, description, image_url, demo_url, category_id, "order", created_at, updated_at"#;

/// Project repository
pub struct ProjectRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ProjectRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List projects, highest `order` first, with relations attached.
    ///
    /// Three queries total regardless of project count.
    pub async fn list(&self) -> Result<Vec<ProjectDetail>, DbError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            r#"SELECT {PROJECT_COLUMNS} FROM projects ORDER BY "order" DESC, id DESC"#
        ))
        .fetch_all(self.pool)
        .await?;

        self.attach_relations(projects).await
    }

    pub async fn get(&self, id: i32) -> Result<ProjectDetail, DbError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| not_found(id))?;

        let mut details = self.attach_relations(vec![project]).await?;
        details.pop().ok_or_else(|| not_found(id))
    }

    /// Insert a project at the top of the ordering (max + 1, or 1 when empty)
    /// together with its technology links.
    pub async fn create(&self, input: NewProject) -> Result<ProjectDetail, DbError> {
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO projects (title, description, image_url, demo_url, category_id, "order")
            VALUES ($1, $2, $3, $4, $5, (SELECT COALESCE(MAX("order"), 0) + 1 FROM projects))
            RETURNING id
            "#,
        )
        .bind(input.title.as_str())
        .bind(input.description.as_str())
        .bind(input.image_url.as_str())
        .bind(input.demo_url.as_str())
        .bind(input.category_id)
        .fetch_one(&mut *tx)
        .await?;

        link_technologies(&mut tx, id, &input.technology_ids).await?;
        tx.commit().await?;

        tracing::debug!(project_id = id, "project created");
        self.get(id).await
    }

    /// Apply a partial update; technology links are replaced wholesale
    /// (delete all, insert new) inside the same transaction.
    pub async fn update(&self, id: i32, input: ProjectUpdate) -> Result<ProjectDetail, DbError> {
        let mut tx = self.pool.begin().await?;

        let (set_category, category_id) = match input.category_id {
            Some(value) => (true, value),
            None => (false, None),
        };

        sqlx::query(
            r#"
            UPDATE projects
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                image_url = COALESCE($4, image_url),
                demo_url = COALESCE($5, demo_url),
                category_id = CASE WHEN $6 THEN $7 ELSE category_id END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(input.title.as_ref().map(RequiredText::as_str))
        .bind(input.description.as_ref().map(RequiredText::as_str))
        .bind(input.image_url.as_ref().map(RequiredText::as_str))
        .bind(input.demo_url.as_ref().map(RequiredText::as_str))
        .bind(set_category)
        .bind(category_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| not_found(id))?;

        if let Some(technology_ids) = &input.technology_ids {
            sqlx::query("DELETE FROM project_technologies WHERE project_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            link_technologies(&mut tx, id, technology_ids).await?;
        }

        tx.commit().await?;
        self.get(id).await
    }

    /// Delete a project; its technology links cascade.
    pub async fn delete(&self, id: i32) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn attach_relations(&self, projects: Vec<Project>) -> Result<Vec<ProjectDetail>, DbError> {
        if projects.is_empty() {
            return Ok(Vec::new());
        }

        let project_ids: Vec<i32> = projects.iter().map(|p| p.id).collect();
        let mut category_ids: Vec<i32> = projects.iter().filter_map(|p| p.category_id).collect();
        category_ids.sort_unstable();
        category_ids.dedup();

        let rows = sqlx::query(
            r#"
            SELECT pt.project_id, t.id, t.name, t.slug
            FROM project_technologies pt
            JOIN technologies t ON t.id = pt.technology_id
            WHERE pt.project_id = ANY($1)
            ORDER BY t.name ASC
            "#,
        )
        .bind(&project_ids)
        .fetch_all(self.pool)
        .await?;

        let mut technologies: HashMap<i32, Vec<Technology>> = HashMap::new();
        for row in rows {
            technologies
                .entry(row.get("project_id"))
                .or_default()
                .push(Technology {
                    id: row.get("id"),
                    name: row.get("name"),
                    slug: row.get("slug"),
                });
        }

        let categories: HashMap<i32, Category> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            sqlx::query_as::<_, Category>(
                r#"SELECT id, name, slug, "order", created_at FROM categories WHERE id = ANY($1)"#,
            )
            .bind(&category_ids)
            .fetch_all(self.pool)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect()
        };

        Ok(projects
            .into_iter()
            .map(|project| ProjectDetail {
                technologies: technologies.remove(&project.id).unwrap_or_default(),
                category: project.category_id.and_then(|id| categories.get(&id).cloned()),
                project,
            })
            .collect())
    }
}

async fn link_technologies(
    tx: &mut Transaction<'_, Postgres>,
    project_id: i32,
    technology_ids: &TechnologyIds,
) -> Result<(), DbError> {
    if technology_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO project_technologies (project_id, technology_id)
        SELECT $1, UNNEST($2::int4[])
        "#,
    )
    .bind(project_id)
    .bind(technology_ids.as_slice())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

fn not_found(id: i32) -> DbError {
    DbError::NotFound {
        resource: "project",
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::test_support::fresh_db;
    use crate::db::repos::{CategoryRepo, NewCategory, TechnologyRepo};
    use crate::models::Slug;

    fn text(s: &str) -> RequiredText {
        RequiredText::new("field", Some(s)).unwrap()
    }

    fn new_project(title: &str, technology_ids: Vec<i32>) -> NewProject {
        NewProject {
            title: text(title),
            description: text("desc"),
            image_url: text("/uploads/1.webp"),
            demo_url: text("#"),
            category_id: None,
            technology_ids: TechnologyIds::new(technology_ids).unwrap(),
        }
    }

    async fn seed_technologies(pool: &PgPool, names: &[&str]) -> Vec<i32> {
        let repo = TechnologyRepo::new(pool);
        let mut ids = Vec::new();
        for name in names {
            let tech = repo
                .insert_if_absent(&text(name), &Slug::new(&name.to_lowercase()).unwrap())
                .await
                .unwrap()
                .unwrap();
            ids.push(tech.id);
        }
        ids
    }

    fn technology_ids(detail: &ProjectDetail) -> Vec<i32> {
        let mut ids: Vec<i32> = detail.technologies.iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn order_starts_at_one_and_increments() {
        let (pool, _guard) = fresh_db().await;
        let repo = ProjectRepo::new(&pool);

        let first = repo.create(new_project("a", vec![])).await.unwrap();
        let second = repo.create(new_project("b", vec![])).await.unwrap();
        assert_eq!(first.project.order, 1);
        assert_eq!(second.project.order, 2);

        let titles: Vec<_> = repo.list().await.unwrap().into_iter().map(|p| p.project.title).collect();
        assert_eq!(titles, ["b", "a"]);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_replaces_technology_set() {
        let (pool, _guard) = fresh_db().await;
        let ids = seed_technologies(&pool, &["One", "Two", "Three"]).await;
        let repo = ProjectRepo::new(&pool);

        let created = repo.create(new_project("p", vec![ids[0], ids[1]])).await.unwrap();
        assert_eq!(technology_ids(&created), vec![ids[0], ids[1]]);

        let updated = repo
            .update(
                created.project.id,
                ProjectUpdate {
                    technology_ids: Some(TechnologyIds::new(vec![ids[1], ids[2]]).unwrap()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(technology_ids(&updated), vec![ids[1], ids[2]]);
        assert_eq!(updated.project.title, "p");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn failed_reassociation_rolls_back_row_update() {
        let (pool, _guard) = fresh_db().await;
        let ids = seed_technologies(&pool, &["One"]).await;
        let repo = ProjectRepo::new(&pool);

        let created = repo.create(new_project("before", vec![ids[0]])).await.unwrap();
        let err = repo
            .update(
                created.project.id,
                ProjectUpdate {
                    title: Some(text("after")),
                    technology_ids: Some(TechnologyIds::new(vec![9999]).unwrap()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidReference(_)));

        let reloaded = repo.get(created.project.id).await.unwrap();
        assert_eq!(reloaded.project.title, "before");
        assert_eq!(technology_ids(&reloaded), vec![ids[0]]);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn deleting_category_clears_project_reference() {
        let (pool, _guard) = fresh_db().await;
        let category = CategoryRepo::new(&pool)
            .create(NewCategory {
                name: text("Bot"),
                slug: Slug::new("bot").unwrap(),
                order: 1,
            })
            .await
            .unwrap();

        let repo = ProjectRepo::new(&pool);
        let mut input = new_project("p", vec![]);
        input.category_id = Some(category.id);
        let created = repo.create(input).await.unwrap();
        assert_eq!(created.category.as_ref().map(|c| c.id), Some(category.id));

        assert!(CategoryRepo::new(&pool).delete(category.id).await.unwrap());

        let reloaded = repo.get(created.project.id).await.unwrap();
        assert_eq!(reloaded.project.category_id, None);
        assert!(reloaded.category.is_none());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn explicit_null_clears_category_and_absent_keeps_it() {
        let (pool, _guard) = fresh_db().await;
        let category = CategoryRepo::new(&pool)
            .create(NewCategory {
                name: text("Web"),
                slug: Slug::new("web").unwrap(),
                order: 0,
            })
            .await
            .unwrap();

        let repo = ProjectRepo::new(&pool);
        let mut input = new_project("p", vec![]);
        input.category_id = Some(category.id);
        let id = repo.create(input).await.unwrap().project.id;

        let kept = repo
            .update(id, ProjectUpdate { title: Some(text("q")), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(kept.project.category_id, Some(category.id));

        let cleared = repo
            .update(id, ProjectUpdate { category_id: Some(None), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(cleared.project.category_id, None);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_cascades_links() {
        let (pool, _guard) = fresh_db().await;
        let ids = seed_technologies(&pool, &["One"]).await;
        let repo = ProjectRepo::new(&pool);

        let created = repo.create(new_project("p", ids.clone())).await.unwrap();
        assert!(repo.delete(created.project.id).await.unwrap());
        assert!(!repo.delete(created.project.id).await.unwrap());

        let links: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM project_technologies")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(links.0, 0);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_missing_is_not_found() {
        let (pool, _guard) = fresh_db().await;
        let err = ProjectRepo::new(&pool)
            .update(42, ProjectUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "project", .. }));
    }
}
