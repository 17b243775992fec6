//! Schema migrations
//!
//! Every statement is idempotent so `run` is safe on each startup.

use sqlx::PgPool;

use super::repos::DbError;

const STATEMENTS: &[(&str, &str)] = &[
    (
        "admins",
        r#"
        CREATE TABLE IF NOT EXISTS admins (
            id SERIAL PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "technologies",
        r#"
        CREATE TABLE IF NOT EXISTS technologies (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            slug TEXT NOT NULL UNIQUE
        )
        "#,
    ),
    (
        "categories",
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            slug TEXT NOT NULL UNIQUE,
            "order" INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "projects",
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id SERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            image_url TEXT NOT NULL,
            demo_url TEXT NOT NULL,
            category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
            "order" INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "project_technologies",
        r#"
        CREATE TABLE IF NOT EXISTS project_technologies (
            id SERIAL PRIMARY KEY,
            project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            technology_id INTEGER NOT NULL REFERENCES technologies(id) ON DELETE CASCADE,
            UNIQUE (project_id, technology_id)
        )
        "#,
    ),
    (
        "about_content",
        r#"
        CREATE TABLE IF NOT EXISTS about_content (
            id SERIAL PRIMARY KEY,
            singleton BOOLEAN NOT NULL DEFAULT TRUE UNIQUE CHECK (singleton),
            title TEXT NOT NULL,
            subtitle TEXT NOT NULL,
            paragraphs JSONB NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "site_stats",
        r#"
        CREATE TABLE IF NOT EXISTS site_stats (
            id SERIAL PRIMARY KEY,
            singleton BOOLEAN NOT NULL DEFAULT TRUE UNIQUE CHECK (singleton),
            years_experience TEXT NOT NULL,
            projects_completed TEXT NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "projects_order_idx",
        r#"CREATE INDEX IF NOT EXISTS projects_order_idx ON projects ("order" DESC)"#,
    ),
    (
        "project_technologies_technology_idx",
        "CREATE INDEX IF NOT EXISTS project_technologies_technology_idx ON project_technologies (technology_id)",
    ),
];

/// Run all migrations in order.
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running migrations...");

    for (name, sql) in STATEMENTS {
        tracing::debug!(migration = name, "applying");
        sqlx::query(sql).execute(pool).await?;
    }

    tracing::info!(count = STATEMENTS.len(), "Migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_precede_their_dependents() {
        let position = |name: &str| {
            STATEMENTS
                .iter()
                .position(|(n, _)| *n == name)
                .expect("migration present")
        };
        assert!(position("categories") < position("projects"));
        assert!(position("projects") < position("project_technologies"));
        assert!(position("technologies") < position("project_technologies"));
    }

    #[test]
    fn statements_are_idempotent() {
        for (name, sql) in STATEMENTS {
            assert!(sql.contains("IF NOT EXISTS"), "{name} is not idempotent");
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn run_twice_is_harmless() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        run(&pool).await.expect("first run");
        run(&pool).await.expect("second run");
    }
}
