//! Initial content for a fresh database
//!
//! Seeding only fills gaps: existing technologies, singletons and
//! projects are never overwritten, so running it twice is harmless.

use sqlx::PgPool;

use crate::models::{Paragraphs, RequiredText, Slug, TechnologyIds, ValidationError};
use super::repos::{
    AboutRepo, AdminRepo, DbError, NewProject, ProjectRepo, StatsRepo, TechnologyRepo,
};

/// Technology catalog offered to the admin UI.
pub const TECHNOLOGIES: &[(&str, &str)] = &[
    ("Next.js", "nextjs"),
    ("React", "react"),
    ("Node.js", "nodejs"),
    ("TypeScript", "typescript"),
    ("JavaScript", "javascript"),
    ("PostgreSQL", "postgresql"),
    ("MongoDB", "mongodb"),
    ("Firebase", "firebase"),
    ("Tailwind CSS", "tailwind"),
    ("Three.js", "threejs"),
    ("WebGL", "webgl"),
    ("GSAP", "gsap"),
    ("Stripe", "stripe"),
    ("OpenAI", "openai"),
    ("WebSocket", "websocket"),
    ("GraphQL", "graphql"),
    ("AWS", "aws"),
    ("Redis", "redis"),
    ("Chart.js", "chartjs"),
    ("API Integration", "api-integration"),
    ("Maps", "maps"),
    ("HTML", "html"),
    ("CSS", "css"),
    ("Python", "python"),
    ("Express.js", "expressjs"),
    ("Vue.js", "vuejs"),
    ("Angular", "angular"),
];

const ABOUT_TITLE: &str = "About Me";
const ABOUT_SUBTITLE: &str = "Full Stack Developer & Creative Coder";
const ABOUT_PARAGRAPHS: &[&str] = &[
    "I'm a passionate developer with expertise in building modern web applications. I love turning complex problems into simple, beautiful, and intuitive designs.",
    "With a strong foundation in both frontend and backend technologies, I create seamless user experiences that are not only functional but also aesthetically pleasing.",
    "When I'm not coding, you can find me exploring new technologies, contributing to open-source projects, or learning something new in the ever-evolving tech world.",
];

const SAMPLE_PROJECTS: &[(&str, &str, &[&str])] = &[
    (
        "E-Commerce Platform",
        "A full-stack e-commerce solution with payment integration, user authentication, and admin dashboard.",
        &["nextjs", "nodejs", "postgresql", "stripe"],
    ),
    (
        "3D Portfolio Website",
        "Interactive portfolio with 3D animations using Three.js and React Three Fiber.",
        &["react", "threejs", "webgl", "gsap"],
    ),
    (
        "Task Management App",
        "Real-time collaborative task management system with team features and notifications.",
        &["react", "firebase", "tailwind", "typescript"],
    ),
    (
        "AI Chat Application",
        "Chat application powered by AI with natural language processing capabilities.",
        &["nextjs", "openai", "websocket", "mongodb"],
    ),
    (
        "Weather Dashboard",
        "Weather forecast application with interactive maps and detailed analytics.",
        &["react", "api-integration", "chartjs", "maps"],
    ),
    (
        "Social Media Platform",
        "Social networking platform with posts, stories, and real-time messaging.",
        &["nextjs", "graphql", "aws", "redis"],
    ),
];

const SAMPLE_IMAGE: &str = "/placeholder-project.webp";

/// Seeding error
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Database(#[from] DbError),

    #[error("invalid seed data: {0}")]
    Invalid(#[from] ValidationError),
}

/// What to seed beyond the technology catalog and singletons
#[derive(Debug, Clone, Default)]
pub struct SeedOptions {
    /// Username and Argon2 hash for an initial admin
    pub admin: Option<(String, String)>,
    /// Insert placeholder projects when the table is empty
    pub sample_projects: bool,
}

/// Counts of rows actually inserted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub technologies: usize,
    pub admin_created: bool,
    pub about_created: bool,
    pub stats_created: bool,
    pub projects: usize,
}

/// Fill a migrated database with initial content.
pub async fn run(pool: &PgPool, options: SeedOptions) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    let technologies = TechnologyRepo::new(pool);
    for (name, slug) in TECHNOLOGIES {
        let name = RequiredText::new("name", Some(*name))?;
        let slug = Slug::new(slug)?;
        if technologies.insert_if_absent(&name, &slug).await?.is_some() {
            report.technologies += 1;
        }
    }

    if let Some((username, password_hash)) = &options.admin {
        let admins = AdminRepo::new(pool);
        if admins.find_by_username(username).await?.is_none() {
            admins.create(username, password_hash).await?;
            report.admin_created = true;
        }
    }

    let about = AboutRepo::new(pool);
    if about.get().await?.is_none() {
        let paragraphs =
            Paragraphs::new(Some(ABOUT_PARAGRAPHS.iter().map(|p| p.to_string()).collect()))?;
        about
            .upsert(
                &RequiredText::new("title", Some(ABOUT_TITLE))?,
                &RequiredText::new("subtitle", Some(ABOUT_SUBTITLE))?,
                &paragraphs,
            )
            .await?;
        report.about_created = true;
    }

    let stats = StatsRepo::new(pool);
    if stats.get().await?.is_none() {
        stats
            .upsert(
                &RequiredText::new("yearsExperience", Some("5+"))?,
                &RequiredText::new("projectsCompleted", Some("50+"))?,
            )
            .await?;
        report.stats_created = true;
    }

    if options.sample_projects {
        report.projects = seed_projects(pool).await?;
    }

    tracing::info!(?report, "Seed complete");
    Ok(report)
}

async fn seed_projects(pool: &PgPool) -> Result<usize, SeedError> {
    let projects = ProjectRepo::new(pool);
    if !projects.list().await?.is_empty() {
        tracing::info!("Projects already present, skipping samples");
        return Ok(0);
    }

    let catalog = TechnologyRepo::new(pool).list().await?;
    let mut inserted = 0;

    // Inserted oldest first so the first sample ends up with order 1.
    for (title, description, slugs) in SAMPLE_PROJECTS {
        let ids: Vec<i32> = catalog
            .iter()
            .filter(|t| slugs.contains(&t.slug.as_str()))
            .map(|t| t.id)
            .collect();

        projects
            .create(NewProject {
                title: RequiredText::new("title", Some(*title))?,
                description: RequiredText::new("description", Some(*description))?,
                image_url: RequiredText::new("imageUrl", Some(SAMPLE_IMAGE))?,
                demo_url: RequiredText::new("demoUrl", Some("#"))?,
                category_id: None,
                technology_ids: TechnologyIds::new(ids)?,
            })
            .await?;
        inserted += 1;
    }

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::test_support::fresh_db;

    #[test]
    fn catalog_slugs_are_valid() {
        for (name, slug) in TECHNOLOGIES {
            assert!(Slug::new(slug).is_ok(), "bad slug for {name}");
        }
    }

    #[test]
    fn sample_projects_reference_catalog() {
        for (title, _, slugs) in SAMPLE_PROJECTS {
            for slug in *slugs {
                assert!(
                    TECHNOLOGIES.iter().any(|(_, s)| s == slug),
                    "{title} references unknown technology {slug}"
                );
            }
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn seeding_twice_inserts_once() {
        let (pool, _guard) = fresh_db().await;
        let options = SeedOptions {
            admin: Some(("admin".into(), "$argon2id$fake".into())),
            sample_projects: true,
        };

        let first = run(&pool, options.clone()).await.unwrap();
        assert_eq!(first.technologies, TECHNOLOGIES.len());
        assert!(first.admin_created && first.about_created && first.stats_created);
        assert_eq!(first.projects, SAMPLE_PROJECTS.len());

        let second = run(&pool, options).await.unwrap();
        assert_eq!(second, SeedReport::default());
    }
}
