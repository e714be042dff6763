//! Bootstrap data for a fresh database.
//!
//! Every step is skipped when its table already has rows, so running the
//! seed binary twice is harmless.

use haosenyi_core::slug::slugify;
use haosenyi_db::models::admin::{Admin, CreateAdmin};
use haosenyi_db::models::article::{ArticleStatus, CreateArticle};
use haosenyi_db::models::work::{CreateWork, WorkType};
use haosenyi_db::repositories::{AdminRepo, ArticleRepo, WorkRepo};
use haosenyi_db::DbPool;

use crate::auth::password::hash_password_blocking;
use crate::error::AppResult;

/// Credentials for the bootstrap admin.
#[derive(Debug, Clone)]
pub struct SeedAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// What a seed run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub articles_created: usize,
    pub works_created: usize,
}

/// Create the admin unless one exists.
pub async fn seed_admin(pool: &DbPool, admin: &SeedAdmin) -> AppResult<Option<Admin>> {
    if AdminRepo::exists(pool).await? {
        return Ok(None);
    }
    let password_hash = hash_password_blocking(admin.password.clone()).await?;
    let input = CreateAdmin {
        username: admin.username.clone(),
        email: admin.email.clone(),
        password_hash,
    };
    Ok(AdminRepo::create_first(pool, &input).await?)
}

/// Insert the sample articles when the table is empty.
pub async fn seed_articles(pool: &DbPool) -> AppResult<usize> {
    if ArticleRepo::count(pool, &Default::default()).await? > 0 {
        return Ok(0);
    }

    let samples = [
        (
            "Welcome to HaoSenYi AI",
            "This is the first sample article, introducing our AI services.",
            ArticleStatus::Published,
        ),
        (
            "The Future of AI Technology",
            "A look at where artificial intelligence is heading and how it will be applied.",
            ArticleStatus::Draft,
        ),
    ];

    for (title, content, status) in samples {
        let input = CreateArticle {
            title: title.to_string(),
            slug: slugify(title),
            content: content.to_string(),
            cover_image: None,
            status,
        };
        ArticleRepo::create(pool, &input).await?;
    }
    Ok(samples.len())
}

/// Insert the sample portfolio works when the table is empty.
pub async fn seed_works(pool: &DbPool) -> AppResult<usize> {
    if WorkRepo::count(pool, &Default::default()).await? > 0 {
        return Ok(0);
    }

    let samples = [
        (
            "E-commerce Platform",
            "ABC Corp",
            WorkType::Ecommerce,
            "https://example.com",
            true,
            1,
        ),
        (
            "Corporate Website",
            "XYZ Enterprise",
            WorkType::Website,
            "https://example2.com",
            false,
            2,
        ),
        (
            "Mobile App",
            "DEF Technology",
            WorkType::App,
            "https://example3.com",
            true,
            3,
        ),
    ];

    for (title, company, work_type, link_url, is_featured, display_order) in samples {
        let input = CreateWork {
            title: title.to_string(),
            company: company.to_string(),
            work_type,
            link_url: Some(link_url.to_string()),
            image_url: None,
            is_featured,
            display_order,
        };
        WorkRepo::create(pool, &input).await?;
    }
    Ok(samples.len())
}

/// Run every seed step.
pub async fn run(pool: &DbPool, admin: &SeedAdmin) -> AppResult<SeedReport> {
    let created = seed_admin(pool, admin).await?;
    if let Some(admin) = &created {
        tracing::info!(admin_id = admin.id, username = %admin.username, "Seeded admin account");
    } else {
        tracing::info!("Admin account already exists, skipping");
    }

    let articles_created = seed_articles(pool).await?;
    let works_created = seed_works(pool).await?;
    tracing::info!(articles_created, works_created, "Seeded sample content");

    Ok(SeedReport {
        admin_created: created.is_some(),
        articles_created,
        works_created,
    })
}
