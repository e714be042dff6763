//! Bootstrap a fresh database: apply migrations, create the first admin,
//! and insert sample articles and works.
//!
//! Reads `DATABASE_URL` plus `SEED_ADMIN_USERNAME` (default `admin`),
//! `SEED_ADMIN_EMAIL` (default `admin@haosenyi.com`) and
//! `SEED_ADMIN_PASSWORD` (required).

use anyhow::Context;
use haosenyi_api::config::Environment;
use haosenyi_api::seed::{self, SeedAdmin};
use haosenyi_api::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(Environment::from_name(
        &std::env::var("NODE_ENV").unwrap_or_default(),
    ));

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let admin = SeedAdmin {
        username: std::env::var("SEED_ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
        email: std::env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@haosenyi.com".into()),
        password: std::env::var("SEED_ADMIN_PASSWORD")
            .context("SEED_ADMIN_PASSWORD must be set")?,
    };
    anyhow::ensure!(
        admin.password.len() >= 6,
        "SEED_ADMIN_PASSWORD must be at least 6 characters"
    );

    let pool = haosenyi_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    haosenyi_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let report = seed::run(&pool, &admin)
        .await
        .map_err(|e| anyhow::anyhow!("Seeding failed: {e}"))?;

    tracing::info!(
        admin_created = report.admin_created,
        articles_created = report.articles_created,
        works_created = report.works_created,
        "Seed complete"
    );
    pool.close().await;
    Ok(())
}
