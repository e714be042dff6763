//! Repository for the `works` table.

use haosenyi_core::pagination::PageRequest;
use haosenyi_core::types::DbId;
use sqlx::PgPool;

use crate::models::work::{CreateWork, UpdateWork, Work, WorkFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, company, work_type, link_url, image_url, is_featured, \
                       display_order, created_at, updated_at";

/// Optional type filter (`$1`, NULL when unfiltered) and featured flag (`$2`).
const FILTER: &str = "($1::work_type IS NULL OR work_type = $1) AND (NOT $2 OR is_featured)";

/// Provides CRUD operations for portfolio works.
pub struct WorkRepo;

impl WorkRepo {
    /// Insert a new work, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateWork) -> Result<Work, sqlx::Error> {
        let query = format!(
            "INSERT INTO works (title, company, work_type, link_url, image_url, is_featured, display_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Work>(&query)
            .bind(&input.title)
            .bind(&input.company)
            .bind(input.work_type)
            .bind(&input.link_url)
            .bind(&input.image_url)
            .bind(input.is_featured)
            .bind(input.display_order)
            .fetch_one(pool)
            .await
    }

    /// Find a work by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Work>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM works WHERE id = $1");
        sqlx::query_as::<_, Work>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one page of works by display order, then newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &WorkFilter,
        page: &PageRequest,
    ) -> Result<Vec<Work>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM works
             WHERE {FILTER}
             ORDER BY display_order ASC, created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Work>(&query)
            .bind(filter.work_type)
            .bind(filter.featured_only)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Count works matching `filter`.
    pub async fn count(pool: &PgPool, filter: &WorkFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM works WHERE {FILTER}");
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(filter.work_type)
            .bind(filter.featured_only)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Update a work. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWork,
    ) -> Result<Option<Work>, sqlx::Error> {
        let query = format!(
            "UPDATE works SET
                title = COALESCE($2, title),
                company = COALESCE($3, company),
                work_type = COALESCE($4, work_type),
                link_url = CASE WHEN $5 THEN $6 ELSE link_url END,
                image_url = COALESCE($7, image_url),
                is_featured = COALESCE($8, is_featured),
                display_order = COALESCE($9, display_order),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let (set_link, link_url) = match &input.link_url {
            Some(link) => (true, link.clone()),
            None => (false, None),
        };
        sqlx::query_as::<_, Work>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.company)
            .bind(input.work_type)
            .bind(set_link)
            .bind(link_url)
            .bind(&input.image_url)
            .bind(input.is_featured)
            .bind(input.display_order)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a work, returning the removed row if it existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Work>, sqlx::Error> {
        let query = format!("DELETE FROM works WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Work>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
