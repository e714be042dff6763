//! Handlers for the `/articles` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use haosenyi_core::error::CoreError;
use haosenyi_core::pagination::Pagination;
use haosenyi_core::slug::slugify_checked;
use haosenyi_core::types::DbId;
use haosenyi_db::models::article::{
    Article, ArticleFilter, ArticleStatus, CreateArticle, UpdateArticle,
};
use haosenyi_db::repositories::ArticleRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, AppQuery};
use crate::handlers::page_request;
use crate::middleware::auth::AuthAdmin;
use crate::response::MessageResponse;
use crate::state::AppState;
use crate::upload::{CoverImage, FormFields, UploadForm};
use crate::validation::{non_blank, FieldErrors};

const TITLE_REQUIRED: &str = "Title is required";
const CONTENT_REQUIRED: &str = "Content is required";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /articles`.
///
/// Kept as raw strings so a bad value produces a field error rather than a
/// generic query rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ArticleListParams {
    pub status: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Paginated article list.
#[derive(Debug, Serialize)]
pub struct ArticleList {
    pub articles: Vec<Article>,
    pub pagination: Pagination,
}

/// Validated text fields of a create or update request.
#[derive(Debug, Default)]
struct ArticleFields {
    title: Option<String>,
    slug: Option<String>,
    content: Option<String>,
    status: Option<ArticleStatus>,
}

/// Validate the text fields. `required` is set for creates.
fn validate_fields(fields: &FormFields, required: bool) -> AppResult<ArticleFields> {
    let mut errors = FieldErrors::new();

    let title = errors.text("title", fields.get("title"), required, TITLE_REQUIRED);
    let slug = match title.as_deref().map(slugify_checked) {
        Some(Ok(slug)) => Some(slug),
        Some(Err(CoreError::Validation(message))) => {
            errors.add("title", "slug", message);
            None
        }
        Some(Err(other)) => return Err(other.into()),
        None => None,
    };
    let content = errors.text("content", fields.get("content"), required, CONTENT_REQUIRED);
    let status = errors.parse::<ArticleStatus>("status", non_blank(fields.get("status")));

    errors.finish()?;
    Ok(ArticleFields {
        title,
        slug,
        content,
        status,
    })
}

fn not_found(id: DbId) -> AppError {
    CoreError::not_found("Article", id).into()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/articles?status=&page=&limit=
pub async fn list_articles(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ArticleListParams>,
) -> AppResult<Json<ArticleList>> {
    let mut errors = FieldErrors::new();
    let status = errors.parse::<ArticleStatus>("status", non_blank(params.status.as_deref()));
    errors.finish()?;

    let filter = ArticleFilter { status };
    let page = page_request(params.page.as_deref(), params.limit.as_deref());

    let (articles, total) = tokio::try_join!(
        ArticleRepo::list(&state.pool, &filter, &page),
        ArticleRepo::count(&state.pool, &filter),
    )?;

    Ok(Json(ArticleList {
        articles,
        pagination: page.paginate(total),
    }))
}

/// GET /api/articles/{id}
pub async fn get_article(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Article>> {
    let article = ArticleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(article))
}

/// POST /api/articles (auth, multipart with optional `coverImage`)
pub async fn create_article(
    State(state): State<AppState>,
    admin: AuthAdmin,
    form: UploadForm<CoverImage>,
) -> AppResult<(StatusCode, Json<Article>)> {
    let fields = validate_fields(&form.fields, true)?;
    let cover_image = state.uploads.save_optional(form.file.as_ref()).await?;

    let input = CreateArticle {
        title: fields.title.unwrap_or_default(),
        slug: fields.slug.unwrap_or_default(),
        content: fields.content.unwrap_or_default(),
        cover_image: cover_image.clone(),
        status: fields.status.unwrap_or_default(),
    };

    let article = match ArticleRepo::create(&state.pool, &input).await {
        Ok(article) => article,
        Err(e) => {
            state.uploads.discard(cover_image.as_deref()).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        article_id = article.id,
        slug = %article.slug,
        admin_id = admin.admin_id,
        "Article created"
    );
    Ok((StatusCode::CREATED, Json(article)))
}

/// PUT /api/articles/{id} (auth, partial update)
pub async fn update_article(
    State(state): State<AppState>,
    admin: AuthAdmin,
    AppPath(id): AppPath<DbId>,
    form: UploadForm<CoverImage>,
) -> AppResult<Json<Article>> {
    let fields = validate_fields(&form.fields, false)?;

    let existing = ArticleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let cover_image = state.uploads.save_optional(form.file.as_ref()).await?;

    let input = UpdateArticle {
        title: fields.title,
        slug: fields.slug,
        content: fields.content,
        cover_image: cover_image.clone(),
        status: fields.status,
    };

    let updated = match ArticleRepo::update(&state.pool, id, &input).await {
        Ok(Some(article)) => article,
        Ok(None) => {
            state.uploads.discard(cover_image.as_deref()).await;
            return Err(not_found(id));
        }
        Err(e) => {
            state.uploads.discard(cover_image.as_deref()).await;
            return Err(e.into());
        }
    };

    if cover_image.is_some() && existing.cover_image != updated.cover_image {
        state.uploads.discard(existing.cover_image.as_deref()).await;
    }

    tracing::info!(article_id = id, admin_id = admin.admin_id, "Article updated");
    Ok(Json(updated))
}

/// DELETE /api/articles/{id} (auth)
pub async fn delete_article(
    State(state): State<AppState>,
    admin: AuthAdmin,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let deleted = ArticleRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    state.uploads.discard(deleted.cover_image.as_deref()).await;

    tracing::info!(article_id = id, admin_id = admin.admin_id, "Article deleted");
    Ok(Json(MessageResponse::new("Article deleted")))
}
