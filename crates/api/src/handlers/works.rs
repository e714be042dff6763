//! Handlers for the `/works` resource (portfolio entries).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use haosenyi_core::error::CoreError;
use haosenyi_core::pagination::Pagination;
use haosenyi_core::types::DbId;
use haosenyi_db::models::work::{CreateWork, UpdateWork, Work, WorkFilter, WorkType};
use haosenyi_db::repositories::WorkRepo;
use serde::{Deserialize, Serialize};
use validator::ValidateUrl;

use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, AppQuery};
use crate::handlers::page_request;
use crate::middleware::auth::AuthAdmin;
use crate::response::MessageResponse;
use crate::state::AppState;
use crate::upload::{FormFields, UploadForm, WorkImage};
use crate::validation::{non_blank, FieldErrors};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /works`.
#[derive(Debug, Default, Deserialize)]
pub struct WorkListParams {
    #[serde(rename = "type")]
    pub work_type: Option<String>,
    /// Only the literal `true` enables the filter.
    pub featured: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Paginated work list.
#[derive(Debug, Serialize)]
pub struct WorkList {
    pub works: Vec<Work>,
    pub pagination: Pagination,
}

/// Validated text fields of a create or update request.
#[derive(Debug, Default)]
struct WorkFields {
    title: Option<String>,
    company: Option<String>,
    work_type: Option<WorkType>,
    /// `Some(None)` when the client sent an empty link.
    link_url: Option<Option<String>>,
    is_featured: Option<bool>,
    display_order: Option<i32>,
}

/// Validate the text fields. `required` is set for creates.
fn validate_fields(fields: &FormFields, required: bool) -> AppResult<WorkFields> {
    let mut errors = FieldErrors::new();

    let title = errors.text("title", fields.get("title"), required, "Title is required");
    let company = errors.text(
        "company",
        fields.get("company"),
        required,
        "Company is required",
    );

    let work_type = errors.parse::<WorkType>("type", non_blank(fields.get("type")));
    if required && work_type.is_none() && non_blank(fields.get("type")).is_none() {
        errors.add(
            "type",
            "required",
            "type must be one of WEBSITE, ECOMMERCE, APP or OTHER",
        );
    }

    let link_url = match fields.get("linkUrl").map(str::trim) {
        None => None,
        Some("") => Some(None),
        Some(url) if url.validate_url() => Some(Some(url.to_string())),
        Some(_) => {
            errors.add("linkUrl", "url", "linkUrl must be a valid URL");
            None
        }
    };

    let is_featured = errors.parse_bool(
        "isFeatured",
        non_blank(fields.get("isFeatured")),
        "isFeatured must be true or false",
    );
    let display_order = errors.parse_int::<i32>(
        "displayOrder",
        non_blank(fields.get("displayOrder")),
        "displayOrder must be an integer",
    );

    errors.finish()?;
    Ok(WorkFields {
        title,
        company,
        work_type,
        link_url,
        is_featured,
        display_order,
    })
}

fn not_found(id: DbId) -> AppError {
    CoreError::not_found("Work", id).into()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/works?type=&featured=&page=&limit=
pub async fn list_works(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<WorkListParams>,
) -> AppResult<Json<WorkList>> {
    let mut errors = FieldErrors::new();
    let work_type = errors.parse::<WorkType>("type", non_blank(params.work_type.as_deref()));
    errors.finish()?;

    let filter = WorkFilter {
        work_type,
        featured_only: params.featured.as_deref() == Some("true"),
    };
    let page = page_request(params.page.as_deref(), params.limit.as_deref());

    let (works, total) = tokio::try_join!(
        WorkRepo::list(&state.pool, &filter, &page),
        WorkRepo::count(&state.pool, &filter),
    )?;

    Ok(Json(WorkList {
        works,
        pagination: page.paginate(total),
    }))
}

/// GET /api/works/{id}
pub async fn get_work(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Work>> {
    let work = WorkRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(work))
}

/// POST /api/works (auth, multipart with optional `imageUrl`)
pub async fn create_work(
    State(state): State<AppState>,
    admin: AuthAdmin,
    form: UploadForm<WorkImage>,
) -> AppResult<(StatusCode, Json<Work>)> {
    let fields = validate_fields(&form.fields, true)?;
    let (Some(work_type), Some(title), Some(company)) =
        (fields.work_type, fields.title, fields.company)
    else {
        return Err(AppError::InternalError(
            "validated work fields are incomplete".into(),
        ));
    };

    let image_url = state.uploads.save_optional(form.file.as_ref()).await?;

    let input = CreateWork {
        title,
        company,
        work_type,
        link_url: fields.link_url.flatten(),
        image_url: image_url.clone(),
        is_featured: fields.is_featured.unwrap_or(false),
        display_order: fields.display_order.unwrap_or(0),
    };

    let work = match WorkRepo::create(&state.pool, &input).await {
        Ok(work) => work,
        Err(e) => {
            state.uploads.discard(image_url.as_deref()).await;
            return Err(e.into());
        }
    };

    tracing::info!(work_id = work.id, admin_id = admin.admin_id, "Work created");
    Ok((StatusCode::CREATED, Json(work)))
}

/// PUT /api/works/{id} (auth, partial update)
pub async fn update_work(
    State(state): State<AppState>,
    admin: AuthAdmin,
    AppPath(id): AppPath<DbId>,
    form: UploadForm<WorkImage>,
) -> AppResult<Json<Work>> {
    let fields = validate_fields(&form.fields, false)?;

    let existing = WorkRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let image_url = state.uploads.save_optional(form.file.as_ref()).await?;

    let input = UpdateWork {
        title: fields.title,
        company: fields.company,
        work_type: fields.work_type,
        link_url: fields.link_url,
        image_url: image_url.clone(),
        is_featured: fields.is_featured,
        display_order: fields.display_order,
    };

    let updated = match WorkRepo::update(&state.pool, id, &input).await {
        Ok(Some(work)) => work,
        Ok(None) => {
            state.uploads.discard(image_url.as_deref()).await;
            return Err(not_found(id));
        }
        Err(e) => {
            state.uploads.discard(image_url.as_deref()).await;
            return Err(e.into());
        }
    };

    if image_url.is_some() && existing.image_url != updated.image_url {
        state.uploads.discard(existing.image_url.as_deref()).await;
    }

    tracing::info!(work_id = id, admin_id = admin.admin_id, "Work updated");
    Ok(Json(updated))
}

/// DELETE /api/works/{id} (auth)
pub async fn delete_work(
    State(state): State<AppState>,
    admin: AuthAdmin,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let deleted = WorkRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    state.uploads.discard(deleted.image_url.as_deref()).await;

    tracing::info!(work_id = id, admin_id = admin.admin_id, "Work deleted");
    Ok(Json(MessageResponse::new("Work deleted")))
}
