use std::collections::BTreeMap;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use haosenyi_core::error::CoreError;
use haosenyi_core::upload::UploadError;
use serde_json::json;
use validator::ValidationErrors;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `haosenyi_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Field-level input validation failures.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// A rejected image upload (size, type, or field).
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Detailed message of a 500 response, stashed in the response extensions.
///
/// The client only ever sees the generic message unless the server runs in
/// development mode, in which case [`crate::middleware::errors`] copies this
/// into the body.
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

/// Generic message returned for every 500 response.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details: Option<BTreeMap<String, Vec<String>>> = None;
        let mut internal_detail: Option<String> = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => {
                let message = core.client_message();
                match core {
                    CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", message),
                    CoreError::Validation(_) => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
                    }
                    CoreError::Conflict(_) => (StatusCode::BAD_REQUEST, "CONFLICT", message),
                    CoreError::Unauthorized(_) => {
                        (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
                    }
                    CoreError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN", message),
                    CoreError::Internal(_) => {
                        internal_detail = Some(message);
                        internal_error()
                    }
                }
            }

            // --- Database errors ---
            AppError::Database(err) => {
                let classified = classify_sqlx_error(err);
                if classified.0 == StatusCode::INTERNAL_SERVER_ERROR {
                    internal_detail = Some(err.to_string());
                }
                classified
            }

            // --- Input errors ---
            AppError::Validation(errors) => {
                details = Some(field_messages(errors));
                (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "Validation failed".to_string(),
                )
            }
            AppError::Upload(err) => (StatusCode::BAD_REQUEST, "UPLOAD_ERROR", err.to_string()),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                internal_detail = Some(msg.clone());
                internal_error()
            }
        };

        if let Some(detail) = &internal_detail {
            tracing::error!(error = %detail, "Internal error");
        } else {
            tracing::debug!(status = status.as_u16(), code, error = %message, "Request failed");
        }

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = json!(details);
        }

        let mut response = (status, axum::Json(body)).into_response();
        if let Some(detail) = internal_detail {
            response.extensions_mut().insert(InternalErrorDetail(detail));
        }
        response
    }
}

fn internal_error() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_ERROR_MESSAGE.to_string(),
    )
}

/// Flatten validator output into `{ field: [message, ...] }`.
///
/// Falls back to the validator code when a rule carries no message.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid ({})", e.code))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map
///   to 400 with a message naming the duplicated field.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::BAD_REQUEST,
                        "CONFLICT",
                        duplicate_message(constraint),
                    );
                }
            }
            internal_error()
        }
        _ => internal_error(),
    }
}

/// User-facing "already exists" message for a unique constraint.
fn duplicate_message(constraint: &str) -> String {
    match constraint {
        "uq_articles_slug" => "An article with this title already exists".to_string(),
        "uq_admins_username" | "uq_admins_email" => {
            "Username or email already exists".to_string()
        }
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Extractor rejections
// ---------------------------------------------------------------------------

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    /// Body-limit failures while streaming a file count as an oversized upload.
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::Upload(UploadError::FileTooLarge)
        } else {
            AppError::BadRequest(err.body_text())
        }
    }
}
