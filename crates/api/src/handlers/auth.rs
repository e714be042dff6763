//! Handlers for the `/auth` resource (login, one-time admin bootstrap).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use haosenyi_core::error::CoreError;
use haosenyi_db::models::admin::{AdminInfo, CreateAdmin};
use haosenyi_db::repositories::AdminRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;
use crate::validation::FieldErrors;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub admin: AdminInfo,
}

/// Request body for `POST /auth/seed-admin`.
#[derive(Debug, Deserialize, Validate)]
pub struct SeedAdminRequest {
    pub username: Option<String>,
    #[validate(email(message = "A valid email is required"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
}

/// Response for `POST /auth/seed-admin`.
#[derive(Debug, Serialize)]
pub struct SeedAdminResponse {
    pub message: String,
    pub admin: AdminInfo,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with username + password. Returns an access token.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let mut errors = FieldErrors::new();
    let username = errors.text("username", input.username.as_deref(), true, "Username is required");
    let password = input.password.filter(|p| !p.is_empty());
    errors.require("password", &password, "Password is required");
    errors.finish()?;
    let (username, password) = (username.unwrap_or_default(), password.unwrap_or_default());

    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid credentials".into()));

    let admin = AdminRepo::find_by_username(&state.pool, &username)
        .await?
        .ok_or_else(|| {
            tracing::info!(username = %username, "Login failed: unknown username");
            invalid()
        })?;

    if !verify_password_blocking(password, admin.password_hash.clone()).await? {
        tracing::info!(admin_id = admin.id, "Login failed: wrong password");
        return Err(invalid());
    }

    let token = generate_token(admin.id, &admin.username, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(admin_id = admin.id, username = %admin.username, "Admin logged in");

    Ok(Json(LoginResponse {
        token,
        admin: AdminInfo::from(&admin),
    }))
}

/// POST /api/auth/seed-admin
///
/// Create the first admin account. Refused once any admin exists.
pub async fn seed_admin(
    State(state): State<AppState>,
    AppJson(input): AppJson<SeedAdminRequest>,
) -> AppResult<(StatusCode, Json<SeedAdminResponse>)> {
    let mut errors = FieldErrors::validate(&input);
    let username = errors.text("username", input.username.as_deref(), true, "Username is required");
    errors.require("email", &input.email, "A valid email is required");
    errors.require("password", &input.password, "Password must be at least 6 characters");
    errors.finish()?;

    // Checked again under lock by `create_first`.
    if AdminRepo::exists(&state.pool).await? {
        return Err(admin_exists());
    }

    let password_hash = hash_password_blocking(input.password.unwrap_or_default()).await?;
    let create = CreateAdmin {
        username: username.unwrap_or_default(),
        email: input.email.unwrap_or_default().trim().to_string(),
        password_hash,
    };

    let admin = AdminRepo::create_first(&state.pool, &create)
        .await?
        .ok_or_else(admin_exists)?;

    tracing::info!(admin_id = admin.id, username = %admin.username, "Admin account created");

    Ok((
        StatusCode::CREATED,
        Json(SeedAdminResponse {
            message: "Admin account created".into(),
            admin: AdminInfo::from(&admin),
        }),
    ))
}

fn admin_exists() -> AppError {
    AppError::Core(CoreError::Conflict("An admin account already exists".into()))
}
