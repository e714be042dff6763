//! HTML entry points and static asset directories.

use axum::handler::HandlerWithoutStateExt;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::ServerConfig;
use crate::handlers::fallback::not_found;
use crate::state::AppState;

/// Page and static file routes.
///
/// ```text
/// GET /                  -> PUBLIC_DIR/index.html
/// GET /admin             -> ADMIN_DIR/login.html
/// GET /admin/login       -> ADMIN_DIR/login.html
/// GET /admin/dashboard   -> ADMIN_DIR/dashboard.html
/// GET /public/*          -> PUBLIC_DIR
/// GET /uploads/*         -> UPLOAD_DIR
/// ```
///
/// Missing files under the two directories answer with the JSON 404.
pub fn router(config: &ServerConfig) -> Router<AppState> {
    let login = ServeFile::new(config.admin_dir.join("login.html"));

    Router::new()
        .route_service("/", ServeFile::new(config.public_dir.join("index.html")))
        .route_service("/admin", login.clone())
        .route_service("/admin/login", login)
        .route_service(
            "/admin/dashboard",
            ServeFile::new(config.admin_dir.join("dashboard.html")),
        )
        .nest_service(
            "/public",
            ServeDir::new(&config.public_dir).not_found_service(not_found.into_service()),
        )
        .nest_service(
            "/uploads",
            ServeDir::new(&config.upload_dir).not_found_service(not_found.into_service()),
        )
}
