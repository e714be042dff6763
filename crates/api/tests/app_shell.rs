//! Cross-cutting behaviour of the assembled router: health, pages, static
//! files, fallback, response headers, development-mode error detail.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::routing::get as get_route;
use axum::Router;
use common::{body_json, body_text, build_test_app, get, send};
use haosenyi_api::config::Environment;
use haosenyi_api::error::AppError;
use haosenyi_api::middleware::errors::expose_internal_errors;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app.app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert!(json["version"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_html_pages(pool: PgPool) {
    let app = build_test_app(pool);

    for (path, marker) in [
        ("/", "home"),
        ("/admin", "login"),
        ("/admin/login", "login"),
        ("/admin/dashboard", "dashboard"),
    ] {
        let response = get(app.app(), path).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert!(body_text(response).await.contains(marker), "{path}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_assets(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app.app(), "/public/site.css").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app.app(), "/public/missing.js").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_route_is_json_404(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app.app(), "/api/nothing-here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_security_headers_and_request_id(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app.app(), "/health").await;
    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "SAMEORIGIN");
    assert_eq!(headers["referrer-policy"], "no-referrer");
    assert_eq!(headers["cross-origin-opener-policy"], "same-origin");
    assert!(headers["content-security-policy"]
        .to_str()
        .unwrap()
        .contains("cdn.jsdelivr.net"));
    assert!(headers.contains_key("strict-transport-security"));
    assert!(headers.contains_key("x-request-id"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cors_preflight(pool: PgPool) {
    let app = build_test_app(pool);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/articles")
        .header(header::ORIGIN, "http://localhost:3001")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = send(app.app(), request).await;
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3001"
    );
}

async fn failing_handler() -> Result<(), AppError> {
    Err(AppError::InternalError("disk on fire".into()))
}

fn failing_router(app: &common::TestApp) -> Router {
    Router::new()
        .route("/boom", get_route(failing_handler))
        .layer(axum::middleware::from_fn_with_state(
            app.state.clone(),
            expose_internal_errors,
        ))
        .with_state(app.state.clone())
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_internal_detail_hidden_in_production(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(failing_router(&app), "/boom").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert!(json.get("message").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_internal_detail_shown_in_development(pool: PgPool) {
    let app = common::build_test_app_in(pool, Environment::Development);

    let response = get(failing_router(&app), "/boom").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["message"], "disk on fire");
}
