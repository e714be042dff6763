//! Multipart upload handling for articles and works.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    admin_token, body_json, build_test_app, delete_auth, get, multipart_request, MultipartForm,
    PNG_BYTES,
};
use sqlx::PgPool;

fn article_form(title: &str) -> MultipartForm {
    MultipartForm::new()
        .text("title", title)
        .text("content", "Body text")
        .text("status", "PUBLISHED")
}

/// A cover image is stored under a generated name and served back.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_article_with_cover_image(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let token = admin_token(&app, &pool).await;

    let form = article_form("With Cover").file("coverImage", "Cover.PNG", "image/png", PNG_BYTES);
    let response = multipart_request(app.app(), Method::POST, "/api/articles", &token, form).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let article = body_json(response).await;
    assert_eq!(article["status"], "PUBLISHED");
    let filename = article["coverImage"].as_str().unwrap().to_string();
    assert!(filename.starts_with("coverImage-"), "{filename}");
    assert!(filename.ends_with(".png"), "{filename}");
    assert_eq!(std::fs::read(app.upload_path(&filename)).unwrap(), PNG_BYTES);

    let served = get(app.app(), &format!("/uploads/{filename}")).await;
    assert_eq!(served.status(), StatusCode::OK);
}

/// An untouched file input (empty filename) is ignored.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_file_part_is_ignored(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let token = admin_token(&app, &pool).await;

    let form = article_form("No Cover").file("coverImage", "", "application/octet-stream", b"");
    let response = multipart_request(app.app(), Method::POST, "/api/articles", &token, form).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(body_json(response).await["coverImage"].is_null());
    assert!(app.uploaded_files().is_empty());
}

/// Files over 5 MiB are rejected with the size message.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_oversized_file_is_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let token = admin_token(&app, &pool).await;

    let big = vec![0u8; 6 * 1024 * 1024];
    let form = article_form("Too Big").file("coverImage", "big.jpg", "image/jpeg", &big);
    let response = multipart_request(app.app(), Method::POST, "/api/articles", &token, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UPLOAD_ERROR");
    assert_eq!(json["error"], "File size exceeds the 5MB limit");
    assert!(app.uploaded_files().is_empty());

    let list = body_json(get(app.app(), "/api/articles").await).await;
    assert_eq!(list["pagination"]["total"], 0);
}

/// Bodies past the overall request limit are reported the same way.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_body_past_request_limit_is_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let token = admin_token(&app, &pool).await;

    let huge = vec![0u8; 11 * 1024 * 1024];
    let form = MultipartForm::new().file("coverImage", "huge.jpg", "image/jpeg", &huge);
    let response = multipart_request(app.app(), Method::POST, "/api/articles", &token, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Non-image files are rejected with the type message.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_image_is_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let token = admin_token(&app, &pool).await;

    let form = article_form("PDF").file("coverImage", "doc.pdf", "application/pdf", b"%PDF-1.4");
    let response = multipart_request(app.app(), Method::POST, "/api/articles", &token, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UPLOAD_ERROR");
    assert_eq!(json["error"], "Only image files are allowed");
}

/// A file under another resource's field name is rejected.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unexpected_file_field_is_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let token = admin_token(&app, &pool).await;

    let form = article_form("Wrong Field").file("imageUrl", "a.png", "image/png", PNG_BYTES);
    let response = multipart_request(app.app(), Method::POST, "/api/articles", &token, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "UPLOAD_ERROR");
}

/// Two files in one request are rejected.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_file_is_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let token = admin_token(&app, &pool).await;

    let form = article_form("Two Files")
        .file("coverImage", "a.png", "image/png", PNG_BYTES)
        .file("coverImage", "b.png", "image/png", PNG_BYTES);
    let response = multipart_request(app.app(), Method::POST, "/api/articles", &token, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.uploaded_files().is_empty());
}

/// Validation failures leave nothing on disk.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_fields_store_no_file(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let token = admin_token(&app, &pool).await;

    let form = MultipartForm::new()
        .text("title", "Missing content")
        .file("coverImage", "a.png", "image/png", PNG_BYTES);
    let response = multipart_request(app.app(), Method::POST, "/api/articles", &token, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.uploaded_files().is_empty());
}

/// A slug conflict removes the file that was stored for the failed insert.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_conflict_discards_stored_file(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let token = admin_token(&app, &pool).await;

    let response =
        multipart_request(app.app(), Method::POST, "/api/articles", &token, article_form("Dup")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let form = article_form("Dup").file("coverImage", "a.png", "image/png", PNG_BYTES);
    let response = multipart_request(app.app(), Method::POST, "/api/articles", &token, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
    assert!(app.uploaded_files().is_empty());
}

/// Replacing a work image removes the previous file; deleting removes the last.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_work_image_replace_and_delete(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let token = admin_token(&app, &pool).await;

    let form = MultipartForm::new()
        .text("title", "Shop")
        .text("company", "ABC")
        .text("type", "ECOMMERCE")
        .text("isFeatured", "true")
        .text("displayOrder", "1")
        .file("imageUrl", "shot.webp", "image/webp", PNG_BYTES);
    let response = multipart_request(app.app(), Method::POST, "/api/works", &token, form).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let work = body_json(response).await;
    assert_eq!(work["isFeatured"], true);
    assert_eq!(work["displayOrder"], 1);
    let id = work["id"].as_i64().unwrap();
    let first = work["imageUrl"].as_str().unwrap().to_string();
    assert!(first.starts_with("imageUrl-") && first.ends_with(".webp"));

    let form = MultipartForm::new().file("imageUrl", "new.jpg", "image/jpeg", PNG_BYTES);
    let response =
        multipart_request(app.app(), Method::PUT, &format!("/api/works/{id}"), &token, form).await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await;
    let second = updated["imageUrl"].as_str().unwrap().to_string();
    assert_ne!(first, second);
    assert_eq!(updated["title"], "Shop");
    assert!(!app.upload_path(&first).exists());
    assert!(app.upload_path(&second).exists());

    let response = delete_auth(app.app(), &format!("/api/works/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!app.upload_path(&second).exists());
}
