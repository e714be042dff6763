#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use haosenyi_api::auth::jwt::{generate_token, JwtConfig};
use haosenyi_api::auth::password::hash_password;
use haosenyi_api::config::{Environment, ServerConfig};
use haosenyi_api::router::build_app_router;
use haosenyi_api::state::AppState;
use haosenyi_db::models::admin::{Admin, CreateAdmin};
use haosenyi_db::repositories::AdminRepo;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Router plus the temporary directories it serves from.
///
/// The directories are removed when this value is dropped, so keep it alive
/// for the whole test.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub root: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn upload_path(&self, filename: &str) -> std::path::PathBuf {
        self.state.config.upload_dir.join(filename)
    }

    /// Names of the files currently in the upload directory.
    pub fn uploaded_files(&self) -> Vec<String> {
        match std::fs::read_dir(&self.state.config.upload_dir) {
            Ok(entries) => entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Build a test `ServerConfig` rooted in `root`.
pub fn test_config(root: &std::path::Path, environment: Environment) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        upload_dir: root.join("uploads"),
        public_dir: root.join("public"),
        admin_dir: root.join("admin"),
        environment,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_hours: 24,
        },
    }
}

/// Build the full application router over `pool`, with the same middleware
/// stack production uses.
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_in(pool, Environment::Production)
}

pub fn build_test_app_in(pool: PgPool, environment: Environment) -> TestApp {
    let root = tempfile::tempdir().expect("tempdir");
    for dir in ["uploads", "public", "admin"] {
        std::fs::create_dir_all(root.path().join(dir)).unwrap();
    }
    std::fs::write(root.path().join("public/index.html"), "<h1>home</h1>").unwrap();
    std::fs::write(root.path().join("public/site.css"), "body{}").unwrap();
    std::fs::write(root.path().join("admin/login.html"), "<h1>login</h1>").unwrap();
    std::fs::write(root.path().join("admin/dashboard.html"), "<h1>dashboard</h1>").unwrap();

    let state = AppState::new(pool, test_config(root.path(), environment));
    let router = build_app_router(state.clone());
    TestApp {
        router,
        state,
        root,
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert an admin directly and return it.
pub async fn create_admin(pool: &PgPool, username: &str) -> Admin {
    let input = CreateAdmin {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
    };
    AdminRepo::create(pool, &input)
        .await
        .expect("admin creation should succeed")
}

/// Insert an admin and return a valid bearer token for it.
pub async fn admin_token(app: &TestApp, pool: &PgPool) -> String {
    let admin = create_admin(pool, "admin").await;
    generate_token(admin.id, &admin.username, &app.state.config.jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, None, json).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    json: serde_json::Value,
) -> Response<Body> {
    json_request(app, Method::POST, uri, Some(token), json).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    json: serde_json::Value,
) -> Response<Body> {
    json_request(app, Method::PUT, uri, Some(token), json).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        request(Method::DELETE, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    json: serde_json::Value,
) -> Response<Body> {
    send(
        app,
        request(method, uri, token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn multipart_request(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    form: MultipartForm,
) -> Response<Body> {
    let (content_type, body) = form.finish();
    send(
        app,
        request(method, uri, Some(token))
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap(),
    )
    .await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ---------------------------------------------------------------------------
// Multipart bodies
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "----haosenyi-test-boundary";

/// Minimal `multipart/form-data` body builder.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={BOUNDARY}"), self.body)
    }
}

/// A tiny payload labelled as PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot really a png";
