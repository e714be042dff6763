//! Assembly of the HTTP surface.
//!
//! `main.rs` and the integration tests both go through [`build_app_router`],
//! so the tests exercise the same layers production runs with.

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::handlers::fallback;
use crate::middleware::{errors, security};
use crate::routes;
use crate::state::AppState;

/// Largest request body accepted, in bytes (10 MiB).
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Routes plus middleware, ready to serve.
///
/// Outermost first, a request passes through: CORS, security headers,
/// request-id assignment, tracing, request-id echo, timeout, dev-mode error
/// detail, panic recovery and the body size limit.
pub fn build_app_router(state: AppState) -> Router {
    let config = state.config.clone();
    let request_id = HeaderName::from_static("x-request-id");

    let routes = Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes())
        .nest("/webhook", routes::webhook::router())
        .merge(routes::pages::router(&config))
        .fallback(fallback::not_found);

    let app = routes
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(errors::panic_response))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            errors::expose_internal_errors,
        ))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid));

    security::apply(app)
        .layer(cors_layer(&config))
        .with_state(state)
}

/// CORS for the configured admin origins. Credentials are allowed, so the
/// origin list is explicit rather than a wildcard.
///
/// A malformed origin aborts startup.
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins = config
        .cors_origins
        .iter()
        .map(|origin| match origin.parse() {
            Ok(value) => value,
            Err(e) => panic!("CORS_ORIGIN entry '{origin}' is not a valid header value: {e}"),
        })
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60))
}
