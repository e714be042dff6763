//! Route definitions for inbound webhooks, mounted at `/webhook`.

use axum::routing::post;
use axum::Router;

use crate::handlers::webhook;
use crate::state::AppState;

/// ```text
/// POST /n8n   -> n8n
/// POST /line  -> line
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/n8n", post(webhook::n8n))
        .route("/line", post(webhook::line))
}
