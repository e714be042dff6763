//! Liveness probe, mounted at the root rather than under `/api`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok`, or `degraded` when the database did not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub environment: &'static str,
    pub db_healthy: bool,
    pub timestamp: DateTime<Utc>,
}

/// GET /health. Answers 503 while the database is unreachable so load
/// balancers stop routing here.
async fn report(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let db_healthy = match haosenyi_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health probe could not reach the database");
            false
        }
    };

    let (code, status) = if db_healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthReport {
        status,
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.name(),
        db_healthy,
        timestamp: Utc::now(),
    };
    (code, Json(body))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(report))
}
