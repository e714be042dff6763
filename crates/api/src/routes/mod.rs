pub mod articles;
pub mod auth;
pub mod health;
pub mod pages;
pub mod webhook;
pub mod works;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                  login (public)
/// /auth/seed-admin             create the first admin (public, one-time)
///
/// /articles                    list (public), create (auth)
/// /articles/{id}               get (public), update, delete (auth)
///
/// /works                       list (public), create (auth)
/// /works/{id}                  get (public), update, delete (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (login, admin bootstrap).
        .nest("/auth", auth::router())
        // Blog articles.
        .nest("/articles", articles::router())
        // Portfolio works.
        .nest("/works", works::router())
}
