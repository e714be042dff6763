//! Route definitions for the `/works` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::works;
use crate::state::AppState;

/// Routes mounted at `/works`.
///
/// ```text
/// GET    /       -> list_works
/// POST   /       -> create_work (auth)
/// GET    /{id}   -> get_work
/// PUT    /{id}   -> update_work (auth)
/// DELETE /{id}   -> delete_work (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(works::list_works).post(works::create_work))
        .route(
            "/{id}",
            get(works::get_work)
                .put(works::update_work)
                .delete(works::delete_work),
        )
}
