//! Route definitions for the `/tasks` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /counts                    -> counts
/// GET    /{id}                      -> get_by_id (with comments)
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete (cascades to comments)
/// POST   /{id}/comments             -> add_comment
/// DELETE /{task_id}/comments/{id}   -> delete_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list).post(tasks::create))
        .route("/counts", get(tasks::counts))
        .route(
            "/{id}",
            get(tasks::get_by_id)
                .put(tasks::update)
                .delete(tasks::delete),
        )
        .route("/{id}/comments", post(tasks::add_comment))
        .route("/{task_id}/comments/{id}", delete(tasks::delete_comment))
}
