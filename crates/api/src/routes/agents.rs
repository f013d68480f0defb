//! Route definitions for the `/agents` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::agents;
use crate::state::AppState;

/// Routes mounted at `/agents`.
///
/// Reads require any authenticated user; mutations require the `ADMIN`
/// role (enforced by handler extractors).
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create (admin)
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update (admin)
/// DELETE /{id}    -> delete (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(agents::list).post(agents::create))
        .route(
            "/{id}",
            get(agents::get_by_id)
                .put(agents::update)
                .delete(agents::delete),
        )
}
