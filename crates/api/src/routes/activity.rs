//! Route definitions for the `/activity` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::activity;
use crate::state::AppState;

/// Routes mounted at `/activity`.
///
/// Target mutations require the `ADMIN` role (enforced by handler
/// extractors); reads require any authenticated user.
///
/// ```text
/// GET    /targets        -> list_targets (?year=)
/// POST   /targets        -> create_target (admin)
/// PUT    /targets/{id}   -> update_target (admin)
/// DELETE /targets/{id}   -> delete_target (admin)
/// GET    /summary        -> summary (?year=&month=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/targets",
            get(activity::list_targets).post(activity::create_target),
        )
        .route(
            "/targets/{id}",
            put(activity::update_target).delete(activity::delete_target),
        )
        .route("/summary", get(activity::summary))
}
