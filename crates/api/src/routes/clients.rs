//! Route definitions for the `/clients` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::clients;
use crate::state::AppState;

/// Routes mounted at `/clients`.
///
/// Mutations require `AGENT` or `ADMIN`; update and delete additionally
/// check record ownership (enforced in the handlers).
///
/// ```text
/// GET    /                              -> list
/// POST   /                              -> create
/// GET    /{id}                          -> get_by_id
/// PUT    /{id}                          -> update (conversion lives here)
/// DELETE /{id}                          -> delete
/// GET    /{id}/interests                -> list_interests
/// POST   /{id}/interests                -> add_interest
/// DELETE /{id}/interests/{apartment_id} -> remove_interest
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(clients::list).post(clients::create))
        .route(
            "/{id}",
            get(clients::get_by_id)
                .put(clients::update)
                .delete(clients::delete),
        )
        .route(
            "/{id}/interests",
            get(clients::list_interests).post(clients::add_interest),
        )
        .route(
            "/{id}/interests/{apartment_id}",
            delete(clients::remove_interest),
        )
}
