//! Route definitions for the `/apartments` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::apartments;
use crate::state::AppState;

/// Routes mounted at `/apartments`.
///
/// ```text
/// GET    /               -> list (?project_id=)
/// POST   /               -> create
/// POST   /price-quote    -> price_quote
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete
/// POST   /{id}/assign    -> assign (RESERVED or SOLD)
/// POST   /{id}/release   -> release (back to AVAILABLE)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(apartments::list).post(apartments::create))
        .route("/price-quote", post(apartments::price_quote))
        .route(
            "/{id}",
            get(apartments::get_by_id)
                .put(apartments::update)
                .delete(apartments::delete),
        )
        .route("/{id}/assign", post(apartments::assign))
        .route("/{id}/release", post(apartments::release))
}
