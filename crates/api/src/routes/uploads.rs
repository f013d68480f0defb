//! Route definitions for the `/uploads` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;

/// Routes mounted at `/uploads`.
///
/// The body limit leaves headroom over the 5 MB file cap for the multipart
/// framing; the handler enforces the exact file-size limit with a 400.
///
/// ```text
/// POST / -> upload (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(uploads::upload))
        .layer(DefaultBodyLimit::max(uploads::MAX_UPLOAD_BYTES + 64 * 1024))
}
