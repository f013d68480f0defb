//! Crate-local request extractors.
//!
//! [`Json`] wraps `axum::Json` so that malformed or unparseable request
//! bodies (syntax errors, missing fields, invalid enum labels) are rejected
//! with a 400 in the unified `{error, code}` shape rather than axum's
//! default 422 plain-text rejection. Handlers use it for both input and
//! output; responses delegate straight to `axum::Json`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::AppError;

/// Drop-in replacement for `axum::Json` with 400 rejections.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => Err(reject(rejection)),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Map a `JsonRejection` to the unified error type.
///
/// Everything is a client fault here: bad syntax, a body that does not
/// match the expected shape, or a missing/wrong content type.
fn reject(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}
