//! Domain-level error type shared by every crate in the workspace.

use crate::types::DbId;

/// Errors produced by domain rules and validation, independent of HTTP.
///
/// The `immo-api` crate maps each variant to a status code and a stable
/// error code in its `AppError` layer.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
