//! Handler for the `/uploads` resource (image uploads).
//!
//! Files are written to the configured uploads directory with a
//! uuid-based name and served statically under `/uploads/`. Nothing is
//! persisted to the database here; callers store the returned URL on the
//! entity they are editing.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

/// Maximum accepted file size in bytes (5 MB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// MIME types accepted for image uploads.
const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/jpg"];

/// Response body for a stored upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub url: String,
}

/// POST /api/uploads
///
/// Accepts a multipart form with a required `file` field holding a JPEG,
/// PNG or WebP image of at most 5 MB. Returns the stored filename and its
/// public URL with 201 Created.
pub async fn upload(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().unwrap_or("").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file = Some((filename, content_type, data.to_vec()));
        }
        // Ignore unknown fields.
    }

    let (filename, content_type, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    if !ALLOWED_MIME_TYPES.contains(&content_type.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Unsupported file type '{content_type}'. Allowed: image/jpeg, image/png, image/webp"
        )));
    }
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::BadRequest(
            "File exceeds the 5 MB upload limit".into(),
        ));
    }
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    // uuid name, original extension (fall back to the MIME subtype).
    let ext = filename
        .rsplit('.')
        .next()
        .filter(|e| *e != filename && !e.is_empty())
        .map(str::to_lowercase)
        .unwrap_or_else(|| content_type.trim_start_matches("image/").to_string());
    let stored_filename = format!("{}.{ext}", Uuid::new_v4());

    let dir = std::path::Path::new(&state.config.upload_dir);
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Upload directory error: {e}")))?;
    tokio::fs::write(dir.join(&stored_filename), &data)
        .await
        .map_err(|e| AppError::InternalError(format!("File write error: {e}")))?;

    let url = format!("{}/uploads/{stored_filename}", state.config.base_url);
    tracing::info!(filename = %stored_filename, size = data.len(), "File uploaded");

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            filename: stored_filename,
            url,
        }),
    ))
}
