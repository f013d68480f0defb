//! Handlers for the `/tasks` resource and its comments.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use immo_core::error::CoreError;
use immo_core::types::DbId;
use immo_core::validation::{validate_id, validate_required};
use immo_db::models::task::{
    Comment, CreateComment, CreateTask, Task, TaskCounts, TaskWithComments, UpdateTask,
};
use immo_db::repositories::TaskRepo;

use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::middleware::rbac::{RequireAgent, RequireAuth};
use crate::state::AppState;

/// POST /api/tasks
pub async fn create(
    State(state): State<AppState>,
    RequireAgent(_user): RequireAgent,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<Task>)> {
    validate_required("Title", &input.title)?;
    let task = TaskRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/tasks
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<Vec<Task>>> {
    let tasks = TaskRepo::list(&state.pool).await?;
    Ok(Json(tasks))
}

/// GET /api/tasks/counts
///
/// Fixed-shape counts by status, computed in one query.
pub async fn counts(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<TaskCounts>> {
    let counts = TaskRepo::counts(&state.pool).await?;
    Ok(Json(counts))
}

/// GET /api/tasks/{id}
///
/// Returns the task with its comments embedded, oldest first.
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<TaskWithComments>> {
    validate_id("Task", id)?;
    let task = TaskRepo::find_with_comments(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    Ok(Json(task))
}

/// PUT /api/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAgent(_user): RequireAgent,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<Task>> {
    validate_id("Task", id)?;
    if let Some(title) = &input.title {
        validate_required("Title", title)?;
    }
    let task = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    Ok(Json(task))
}

/// DELETE /api/tasks/{id}
///
/// Comments are removed by FK cascade.
pub async fn delete(
    State(state): State<AppState>,
    RequireAgent(_user): RequireAgent,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    validate_id("Task", id)?;
    let deleted = TaskRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Task", id }))
    }
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// POST /api/tasks/{id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    RequireAgent(_user): RequireAgent,
    Path(id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    validate_id("Task", id)?;
    validate_required("Content", &input.content)?;

    let comment = TaskRepo::add_comment(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// DELETE /api/tasks/{task_id}/comments/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    RequireAgent(_user): RequireAgent,
    Path((task_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    validate_id("Task", task_id)?;
    validate_id("Comment", id)?;

    let deleted = TaskRepo::delete_comment(&state.pool, task_id, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id,
        }))
    }
}
