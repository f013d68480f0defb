//! Task and comment entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use immo_core::types::{DbId, Timestamp};

use crate::models::status::TaskStatus;

/// A task row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<Timestamp>,
    pub status: TaskStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A comment row from the `task_comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub task_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
}

/// A task together with its comments, returned by single-task GETs.
#[derive(Debug, Clone, Serialize)]
pub struct TaskWithComments {
    #[serde(flatten)]
    pub task: Task,
    pub comments: Vec<Comment>,
}

/// Fixed-shape task counts grouped by status.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct TaskCounts {
    pub todo: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub total: i64,
}

/// DTO for creating a new task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<Timestamp>,
    /// Defaults to TODO if omitted.
    pub status: Option<TaskStatus>,
}

/// DTO for updating an existing task. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Timestamp>,
    pub status: Option<TaskStatus>,
}

/// DTO for creating a comment on a task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub content: String,
}
