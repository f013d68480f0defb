//! Repository for the `tasks` and `task_comments` tables.

use sqlx::PgPool;

use immo_core::types::DbId;

use crate::models::task::{
    Comment, CreateComment, CreateTask, Task, TaskCounts, TaskWithComments, UpdateTask,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, due_date, status, created_at, updated_at";

/// Comment column list.
const COMMENT_COLUMNS: &str = "id, task_id, content, created_at";

/// Provides CRUD operations for tasks and their comments.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    ///
    /// If `status` is `None` in the input, defaults to TODO.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (title, description, due_date, status)
             VALUES ($1, $2, $3, COALESCE($4, 'TODO'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.due_date)
            .bind(input.status)
            .fetch_one(pool)
            .await
    }

    /// Find a task by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a task together with its comments, oldest comment first.
    pub async fn find_with_comments(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TaskWithComments>, sqlx::Error> {
        let Some(task) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM task_comments
             WHERE task_id = $1 ORDER BY created_at"
        );
        let comments = sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_all(pool)
            .await?;
        Ok(Some(TaskWithComments { task, comments }))
    }

    /// List all tasks ordered by due date (tasks without one last), then
    /// most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             ORDER BY due_date ASC NULLS LAST, created_at DESC"
        );
        sqlx::query_as::<_, Task>(&query).fetch_all(pool).await
    }

    /// Update a task. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                due_date = COALESCE($4, due_date),
                status = COALESCE($5, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.due_date)
            .bind(input.status)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a task by ID. Comments cascade via FK.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Task counts grouped by status, in one query.
    pub async fn counts(pool: &PgPool) -> Result<TaskCounts, sqlx::Error> {
        let row: (i64, i64, i64, i64) = sqlx::query_as(
            "SELECT
                COUNT(*) FILTER (WHERE status = 'TODO'),
                COUNT(*) FILTER (WHERE status = 'IN_PROGRESS'),
                COUNT(*) FILTER (WHERE status = 'COMPLETED'),
                COUNT(*)
             FROM tasks",
        )
        .fetch_one(pool)
        .await?;
        Ok(TaskCounts {
            todo: row.0,
            in_progress: row.1,
            completed: row.2,
            total: row.3,
        })
    }

    // -----------------------------------------------------------------------
    // Comments
    // -----------------------------------------------------------------------

    /// Add a comment to a task. Returns `None` if the task does not exist.
    pub async fn add_comment(
        pool: &PgPool,
        task_id: DbId,
        input: &CreateComment,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM tasks WHERE id = $1)")
            .bind(task_id)
            .fetch_one(pool)
            .await?;
        if !exists.0 {
            return Ok(None);
        }
        let query = format!(
            "INSERT INTO task_comments (task_id, content)
             VALUES ($1, $2)
             RETURNING {COMMENT_COLUMNS}"
        );
        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(task_id)
            .bind(&input.content)
            .fetch_one(pool)
            .await?;
        Ok(Some(comment))
    }

    /// Delete a comment scoped to its task. Returns `true` if a row was
    /// removed.
    pub async fn delete_comment(
        pool: &PgPool,
        task_id: DbId,
        comment_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task_comments WHERE id = $1 AND task_id = $2")
            .bind(comment_id)
            .bind(task_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
