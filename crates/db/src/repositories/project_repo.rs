//! Repository for the `projects` table.

use sqlx::PgPool;

use immo_core::types::DbId;

use crate::models::apartment::Apartment;
use crate::models::project::{CreateProject, Project, ProjectWithApartments, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, address, number_of_apartments, total_surface, notes, \
                       image_url, status, progress, folder_fees, commission_per_m2, \
                       total_sales, latitude, longitude, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// If `status` is `None` in the input, defaults to PLANIFICATION;
    /// `progress` defaults to 0.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (name, address, number_of_apartments, total_surface, notes, image_url,
                 status, progress, folder_fees, commission_per_m2, latitude, longitude)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'PLANIFICATION'), COALESCE($8, 0),
                     $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.address)
            .bind(input.number_of_apartments)
            .bind(input.total_surface)
            .bind(&input.notes)
            .bind(&input.image_url)
            .bind(input.status)
            .bind(input.progress)
            .bind(input.folder_fees)
            .bind(input.commission_per_m2)
            .bind(input.latitude)
            .bind(input.longitude)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project together with its apartments.
    pub async fn find_with_apartments(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectWithApartments>, sqlx::Error> {
        let Some(project) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let apartments = sqlx::query_as::<_, Apartment>(
            "SELECT id, project_id, number, floor, property_type, area, price, price_per_m2,
                    status, zone, notes, image_url, client_id, sold_at, version,
                    created_at, updated_at
             FROM apartments WHERE project_id = $1
             ORDER BY number",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;
        Ok(Some(ProjectWithApartments {
            project,
            apartments,
        }))
    }

    /// List all projects ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                number_of_apartments = COALESCE($4, number_of_apartments),
                total_surface = COALESCE($5, total_surface),
                notes = COALESCE($6, notes),
                image_url = COALESCE($7, image_url),
                status = COALESCE($8, status),
                progress = COALESCE($9, progress),
                folder_fees = COALESCE($10, folder_fees),
                commission_per_m2 = COALESCE($11, commission_per_m2),
                latitude = COALESCE($12, latitude),
                longitude = COALESCE($13, longitude)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.address)
            .bind(input.number_of_apartments)
            .bind(input.total_surface)
            .bind(&input.notes)
            .bind(&input.image_url)
            .bind(input.status)
            .bind(input.progress)
            .bind(input.folder_fees)
            .bind(input.commission_per_m2)
            .bind(input.latitude)
            .bind(input.longitude)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project by ID. Apartments cascade via FK.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
