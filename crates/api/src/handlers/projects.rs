//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use immo_core::error::CoreError;
use immo_core::types::DbId;
use immo_core::validation::{
    validate_id, validate_non_negative, validate_progress, validate_required,
};
use immo_db::models::apartment::Apartment;
use immo_db::models::project::{CreateProject, Project, ProjectWithApartments, UpdateProject};
use immo_db::repositories::{ApartmentRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::middleware::rbac::{RequireAgent, RequireAuth};
use crate::state::AppState;

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    RequireAgent(_user): RequireAgent,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    validate_required("Name", &input.name)?;
    if let Some(progress) = input.progress {
        validate_progress(progress)?;
    }
    validate_money_fields(
        input.total_surface,
        input.folder_fees,
        input.commission_per_m2,
    )?;

    let project = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(project_id = project.id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/projects
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<Vec<Project>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(projects))
}

/// GET /api/projects/{id}
///
/// Returns the project with its apartments embedded (empty array for a
/// project without any).
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectWithApartments>> {
    validate_id("Project", id)?;
    let project = ProjectRepo::find_with_apartments(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// GET /api/projects/{id}/apartments
pub async fn list_apartments(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Apartment>>> {
    validate_id("Project", id)?;
    if ProjectRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }));
    }
    let apartments = ApartmentRepo::list_by_project(&state.pool, id).await?;
    Ok(Json(apartments))
}

/// PUT /api/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAgent(_user): RequireAgent,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    validate_id("Project", id)?;
    if let Some(name) = &input.name {
        validate_required("Name", name)?;
    }
    if let Some(progress) = input.progress {
        validate_progress(progress)?;
    }
    validate_money_fields(
        input.total_surface,
        input.folder_fees,
        input.commission_per_m2,
    )?;

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// DELETE /api/projects/{id}
///
/// Apartments belonging to the project are removed by FK cascade.
pub async fn delete(
    State(state): State<AppState>,
    RequireAgent(_user): RequireAgent,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    validate_id("Project", id)?;
    let deleted = ProjectRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(project_id = id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}

/// Validate the optional non-negative numeric fields shared by create and
/// update payloads.
fn validate_money_fields(
    total_surface: Option<f64>,
    folder_fees: Option<f64>,
    commission_per_m2: Option<f64>,
) -> AppResult<()> {
    if let Some(surface) = total_surface {
        validate_non_negative("Total surface", surface)?;
    }
    if let Some(fees) = folder_fees {
        validate_non_negative("Folder fees", fees)?;
    }
    if let Some(commission) = commission_per_m2 {
        validate_non_negative("Commission per m2", commission)?;
    }
    Ok(())
}
