//! Handlers for the `/agents` resource.
//!
//! Agents are users with role AGENT. Reads require any authenticated user;
//! create/update/delete require the ADMIN role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use immo_core::error::CoreError;
use immo_core::types::DbId;
use immo_core::validation::{validate_email, validate_id, validate_phone_number, validate_required};
use immo_db::models::status::{UserRole, UserStatus};
use immo_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use immo_db::repositories::{ClientRepo, UserRepo};
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/agents`.
#[derive(Debug, Deserialize)]
pub struct CreateAgentRequest {
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password: String,
}

/// Request body for `PUT /api/agents/{id}`.
///
/// The role is deliberately not updatable through this surface.
#[derive(Debug, Deserialize)]
pub struct UpdateAgentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub status: Option<UserStatus>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/agents
///
/// Create a new agent account. Validates email format and cross-table
/// uniqueness, phone format, and password strength; hashes the password and
/// returns a safe [`UserResponse`] with 201 Created.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateAgentRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    validate_required("Name", &input.name)?;
    validate_email(&input.email)?;
    if let Some(phone) = &input.phone_number {
        validate_phone_number(phone)?;
    }
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    ensure_email_free(&state, &input.email, None).await?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create_dto = CreateUser {
        name: input.name,
        email: input.email,
        phone_number: input.phone_number,
        password_hash: hashed,
        role: UserRole::Agent,
    };

    let user = UserRepo::create(&state.pool, &create_dto).await?;
    tracing::info!(user_id = user.id, "Agent created");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/agents
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<Vec<UserResponse>>> {
    let agents = UserRepo::list_by_role(&state.pool, UserRole::Agent).await?;
    Ok(Json(agents.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/agents/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let agent = find_agent(&state, id).await?;
    Ok(Json(agent.into()))
}

/// PUT /api/agents/{id}
///
/// Partial update of an agent's profile fields (not password, not role).
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAgentRequest>,
) -> AppResult<Json<UserResponse>> {
    // Confirm the target exists and is an agent before validating input.
    find_agent(&state, id).await?;

    if let Some(name) = &input.name {
        validate_required("Name", name)?;
    }
    if let Some(email) = &input.email {
        validate_email(email)?;
        ensure_email_free(&state, email, Some(id)).await?;
    }
    if let Some(phone) = &input.phone_number {
        validate_phone_number(phone)?;
    }

    let update_dto = UpdateUser {
        name: input.name,
        email: input.email,
        phone_number: input.phone_number,
        status: input.status,
    };

    let user = UserRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Agent", id }))?;
    Ok(Json(user.into()))
}

/// DELETE /api/agents/{id}
///
/// Refused with 409 while the agent still owns client records; deleting the
/// account would orphan them.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_agent(&state, id).await?;

    let owned = ClientRepo::count_by_creator(&state.pool, id).await?;
    if owned > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Agent still owns {owned} client record(s); reassign or delete them first"
        ))));
    }

    let deleted = UserRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(user_id = id, "Agent deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Agent", id }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a user by id and require the AGENT role, otherwise 404.
async fn find_agent(state: &AppState, id: DbId) -> AppResult<User> {
    validate_id("Agent", id)?;
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|u| u.role == UserRole::Agent)
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Agent", id }))?;
    Ok(user)
}

/// Reject with 409 if the email is taken by any user or client.
///
/// Emails identify people across both tables, so an agent and a client can
/// never share one. `exclude_user` skips the user row being updated.
async fn ensure_email_free(
    state: &AppState,
    email: &str,
    exclude_user: Option<DbId>,
) -> AppResult<()> {
    if UserRepo::email_taken(&state.pool, email, exclude_user).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Email '{email}' is already in use"
        ))));
    }
    if ClientRepo::email_taken(&state.pool, email, None).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Email '{email}' is already in use"
        ))));
    }
    Ok(())
}
