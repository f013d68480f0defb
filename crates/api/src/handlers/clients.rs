//! Handlers for the `/clients` resource.
//!
//! Clients enter the pipeline as PROSPECT records owned by the agent who
//! created them. The PROSPECT->CLIENT conversion on update creates the
//! linked portal user in the same transaction. An AGENT may only mutate
//! clients they created; ADMIN is unrestricted.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use immo_core::error::CoreError;
use immo_core::roles::ROLE_ADMIN;
use immo_core::types::DbId;
use immo_core::validation::{validate_email, validate_id, validate_phone_number, validate_required};
use immo_db::models::apartment::Apartment;
use immo_db::models::client::{Client, CreateClient, UpdateClient};
use immo_db::models::status::{ClientStatus, UserRole};
use immo_db::models::user::CreateUser;
use immo_db::repositories::{ApartmentRepo, ClientRepo, DeleteClientOutcome, UserRepo};
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAgent, RequireAuth};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/clients/{id}/interests`.
#[derive(Debug, Deserialize)]
pub struct AddInterestRequest {
    pub apartment_id: DbId,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/clients
///
/// Create a new client record owned by the calling agent. Records always
/// start as PROSPECT; the portal account comes later through conversion,
/// which is the only path that can collect a password.
pub async fn create(
    State(state): State<AppState>,
    RequireAgent(user): RequireAgent,
    Json(input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<Client>)> {
    validate_required("First name", &input.first_name)?;
    validate_required("Last name", &input.last_name)?;
    validate_email(&input.email)?;
    if let Some(phone) = &input.phone_number {
        validate_phone_number(phone)?;
    }
    if let Some(whatsapp) = &input.whatsapp_number {
        validate_phone_number(whatsapp)?;
    }
    if input.status == Some(ClientStatus::Client) {
        return Err(AppError::Core(CoreError::Validation(
            "Clients are created as PROSPECT; convert via update with a password".into(),
        )));
    }

    ensure_email_free(&state, &input.email, None, None).await?;

    let client = ClientRepo::create(&state.pool, &input, user.user_id).await?;
    tracing::info!(client_id = client.id, created_by = user.user_id, "Client created");

    Ok((StatusCode::CREATED, Json(client)))
}

/// GET /api/clients
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<Vec<Client>>> {
    let clients = ClientRepo::list(&state.pool).await?;
    Ok(Json(clients))
}

/// GET /api/clients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Client>> {
    validate_id("Client", id)?;
    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;
    Ok(Json(client))
}

/// PUT /api/clients/{id}
///
/// Partial update. When the payload sets status CLIENT on a stored PROSPECT
/// with no linked user, the update becomes a conversion: a mandatory
/// `password` is hashed, a portal user with role CLIENT is created, and the
/// client row is linked and updated in one transaction.
pub async fn update(
    State(state): State<AppState>,
    RequireAgent(user): RequireAgent,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClient>,
) -> AppResult<Json<Client>> {
    validate_id("Client", id)?;
    let existing = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;
    ensure_ownership(&user, &existing)?;

    if let Some(first_name) = &input.first_name {
        validate_required("First name", first_name)?;
    }
    if let Some(last_name) = &input.last_name {
        validate_required("Last name", last_name)?;
    }
    if let Some(email) = &input.email {
        validate_email(email)?;
        ensure_email_free(&state, email, Some(id), existing.user_id).await?;
    }
    if let Some(phone) = &input.phone_number {
        validate_phone_number(phone)?;
    }
    if let Some(whatsapp) = &input.whatsapp_number {
        validate_phone_number(whatsapp)?;
    }

    let converting = input.status == Some(ClientStatus::Client)
        && existing.status == ClientStatus::Prospect
        && existing.user_id.is_none();

    if converting {
        let password = input
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(
                    "Password is required when converting PROSPECT to CLIENT".into(),
                ))
            })?;
        validate_password_strength(password, MIN_PASSWORD_LENGTH)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

        let hashed = hash_password(password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

        // The portal account takes the post-update identity fields.
        let first_name = input.first_name.as_deref().unwrap_or(&existing.first_name);
        let last_name = input.last_name.as_deref().unwrap_or(&existing.last_name);
        let portal_user = CreateUser {
            name: format!("{first_name} {last_name}"),
            email: input.email.clone().unwrap_or_else(|| existing.email.clone()),
            phone_number: input.phone_number.clone().or_else(|| existing.phone_number.clone()),
            password_hash: hashed,
            role: UserRole::Client,
        };

        let client = ClientRepo::convert_to_client(&state.pool, id, &input, &portal_user)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict(
                    "Client was modified concurrently; reload and retry".into(),
                ))
            })?;

        tracing::info!(client_id = id, user_id = ?client.user_id, "Prospect converted to client");
        return Ok(Json(client));
    }

    let client = ClientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;
    Ok(Json(client))
}

/// DELETE /api/clients/{id}
///
/// Releases any RESERVED apartments back to AVAILABLE; refused with 409 if
/// the client owns a SOLD apartment.
pub async fn delete(
    State(state): State<AppState>,
    RequireAgent(user): RequireAgent,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    validate_id("Client", id)?;
    let existing = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;
    ensure_ownership(&user, &existing)?;

    match ClientRepo::delete(&state.pool, id).await? {
        DeleteClientOutcome::Deleted => {
            tracing::info!(client_id = id, "Client deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        DeleteClientOutcome::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        })),
        DeleteClientOutcome::OwnsSoldApartment => Err(AppError::Core(CoreError::Conflict(
            "Client owns a sold apartment and cannot be deleted".into(),
        ))),
    }
}

// ---------------------------------------------------------------------------
// Apartment interests
// ---------------------------------------------------------------------------

/// GET /api/clients/{id}/interests
pub async fn list_interests(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Apartment>>> {
    validate_id("Client", id)?;
    ensure_client_exists(&state, id).await?;
    let apartments = ClientRepo::list_interests(&state.pool, id).await?;
    Ok(Json(apartments))
}

/// POST /api/clients/{id}/interests
///
/// Record the client's interest in an apartment. Idempotent: adding an
/// existing link is a no-op.
pub async fn add_interest(
    State(state): State<AppState>,
    RequireAgent(_user): RequireAgent,
    Path(id): Path<DbId>,
    Json(input): Json<AddInterestRequest>,
) -> AppResult<StatusCode> {
    validate_id("Client", id)?;
    validate_id("Apartment", input.apartment_id)?;
    ensure_client_exists(&state, id).await?;
    if ApartmentRepo::find_by_id(&state.pool, input.apartment_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Apartment",
            id: input.apartment_id,
        }));
    }

    ClientRepo::add_interest(&state.pool, id, input.apartment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/clients/{id}/interests/{apartment_id}
pub async fn remove_interest(
    State(state): State<AppState>,
    RequireAgent(_user): RequireAgent,
    Path((id, apartment_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    validate_id("Client", id)?;
    validate_id("Apartment", apartment_id)?;

    let removed = ClientRepo::remove_interest(&state.pool, id, apartment_id).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Interest",
            id: apartment_id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Reject with 403 unless the caller is an admin or created the client.
fn ensure_ownership(user: &AuthUser, client: &Client) -> AppResult<()> {
    if user.role != ROLE_ADMIN && client.created_by != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only modify clients you created".into(),
        )));
    }
    Ok(())
}

/// 404 unless a client row with this id exists.
async fn ensure_client_exists(state: &AppState, id: DbId) -> AppResult<()> {
    if ClientRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }));
    }
    Ok(())
}

/// Reject with 409 if the email is taken by another client or any user.
///
/// `exclude_client` skips the client row being updated; `exclude_user`
/// skips its linked portal user, if one exists.
async fn ensure_email_free(
    state: &AppState,
    email: &str,
    exclude_client: Option<DbId>,
    exclude_user: Option<DbId>,
) -> AppResult<()> {
    if ClientRepo::email_taken(&state.pool, email, exclude_client).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Email '{email}' is already in use"
        ))));
    }
    if UserRepo::email_taken(&state.pool, email, exclude_user).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Email '{email}' is already in use"
        ))));
    }
    Ok(())
}
