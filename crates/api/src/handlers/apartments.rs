//! Handlers for the `/apartments` resource.
//!
//! Sale-state transitions are deliberately split: create and update refuse
//! RESERVED/SOLD (those states require a client), the assign endpoint moves
//! an apartment to RESERVED or SOLD under a row lock, and the release
//! endpoint returns it to AVAILABLE.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use immo_core::error::CoreError;
use immo_core::pricing::{compute_price, PriceBreakdown, QuoteRequest};
use immo_core::types::DbId;
use immo_core::validation::{validate_id, validate_non_negative, validate_required};
use immo_db::models::apartment::{
    Apartment, AssignApartment, CreateApartment, UpdateApartment,
};
use immo_db::models::status::ApartmentStatus;
use immo_db::repositories::{ApartmentRepo, AssignResult, ProjectRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::middleware::rbac::{RequireAgent, RequireAuth};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/apartments`.
///
/// The optional `pricing` quote is computed server-side; its total
/// overrides any client-supplied `price`.
#[derive(Debug, Deserialize)]
pub struct CreateApartmentRequest {
    #[serde(flatten)]
    pub apartment: CreateApartment,
    pub pricing: Option<QuoteRequest>,
}

/// Request body for `PUT /api/apartments/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateApartmentRequest {
    #[serde(flatten)]
    pub apartment: UpdateApartment,
    pub pricing: Option<QuoteRequest>,
}

/// Query parameters for `GET /api/apartments`.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub project_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/apartments
pub async fn create(
    State(state): State<AppState>,
    RequireAgent(_user): RequireAgent,
    Json(input): Json<CreateApartmentRequest>,
) -> AppResult<(StatusCode, Json<Apartment>)> {
    let mut apartment = input.apartment;

    validate_id("Project", apartment.project_id)?;
    validate_required("Number", &apartment.number)?;
    validate_optional_amounts(apartment.area, apartment.price, apartment.price_per_m2)?;
    if matches!(
        apartment.status,
        Some(ApartmentStatus::Reserved | ApartmentStatus::Sold)
    ) {
        return Err(AppError::Core(CoreError::Validation(
            "Apartments are created AVAILABLE; use the assign endpoint to reserve or sell".into(),
        )));
    }

    if ProjectRepo::find_by_id(&state.pool, apartment.project_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: apartment.project_id,
        }));
    }

    // The server owns the pricing arithmetic: a submitted quote wins over
    // any client-supplied price.
    if let Some(quote) = &input.pricing {
        let breakdown = compute_price(quote)?;
        apartment.price = Some(breakdown.total);
    }

    let apartment = ApartmentRepo::create(&state.pool, &apartment).await?;
    tracing::info!(
        apartment_id = apartment.id,
        project_id = apartment.project_id,
        "Apartment created"
    );

    Ok((StatusCode::CREATED, Json(apartment)))
}

/// GET /api/apartments[?project_id=]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Apartment>>> {
    let apartments = match params.project_id {
        Some(project_id) => {
            validate_id("Project", project_id)?;
            ApartmentRepo::list_by_project(&state.pool, project_id).await?
        }
        None => ApartmentRepo::list(&state.pool).await?,
    };
    Ok(Json(apartments))
}

/// GET /api/apartments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Apartment>> {
    validate_id("Apartment", id)?;
    let apartment = ApartmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Apartment",
            id,
        }))?;
    Ok(Json(apartment))
}

/// PUT /api/apartments/{id}
///
/// Partial update of descriptive fields. Status may only move between
/// AVAILABLE and CANCELLED here; RESERVED/SOLD go through assign, and a
/// reserved or sold apartment returns to AVAILABLE through release.
pub async fn update(
    State(state): State<AppState>,
    RequireAgent(_user): RequireAgent,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateApartmentRequest>,
) -> AppResult<Json<Apartment>> {
    let mut update = input.apartment;

    validate_id("Apartment", id)?;
    if let Some(number) = &update.number {
        validate_required("Number", number)?;
    }
    validate_optional_amounts(update.area, update.price, update.price_per_m2)?;
    if matches!(
        update.status,
        Some(ApartmentStatus::Reserved | ApartmentStatus::Sold)
    ) {
        return Err(AppError::Core(CoreError::Validation(
            "Use the assign endpoint to reserve or sell an apartment".into(),
        )));
    }

    if let Some(quote) = &input.pricing {
        let breakdown = compute_price(quote)?;
        update.price = Some(breakdown.total);
    }

    let apartment = ApartmentRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Apartment",
            id,
        }))?;
    Ok(Json(apartment))
}

/// POST /api/apartments/{id}/assign
///
/// Move an apartment to RESERVED or SOLD for a client. Runs under a row
/// lock; an optional `expected_version` turns the write into a
/// compare-and-set that fails 409 on mismatch.
pub async fn assign(
    State(state): State<AppState>,
    RequireAgent(_user): RequireAgent,
    Path(id): Path<DbId>,
    Json(input): Json<AssignApartment>,
) -> AppResult<Json<Apartment>> {
    validate_id("Apartment", id)?;
    validate_id("Client", input.client_id)?;
    if !matches!(
        input.status,
        ApartmentStatus::Reserved | ApartmentStatus::Sold
    ) {
        return Err(AppError::Core(CoreError::Validation(
            "Assignment status must be RESERVED or SOLD".into(),
        )));
    }

    match ApartmentRepo::assign(&state.pool, id, &input).await? {
        AssignResult::Assigned(apartment) => {
            tracing::info!(
                apartment_id = id,
                client_id = input.client_id,
                status = input.status.as_str(),
                "Apartment assigned"
            );
            Ok(Json(apartment))
        }
        AssignResult::ApartmentMissing => Err(AppError::Core(CoreError::NotFound {
            entity: "Apartment",
            id,
        })),
        AssignResult::ClientMissing => Err(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id: input.client_id,
        })),
        AssignResult::VersionMismatch { current } => {
            Err(AppError::Core(CoreError::Conflict(format!(
                "Apartment was modified concurrently (current version {current})"
            ))))
        }
    }
}

/// POST /api/apartments/{id}/release
///
/// Return an apartment to AVAILABLE, clearing the client link and sale
/// timestamp.
pub async fn release(
    State(state): State<AppState>,
    RequireAgent(_user): RequireAgent,
    Path(id): Path<DbId>,
) -> AppResult<Json<Apartment>> {
    validate_id("Apartment", id)?;
    let apartment = ApartmentRepo::release(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Apartment",
            id,
        }))?;
    tracing::info!(apartment_id = id, "Apartment released");
    Ok(Json(apartment))
}

/// POST /api/apartments/price-quote
///
/// Compute an itemized price for a quote without touching any row. The
/// same calculator backs the `pricing` field on create/update.
pub async fn price_quote(
    RequireAuth(_user): RequireAuth,
    Json(quote): Json<QuoteRequest>,
) -> AppResult<Json<PriceBreakdown>> {
    let breakdown = compute_price(&quote)?;
    Ok(Json(breakdown))
}

/// DELETE /api/apartments/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAgent(_user): RequireAgent,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    validate_id("Apartment", id)?;
    let deleted = ApartmentRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(apartment_id = id, "Apartment deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Apartment",
            id,
        }))
    }
}

/// Validate the optional non-negative numeric fields shared by create and
/// update payloads.
fn validate_optional_amounts(
    area: Option<f64>,
    price: Option<f64>,
    price_per_m2: Option<f64>,
) -> AppResult<()> {
    if let Some(area) = area {
        validate_non_negative("Area", area)?;
    }
    if let Some(price) = price {
        validate_non_negative("Price", price)?;
    }
    if let Some(rate) = price_per_m2 {
        validate_non_negative("Price per m2", rate)?;
    }
    Ok(())
}
