//! Handlers for the `/activity` resource: monthly targets and the
//! dashboard summary.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{Datelike, Utc};
use immo_core::error::CoreError;
use immo_core::types::DbId;
use immo_core::validation::{validate_id, validate_month, validate_non_negative, validate_year};
use immo_db::models::monthly_target::{
    ActivitySummary, CreateMonthlyTarget, MonthlyTarget, UpdateMonthlyTarget,
};
use immo_db::repositories::MonthlyTargetRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /api/activity/targets`.
#[derive(Debug, Deserialize)]
pub struct ListTargetsParams {
    pub year: Option<i32>,
}

/// Query parameters for `GET /api/activity/summary`.
#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub year: Option<i32>,
    pub month: Option<i32>,
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// GET /api/activity/targets[?year=]
pub async fn list_targets(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<ListTargetsParams>,
) -> AppResult<Json<Vec<MonthlyTarget>>> {
    if let Some(year) = params.year {
        validate_year(year)?;
    }
    let targets = MonthlyTargetRepo::list(&state.pool, params.year).await?;
    Ok(Json(targets))
}

/// POST /api/activity/targets
///
/// `(year, month)` is unique; creating a duplicate pair is a 409.
pub async fn create_target(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateMonthlyTarget>,
) -> AppResult<(StatusCode, Json<MonthlyTarget>)> {
    validate_year(input.year)?;
    validate_month(input.month)?;
    validate_non_negative("Target amount", input.target_amount)?;

    let target = MonthlyTargetRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(target)))
}

/// PUT /api/activity/targets/{id}
pub async fn update_target(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMonthlyTarget>,
) -> AppResult<Json<MonthlyTarget>> {
    validate_id("Monthly target", id)?;
    if let Some(year) = input.year {
        validate_year(year)?;
    }
    if let Some(month) = input.month {
        validate_month(month)?;
    }
    if let Some(amount) = input.target_amount {
        validate_non_negative("Target amount", amount)?;
    }

    let target = MonthlyTargetRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Monthly target",
            id,
        }))?;
    Ok(Json(target))
}

/// DELETE /api/activity/targets/{id}
pub async fn delete_target(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    validate_id("Monthly target", id)?;
    let deleted = MonthlyTargetRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Monthly target",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// GET /api/activity/summary[?year=&month=]
///
/// Dashboard aggregates for one month; defaults to the current UTC month
/// when the parameters are omitted.
pub async fn summary(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<SummaryParams>,
) -> AppResult<Json<ActivitySummary>> {
    let now = Utc::now();
    let year = params.year.unwrap_or(now.year());
    let month = params.month.unwrap_or(now.month() as i32);
    validate_year(year)?;
    validate_month(month)?;

    let summary = MonthlyTargetRepo::summary(&state.pool, year, month).await?;
    Ok(Json(summary))
}
