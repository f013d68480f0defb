//! Monthly sales target model and activity-summary DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use immo_core::types::{DbId, Timestamp};

/// A monthly target row from the `monthly_targets` table.
///
/// `(year, month)` is unique; creating a duplicate pair is a conflict.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlyTarget {
    pub id: DbId,
    pub year: i32,
    pub month: i32,
    pub target_amount: f64,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new monthly target.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMonthlyTarget {
    pub year: i32,
    pub month: i32,
    pub target_amount: f64,
    pub notes: Option<String>,
}

/// DTO for updating an existing monthly target. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMonthlyTarget {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub target_amount: Option<f64>,
    pub notes: Option<String>,
}

/// Apartment counts grouped by sale status.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ApartmentStatusCounts {
    pub available: i64,
    pub reserved: i64,
    pub sold: i64,
    pub cancelled: i64,
    pub total: i64,
}

/// Dashboard aggregates for one month.
#[derive(Debug, Clone, Serialize)]
pub struct ActivitySummary {
    pub year: i32,
    pub month: i32,
    pub apartment_counts: ApartmentStatusCounts,
    /// All-time sales volume (sum of price over SOLD apartments).
    pub total_sales: f64,
    /// Sales volume for the requested month (`sold_at` within the month).
    pub month_sales: f64,
    /// The month's target, if one was set.
    pub target_amount: Option<f64>,
    /// `month_sales / target_amount` as a percentage; null without a
    /// positive target.
    pub attainment_pct: Option<f64>,
}
