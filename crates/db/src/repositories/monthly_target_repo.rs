//! Repository for the `monthly_targets` table and activity aggregates.

use sqlx::PgPool;

use immo_core::types::DbId;

use crate::models::monthly_target::{
    ActivitySummary, ApartmentStatusCounts, CreateMonthlyTarget, MonthlyTarget,
    UpdateMonthlyTarget,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, year, month, target_amount, notes, created_at, updated_at";

/// Provides CRUD operations for monthly targets and the activity summary.
pub struct MonthlyTargetRepo;

impl MonthlyTargetRepo {
    /// Insert a new monthly target, returning the created row.
    ///
    /// `(year, month)` is unique; a duplicate pair surfaces as a
    /// unique-constraint violation.
    pub async fn create(
        pool: &PgPool,
        input: &CreateMonthlyTarget,
    ) -> Result<MonthlyTarget, sqlx::Error> {
        let query = format!(
            "INSERT INTO monthly_targets (year, month, target_amount, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MonthlyTarget>(&query)
            .bind(input.year)
            .bind(input.month)
            .bind(input.target_amount)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a monthly target by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MonthlyTarget>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM monthly_targets WHERE id = $1");
        sqlx::query_as::<_, MonthlyTarget>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the target for a specific month, if one was set.
    pub async fn find_by_year_month(
        pool: &PgPool,
        year: i32,
        month: i32,
    ) -> Result<Option<MonthlyTarget>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM monthly_targets WHERE year = $1 AND month = $2");
        sqlx::query_as::<_, MonthlyTarget>(&query)
            .bind(year)
            .bind(month)
            .fetch_optional(pool)
            .await
    }

    /// List targets, optionally filtered by year, chronological order.
    pub async fn list(pool: &PgPool, year: Option<i32>) -> Result<Vec<MonthlyTarget>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM monthly_targets
             WHERE ($1::INT IS NULL OR year = $1)
             ORDER BY year, month"
        );
        sqlx::query_as::<_, MonthlyTarget>(&query)
            .bind(year)
            .fetch_all(pool)
            .await
    }

    /// Update a monthly target. Only non-`None` fields in `input` are
    /// applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMonthlyTarget,
    ) -> Result<Option<MonthlyTarget>, sqlx::Error> {
        let query = format!(
            "UPDATE monthly_targets SET
                year = COALESCE($2, year),
                month = COALESCE($3, month),
                target_amount = COALESCE($4, target_amount),
                notes = COALESCE($5, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MonthlyTarget>(&query)
            .bind(id)
            .bind(input.year)
            .bind(input.month)
            .bind(input.target_amount)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a monthly target by ID. Returns `true` if a row
    /// was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM monthly_targets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Compute the dashboard aggregates for one month: apartment counts by
    /// status, all-time and monthly sales volume, and attainment against
    /// the month's target (null without a positive target).
    pub async fn summary(
        pool: &PgPool,
        year: i32,
        month: i32,
    ) -> Result<ActivitySummary, sqlx::Error> {
        let counts: (i64, i64, i64, i64, i64) = sqlx::query_as(
            "SELECT
                COUNT(*) FILTER (WHERE status = 'AVAILABLE'),
                COUNT(*) FILTER (WHERE status = 'RESERVED'),
                COUNT(*) FILTER (WHERE status = 'SOLD'),
                COUNT(*) FILTER (WHERE status = 'CANCELLED'),
                COUNT(*)
             FROM apartments",
        )
        .fetch_one(pool)
        .await?;

        let sales: (f64, f64) = sqlx::query_as(
            "SELECT
                COALESCE(SUM(price) FILTER (WHERE status = 'SOLD'), 0),
                COALESCE(SUM(price) FILTER (WHERE status = 'SOLD'
                    AND EXTRACT(YEAR FROM sold_at AT TIME ZONE 'UTC')::INT = $1
                    AND EXTRACT(MONTH FROM sold_at AT TIME ZONE 'UTC')::INT = $2), 0)
             FROM apartments",
        )
        .bind(year)
        .bind(month)
        .fetch_one(pool)
        .await?;

        let target = Self::find_by_year_month(pool, year, month).await?;
        let target_amount = target.map(|t| t.target_amount);
        let attainment_pct = target_amount
            .filter(|t| *t > 0.0)
            .map(|t| sales.1 / t * 100.0);

        Ok(ActivitySummary {
            year,
            month,
            apartment_counts: ApartmentStatusCounts {
                available: counts.0,
                reserved: counts.1,
                sold: counts.2,
                cancelled: counts.3,
                total: counts.4,
            },
            total_sales: sales.0,
            month_sales: sales.1,
            target_amount,
            attainment_pct,
        })
    }
}
