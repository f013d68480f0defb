//! Repository for the `apartments` table.
//!
//! Writes that affect sale state (assign, release, update, delete) run in a
//! transaction and refresh the owning project's `total_sales` before
//! committing, so the denormalized column never drifts.

use sqlx::{PgConnection, PgPool};

use immo_core::types::DbId;

use crate::models::apartment::{Apartment, AssignApartment, CreateApartment, UpdateApartment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, number, floor, property_type, area, price, \
                       price_per_m2, status, zone, notes, image_url, client_id, sold_at, \
                       version, created_at, updated_at";

/// Outcome of an assignment attempt.
#[derive(Debug, Clone)]
pub enum AssignResult {
    /// Assignment written; the returned row reflects the new state.
    Assigned(Apartment),
    /// No apartment with that id; nothing was written.
    ApartmentMissing,
    /// No client with that id; nothing was written.
    ClientMissing,
    /// `expected_version` did not match the stored row; nothing was written.
    VersionMismatch { current: i32 },
}

/// Provides CRUD and sale-state operations for apartments.
pub struct ApartmentRepo;

impl ApartmentRepo {
    /// Insert a new apartment, returning the created row.
    ///
    /// If `status` is `None` in the input, defaults to AVAILABLE; `price`
    /// defaults to 0.
    pub async fn create(pool: &PgPool, input: &CreateApartment) -> Result<Apartment, sqlx::Error> {
        let query = format!(
            "INSERT INTO apartments
                (project_id, number, floor, property_type, area, price, price_per_m2,
                 status, zone, notes, image_url)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 0), $7,
                     COALESCE($8, 'AVAILABLE'), $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Apartment>(&query)
            .bind(input.project_id)
            .bind(&input.number)
            .bind(input.floor)
            .bind(input.property_type)
            .bind(input.area)
            .bind(input.price)
            .bind(input.price_per_m2)
            .bind(input.status)
            .bind(&input.zone)
            .bind(&input.notes)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Find an apartment by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Apartment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM apartments WHERE id = $1");
        sqlx::query_as::<_, Apartment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all apartments ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Apartment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM apartments ORDER BY created_at DESC");
        sqlx::query_as::<_, Apartment>(&query).fetch_all(pool).await
    }

    /// List a project's apartments ordered by lot number.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Apartment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM apartments WHERE project_id = $1 ORDER BY number");
        sqlx::query_as::<_, Apartment>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update an apartment. Only non-`None` fields in `input` are applied;
    /// the row version is bumped on every write.
    ///
    /// A status change away from SOLD clears `sold_at`, and a change back to
    /// AVAILABLE clears the client link. Returns `None` if no row with the
    /// given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateApartment,
    ) -> Result<Option<Apartment>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE apartments SET
                number = COALESCE($2, number),
                floor = COALESCE($3, floor),
                property_type = COALESCE($4, property_type),
                area = COALESCE($5, area),
                price = COALESCE($6, price),
                price_per_m2 = COALESCE($7, price_per_m2),
                status = COALESCE($8, status),
                zone = COALESCE($9, zone),
                notes = COALESCE($10, notes),
                image_url = COALESCE($11, image_url),
                sold_at = CASE WHEN $8 IS NULL OR $8 = 'SOLD' THEN sold_at ELSE NULL END,
                client_id = CASE WHEN $8 = 'AVAILABLE' THEN NULL ELSE client_id END,
                version = version + 1
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let apartment = sqlx::query_as::<_, Apartment>(&query)
            .bind(id)
            .bind(&input.number)
            .bind(input.floor)
            .bind(input.property_type)
            .bind(input.area)
            .bind(input.price)
            .bind(input.price_per_m2)
            .bind(input.status)
            .bind(&input.zone)
            .bind(&input.notes)
            .bind(&input.image_url)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(apartment) = apartment else {
            return Ok(None);
        };
        Self::refresh_project_sales(&mut tx, apartment.project_id).await?;

        tx.commit().await?;
        Ok(Some(apartment))
    }

    /// Assign an apartment to a client, setting the new sale status.
    ///
    /// The whole sequence runs in one transaction over a row lock: load the
    /// apartment `FOR UPDATE`, check the optional expected version, verify
    /// the client exists, then write `client_id`, `status`, `sold_at` and
    /// the bumped version in a single UPDATE. Any failure leaves the row
    /// untouched.
    pub async fn assign(
        pool: &PgPool,
        id: DbId,
        input: &AssignApartment,
    ) -> Result<AssignResult, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM apartments WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, Apartment>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(current) = current else {
            return Ok(AssignResult::ApartmentMissing);
        };

        if let Some(expected) = input.expected_version {
            if expected != current.version {
                return Ok(AssignResult::VersionMismatch {
                    current: current.version,
                });
            }
        }

        let client_exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)")
                .bind(input.client_id)
                .fetch_one(&mut *tx)
                .await?;
        if !client_exists.0 {
            return Ok(AssignResult::ClientMissing);
        }

        let query = format!(
            "UPDATE apartments SET
                client_id = $2,
                status = $3,
                sold_at = CASE WHEN $3 = 'SOLD' THEN NOW() ELSE NULL END,
                version = version + 1
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let apartment = sqlx::query_as::<_, Apartment>(&query)
            .bind(id)
            .bind(input.client_id)
            .bind(input.status)
            .fetch_one(&mut *tx)
            .await?;
        Self::refresh_project_sales(&mut tx, apartment.project_id).await?;

        tx.commit().await?;
        Ok(AssignResult::Assigned(apartment))
    }

    /// Release an apartment back to AVAILABLE, clearing the client link and
    /// `sold_at`. Returns `None` if no row with the given `id` exists.
    pub async fn release(pool: &PgPool, id: DbId) -> Result<Option<Apartment>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE apartments SET
                status = 'AVAILABLE',
                client_id = NULL,
                sold_at = NULL,
                version = version + 1
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let apartment = sqlx::query_as::<_, Apartment>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(apartment) = apartment else {
            return Ok(None);
        };
        Self::refresh_project_sales(&mut tx, apartment.project_id).await?;

        tx.commit().await?;
        Ok(Some(apartment))
    }

    /// Permanently delete an apartment by ID. Returns `true` if a row was
    /// removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let removed: Option<(DbId,)> =
            sqlx::query_as("DELETE FROM apartments WHERE id = $1 RETURNING project_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((project_id,)) = removed else {
            return Ok(false);
        };
        Self::refresh_project_sales(&mut tx, project_id).await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Recompute the owning project's `total_sales` from its SOLD rows.
    async fn refresh_project_sales(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE projects SET total_sales = (
                SELECT COALESCE(SUM(price), 0) FROM apartments
                WHERE project_id = $1 AND status = 'SOLD'
             )
             WHERE id = $1",
        )
        .bind(project_id)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}
