//! Repository for the `clients` table and the client/apartment interest link.

use sqlx::PgPool;

use immo_core::types::DbId;

use crate::models::apartment::Apartment;
use crate::models::client::{Client, CreateClient, UpdateClient};
use crate::models::user::CreateUser;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, email, phone_number, whatsapp_number, \
                       status, notes, provenance, created_by, user_id, created_at, updated_at";

/// Apartment columns, prefixed for the interest JOIN.
const APARTMENT_COLUMNS: &str =
    "a.id, a.project_id, a.number, a.floor, a.property_type, a.area, a.price, \
     a.price_per_m2, a.status, a.zone, a.notes, a.image_url, a.client_id, a.sold_at, \
     a.version, a.created_at, a.updated_at";

/// Outcome of a client deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteClientOutcome {
    /// Client removed; any RESERVED apartments were released back to
    /// AVAILABLE.
    Deleted,
    /// No client with that id.
    NotFound,
    /// The client owns a SOLD apartment; deletion is refused.
    OwnsSoldApartment,
}

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client owned by `created_by`, returning the created row.
    ///
    /// If `status` is `None` in the input, defaults to PROSPECT.
    pub async fn create(
        pool: &PgPool,
        input: &CreateClient,
        created_by: DbId,
    ) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients
                (first_name, last_name, email, phone_number, whatsapp_number,
                 status, notes, provenance, created_by)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'PROSPECT'), $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .bind(&input.whatsapp_number)
            .bind(input.status)
            .bind(&input.notes)
            .bind(&input.provenance)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a client by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all clients ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients ORDER BY created_at DESC");
        sqlx::query_as::<_, Client>(&query).fetch_all(pool).await
    }

    /// Update a client. Only non-`None` fields in `input` are applied.
    ///
    /// This is the plain partial update; it never touches `user_id`.
    /// PROSPECT->CLIENT conversion goes through [`Self::convert_to_client`].
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone_number = COALESCE($5, phone_number),
                whatsapp_number = COALESCE($6, whatsapp_number),
                status = COALESCE($7, status),
                notes = COALESCE($8, notes),
                provenance = COALESCE($9, provenance)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .bind(&input.whatsapp_number)
            .bind(input.status)
            .bind(&input.notes)
            .bind(&input.provenance)
            .fetch_optional(pool)
            .await
    }

    /// Convert a PROSPECT to CLIENT: create the portal user, link it, set
    /// the status, and apply the rest of the partial update -- all in one
    /// transaction.
    ///
    /// Returns `None` (and rolls back the user insert) if the row is gone
    /// or was converted concurrently.
    pub async fn convert_to_client(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClient,
        user: &CreateUser,
    ) -> Result<Option<Client>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user_row: (DbId,) = sqlx::query_as(
            "INSERT INTO users (name, email, phone_number, password_hash, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&mut *tx)
        .await?;

        let query = format!(
            "UPDATE clients SET
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                email = COALESCE($5, email),
                phone_number = COALESCE($6, phone_number),
                whatsapp_number = COALESCE($7, whatsapp_number),
                notes = COALESCE($8, notes),
                provenance = COALESCE($9, provenance),
                status = 'CLIENT',
                user_id = $2
             WHERE id = $1 AND status = 'PROSPECT' AND user_id IS NULL
             RETURNING {COLUMNS}"
        );
        let client = sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(user_row.0)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .bind(&input.whatsapp_number)
            .bind(&input.notes)
            .bind(&input.provenance)
            .fetch_optional(&mut *tx)
            .await?;

        // No matching prospect: drop the transaction, discarding the user.
        if client.is_none() {
            return Ok(None);
        }

        tx.commit().await?;
        Ok(client)
    }

    /// Delete a client.
    ///
    /// RESERVED apartments owned by the client are released back to
    /// AVAILABLE in the same transaction; a SOLD apartment refuses the
    /// deletion outright.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<DeleteClientOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let sold: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM apartments WHERE client_id = $1 AND status = 'SOLD')",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if sold.0 {
            return Ok(DeleteClientOutcome::OwnsSoldApartment);
        }

        sqlx::query(
            "UPDATE apartments SET
                status = 'AVAILABLE',
                client_id = NULL,
                sold_at = NULL,
                version = version + 1
             WHERE client_id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(DeleteClientOutcome::NotFound);
        }

        tx.commit().await?;
        Ok(DeleteClientOutcome::Deleted)
    }

    /// Number of clients created by the given agent. Used to refuse agent
    /// deletion while they still own client records.
    pub async fn count_by_creator(pool: &PgPool, agent_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients WHERE created_by = $1")
            .bind(agent_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Whether an email is already used by a client other than `exclude`.
    pub async fn email_taken(
        pool: &PgPool,
        email: &str,
        exclude: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                SELECT 1 FROM clients
                WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    // -----------------------------------------------------------------------
    // Apartment interests (many-to-many)
    // -----------------------------------------------------------------------

    /// Record the client's interest in an apartment. Returns `false` if the
    /// link already existed.
    pub async fn add_interest(
        pool: &PgPool,
        client_id: DbId,
        apartment_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO client_apartment_interests (client_id, apartment_id)
             VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(client_id)
        .bind(apartment_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove an interest link. Returns `true` if a link was removed.
    pub async fn remove_interest(
        pool: &PgPool,
        client_id: DbId,
        apartment_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM client_apartment_interests
             WHERE client_id = $1 AND apartment_id = $2",
        )
        .bind(client_id)
        .bind(apartment_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the apartments a client has registered interest in.
    pub async fn list_interests(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<Apartment>, sqlx::Error> {
        let query = format!(
            "SELECT {APARTMENT_COLUMNS}
             FROM apartments a
             JOIN client_apartment_interests i ON i.apartment_id = a.id
             WHERE i.client_id = $1
             ORDER BY i.created_at DESC"
        );
        sqlx::query_as::<_, Apartment>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }
}
