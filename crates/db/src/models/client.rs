//! Client entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use immo_core::types::{DbId, Timestamp};

use crate::models::status::ClientStatus;

/// A client row from the `clients` table.
///
/// `user_id` is null for prospects; it is populated once by the
/// PROSPECT->CLIENT conversion and never cleared.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub whatsapp_number: Option<String>,
    pub status: ClientStatus,
    pub notes: Option<String>,
    pub provenance: Option<String>,
    /// User id of the agent who created the record. Owning agents may
    /// mutate it; other agents may not.
    pub created_by: DbId,
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClient {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub whatsapp_number: Option<String>,
    /// Defaults to PROSPECT if omitted.
    pub status: Option<ClientStatus>,
    pub notes: Option<String>,
    pub provenance: Option<String>,
}

/// DTO for updating an existing client. All fields are optional.
///
/// `password` is only meaningful when the update converts a PROSPECT to
/// CLIENT; it is consumed by the conversion and never stored as-is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClient {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub whatsapp_number: Option<String>,
    pub status: Option<ClientStatus>,
    pub notes: Option<String>,
    pub provenance: Option<String>,
    pub password: Option<String>,
}
