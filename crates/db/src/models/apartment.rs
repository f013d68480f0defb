//! Apartment entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use immo_core::types::{DbId, Timestamp};

use crate::models::status::{ApartmentStatus, PropertyType};

/// An apartment row from the `apartments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Apartment {
    pub id: DbId,
    pub project_id: DbId,
    /// Lot identifier within the project, e.g. `"A-12"`.
    pub number: String,
    pub floor: Option<i32>,
    pub property_type: PropertyType,
    pub area: Option<f64>,
    pub price: f64,
    pub price_per_m2: Option<f64>,
    pub status: ApartmentStatus,
    pub zone: Option<String>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    /// Owning client once reserved or sold; null while AVAILABLE.
    pub client_id: Option<DbId>,
    /// Set when the apartment is marked SOLD; cleared on release.
    pub sold_at: Option<Timestamp>,
    /// Optimistic-concurrency counter, bumped on every write.
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new apartment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApartment {
    pub project_id: DbId,
    pub number: String,
    pub floor: Option<i32>,
    pub property_type: PropertyType,
    pub area: Option<f64>,
    /// Defaults to 0 if omitted (a server-side quote may override it).
    pub price: Option<f64>,
    pub price_per_m2: Option<f64>,
    /// Defaults to AVAILABLE if omitted.
    pub status: Option<ApartmentStatus>,
    pub zone: Option<String>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
}

/// DTO for updating an existing apartment. All fields are optional.
///
/// `client_id` and `status` transitions to RESERVED/SOLD go through the
/// assign operation, not this DTO.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateApartment {
    pub number: Option<String>,
    pub floor: Option<i32>,
    pub property_type: Option<PropertyType>,
    pub area: Option<f64>,
    pub price: Option<f64>,
    pub price_per_m2: Option<f64>,
    pub status: Option<ApartmentStatus>,
    pub zone: Option<String>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
}

/// DTO for assigning an apartment to a client.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignApartment {
    pub client_id: DbId,
    /// Must be RESERVED or SOLD; validated at the handler.
    pub status: ApartmentStatus,
    /// When supplied, the assignment fails with a conflict unless the
    /// stored row version matches.
    pub expected_version: Option<i32>,
}
