//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use immo_core::types::{DbId, Timestamp};

use crate::models::apartment::Apartment;
use crate::models::status::ProjectStatus;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub address: Option<String>,
    pub number_of_apartments: Option<i32>,
    pub total_surface: Option<f64>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub status: ProjectStatus,
    /// Construction progress percentage, 0-100.
    pub progress: i32,
    pub folder_fees: Option<f64>,
    pub commission_per_m2: Option<f64>,
    pub total_sales: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project together with its apartments, returned by single-project GETs.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithApartments {
    #[serde(flatten)]
    pub project: Project,
    pub apartments: Vec<Apartment>,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub address: Option<String>,
    pub number_of_apartments: Option<i32>,
    pub total_surface: Option<f64>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    /// Defaults to PLANIFICATION if omitted.
    pub status: Option<ProjectStatus>,
    /// Defaults to 0 if omitted.
    pub progress: Option<i32>,
    pub folder_fees: Option<f64>,
    pub commission_per_m2: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub address: Option<String>,
    pub number_of_apartments: Option<i32>,
    pub total_surface: Option<f64>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<ProjectStatus>,
    pub progress: Option<i32>,
    pub folder_fees: Option<f64>,
    pub commission_per_m2: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
