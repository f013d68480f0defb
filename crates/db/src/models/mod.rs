//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod apartment;
pub mod client;
pub mod monthly_target;
pub mod project;
pub mod status;
pub mod task;
pub mod user;
