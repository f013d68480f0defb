//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod apartment_repo;
pub mod client_repo;
pub mod monthly_target_repo;
pub mod project_repo;
pub mod task_repo;
pub mod user_repo;

pub use apartment_repo::{ApartmentRepo, AssignResult};
pub use client_repo::{ClientRepo, DeleteClientOutcome};
pub use monthly_target_repo::MonthlyTargetRepo;
pub use project_repo::ProjectRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
