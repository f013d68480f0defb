//! Pure domain logic for the agency back-office.
//!
//! No I/O lives here: errors, shared types, role constants, input
//! validation, and the pricing calculator are all plain functions and
//! types consumed by the `immo-db` and `immo-api` crates.

pub mod error;
pub mod pricing;
pub mod roles;
pub mod types;
pub mod validation;
