//! HTTP request handlers, one module per resource.
//!
//! Handlers parse and validate input, call repository operations, and map
//! the results to status codes. Business rules that span tables (uniqueness
//! across users and clients, ownership, conversion) live here; single-table
//! SQL lives in `immo_db`.

pub mod activity;
pub mod agents;
pub mod apartments;
pub mod auth;
pub mod clients;
pub mod projects;
pub mod tasks;
pub mod uploads;
