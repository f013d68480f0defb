//! Well-known role name constants.
//!
//! These must match the `user_role` enum values defined in
//! `20260815000002_create_users.sql`.

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_AGENT: &str = "AGENT";
pub const ROLE_CLIENT: &str = "CLIENT";
