//! First-run bootstrap of the initial ADMIN account.
//!
//! Agent accounts can only be created by an admin, so a fresh deployment
//! needs one admin seeded before anyone can log in. If the users table is
//! empty and `ADMIN_EMAIL`/`ADMIN_PASSWORD` are configured, an ADMIN user
//! is created at startup. Existing deployments are never touched.

use immo_db::models::status::UserRole;
use immo_db::models::user::CreateUser;
use immo_db::repositories::UserRepo;
use immo_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// Create the initial ADMIN user if the users table is empty.
///
/// Returns `Ok(true)` if a user was created, `Ok(false)` if bootstrap was
/// skipped (users already exist, or credentials are not configured).
pub async fn ensure_admin_user(pool: &DbPool, config: &ServerConfig) -> AppResult<bool> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        tracing::debug!("Admin bootstrap credentials not configured, skipping");
        return Ok(false);
    };

    if UserRepo::count(pool).await? > 0 {
        tracing::debug!("Users already exist, skipping admin bootstrap");
        return Ok(false);
    }

    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: "Admin".to_string(),
            email: email.clone(),
            phone_number: None,
            password_hash,
            role: UserRole::Admin,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap admin user created");
    Ok(true)
}
