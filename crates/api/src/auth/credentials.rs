//! Admin registration and username/password checks.

use std::sync::LazyLock;

use vitrine_core::error::CoreError;
use vitrine_db::models::admin::{Admin, CreateAdmin};
use vitrine_db::repositories::AdminRepo;
use vitrine_db::DbPool;

use super::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};

/// Message for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Verified in place of a real hash when the username is unknown, so both
/// login failures cost one Argon2 verification.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("vitrine-unknown-admin").ok());

/// Run a verification against [`DUMMY_HASH`]. Never matches a real login.
fn verify_against_dummy(password: &str) -> bool {
    DUMMY_HASH
        .as_deref()
        .is_some_and(|hash| verify_password(password, hash).unwrap_or(false))
}

/// Store a new admin with a hashed password.
///
/// Fails with `Conflict` when the username or the email is already taken.
/// The unique constraints still back this check up under concurrent inserts.
pub async fn register_admin(
    pool: &DbPool,
    username: &str,
    email: &str,
    password: &str,
) -> AppResult<Admin> {
    if AdminRepo::exists_by_username_or_email(pool, username, email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Admin already exists".into(),
        )));
    }

    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let admin = AdminRepo::create(
        pool,
        &CreateAdmin {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        },
    )
    .await?;

    tracing::info!(admin_id = admin.id, username = %admin.username, "Admin registered");
    Ok(admin)
}

/// Resolve the admin whose username and password both match.
///
/// An unknown username and a wrong password fail identically.
pub async fn verify_credentials(pool: &DbPool, username: &str, password: &str) -> AppResult<Admin> {
    let invalid = || AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()));

    let Some(admin) = AdminRepo::find_by_username(pool, username).await? else {
        verify_against_dummy(password);
        return Err(invalid());
    };

    let matches = verify_password(password, &admin.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !matches {
        tracing::debug!(admin_id = admin.id, "Password mismatch");
        return Err(invalid());
    }

    Ok(admin)
}
