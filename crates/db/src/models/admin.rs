//! Administrator identity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use vitrine_core::types::{DbId, Timestamp};

/// Full row from the `admins` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`AdminResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe admin representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct AdminResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub created_at: Timestamp,
}

impl From<&Admin> for AdminResponse {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username.clone(),
            email: admin.email.clone(),
            created_at: admin.created_at,
        }
    }
}

/// DTO for creating an admin. The password must already be hashed.
#[derive(Debug)]
pub struct CreateAdmin {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
