//! User session model and DTOs.

use moviemania_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `user_sessions` table. One row per issued refresh token;
/// only the SHA-256 hash of the token is stored.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user session.
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
