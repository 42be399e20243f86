//! Refresh-token session models.

use sqlx::FromRow;

use curby_core::types::{DbId, Timestamp};

/// A row from the `sessions` table. Refresh tokens are stored as SHA-256
/// hashes only.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub profile_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
