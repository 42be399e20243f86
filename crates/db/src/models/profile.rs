//! Profile (admin/member account) models.

use curby_core::filter::{EntityMeta, FieldMeta, FieldType};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use curby_core::types::{DbId, Timestamp};

/// Role with full access, including profile administration.
pub const ROLE_ADMIN: &str = "admin";

/// Role allowed to work review queues.
pub const ROLE_MODERATOR: &str = "moderator";

/// Ordinary marketplace member.
pub const ROLE_MEMBER: &str = "member";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MODERATOR, ROLE_MEMBER];

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub role: String,
    /// Argon2id PHC hash. Never serialized into API responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub coin_balance: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
}

/// DTO for creating a profile (admin-created accounts).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfile {
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub password: String,
}

/// DTO for partially updating a profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub coin_balance: Option<i64>,
}

/// Field metadata for the listing layer.
pub const PROFILE_META: EntityMeta = EntityMeta {
    table: "profiles",
    fields: &[
        ("id", FieldMeta::new(FieldType::Uuid, false)),
        ("email", FieldMeta::new(FieldType::Text, true)),
        ("display_name", FieldMeta::new(FieldType::Text, true)),
        ("role", FieldMeta::new(FieldType::Text, false)),
        ("is_active", FieldMeta::new(FieldType::Boolean, false)),
        ("failed_login_count", FieldMeta::new(FieldType::Integer, false)),
        ("locked_until", FieldMeta::new(FieldType::Timestamp, false)),
        ("last_login_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("coin_balance", FieldMeta::new(FieldType::Integer, false)),
        ("created_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("updated_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("created_by", FieldMeta::new(FieldType::Uuid, false)),
        ("updated_by", FieldMeta::new(FieldType::Uuid, false)),
    ],
};
