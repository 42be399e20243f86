//! Device (push registration) models.

use curby_core::filter::{EntityMeta, FieldMeta, FieldType};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use curby_core::types::{DbId, Timestamp};

/// All valid device platform values.
pub const VALID_PLATFORMS: &[&str] = &["ios", "android", "web"];

/// A row from the `devices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Device {
    pub id: DbId,
    pub profile_id: DbId,
    pub platform: String,
    /// Opaque push token. Unique across all devices.
    pub push_token: String,
    pub app_version: Option<String>,
    pub last_seen_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
}

/// DTO for registering a device.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDevice {
    pub profile_id: DbId,
    pub platform: String,
    pub push_token: String,
    pub app_version: Option<String>,
}

/// DTO for partially updating a device.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDevice {
    pub app_version: Option<String>,
    pub last_seen_at: Option<Timestamp>,
}

pub const DEVICE_META: EntityMeta = EntityMeta {
    table: "devices",
    fields: &[
        ("id", FieldMeta::new(FieldType::Uuid, false)),
        ("profile_id", FieldMeta::new(FieldType::Uuid, true)),
        ("platform", FieldMeta::new(FieldType::Text, true)),
        ("push_token", FieldMeta::new(FieldType::Text, false)),
        ("app_version", FieldMeta::new(FieldType::Text, true)),
        ("last_seen_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("created_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("updated_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("created_by", FieldMeta::new(FieldType::Uuid, false)),
        ("updated_by", FieldMeta::new(FieldType::Uuid, false)),
    ],
};
