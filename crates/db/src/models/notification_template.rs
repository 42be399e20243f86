//! Notification template models. Rendering happens backend-side in the
//! consumer product; this system only manages the rows.

use curby_core::filter::{EntityMeta, FieldMeta, FieldType};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use curby_core::types::{DbId, Timestamp};

/// A row from the `notification_templates` table.
/// `(name, version, locale)` is unique.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationTemplate {
    pub id: DbId,
    pub event_type_id: DbId,
    pub name: String,
    pub version: i32,
    pub locale: String,
    pub subject: String,
    pub body: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
}

/// DTO for creating a notification template.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNotificationTemplate {
    pub event_type_id: DbId,
    pub name: String,
    pub version: i32,
    pub locale: String,
    pub subject: String,
    pub body: String,
}

/// DTO for partially updating a notification template. Name, version, and
/// locale are immutable; publish a new version instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNotificationTemplate {
    pub subject: Option<String>,
    pub body: Option<String>,
}

pub const NOTIFICATION_TEMPLATE_META: EntityMeta = EntityMeta {
    table: "notification_templates",
    fields: &[
        ("id", FieldMeta::new(FieldType::Uuid, false)),
        ("event_type_id", FieldMeta::new(FieldType::Uuid, false)),
        ("name", FieldMeta::new(FieldType::Text, true)),
        ("version", FieldMeta::new(FieldType::Integer, true)),
        ("locale", FieldMeta::new(FieldType::Text, true)),
        ("subject", FieldMeta::new(FieldType::Text, true)),
        ("body", FieldMeta::new(FieldType::Text, false)),
        ("created_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("updated_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("created_by", FieldMeta::new(FieldType::Uuid, false)),
        ("updated_by", FieldMeta::new(FieldType::Uuid, false)),
    ],
};
