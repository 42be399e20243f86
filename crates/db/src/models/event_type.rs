//! Event type models (catalog of notifiable platform events).

use curby_core::filter::{EntityMeta, FieldMeta, FieldType};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use curby_core::types::{DbId, Timestamp};

/// A row from the `event_types` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventType {
    pub id: DbId,
    /// Stable machine key, e.g. `item.claimed`. Unique.
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub default_channel: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
}

/// DTO for creating an event type.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventType {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub default_channel: String,
}

/// DTO for partially updating an event type. The key is immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventType {
    pub name: Option<String>,
    pub description: Option<String>,
    pub default_channel: Option<String>,
    pub is_active: Option<bool>,
}

pub const EVENT_TYPE_META: EntityMeta = EntityMeta {
    table: "event_types",
    fields: &[
        ("id", FieldMeta::new(FieldType::Uuid, false)),
        ("key", FieldMeta::new(FieldType::Text, true)),
        ("name", FieldMeta::new(FieldType::Text, true)),
        ("description", FieldMeta::new(FieldType::Text, true)),
        ("default_channel", FieldMeta::new(FieldType::Text, false)),
        ("is_active", FieldMeta::new(FieldType::Boolean, false)),
        ("created_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("updated_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("created_by", FieldMeta::new(FieldType::Uuid, false)),
        ("updated_by", FieldMeta::new(FieldType::Uuid, false)),
    ],
};
