//! Support request models.

use curby_core::filter::{EntityMeta, FieldMeta, FieldType};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use curby_core::types::{DbId, Timestamp};

pub const SUPPORT_STATUS_OPEN: &str = "open";
pub const SUPPORT_STATUS_IN_PROGRESS: &str = "in_progress";
pub const SUPPORT_STATUS_RESOLVED: &str = "resolved";
pub const SUPPORT_STATUS_CLOSED: &str = "closed";

/// All valid support request status values.
pub const VALID_SUPPORT_STATUSES: &[&str] = &[
    SUPPORT_STATUS_OPEN,
    SUPPORT_STATUS_IN_PROGRESS,
    SUPPORT_STATUS_RESOLVED,
    SUPPORT_STATUS_CLOSED,
];

/// A row from the `support_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SupportRequest {
    pub id: DbId,
    pub profile_id: DbId,
    pub subject: String,
    pub body: String,
    pub status: String,
    pub assignee_id: Option<DbId>,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
}

/// DTO for creating a support request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSupportRequest {
    pub profile_id: DbId,
    pub subject: String,
    pub body: String,
}

/// DTO for partially updating a support request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSupportRequest {
    pub subject: Option<String>,
    pub status: Option<String>,
    pub assignee_id: Option<DbId>,
}

pub const SUPPORT_REQUEST_META: EntityMeta = EntityMeta {
    table: "support_requests",
    fields: &[
        ("id", FieldMeta::new(FieldType::Uuid, false)),
        ("profile_id", FieldMeta::new(FieldType::Uuid, true)),
        ("subject", FieldMeta::new(FieldType::Text, true)),
        ("body", FieldMeta::new(FieldType::Text, true)),
        ("status", FieldMeta::new(FieldType::Text, false)),
        ("assignee_id", FieldMeta::new(FieldType::Uuid, false)),
        ("resolved_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("created_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("updated_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("created_by", FieldMeta::new(FieldType::Uuid, false)),
        ("updated_by", FieldMeta::new(FieldType::Uuid, false)),
    ],
};
