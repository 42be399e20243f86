//! Broadcast, schedule, and delivery models.
//!
//! A broadcast is an announcement sent to a slice of the community. Sending
//! fans out one `broadcast_deliveries` row per reachable profile; actual push
//! and email dispatch happen outside this system.

use curby_core::filter::{EntityMeta, FieldMeta, FieldType};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use curby_core::types::{DbId, Timestamp};

/* --------------------------------------------------------------------------
Status / audience constants
-------------------------------------------------------------------------- */

pub const BROADCAST_STATUS_DRAFT: &str = "draft";
pub const BROADCAST_STATUS_SCHEDULED: &str = "scheduled";
pub const BROADCAST_STATUS_SENDING: &str = "sending";
pub const BROADCAST_STATUS_SENT: &str = "sent";
pub const BROADCAST_STATUS_FAILED: &str = "failed";

/// All valid broadcast status values.
pub const VALID_BROADCAST_STATUSES: &[&str] = &[
    BROADCAST_STATUS_DRAFT,
    BROADCAST_STATUS_SCHEDULED,
    BROADCAST_STATUS_SENDING,
    BROADCAST_STATUS_SENT,
    BROADCAST_STATUS_FAILED,
];

/// All valid broadcast audience values.
pub const VALID_AUDIENCES: &[&str] = &["all", "neighborhood", "subscribers"];

pub const DELIVERY_STATUS_PENDING: &str = "pending";
pub const DELIVERY_STATUS_DELIVERED: &str = "delivered";
pub const DELIVERY_STATUS_FAILED: &str = "failed";

/// All valid delivery channel values.
pub const VALID_CHANNELS: &[&str] = &["push", "email"];

/* --------------------------------------------------------------------------
Rows
-------------------------------------------------------------------------- */

/// A row from the `broadcasts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Broadcast {
    pub id: DbId,
    pub title: String,
    pub body: String,
    pub audience: String,
    pub status: String,
    pub scheduled_at: Option<Timestamp>,
    pub sent_at: Option<Timestamp>,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
}

/// A row from the `schedules` table (recurring broadcast firing rules).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Schedule {
    pub id: DbId,
    pub broadcast_id: DbId,
    pub cron_expr: String,
    pub timezone: String,
    pub is_active: bool,
    pub next_fire_at: Option<Timestamp>,
    pub last_fired_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
}

/// A row from the `broadcast_deliveries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BroadcastDelivery {
    pub id: DbId,
    pub broadcast_id: DbId,
    pub profile_id: DbId,
    pub channel: String,
    pub status: String,
    pub delivered_at: Option<Timestamp>,
    pub error: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
}

/* --------------------------------------------------------------------------
DTOs
-------------------------------------------------------------------------- */

/// DTO for creating a broadcast (starts in `draft`, or `scheduled` when a
/// `scheduled_at` is supplied).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBroadcast {
    pub title: String,
    pub body: String,
    pub audience: String,
    pub scheduled_at: Option<Timestamp>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// DTO for partially updating a broadcast. Only drafts and scheduled
/// broadcasts may be edited.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBroadcast {
    pub title: Option<String>,
    pub body: Option<String>,
    pub audience: Option<String>,
    pub scheduled_at: Option<Timestamp>,
    pub tags: Option<Vec<String>>,
}

/// DTO for creating a schedule under a broadcast.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSchedule {
    pub cron_expr: String,
    pub timezone: String,
    pub next_fire_at: Option<Timestamp>,
}

/// DTO for partially updating a schedule.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSchedule {
    pub cron_expr: Option<String>,
    pub timezone: Option<String>,
    pub is_active: Option<bool>,
    pub next_fire_at: Option<Timestamp>,
}

/* --------------------------------------------------------------------------
Listing metadata
-------------------------------------------------------------------------- */

pub const BROADCAST_META: EntityMeta = EntityMeta {
    table: "broadcasts",
    fields: &[
        ("id", FieldMeta::new(FieldType::Uuid, false)),
        ("title", FieldMeta::new(FieldType::Text, true)),
        ("body", FieldMeta::new(FieldType::Text, true)),
        ("audience", FieldMeta::new(FieldType::Text, false)),
        ("status", FieldMeta::new(FieldType::Text, false)),
        ("scheduled_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("sent_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("tags", FieldMeta::new(FieldType::TextArray, false)),
        ("created_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("updated_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("created_by", FieldMeta::new(FieldType::Uuid, false)),
        ("updated_by", FieldMeta::new(FieldType::Uuid, false)),
    ],
};

pub const SCHEDULE_META: EntityMeta = EntityMeta {
    table: "schedules",
    fields: &[
        ("id", FieldMeta::new(FieldType::Uuid, false)),
        ("broadcast_id", FieldMeta::new(FieldType::Uuid, false)),
        ("cron_expr", FieldMeta::new(FieldType::Text, true)),
        ("timezone", FieldMeta::new(FieldType::Text, true)),
        ("is_active", FieldMeta::new(FieldType::Boolean, false)),
        ("next_fire_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("last_fired_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("created_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("updated_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("created_by", FieldMeta::new(FieldType::Uuid, false)),
        ("updated_by", FieldMeta::new(FieldType::Uuid, false)),
    ],
};

pub const DELIVERY_META: EntityMeta = EntityMeta {
    table: "broadcast_deliveries",
    fields: &[
        ("id", FieldMeta::new(FieldType::Uuid, false)),
        ("broadcast_id", FieldMeta::new(FieldType::Uuid, false)),
        ("profile_id", FieldMeta::new(FieldType::Uuid, false)),
        ("channel", FieldMeta::new(FieldType::Text, false)),
        ("status", FieldMeta::new(FieldType::Text, false)),
        ("delivered_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("error", FieldMeta::new(FieldType::Text, true)),
        ("created_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("updated_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("created_by", FieldMeta::new(FieldType::Uuid, false)),
        ("updated_by", FieldMeta::new(FieldType::Uuid, false)),
    ],
};
