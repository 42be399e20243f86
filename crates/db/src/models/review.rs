//! Item and user review models (moderation workflow).
//!
//! Both review kinds share the same workflow column block; they differ only
//! in what was reported (a marketplace item vs. a profile). Status values and
//! transition rules live in `curby_core::review`.

use curby_core::filter::{EntityMeta, FieldMeta, FieldType};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use curby_core::types::{DbId, Timestamp};

/* --------------------------------------------------------------------------
Rows
-------------------------------------------------------------------------- */

/// A row from the `item_reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ItemReview {
    pub id: DbId,
    /// The reported marketplace item. Items live in the consumer product's
    /// schema; this system stores only the reference.
    pub item_id: DbId,
    pub reporter_id: Option<DbId>,
    pub reason: String,
    pub status: String,
    pub reviewer_id: Option<DbId>,
    pub review_started_at: Option<Timestamp>,
    pub decision: Option<String>,
    pub decision_notes: Option<String>,
    pub decided_at: Option<Timestamp>,
    pub appeal_reason: Option<String>,
    pub appealed_at: Option<Timestamp>,
    pub appeal_reviewer_id: Option<DbId>,
    pub appeal_started_at: Option<Timestamp>,
    pub appeal_decision: Option<String>,
    pub appeal_decided_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
}

/// A row from the `user_reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserReview {
    pub id: DbId,
    pub reported_profile_id: DbId,
    pub reporter_id: Option<DbId>,
    pub reason: String,
    pub status: String,
    pub reviewer_id: Option<DbId>,
    pub review_started_at: Option<Timestamp>,
    pub decision: Option<String>,
    pub decision_notes: Option<String>,
    pub decided_at: Option<Timestamp>,
    pub appeal_reason: Option<String>,
    pub appealed_at: Option<Timestamp>,
    pub appeal_reviewer_id: Option<DbId>,
    pub appeal_started_at: Option<Timestamp>,
    pub appeal_decision: Option<String>,
    pub appeal_decided_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
}

/* --------------------------------------------------------------------------
DTOs
-------------------------------------------------------------------------- */

/// DTO for filing an item report.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemReview {
    pub item_id: DbId,
    pub reporter_id: Option<DbId>,
    pub reason: String,
}

/// DTO for filing a user report.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserReview {
    pub reported_profile_id: DbId,
    pub reporter_id: Option<DbId>,
    pub reason: String,
}

/// Request body for the decision endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionRequest {
    pub decision: String,
    pub notes: Option<String>,
}

/// Request body for the appeal endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AppealRequest {
    pub reason: String,
}

/* --------------------------------------------------------------------------
Listing metadata
-------------------------------------------------------------------------- */

pub const ITEM_REVIEW_META: EntityMeta = EntityMeta {
    table: "item_reviews",
    fields: &[
        ("id", FieldMeta::new(FieldType::Uuid, false)),
        ("item_id", FieldMeta::new(FieldType::Uuid, true)),
        ("reporter_id", FieldMeta::new(FieldType::Uuid, false)),
        ("reason", FieldMeta::new(FieldType::Text, true)),
        ("status", FieldMeta::new(FieldType::Text, false)),
        ("reviewer_id", FieldMeta::new(FieldType::Uuid, false)),
        ("review_started_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("decision", FieldMeta::new(FieldType::Text, false)),
        ("decision_notes", FieldMeta::new(FieldType::Text, true)),
        ("decided_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("appeal_reason", FieldMeta::new(FieldType::Text, true)),
        ("appealed_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("appeal_reviewer_id", FieldMeta::new(FieldType::Uuid, false)),
        ("appeal_started_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("appeal_decision", FieldMeta::new(FieldType::Text, false)),
        ("appeal_decided_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("created_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("updated_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("created_by", FieldMeta::new(FieldType::Uuid, false)),
        ("updated_by", FieldMeta::new(FieldType::Uuid, false)),
    ],
};

pub const USER_REVIEW_META: EntityMeta = EntityMeta {
    table: "user_reviews",
    fields: &[
        ("id", FieldMeta::new(FieldType::Uuid, false)),
        ("reported_profile_id", FieldMeta::new(FieldType::Uuid, true)),
        ("reporter_id", FieldMeta::new(FieldType::Uuid, false)),
        ("reason", FieldMeta::new(FieldType::Text, true)),
        ("status", FieldMeta::new(FieldType::Text, false)),
        ("reviewer_id", FieldMeta::new(FieldType::Uuid, false)),
        ("review_started_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("decision", FieldMeta::new(FieldType::Text, false)),
        ("decision_notes", FieldMeta::new(FieldType::Text, true)),
        ("decided_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("appeal_reason", FieldMeta::new(FieldType::Text, true)),
        ("appealed_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("appeal_reviewer_id", FieldMeta::new(FieldType::Uuid, false)),
        ("appeal_started_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("appeal_decision", FieldMeta::new(FieldType::Text, false)),
        ("appeal_decided_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("created_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("updated_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("created_by", FieldMeta::new(FieldType::Uuid, false)),
        ("updated_by", FieldMeta::new(FieldType::Uuid, false)),
    ],
};
