//! Repository for the `event_types` table.

use sqlx::PgPool;

use curby_core::filter::EntityMeta;
use curby_core::types::DbId;

use crate::listing::Table;
use crate::models::event_type::{CreateEventType, EventType, UpdateEventType, EVENT_TYPE_META};

/// Column list for `event_types` queries.
const COLUMNS: &str = "id, key, name, description, default_channel, is_active, \
    created_at, updated_at, created_by, updated_by";

impl Table for EventType {
    type Row = EventType;
    const TABLE: &'static str = "event_types";
    const COLUMNS: &'static str = COLUMNS;

    fn meta() -> &'static EntityMeta {
        &EVENT_TYPE_META
    }
}

/// Provides CRUD operations for event types.
pub struct EventTypeRepo;

impl EventTypeRepo {
    /// Create an event type. The key must be unique (`uq_event_types_key`).
    pub async fn create(
        pool: &PgPool,
        input: &CreateEventType,
        actor: Option<DbId>,
    ) -> Result<EventType, sqlx::Error> {
        let query = format!(
            "INSERT INTO event_types (key, name, description, default_channel, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventType>(&query)
            .bind(&input.key)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.default_channel)
            .bind(actor)
            .fetch_one(pool)
            .await
    }

    /// Partially update an event type. The key is immutable.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEventType,
        actor: Option<DbId>,
    ) -> Result<EventType, sqlx::Error> {
        let query = format!(
            "UPDATE event_types SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                default_channel = COALESCE($3, default_channel),
                is_active = COALESCE($4, is_active),
                updated_at = NOW(),
                updated_by = $5
             WHERE id = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventType>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.default_channel)
            .bind(input.is_active)
            .bind(actor)
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
