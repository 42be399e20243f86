//! Repository for the `broadcasts` table.

use sqlx::PgPool;

use curby_core::filter::EntityMeta;
use curby_core::types::DbId;

use crate::listing::Table;
use crate::models::broadcast::{
    Broadcast, CreateBroadcast, UpdateBroadcast, BROADCAST_META, BROADCAST_STATUS_DRAFT,
    BROADCAST_STATUS_SCHEDULED, BROADCAST_STATUS_SENDING, BROADCAST_STATUS_SENT,
};

/// Column list for `broadcasts` queries.
const COLUMNS: &str = "id, title, body, audience, status, scheduled_at, sent_at, tags, \
    created_at, updated_at, created_by, updated_by";

impl Table for Broadcast {
    type Row = Broadcast;
    const TABLE: &'static str = "broadcasts";
    const COLUMNS: &'static str = COLUMNS;

    fn meta() -> &'static EntityMeta {
        &BROADCAST_META
    }
}

/// Provides CRUD and send-fanout operations for broadcasts.
pub struct BroadcastRepo;

impl BroadcastRepo {
    /// Create a broadcast. Status starts as `scheduled` when a firing time is
    /// supplied, `draft` otherwise.
    pub async fn create(
        pool: &PgPool,
        input: &CreateBroadcast,
        actor: Option<DbId>,
    ) -> Result<Broadcast, sqlx::Error> {
        let status = if input.scheduled_at.is_some() {
            BROADCAST_STATUS_SCHEDULED
        } else {
            BROADCAST_STATUS_DRAFT
        };
        let query = format!(
            "INSERT INTO broadcasts (title, body, audience, status, scheduled_at, tags, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Broadcast>(&query)
            .bind(&input.title)
            .bind(&input.body)
            .bind(&input.audience)
            .bind(status)
            .bind(input.scheduled_at)
            .bind(&input.tags)
            .bind(actor)
            .fetch_one(pool)
            .await
    }

    /// Partially update a broadcast.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBroadcast,
        actor: Option<DbId>,
    ) -> Result<Broadcast, sqlx::Error> {
        let query = format!(
            "UPDATE broadcasts SET
                title = COALESCE($1, title),
                body = COALESCE($2, body),
                audience = COALESCE($3, audience),
                scheduled_at = COALESCE($4, scheduled_at),
                tags = COALESCE($5, tags),
                updated_at = NOW(),
                updated_by = $6
             WHERE id = $7
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Broadcast>(&query)
            .bind(&input.title)
            .bind(&input.body)
            .bind(&input.audience)
            .bind(input.scheduled_at)
            .bind(&input.tags)
            .bind(actor)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Move a draft or scheduled broadcast into `sending`. Compare-and-set:
    /// returns `None` when the broadcast is not in a sendable state, so two
    /// concurrent sends cannot both fan out.
    pub async fn mark_sending(
        pool: &PgPool,
        id: DbId,
        actor: Option<DbId>,
    ) -> Result<Option<Broadcast>, sqlx::Error> {
        let query = format!(
            "UPDATE broadcasts SET status = $1, updated_at = NOW(), updated_by = $2
             WHERE id = $3 AND status IN ($4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Broadcast>(&query)
            .bind(BROADCAST_STATUS_SENDING)
            .bind(actor)
            .bind(id)
            .bind(BROADCAST_STATUS_DRAFT)
            .bind(BROADCAST_STATUS_SCHEDULED)
            .fetch_optional(pool)
            .await
    }

    /// Fan out one pending delivery per active profile with a registered
    /// device. Returns the number of deliveries created. Dispatch itself is
    /// a backend concern outside this system.
    pub async fn fan_out_deliveries(
        pool: &PgPool,
        broadcast_id: DbId,
        channel: &str,
        actor: Option<DbId>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO broadcast_deliveries (broadcast_id, profile_id, channel, created_by, updated_by)
             SELECT DISTINCT $1, d.profile_id, $2, $3, $3
             FROM devices d
             INNER JOIN profiles p ON p.id = d.profile_id
             WHERE p.is_active",
        )
        .bind(broadcast_id)
        .bind(channel)
        .bind(actor)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Mark a sending broadcast as sent.
    pub async fn mark_sent(
        pool: &PgPool,
        id: DbId,
        actor: Option<DbId>,
    ) -> Result<Broadcast, sqlx::Error> {
        let query = format!(
            "UPDATE broadcasts SET status = $1, sent_at = NOW(), updated_at = NOW(), updated_by = $2
             WHERE id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Broadcast>(&query)
            .bind(BROADCAST_STATUS_SENT)
            .bind(actor)
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
