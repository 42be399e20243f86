//! Repository for the `schedules` table.

use sqlx::PgPool;

use curby_core::filter::EntityMeta;
use curby_core::types::DbId;

use crate::listing::Table;
use crate::models::broadcast::{CreateSchedule, Schedule, UpdateSchedule, SCHEDULE_META};

/// Column list for `schedules` queries.
const COLUMNS: &str = "id, broadcast_id, cron_expr, timezone, is_active, next_fire_at, \
    last_fired_at, created_at, updated_at, created_by, updated_by";

impl Table for Schedule {
    type Row = Schedule;
    const TABLE: &'static str = "schedules";
    const COLUMNS: &'static str = COLUMNS;

    fn meta() -> &'static EntityMeta {
        &SCHEDULE_META
    }
}

/// Provides CRUD operations for broadcast schedules.
pub struct ScheduleRepo;

impl ScheduleRepo {
    /// Create a schedule under a broadcast.
    pub async fn create(
        pool: &PgPool,
        broadcast_id: DbId,
        input: &CreateSchedule,
        actor: Option<DbId>,
    ) -> Result<Schedule, sqlx::Error> {
        let query = format!(
            "INSERT INTO schedules (broadcast_id, cron_expr, timezone, next_fire_at, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Schedule>(&query)
            .bind(broadcast_id)
            .bind(&input.cron_expr)
            .bind(&input.timezone)
            .bind(input.next_fire_at)
            .bind(actor)
            .fetch_one(pool)
            .await
    }

    /// List all schedules for a broadcast, newest first.
    pub async fn list_for_broadcast(
        pool: &PgPool,
        broadcast_id: DbId,
    ) -> Result<Vec<Schedule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM schedules
             WHERE broadcast_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Schedule>(&query)
            .bind(broadcast_id)
            .fetch_all(pool)
            .await
    }

    /// Partially update a schedule.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSchedule,
        actor: Option<DbId>,
    ) -> Result<Schedule, sqlx::Error> {
        let query = format!(
            "UPDATE schedules SET
                cron_expr = COALESCE($1, cron_expr),
                timezone = COALESCE($2, timezone),
                is_active = COALESCE($3, is_active),
                next_fire_at = COALESCE($4, next_fire_at),
                updated_at = NOW(),
                updated_by = $5
             WHERE id = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Schedule>(&query)
            .bind(&input.cron_expr)
            .bind(&input.timezone)
            .bind(input.is_active)
            .bind(input.next_fire_at)
            .bind(actor)
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
