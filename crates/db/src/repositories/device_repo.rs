//! Repository for the `devices` table.

use sqlx::PgPool;

use curby_core::filter::EntityMeta;
use curby_core::types::DbId;

use crate::listing::Table;
use crate::models::device::{CreateDevice, Device, UpdateDevice, DEVICE_META};

/// Column list for `devices` queries.
const COLUMNS: &str = "id, profile_id, platform, push_token, app_version, last_seen_at, \
    created_at, updated_at, created_by, updated_by";

impl Table for Device {
    type Row = Device;
    const TABLE: &'static str = "devices";
    const COLUMNS: &'static str = COLUMNS;

    fn meta() -> &'static EntityMeta {
        &DEVICE_META
    }
}

/// Provides CRUD operations for push-registered devices.
pub struct DeviceRepo;

impl DeviceRepo {
    /// Register a device. The push token must be unique
    /// (`uq_devices_push_token`).
    pub async fn create(
        pool: &PgPool,
        input: &CreateDevice,
        actor: Option<DbId>,
    ) -> Result<Device, sqlx::Error> {
        let query = format!(
            "INSERT INTO devices (profile_id, platform, push_token, app_version, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(input.profile_id)
            .bind(&input.platform)
            .bind(&input.push_token)
            .bind(&input.app_version)
            .bind(actor)
            .fetch_one(pool)
            .await
    }

    /// Partially update a device.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDevice,
        actor: Option<DbId>,
    ) -> Result<Device, sqlx::Error> {
        let query = format!(
            "UPDATE devices SET
                app_version = COALESCE($1, app_version),
                last_seen_at = COALESCE($2, last_seen_at),
                updated_at = NOW(),
                updated_by = $3
             WHERE id = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(&input.app_version)
            .bind(input.last_seen_at)
            .bind(actor)
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
