//! Repository for the `broadcast_deliveries` table.
//!
//! Deliveries are created by the broadcast send fanout
//! (`BroadcastRepo::fan_out_deliveries`); this repository only reads and
//! fixes up their status.

use sqlx::PgPool;

use curby_core::filter::EntityMeta;
use curby_core::types::DbId;

use crate::listing::Table;
use crate::models::broadcast::{BroadcastDelivery, DELIVERY_META};

/// Column list for `broadcast_deliveries` queries.
const COLUMNS: &str = "id, broadcast_id, profile_id, channel, status, delivered_at, error, \
    created_at, updated_at, created_by, updated_by";

impl Table for BroadcastDelivery {
    type Row = BroadcastDelivery;
    const TABLE: &'static str = "broadcast_deliveries";
    const COLUMNS: &'static str = COLUMNS;

    fn meta() -> &'static EntityMeta {
        &DELIVERY_META
    }
}

pub struct DeliveryRepo;

impl DeliveryRepo {
    /// List all deliveries for a broadcast, newest first.
    pub async fn list_for_broadcast(
        pool: &PgPool,
        broadcast_id: DbId,
    ) -> Result<Vec<BroadcastDelivery>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM broadcast_deliveries
             WHERE broadcast_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, BroadcastDelivery>(&query)
            .bind(broadcast_id)
            .fetch_all(pool)
            .await
    }

    /// Record a delivery outcome reported by the dispatch side.
    pub async fn record_outcome(
        pool: &PgPool,
        id: DbId,
        status: &str,
        error: Option<&str>,
        actor: Option<DbId>,
    ) -> Result<BroadcastDelivery, sqlx::Error> {
        let query = format!(
            "UPDATE broadcast_deliveries SET
                status = $1,
                delivered_at = CASE WHEN $1 = 'delivered' THEN NOW() ELSE delivered_at END,
                error = $2,
                updated_at = NOW(),
                updated_by = $3
             WHERE id = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BroadcastDelivery>(&query)
            .bind(status)
            .bind(error)
            .bind(actor)
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
