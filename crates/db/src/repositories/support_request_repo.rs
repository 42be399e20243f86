//! Repository for the `support_requests` table.

use sqlx::PgPool;

use curby_core::filter::EntityMeta;
use curby_core::types::DbId;

use crate::listing::Table;
use crate::models::support_request::{
    CreateSupportRequest, SupportRequest, UpdateSupportRequest, SUPPORT_REQUEST_META,
    SUPPORT_STATUS_CLOSED, SUPPORT_STATUS_RESOLVED,
};

/// Column list for `support_requests` queries.
const COLUMNS: &str = "id, profile_id, subject, body, status, assignee_id, resolved_at, \
    created_at, updated_at, created_by, updated_by";

impl Table for SupportRequest {
    type Row = SupportRequest;
    const TABLE: &'static str = "support_requests";
    const COLUMNS: &'static str = COLUMNS;

    fn meta() -> &'static EntityMeta {
        &SUPPORT_REQUEST_META
    }
}

/// Provides CRUD operations for support requests.
pub struct SupportRequestRepo;

impl SupportRequestRepo {
    /// File a support request. Starts in `open`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSupportRequest,
        actor: Option<DbId>,
    ) -> Result<SupportRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO support_requests (profile_id, subject, body, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SupportRequest>(&query)
            .bind(input.profile_id)
            .bind(&input.subject)
            .bind(&input.body)
            .bind(actor)
            .fetch_one(pool)
            .await
    }

    /// Partially update a support request. Moving into `resolved` or
    /// `closed` stamps `resolved_at`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSupportRequest,
        actor: Option<DbId>,
    ) -> Result<SupportRequest, sqlx::Error> {
        let query = format!(
            "UPDATE support_requests SET
                subject = COALESCE($1, subject),
                status = COALESCE($2, status),
                assignee_id = COALESCE($3, assignee_id),
                resolved_at = CASE
                    WHEN $2 IN ($4, $5) AND resolved_at IS NULL THEN NOW()
                    ELSE resolved_at
                END,
                updated_at = NOW(),
                updated_by = $6
             WHERE id = $7
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SupportRequest>(&query)
            .bind(&input.subject)
            .bind(&input.status)
            .bind(input.assignee_id)
            .bind(SUPPORT_STATUS_RESOLVED)
            .bind(SUPPORT_STATUS_CLOSED)
            .bind(actor)
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
