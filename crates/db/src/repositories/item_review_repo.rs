//! Repository for the `item_reviews` table.
//!
//! Workflow mutations are compare-and-set on the old status: the handler
//! validates the transition via `curby_core::review::ensure_transition`, and
//! the UPDATE carries `AND status = <from>` so a concurrent transition makes
//! the statement affect zero rows (surfaced as `None`).

use sqlx::PgPool;

use curby_core::filter::EntityMeta;
use curby_core::review::{
    STATUS_APPEAL_COMPLETED, STATUS_APPEAL_IN_REVIEW, STATUS_APPEAL_PENDING, STATUS_IN_REVIEW,
    STATUS_PENDING, STATUS_REVIEW_COMPLETED,
};
use curby_core::types::DbId;

use crate::listing::Table;
use crate::models::review::{CreateItemReview, ItemReview, ITEM_REVIEW_META};

/// Column list for `item_reviews` queries.
const COLUMNS: &str = "id, item_id, reporter_id, reason, status, reviewer_id, \
    review_started_at, decision, decision_notes, decided_at, appeal_reason, appealed_at, \
    appeal_reviewer_id, appeal_started_at, appeal_decision, appeal_decided_at, \
    created_at, updated_at, created_by, updated_by";

impl Table for ItemReview {
    type Row = ItemReview;
    const TABLE: &'static str = "item_reviews";
    const COLUMNS: &'static str = COLUMNS;

    fn meta() -> &'static EntityMeta {
        &ITEM_REVIEW_META
    }
}

/// Provides CRUD and workflow-transition operations for item reviews.
pub struct ItemReviewRepo;

impl ItemReviewRepo {
    /// File a report. The review starts in `pending`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateItemReview,
        actor: Option<DbId>,
    ) -> Result<ItemReview, sqlx::Error> {
        let query = format!(
            "INSERT INTO item_reviews (item_id, reporter_id, reason, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ItemReview>(&query)
            .bind(input.item_id)
            .bind(input.reporter_id)
            .bind(&input.reason)
            .bind(actor)
            .fetch_one(pool)
            .await
    }

    /// `pending -> in_review`, claiming the review for `reviewer_id`.
    pub async fn start_review(
        pool: &PgPool,
        id: DbId,
        reviewer_id: DbId,
    ) -> Result<Option<ItemReview>, sqlx::Error> {
        let query = format!(
            "UPDATE item_reviews SET
                status = $1, reviewer_id = $2, review_started_at = NOW(),
                updated_at = NOW(), updated_by = $2
             WHERE id = $3 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ItemReview>(&query)
            .bind(STATUS_IN_REVIEW)
            .bind(reviewer_id)
            .bind(id)
            .bind(STATUS_PENDING)
            .fetch_optional(pool)
            .await
    }

    /// `in_review -> review_completed`, recording the decision.
    pub async fn record_decision(
        pool: &PgPool,
        id: DbId,
        reviewer_id: DbId,
        decision: &str,
        notes: Option<&str>,
    ) -> Result<Option<ItemReview>, sqlx::Error> {
        let query = format!(
            "UPDATE item_reviews SET
                status = $1, decision = $2, decision_notes = $3, decided_at = NOW(),
                updated_at = NOW(), updated_by = $4
             WHERE id = $5 AND status = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ItemReview>(&query)
            .bind(STATUS_REVIEW_COMPLETED)
            .bind(decision)
            .bind(notes)
            .bind(reviewer_id)
            .bind(id)
            .bind(STATUS_IN_REVIEW)
            .fetch_optional(pool)
            .await
    }

    /// `review_completed -> appeal_pending`, filing the appeal.
    pub async fn file_appeal(
        pool: &PgPool,
        id: DbId,
        reason: &str,
        actor: Option<DbId>,
    ) -> Result<Option<ItemReview>, sqlx::Error> {
        let query = format!(
            "UPDATE item_reviews SET
                status = $1, appeal_reason = $2, appealed_at = NOW(),
                updated_at = NOW(), updated_by = $3
             WHERE id = $4 AND status = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ItemReview>(&query)
            .bind(STATUS_APPEAL_PENDING)
            .bind(reason)
            .bind(actor)
            .bind(id)
            .bind(STATUS_REVIEW_COMPLETED)
            .fetch_optional(pool)
            .await
    }

    /// `appeal_pending -> appeal_in_review`, claiming the appeal.
    pub async fn start_appeal_review(
        pool: &PgPool,
        id: DbId,
        reviewer_id: DbId,
    ) -> Result<Option<ItemReview>, sqlx::Error> {
        let query = format!(
            "UPDATE item_reviews SET
                status = $1, appeal_reviewer_id = $2, appeal_started_at = NOW(),
                updated_at = NOW(), updated_by = $2
             WHERE id = $3 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ItemReview>(&query)
            .bind(STATUS_APPEAL_IN_REVIEW)
            .bind(reviewer_id)
            .bind(id)
            .bind(STATUS_APPEAL_PENDING)
            .fetch_optional(pool)
            .await
    }

    /// `appeal_in_review -> appeal_completed`, recording the appeal decision.
    pub async fn record_appeal_decision(
        pool: &PgPool,
        id: DbId,
        reviewer_id: DbId,
        decision: &str,
        notes: Option<&str>,
    ) -> Result<Option<ItemReview>, sqlx::Error> {
        let query = format!(
            "UPDATE item_reviews SET
                status = $1, appeal_decision = $2,
                decision_notes = COALESCE($3, decision_notes),
                appeal_decided_at = NOW(), updated_at = NOW(), updated_by = $4
             WHERE id = $5 AND status = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ItemReview>(&query)
            .bind(STATUS_APPEAL_COMPLETED)
            .bind(decision)
            .bind(notes)
            .bind(reviewer_id)
            .bind(id)
            .bind(STATUS_APPEAL_IN_REVIEW)
            .fetch_optional(pool)
            .await
    }
}
