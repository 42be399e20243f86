//! Handlers for the item review moderation workflow.
//!
//! Every workflow mutation is validated twice: [`ensure_transition`] checks
//! the step against the freshly loaded row, then the repository applies it
//! compare-and-set on the old status. A race between two moderators thus
//! surfaces as a 409 instead of silently clobbering state.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use curby_core::error::CoreError;
use curby_core::filter::Filter;
use curby_core::review::{
    ensure_transition, validate_appeal_decision, validate_decision, validate_notes,
    STATUS_APPEAL_COMPLETED, STATUS_APPEAL_IN_REVIEW, STATUS_APPEAL_PENDING, STATUS_IN_REVIEW,
    STATUS_REVIEW_COMPLETED,
};
use curby_core::types::DbId;
use curby_db::listing;
use curby_db::models::review::{
    AppealRequest, CreateItemReview, DecisionRequest, ItemReview, ITEM_REVIEW_META,
};
use curby_db::repositories::item_review_repo::ItemReviewRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::watch;
use crate::middleware::auth::AuthUser;
use crate::query::{BulkDeleteRequest, ListParams};
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/* --------------------------------------------------------------------------
Listing
-------------------------------------------------------------------------- */

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<PagedResponse<ItemReview>>> {
    user.require_moderator()?;
    let params = ListParams::from_pairs(&ITEM_REVIEW_META, &pairs)?;
    let page = listing::get_all_paged::<ItemReview>(
        &state.pool,
        &params.filters,
        &params.order,
        &params.pagination,
        params.search.as_ref(),
    )
    .await?;
    Ok(Json(page.into()))
}

/// `GET /moderation/item-reviews/queue` - the work queue. Defaults to
/// `status = pending` unless the caller filters on status explicitly.
pub async fn queue(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<PagedResponse<ItemReview>>> {
    user.require_moderator()?;
    let mut params = ListParams::from_pairs(&ITEM_REVIEW_META, &pairs)?;
    if !params.filters.iter().any(|f| f.column == "status") {
        params
            .filters
            .push(Filter::parse(&ITEM_REVIEW_META, "status.eq.pending")?);
    }
    let page = listing::get_all_paged::<ItemReview>(
        &state.pool,
        &params.filters,
        &params.order,
        &params.pagination,
        params.search.as_ref(),
    )
    .await?;
    Ok(Json(page.into()))
}

/// `GET /moderation/item-reviews/my-queue` - reviews claimed by the caller.
pub async fn my_queue(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<PagedResponse<ItemReview>>> {
    user.require_moderator()?;
    let mut params = ListParams::from_pairs(&ITEM_REVIEW_META, &pairs)?;
    params.filters.push(Filter::parse(
        &ITEM_REVIEW_META,
        &format!("reviewer_id.eq.{}", user.profile_id),
    )?);
    let page = listing::get_all_paged::<ItemReview>(
        &state.pool,
        &params.filters,
        &params.order,
        &params.pagination,
        params.search.as_ref(),
    )
    .await?;
    Ok(Json(page.into()))
}

pub async fn count(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<DataResponse<i64>>> {
    user.require_moderator()?;
    let filters = ListParams::filters_only(&ITEM_REVIEW_META, &pairs)?;
    let total = listing::count::<ItemReview>(&state.pool, &filters).await?;
    Ok(Json(DataResponse { data: total }))
}

pub async fn exists(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<DataResponse<bool>>> {
    user.require_moderator()?;
    let filters = ListParams::filters_only(&ITEM_REVIEW_META, &pairs)?;
    let found = listing::exists::<ItemReview>(&state.pool, &filters).await?;
    Ok(Json(DataResponse { data: found }))
}

/* --------------------------------------------------------------------------
CRUD
-------------------------------------------------------------------------- */

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateItemReview>,
) -> AppResult<(StatusCode, Json<DataResponse<ItemReview>>)> {
    if input.reason.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Report reason must not be empty".to_string(),
        )));
    }
    validate_notes(&Some(input.reason.clone()))?;

    let row = ItemReviewRepo::create(&state.pool, &input, Some(user.profile_id)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

pub async fn get_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ItemReview>>> {
    user.require_moderator()?;
    let row = listing::get_by_id::<ItemReview>(&state.pool, id).await?;
    Ok(Json(DataResponse { data: row }))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    user.require_admin()?;
    if !listing::delete_by_id::<ItemReview>(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "item_review",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<BulkDeleteRequest>,
) -> AppResult<Json<DataResponse<u64>>> {
    user.require_admin()?;
    let deleted = listing::delete_by_ids::<ItemReview>(&state.pool, &req.ids).await?;
    Ok(Json(DataResponse { data: deleted }))
}

/* --------------------------------------------------------------------------
Workflow
-------------------------------------------------------------------------- */

/// `POST /moderation/item-reviews/{id}/start-review` - claim a pending review.
pub async fn start_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ItemReview>>> {
    user.require_moderator()?;
    let current = listing::get_by_id::<ItemReview>(&state.pool, id).await?;
    ensure_transition(&current.status, STATUS_IN_REVIEW)?;

    let row = ItemReviewRepo::start_review(&state.pool, id, user.profile_id)
        .await?
        .ok_or_else(conflict_lost_race)?;
    Ok(Json(DataResponse { data: row }))
}

/// `POST /moderation/item-reviews/{id}/decision` - record the decision.
pub async fn decision(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(req): Json<DecisionRequest>,
) -> AppResult<Json<DataResponse<ItemReview>>> {
    user.require_moderator()?;
    validate_decision(&req.decision)?;
    validate_notes(&req.notes)?;

    let current = listing::get_by_id::<ItemReview>(&state.pool, id).await?;
    ensure_transition(&current.status, STATUS_REVIEW_COMPLETED)?;

    let row = ItemReviewRepo::record_decision(
        &state.pool,
        id,
        user.profile_id,
        &req.decision,
        req.notes.as_deref(),
    )
    .await?
    .ok_or_else(conflict_lost_race)?;
    Ok(Json(DataResponse { data: row }))
}

/// `POST /moderation/item-reviews/{id}/appeal` - appeal a completed review.
pub async fn appeal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(req): Json<AppealRequest>,
) -> AppResult<Json<DataResponse<ItemReview>>> {
    if req.reason.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Appeal reason must not be empty".to_string(),
        )));
    }
    validate_notes(&Some(req.reason.clone()))?;

    let current = listing::get_by_id::<ItemReview>(&state.pool, id).await?;
    ensure_transition(&current.status, STATUS_APPEAL_PENDING)?;

    let row = ItemReviewRepo::file_appeal(&state.pool, id, &req.reason, Some(user.profile_id))
        .await?
        .ok_or_else(conflict_lost_race)?;
    Ok(Json(DataResponse { data: row }))
}

/// `POST /moderation/item-reviews/{id}/start-appeal-review` - claim an appeal.
pub async fn start_appeal_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ItemReview>>> {
    user.require_moderator()?;
    let current = listing::get_by_id::<ItemReview>(&state.pool, id).await?;
    ensure_transition(&current.status, STATUS_APPEAL_IN_REVIEW)?;

    let row = ItemReviewRepo::start_appeal_review(&state.pool, id, user.profile_id)
        .await?
        .ok_or_else(conflict_lost_race)?;
    Ok(Json(DataResponse { data: row }))
}

/// `POST /moderation/item-reviews/{id}/appeal-decision` - close the appeal.
pub async fn appeal_decision(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(req): Json<DecisionRequest>,
) -> AppResult<Json<DataResponse<ItemReview>>> {
    user.require_moderator()?;
    validate_appeal_decision(&req.decision)?;
    validate_notes(&req.notes)?;

    let current = listing::get_by_id::<ItemReview>(&state.pool, id).await?;
    ensure_transition(&current.status, STATUS_APPEAL_COMPLETED)?;

    let row = ItemReviewRepo::record_appeal_decision(
        &state.pool,
        id,
        user.profile_id,
        &req.decision,
        req.notes.as_deref(),
    )
    .await?
    .ok_or_else(conflict_lost_race)?;
    Ok(Json(DataResponse { data: row }))
}

/// `GET /moderation/item-reviews/{id}/watch` - SSE stream for one review.
pub async fn watch_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl axum::response::IntoResponse> {
    user.require_moderator()?;
    listing::get_by_id::<ItemReview>(&state.pool, id).await?;
    Ok(watch::row_event_stream(&state.watcher, "item_reviews", id))
}

fn conflict_lost_race() -> AppError {
    AppError::Core(CoreError::Conflict(
        "Review was modified by another moderator".to_string(),
    ))
}
