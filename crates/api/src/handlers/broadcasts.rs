//! Handlers for broadcasts, their schedules, and their deliveries.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use curby_core::error::CoreError;
use curby_core::types::DbId;
use curby_db::listing;
use curby_db::models::broadcast::{
    Broadcast, BroadcastDelivery, CreateBroadcast, CreateSchedule, Schedule, UpdateBroadcast,
    UpdateSchedule, BROADCAST_META, BROADCAST_STATUS_DRAFT, BROADCAST_STATUS_SCHEDULED,
    DELIVERY_STATUS_DELIVERED, DELIVERY_STATUS_FAILED, VALID_AUDIENCES, VALID_CHANNELS,
};
use curby_db::repositories::broadcast_repo::BroadcastRepo;
use curby_db::repositories::delivery_repo::DeliveryRepo;
use curby_db::repositories::schedule_repo::ScheduleRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::watch;
use crate::middleware::auth::AuthUser;
use crate::query::{BulkDeleteRequest, ListParams};
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/* --------------------------------------------------------------------------
Broadcast CRUD
-------------------------------------------------------------------------- */

pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<PagedResponse<Broadcast>>> {
    let params = ListParams::from_pairs(&BROADCAST_META, &pairs)?;
    let page = listing::get_all_paged::<Broadcast>(
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
    _user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<DataResponse<i64>>> {
    let filters = ListParams::filters_only(&BROADCAST_META, &pairs)?;
    let total = listing::count::<Broadcast>(&state.pool, &filters).await?;
    Ok(Json(DataResponse { data: total }))
}

pub async fn exists(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<DataResponse<bool>>> {
    let filters = ListParams::filters_only(&BROADCAST_META, &pairs)?;
    let found = listing::exists::<Broadcast>(&state.pool, &filters).await?;
    Ok(Json(DataResponse { data: found }))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateBroadcast>,
) -> AppResult<(StatusCode, Json<DataResponse<Broadcast>>)> {
    user.require_admin()?;
    validate_audience(&input.audience)?;

    let row = BroadcastRepo::create(&state.pool, &input, Some(user.profile_id)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

pub async fn get_one(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Broadcast>>> {
    let row = listing::get_by_id::<Broadcast>(&state.pool, id).await?;
    Ok(Json(DataResponse { data: row }))
}

/// `PATCH /broadcasts/{id}`. Only drafts and scheduled broadcasts are
/// editable; anything in or past `sending` is immutable history.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBroadcast>,
) -> AppResult<Json<DataResponse<Broadcast>>> {
    user.require_admin()?;
    if let Some(audience) = &input.audience {
        validate_audience(audience)?;
    }

    let current = listing::get_by_id::<Broadcast>(&state.pool, id).await?;
    ensure_editable(&current)?;

    let row = BroadcastRepo::update(&state.pool, id, &input, Some(user.profile_id)).await?;
    Ok(Json(DataResponse { data: row }))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    user.require_admin()?;
    if !listing::delete_by_id::<Broadcast>(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "broadcast",
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
    let deleted = listing::delete_by_ids::<Broadcast>(&state.pool, &req.ids).await?;
    Ok(Json(DataResponse { data: deleted }))
}

/* --------------------------------------------------------------------------
Send
-------------------------------------------------------------------------- */

#[derive(Debug, Default, Deserialize)]
pub struct SendRequest {
    /// Delivery channel, defaults to `push`.
    pub channel: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendOutcome {
    pub broadcast: Broadcast,
    pub deliveries_created: u64,
}

/// `POST /broadcasts/{id}/send` - fan a broadcast out to its audience.
///
/// The move into `sending` is compare-and-set, so a concurrent send on the
/// same broadcast gets a 409 instead of duplicating deliveries.
pub async fn send(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(req): Json<SendRequest>,
) -> AppResult<Json<DataResponse<SendOutcome>>> {
    user.require_admin()?;

    let channel = req.channel.as_deref().unwrap_or("push");
    if !VALID_CHANNELS.contains(&channel) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid channel '{channel}'. Must be one of: {}",
            VALID_CHANNELS.join(", ")
        ))));
    }

    // Existence check first so an unknown id is a 404, not a 409.
    listing::get_by_id::<Broadcast>(&state.pool, id).await?;

    let actor = Some(user.profile_id);
    BroadcastRepo::mark_sending(&state.pool, id, actor)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Broadcast is not in a sendable state".to_string(),
            ))
        })?;

    let deliveries_created = BroadcastRepo::fan_out_deliveries(&state.pool, id, channel, actor)
        .await?;
    let broadcast = BroadcastRepo::mark_sent(&state.pool, id, actor).await?;

    tracing::info!(broadcast_id = %id, deliveries_created, channel, "Broadcast sent");

    Ok(Json(DataResponse {
        data: SendOutcome {
            broadcast,
            deliveries_created,
        },
    }))
}

/// `GET /broadcasts/{id}/watch` - SSE stream of changes to one broadcast.
pub async fn watch_one(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl axum::response::IntoResponse> {
    listing::get_by_id::<Broadcast>(&state.pool, id).await?;
    Ok(watch::row_event_stream(&state.watcher, "broadcasts", id))
}

/* --------------------------------------------------------------------------
Nested schedules
-------------------------------------------------------------------------- */

pub async fn list_schedules(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Schedule>>>> {
    listing::get_by_id::<Broadcast>(&state.pool, id).await?;
    let rows = ScheduleRepo::list_for_broadcast(&state.pool, id).await?;
    Ok(Json(DataResponse { data: rows }))
}

pub async fn create_schedule(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateSchedule>,
) -> AppResult<(StatusCode, Json<DataResponse<Schedule>>)> {
    user.require_admin()?;
    if input.cron_expr.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Cron expression must not be empty".to_string(),
        )));
    }

    listing::get_by_id::<Broadcast>(&state.pool, id).await?;
    let row = ScheduleRepo::create(&state.pool, id, &input, Some(user.profile_id)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

pub async fn update_schedule(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, schedule_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateSchedule>,
) -> AppResult<Json<DataResponse<Schedule>>> {
    user.require_admin()?;

    // The schedule must belong to the broadcast in the path.
    let current = listing::get_by_id::<Schedule>(&state.pool, schedule_id).await?;
    if current.broadcast_id != id {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "schedule",
            id: schedule_id,
        }));
    }

    let row = ScheduleRepo::update(&state.pool, schedule_id, &input, Some(user.profile_id)).await?;
    Ok(Json(DataResponse { data: row }))
}

/* --------------------------------------------------------------------------
Nested deliveries
-------------------------------------------------------------------------- */

pub async fn list_deliveries(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<BroadcastDelivery>>>> {
    listing::get_by_id::<Broadcast>(&state.pool, id).await?;
    let rows = DeliveryRepo::list_for_broadcast(&state.pool, id).await?;
    Ok(Json(DataResponse { data: rows }))
}

#[derive(Debug, Deserialize)]
pub struct DeliveryOutcomeRequest {
    pub status: String,
    pub error: Option<String>,
}

/// `PATCH /broadcasts/{id}/deliveries/{delivery_id}` - record an outcome
/// reported by the dispatch side.
pub async fn record_delivery_outcome(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, delivery_id)): Path<(DbId, DbId)>,
    Json(req): Json<DeliveryOutcomeRequest>,
) -> AppResult<Json<DataResponse<BroadcastDelivery>>> {
    user.require_admin()?;
    if req.status != DELIVERY_STATUS_DELIVERED && req.status != DELIVERY_STATUS_FAILED {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid delivery outcome '{}'. Must be '{DELIVERY_STATUS_DELIVERED}' or '{DELIVERY_STATUS_FAILED}'",
            req.status
        ))));
    }

    let current = listing::get_by_id::<BroadcastDelivery>(&state.pool, delivery_id).await?;
    if current.broadcast_id != id {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "broadcast_delivery",
            id: delivery_id,
        }));
    }

    let row = DeliveryRepo::record_outcome(
        &state.pool,
        delivery_id,
        &req.status,
        req.error.as_deref(),
        Some(user.profile_id),
    )
    .await?;
    Ok(Json(DataResponse { data: row }))
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

fn validate_audience(audience: &str) -> Result<(), AppError> {
    if !VALID_AUDIENCES.contains(&audience) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid audience '{audience}'. Must be one of: {}",
            VALID_AUDIENCES.join(", ")
        ))));
    }
    Ok(())
}

fn ensure_editable(broadcast: &Broadcast) -> Result<(), AppError> {
    if broadcast.status != BROADCAST_STATUS_DRAFT && broadcast.status != BROADCAST_STATUS_SCHEDULED
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Broadcast in status '{}' cannot be edited",
            broadcast.status
        ))));
    }
    Ok(())
}
