//! Handlers for the event type catalog.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use curby_core::error::CoreError;
use curby_core::types::DbId;
use curby_db::listing;
use curby_db::models::broadcast::VALID_CHANNELS;
use curby_db::models::event_type::{
    CreateEventType, EventType, UpdateEventType, EVENT_TYPE_META,
};
use curby_db::repositories::event_type_repo::EventTypeRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{BulkDeleteRequest, ListParams};
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<PagedResponse<EventType>>> {
    let params = ListParams::from_pairs(&EVENT_TYPE_META, &pairs)?;
    let page = listing::get_all_paged::<EventType>(
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
    let filters = ListParams::filters_only(&EVENT_TYPE_META, &pairs)?;
    let total = listing::count::<EventType>(&state.pool, &filters).await?;
    Ok(Json(DataResponse { data: total }))
}

pub async fn exists(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<DataResponse<bool>>> {
    let filters = ListParams::filters_only(&EVENT_TYPE_META, &pairs)?;
    let found = listing::exists::<EventType>(&state.pool, &filters).await?;
    Ok(Json(DataResponse { data: found }))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateEventType>,
) -> AppResult<(StatusCode, Json<DataResponse<EventType>>)> {
    user.require_admin()?;
    validate_channel(&input.default_channel)?;

    let row = EventTypeRepo::create(&state.pool, &input, Some(user.profile_id)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

pub async fn get_one(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EventType>>> {
    let row = listing::get_by_id::<EventType>(&state.pool, id).await?;
    Ok(Json(DataResponse { data: row }))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEventType>,
) -> AppResult<Json<DataResponse<EventType>>> {
    user.require_admin()?;
    if let Some(channel) = &input.default_channel {
        validate_channel(channel)?;
    }

    let row = EventTypeRepo::update(&state.pool, id, &input, Some(user.profile_id)).await?;
    Ok(Json(DataResponse { data: row }))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    user.require_admin()?;
    if !listing::delete_by_id::<EventType>(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "event_type",
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
    let deleted = listing::delete_by_ids::<EventType>(&state.pool, &req.ids).await?;
    Ok(Json(DataResponse { data: deleted }))
}

fn validate_channel(channel: &str) -> Result<(), AppError> {
    if !VALID_CHANNELS.contains(&channel) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid channel '{channel}'. Must be one of: {}",
            VALID_CHANNELS.join(", ")
        ))));
    }
    Ok(())
}
