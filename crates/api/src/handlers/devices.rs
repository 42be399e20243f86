//! Handlers for device (push registration) records.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use curby_core::error::CoreError;
use curby_core::types::DbId;
use curby_db::listing;
use curby_db::models::device::{CreateDevice, Device, UpdateDevice, DEVICE_META, VALID_PLATFORMS};
use curby_db::repositories::device_repo::DeviceRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{BulkDeleteRequest, ListParams};
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<PagedResponse<Device>>> {
    let params = ListParams::from_pairs(&DEVICE_META, &pairs)?;
    let page = listing::get_all_paged::<Device>(
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
    let filters = ListParams::filters_only(&DEVICE_META, &pairs)?;
    let total = listing::count::<Device>(&state.pool, &filters).await?;
    Ok(Json(DataResponse { data: total }))
}

pub async fn exists(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<DataResponse<bool>>> {
    let filters = ListParams::filters_only(&DEVICE_META, &pairs)?;
    let found = listing::exists::<Device>(&state.pool, &filters).await?;
    Ok(Json(DataResponse { data: found }))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateDevice>,
) -> AppResult<(StatusCode, Json<DataResponse<Device>>)> {
    if !VALID_PLATFORMS.contains(&input.platform.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid platform '{}'. Must be one of: {}",
            input.platform,
            VALID_PLATFORMS.join(", ")
        ))));
    }

    let row = DeviceRepo::create(&state.pool, &input, Some(user.profile_id)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

pub async fn get_one(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Device>>> {
    let row = listing::get_by_id::<Device>(&state.pool, id).await?;
    Ok(Json(DataResponse { data: row }))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDevice>,
) -> AppResult<Json<DataResponse<Device>>> {
    let row = DeviceRepo::update(&state.pool, id, &input, Some(user.profile_id)).await?;
    Ok(Json(DataResponse { data: row }))
}

pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !listing::delete_by_id::<Device>(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "device",
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
    let deleted = listing::delete_by_ids::<Device>(&state.pool, &req.ids).await?;
    Ok(Json(DataResponse { data: deleted }))
}
