//! Handlers for support requests.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use curby_core::error::CoreError;
use curby_core::types::DbId;
use curby_db::listing;
use curby_db::models::support_request::{
    CreateSupportRequest, SupportRequest, UpdateSupportRequest, SUPPORT_REQUEST_META,
    VALID_SUPPORT_STATUSES,
};
use curby_db::repositories::support_request_repo::SupportRequestRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::watch;
use crate::middleware::auth::AuthUser;
use crate::query::{BulkDeleteRequest, ListParams};
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<PagedResponse<SupportRequest>>> {
    let params = ListParams::from_pairs(&SUPPORT_REQUEST_META, &pairs)?;
    let page = listing::get_all_paged::<SupportRequest>(
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
    let filters = ListParams::filters_only(&SUPPORT_REQUEST_META, &pairs)?;
    let total = listing::count::<SupportRequest>(&state.pool, &filters).await?;
    Ok(Json(DataResponse { data: total }))
}

pub async fn exists(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<DataResponse<bool>>> {
    let filters = ListParams::filters_only(&SUPPORT_REQUEST_META, &pairs)?;
    let found = listing::exists::<SupportRequest>(&state.pool, &filters).await?;
    Ok(Json(DataResponse { data: found }))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateSupportRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SupportRequest>>)> {
    if input.subject.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Subject must not be empty".to_string(),
        )));
    }

    let row = SupportRequestRepo::create(&state.pool, &input, Some(user.profile_id)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

pub async fn get_one(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SupportRequest>>> {
    let row = listing::get_by_id::<SupportRequest>(&state.pool, id).await?;
    Ok(Json(DataResponse { data: row }))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSupportRequest>,
) -> AppResult<Json<DataResponse<SupportRequest>>> {
    if let Some(status) = &input.status {
        if !VALID_SUPPORT_STATUSES.contains(&status.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid status '{status}'. Must be one of: {}",
                VALID_SUPPORT_STATUSES.join(", ")
            ))));
        }
    }

    let row = SupportRequestRepo::update(&state.pool, id, &input, Some(user.profile_id)).await?;
    Ok(Json(DataResponse { data: row }))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    user.require_admin()?;
    if !listing::delete_by_id::<SupportRequest>(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "support_request",
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
    let deleted = listing::delete_by_ids::<SupportRequest>(&state.pool, &req.ids).await?;
    Ok(Json(DataResponse { data: deleted }))
}

/// `GET /support-requests/{id}/watch` - SSE stream of changes to one request.
pub async fn watch_one(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl axum::response::IntoResponse> {
    listing::get_by_id::<SupportRequest>(&state.pool, id).await?;
    Ok(watch::row_event_stream(&state.watcher, "support_requests", id))
}
