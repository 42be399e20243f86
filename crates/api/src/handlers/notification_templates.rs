//! Handlers for notification templates.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use curby_core::error::CoreError;
use curby_core::types::DbId;
use curby_db::listing;
use curby_db::models::notification_template::{
    CreateNotificationTemplate, NotificationTemplate, UpdateNotificationTemplate,
    NOTIFICATION_TEMPLATE_META,
};
use curby_db::repositories::notification_template_repo::NotificationTemplateRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{BulkDeleteRequest, ListParams};
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<PagedResponse<NotificationTemplate>>> {
    let params = ListParams::from_pairs(&NOTIFICATION_TEMPLATE_META, &pairs)?;
    let page = listing::get_all_paged::<NotificationTemplate>(
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
    let filters = ListParams::filters_only(&NOTIFICATION_TEMPLATE_META, &pairs)?;
    let total = listing::count::<NotificationTemplate>(&state.pool, &filters).await?;
    Ok(Json(DataResponse { data: total }))
}

pub async fn exists(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<DataResponse<bool>>> {
    let filters = ListParams::filters_only(&NOTIFICATION_TEMPLATE_META, &pairs)?;
    let found = listing::exists::<NotificationTemplate>(&state.pool, &filters).await?;
    Ok(Json(DataResponse { data: found }))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateNotificationTemplate>,
) -> AppResult<(StatusCode, Json<DataResponse<NotificationTemplate>>)> {
    user.require_admin()?;
    if input.version < 1 {
        return Err(AppError::Core(CoreError::Validation(
            "Template version must be at least 1".to_string(),
        )));
    }

    let row = NotificationTemplateRepo::create(&state.pool, &input, Some(user.profile_id)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

pub async fn get_one(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<NotificationTemplate>>> {
    let row = listing::get_by_id::<NotificationTemplate>(&state.pool, id).await?;
    Ok(Json(DataResponse { data: row }))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateNotificationTemplate>,
) -> AppResult<Json<DataResponse<NotificationTemplate>>> {
    user.require_admin()?;
    let row =
        NotificationTemplateRepo::update(&state.pool, id, &input, Some(user.profile_id)).await?;
    Ok(Json(DataResponse { data: row }))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    user.require_admin()?;
    if !listing::delete_by_id::<NotificationTemplate>(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "notification_template",
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
    let deleted = listing::delete_by_ids::<NotificationTemplate>(&state.pool, &req.ids).await?;
    Ok(Json(DataResponse { data: deleted }))
}
