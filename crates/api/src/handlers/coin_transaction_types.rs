//! Handlers for Curby coin transaction types.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use curby_core::error::CoreError;
use curby_core::types::DbId;
use curby_db::listing;
use curby_db::models::coin_transaction_type::{
    CoinTransactionType, CreateCoinTransactionType, UpdateCoinTransactionType,
    COIN_TRANSACTION_TYPE_META,
};
use curby_db::repositories::coin_transaction_type_repo::CoinTransactionTypeRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{BulkDeleteRequest, ListParams};
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<PagedResponse<CoinTransactionType>>> {
    let params = ListParams::from_pairs(&COIN_TRANSACTION_TYPE_META, &pairs)?;
    let page = listing::get_all_paged::<CoinTransactionType>(
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
    let filters = ListParams::filters_only(&COIN_TRANSACTION_TYPE_META, &pairs)?;
    let total = listing::count::<CoinTransactionType>(&state.pool, &filters).await?;
    Ok(Json(DataResponse { data: total }))
}

pub async fn exists(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<DataResponse<bool>>> {
    let filters = ListParams::filters_only(&COIN_TRANSACTION_TYPE_META, &pairs)?;
    let found = listing::exists::<CoinTransactionType>(&state.pool, &filters).await?;
    Ok(Json(DataResponse { data: found }))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateCoinTransactionType>,
) -> AppResult<(StatusCode, Json<DataResponse<CoinTransactionType>>)> {
    user.require_admin()?;
    let row = CoinTransactionTypeRepo::create(&state.pool, &input, Some(user.profile_id)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

pub async fn get_one(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CoinTransactionType>>> {
    let row = listing::get_by_id::<CoinTransactionType>(&state.pool, id).await?;
    Ok(Json(DataResponse { data: row }))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCoinTransactionType>,
) -> AppResult<Json<DataResponse<CoinTransactionType>>> {
    user.require_admin()?;
    let row =
        CoinTransactionTypeRepo::update(&state.pool, id, &input, Some(user.profile_id)).await?;
    Ok(Json(DataResponse { data: row }))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    user.require_admin()?;
    if !listing::delete_by_id::<CoinTransactionType>(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "coin_transaction_type",
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
    let deleted = listing::delete_by_ids::<CoinTransactionType>(&state.pool, &req.ids).await?;
    Ok(Json(DataResponse { data: deleted }))
}
