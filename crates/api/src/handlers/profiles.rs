//! Handlers for profile administration. All operations require the admin
//! role; members manage their own account through `/auth`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use curby_core::error::CoreError;
use curby_core::types::DbId;
use curby_db::listing;
use curby_db::models::profile::{
    CreateProfile, Profile, UpdateProfile, PROFILE_META, VALID_ROLES,
};
use curby_db::repositories::profile_repo::ProfileRepo;
use curby_db::repositories::session_repo::SessionRepo;

use crate::auth::password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{BulkDeleteRequest, ListParams};
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<PagedResponse<Profile>>> {
    user.require_admin()?;
    let params = ListParams::from_pairs(&PROFILE_META, &pairs)?;
    let page = listing::get_all_paged::<Profile>(
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
    user.require_admin()?;
    let filters = ListParams::filters_only(&PROFILE_META, &pairs)?;
    let total = listing::count::<Profile>(&state.pool, &filters).await?;
    Ok(Json(DataResponse { data: total }))
}

pub async fn exists(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<DataResponse<bool>>> {
    user.require_admin()?;
    let filters = ListParams::filters_only(&PROFILE_META, &pairs)?;
    let found = listing::exists::<Profile>(&state.pool, &filters).await?;
    Ok(Json(DataResponse { data: found }))
}

/// `POST /profiles` - admin-created account with an explicit role.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateProfile>,
) -> AppResult<(StatusCode, Json<DataResponse<Profile>>)> {
    user.require_admin()?;
    validate_role(&input.role)?;
    password::validate_password_strength(&input.password)?;

    let password_hash = password::hash_password(&input.password)?;
    let row = ProfileRepo::create(
        &state.pool,
        &input.email,
        &input.display_name,
        &input.role,
        &password_hash,
        Some(user.profile_id),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

pub async fn get_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Profile>>> {
    user.require_admin()?;
    let row = listing::get_by_id::<Profile>(&state.pool, id).await?;
    Ok(Json(DataResponse { data: row }))
}

/// `PATCH /profiles/{id}`. Deactivating an account also revokes its sessions.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<Profile>>> {
    user.require_admin()?;
    if let Some(role) = &input.role {
        validate_role(role)?;
    }

    let row = ProfileRepo::update(&state.pool, id, &input, Some(user.profile_id)).await?;

    if input.is_active == Some(false) {
        let revoked = SessionRepo::revoke_all_for_profile(&state.pool, id).await?;
        tracing::info!(profile_id = %id, revoked, "Deactivated profile, sessions revoked");
    }

    Ok(Json(DataResponse { data: row }))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    user.require_admin()?;
    if user.profile_id == id {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot delete your own account".to_string(),
        )));
    }
    if !listing::delete_by_id::<Profile>(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "profile",
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
    if req.ids.contains(&user.profile_id) {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot delete your own account".to_string(),
        )));
    }
    let deleted = listing::delete_by_ids::<Profile>(&state.pool, &req.ids).await?;
    Ok(Json(DataResponse { data: deleted }))
}

fn validate_role(role: &str) -> Result<(), AppError> {
    if !VALID_ROLES.contains(&role) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))));
    }
    Ok(())
}
