//! Authentication handlers: signup, login, token refresh, logout, me.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use curby_core::error::CoreError;
use curby_db::listing;
use curby_db::models::profile::{Profile, ROLE_MEMBER};
use curby_db::repositories::profile_repo::ProfileRepo;
use curby_db::repositories::session_repo::SessionRepo;

use crate::auth::{jwt, password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Consecutive failed logins before the account is locked.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// How long a lockout lasts.
const LOCK_DURATION_MINS: i64 = 15;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "Display name must be 1-100 characters"))]
    pub display_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: Profile,
}

/// `POST /auth/signup` - create a member account.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    password::validate_password_strength(&req.password)?;

    let password_hash = password::hash_password(&req.password)?;
    let profile = ProfileRepo::create(
        &state.pool,
        &req.email,
        &req.display_name,
        ROLE_MEMBER,
        &password_hash,
        None,
    )
    .await?;

    let response = create_auth_response(&state, profile).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /auth/login` - authenticate and issue a token pair.
///
/// Lockout: after [`MAX_FAILED_ATTEMPTS`] consecutive failures the account is
/// locked for [`LOCK_DURATION_MINS`] minutes. The failure message never
/// reveals whether the email exists.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid email or password".to_string()));

    let profile = ProfileRepo::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(invalid)?;

    if !profile.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".to_string(),
        )));
    }

    if let Some(locked_until) = profile.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::LockedOut {
                until: locked_until,
            }));
        }
    }

    if !password::verify_password(&req.password, &profile.password_hash)? {
        let failed_count = ProfileRepo::increment_failed_login(&state.pool, profile.id).await?;
        if failed_count >= MAX_FAILED_ATTEMPTS {
            let until = Utc::now() + Duration::minutes(LOCK_DURATION_MINS);
            ProfileRepo::lock_account(&state.pool, profile.id, until).await?;
            tracing::warn!(profile_id = %profile.id, "Account locked after repeated login failures");
        }
        return Err(invalid());
    }

    ProfileRepo::record_successful_login(&state.pool, profile.id).await?;
    let profile = listing::get_by_id::<Profile>(&state.pool, profile.id).await?;

    Ok(Json(create_auth_response(&state, profile).await?))
}

/// `POST /auth/refresh` - rotate a refresh token into a new token pair.
///
/// The presented token's session is revoked even as a new one is issued, so
/// a replayed refresh token is dead on arrival.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let hash = jwt::hash_refresh_token(&req.refresh_token);
    let session = SessionRepo::find_active_by_hash(&state.pool, &hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".to_string(),
            ))
        })?;

    SessionRepo::revoke(&state.pool, session.id).await?;

    let profile = listing::get_by_id::<Profile>(&state.pool, session.profile_id).await?;
    if !profile.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".to_string(),
        )));
    }

    Ok(Json(create_auth_response(&state, profile).await?))
}

/// `POST /auth/logout` - revoke every live session for the caller.
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_profile(&state.pool, user.profile_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /auth/me` - the caller's own profile.
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = listing::get_by_id::<Profile>(&state.pool, user.profile_id).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// Issue an access token and a fresh refresh session for the profile.
async fn create_auth_response(state: &AppState, profile: Profile) -> AppResult<AuthResponse> {
    let jwt_config = &state.config.jwt;

    let access_token = jwt::generate_access_token(jwt_config, profile.id, &profile.role)?;
    let (refresh_token, refresh_hash) = jwt::generate_refresh_token();

    let expires_at = Utc::now() + Duration::days(jwt_config.refresh_expiry_days);
    SessionRepo::create(&state.pool, profile.id, &refresh_hash, expires_at).await?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        expires_in: jwt_config.access_expiry_mins * 60,
        user: profile,
    })
}
