//! Request authentication via `Authorization: Bearer <jwt>`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use curby_core::error::CoreError;
use curby_core::types::DbId;
use curby_db::models::profile::{ROLE_ADMIN, ROLE_MODERATOR};

use crate::auth::jwt;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller, extracted from a validated access token.
///
/// Add `user: AuthUser` to any handler signature to require authentication.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub profile_id: DbId,
    pub role: String,
}

impl AuthUser {
    /// Require the admin role.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".to_string(),
            )));
        }
        Ok(())
    }

    /// Require the moderator or admin role.
    pub fn require_moderator(&self) -> Result<(), AppError> {
        if self.role != ROLE_MODERATOR && self.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Moderator role required".to_string(),
            )));
        }
        Ok(())
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".to_string(),
                ))
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".to_string(),
            ))
        })?;

        let claims = jwt::validate_token(&state.config.jwt, token)?;

        Ok(AuthUser {
            profile_id: claims.sub,
            role: claims.role,
        })
    }
}
