//! JWT access tokens and opaque refresh tokens.
//!
//! Access tokens are short-lived HS256 JWTs carrying the profile id and role.
//! Refresh tokens are opaque random strings; only their SHA-256 hash is stored
//! server-side, so a database leak does not expose usable tokens.

use chrono::{Duration, Utc};
use curby_core::error::CoreError;
use curby_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Claims embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Profile id of the authenticated user.
    pub sub: DbId,
    /// Role at the time the token was issued.
    pub role: String,
    /// Expiry (seconds since epoch).
    pub exp: i64,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Unique token id.
    pub jti: DbId,
}

/// JWT signing configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC signing secret. Must be non-empty.
    pub secret: String,
    /// Access token lifetime in minutes.
    pub access_expiry_mins: i64,
    /// Refresh token lifetime in days.
    pub refresh_expiry_days: i64,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                   | Default    |
    /// |---------------------------|------------|
    /// | `JWT_SECRET`              | (required) |
    /// | `JWT_ACCESS_EXPIRY_MINS`  | `15`       |
    /// | `JWT_REFRESH_EXPIRY_DAYS` | `7`        |
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        if secret.is_empty() {
            panic!("JWT_SECRET must not be empty");
        }

        let access_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| "15".into())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let refresh_expiry_days: i64 = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .unwrap_or_else(|_| "7".into())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            access_expiry_mins,
            refresh_expiry_days,
        }
    }
}

/// Generate a signed access token for the given profile.
pub fn generate_access_token(
    config: &JwtConfig,
    profile_id: DbId,
    role: &str,
) -> Result<String, CoreError> {
    let now = Utc::now();
    let claims = Claims {
        sub: profile_id,
        role: role.to_string(),
        exp: (now + Duration::minutes(config.access_expiry_mins)).timestamp(),
        iat: now.timestamp(),
        jti: DbId::new_v4(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| CoreError::Internal(format!("Failed to sign access token: {e}")))
}

/// Validate an access token and return its claims.
pub fn validate_token(config: &JwtConfig, token: &str) -> Result<Claims, CoreError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| CoreError::Unauthorized("Invalid or expired token".to_string()))
}

/// Generate a new refresh token.
///
/// Returns `(plaintext, hash)`: the plaintext goes to the client, the hash is
/// what gets persisted.
pub fn generate_refresh_token() -> (String, String) {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    let plaintext: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    let hash = hash_refresh_token(&plaintext);
    (plaintext, hash)
}

/// SHA-256 hex digest of a refresh token, for storage and lookup.
pub fn hash_refresh_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-signing-secret".into(),
            access_expiry_mins: 15,
            refresh_expiry_days: 7,
        }
    }

    #[test]
    fn access_token_round_trips() {
        let config = test_config();
        let profile_id = DbId::new_v4();

        let token = generate_access_token(&config, profile_id, "moderator").unwrap();
        let claims = validate_token(&config, &token).unwrap();

        assert_eq!(claims.sub, profile_id);
        assert_eq!(claims.role, "moderator");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config = test_config();
        let other = JwtConfig {
            secret: "a-completely-different-secret".into(),
            ..test_config()
        };

        let token = generate_access_token(&other, DbId::new_v4(), "member").unwrap();
        let err = validate_token(&config, &token).unwrap_err();
        assert!(matches!(err, CoreError::Unauthorized(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        // jsonwebtoken applies 60s leeway by default; go well past it.
        let config = JwtConfig {
            access_expiry_mins: -10,
            ..test_config()
        };

        let token = generate_access_token(&config, DbId::new_v4(), "member").unwrap();
        let err = validate_token(&config, &token).unwrap_err();
        assert!(matches!(err, CoreError::Unauthorized(_)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let err = validate_token(&test_config(), "not.a.jwt").unwrap_err();
        assert!(matches!(err, CoreError::Unauthorized(_)));
    }

    #[test]
    fn refresh_tokens_are_unique_and_hash_deterministically() {
        let (plain_a, hash_a) = generate_refresh_token();
        let (plain_b, hash_b) = generate_refresh_token();

        assert_ne!(plain_a, plain_b);
        assert_ne!(hash_a, hash_b);
        assert_eq!(plain_a.len(), 64);
        assert_eq!(hash_refresh_token(&plain_a), hash_a);
        assert_ne!(plain_a, hash_a);
    }
}
