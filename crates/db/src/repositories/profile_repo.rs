//! Repository for the `profiles` table.

use sqlx::PgPool;

use curby_core::filter::EntityMeta;
use curby_core::types::{DbId, Timestamp};

use crate::listing::Table;
use crate::models::profile::{Profile, UpdateProfile, PROFILE_META};

/// Column list for `profiles` queries.
const COLUMNS: &str = "id, email, display_name, role, password_hash, is_active, \
    failed_login_count, locked_until, last_login_at, coin_balance, \
    created_at, updated_at, created_by, updated_by";

impl Table for Profile {
    type Row = Profile;
    const TABLE: &'static str = "profiles";
    const COLUMNS: &'static str = COLUMNS;

    fn meta() -> &'static EntityMeta {
        &PROFILE_META
    }
}

/// Provides CRUD and login-bookkeeping operations for profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Create a profile, stamping the audit columns with the acting user.
    pub async fn create(
        pool: &PgPool,
        email: &str,
        display_name: &str,
        role: &str,
        password_hash: &str,
        actor: Option<DbId>,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (email, display_name, role, password_hash, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(email)
            .bind(display_name)
            .bind(role)
            .bind(password_hash)
            .bind(actor)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE email = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Partially update a profile.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
        actor: Option<DbId>,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET
                display_name = COALESCE($1, display_name),
                role = COALESCE($2, role),
                is_active = COALESCE($3, is_active),
                coin_balance = COALESCE($4, coin_balance),
                updated_at = NOW(),
                updated_by = $5
             WHERE id = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(&input.display_name)
            .bind(&input.role)
            .bind(input.is_active)
            .bind(input.coin_balance)
            .bind(actor)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Bump the consecutive failed-login counter, returning the new count so
    /// concurrent failures are counted atomically.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE profiles SET failed_login_count = failed_login_count + 1 \
             WHERE id = $1 RETURNING failed_login_count",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Lock the account until the given time.
    pub async fn lock_account(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE profiles SET locked_until = $1 WHERE id = $2")
            .bind(until)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Reset the failed-login counter and record the login time.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE profiles SET failed_login_count = 0, locked_until = NULL, \
             last_login_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
