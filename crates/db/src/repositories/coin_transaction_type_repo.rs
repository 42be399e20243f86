//! Repository for the `coin_transaction_types` table.

use sqlx::PgPool;

use curby_core::filter::EntityMeta;
use curby_core::types::DbId;

use crate::listing::Table;
use crate::models::coin_transaction_type::{
    CoinTransactionType, CreateCoinTransactionType, UpdateCoinTransactionType,
    COIN_TRANSACTION_TYPE_META,
};

/// Column list for `coin_transaction_types` queries.
const COLUMNS: &str = "id, key, name, description, amount, is_active, \
    created_at, updated_at, created_by, updated_by";

impl Table for CoinTransactionType {
    type Row = CoinTransactionType;
    const TABLE: &'static str = "coin_transaction_types";
    const COLUMNS: &'static str = COLUMNS;

    fn meta() -> &'static EntityMeta {
        &COIN_TRANSACTION_TYPE_META
    }
}

/// Provides CRUD operations for coin transaction types.
pub struct CoinTransactionTypeRepo;

impl CoinTransactionTypeRepo {
    /// Create a transaction type. The key must be unique
    /// (`uq_coin_transaction_types_key`).
    pub async fn create(
        pool: &PgPool,
        input: &CreateCoinTransactionType,
        actor: Option<DbId>,
    ) -> Result<CoinTransactionType, sqlx::Error> {
        let query = format!(
            "INSERT INTO coin_transaction_types (key, name, description, amount, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CoinTransactionType>(&query)
            .bind(&input.key)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.amount)
            .bind(actor)
            .fetch_one(pool)
            .await
    }

    /// Partially update a transaction type. The key is immutable.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCoinTransactionType,
        actor: Option<DbId>,
    ) -> Result<CoinTransactionType, sqlx::Error> {
        let query = format!(
            "UPDATE coin_transaction_types SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                amount = COALESCE($3, amount),
                is_active = COALESCE($4, is_active),
                updated_at = NOW(),
                updated_by = $5
             WHERE id = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CoinTransactionType>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.amount)
            .bind(input.is_active)
            .bind(actor)
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
