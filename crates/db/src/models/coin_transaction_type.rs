//! Curby coin transaction type models (the ledger of earnable/spendable
//! actions and their amounts).

use curby_core::filter::{EntityMeta, FieldMeta, FieldType};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use curby_core::types::{DbId, Timestamp};

/// A row from the `coin_transaction_types` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CoinTransactionType {
    pub id: DbId,
    /// Stable machine key, e.g. `item.given_away`. Unique.
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    /// Signed coin delta applied when the transaction fires.
    pub amount: i64,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
}

/// DTO for creating a coin transaction type.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCoinTransactionType {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub amount: i64,
}

/// DTO for partially updating a coin transaction type. The key is immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCoinTransactionType {
    pub name: Option<String>,
    pub description: Option<String>,
    pub amount: Option<i64>,
    pub is_active: Option<bool>,
}

pub const COIN_TRANSACTION_TYPE_META: EntityMeta = EntityMeta {
    table: "coin_transaction_types",
    fields: &[
        ("id", FieldMeta::new(FieldType::Uuid, false)),
        ("key", FieldMeta::new(FieldType::Text, true)),
        ("name", FieldMeta::new(FieldType::Text, true)),
        ("description", FieldMeta::new(FieldType::Text, true)),
        ("amount", FieldMeta::new(FieldType::Integer, true)),
        ("is_active", FieldMeta::new(FieldType::Boolean, false)),
        ("created_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("updated_at", FieldMeta::new(FieldType::Timestamp, false)),
        ("created_by", FieldMeta::new(FieldType::Uuid, false)),
        ("updated_by", FieldMeta::new(FieldType::Uuid, false)),
    ],
};
