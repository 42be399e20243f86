//! Query-string parsing for the generic list contract.
//!
//! Every entity collection accepts the same parameters:
//!
//! | Key             | Repeatable | Meaning                                  |
//! |-----------------|------------|------------------------------------------|
//! | `filter`        | yes        | `column.op.value` (in-lists as `(a,b,c)`)|
//! | `order`         | yes        | `column.asc` / `column.desc`             |
//! | `limit`         | no         | page size (clamped to 1..=MAX_PAGE_SIZE) |
//! | `offset`        | no         | row offset, snapped to a page boundary   |
//! | `search`        | no         | free text over the searchable columns    |
//! | `search_column` | yes        | restrict search to these columns         |
//!
//! Handlers extract `Query<Vec<(String, String)>>` (repeated keys are not
//! representable in a plain struct) and hand the pairs to
//! [`ListParams::from_pairs`]. Unknown keys and malformed values are rejected
//! with a 400 so typos never silently widen a listing.

use curby_core::error::CoreError;
use curby_core::filter::{EntityMeta, Filter, OrderBy, Pagination, DEFAULT_PAGE_SIZE};
use curby_core::search::SearchQuery;

use crate::error::AppError;

/// Parsed and validated list parameters for one entity.
#[derive(Debug)]
pub struct ListParams {
    pub filters: Vec<Filter>,
    pub order: Vec<OrderBy>,
    pub pagination: Pagination,
    pub search: Option<SearchQuery>,
}

impl ListParams {
    /// Parse raw query pairs against the entity's field metadata.
    pub fn from_pairs(
        meta: &'static EntityMeta,
        pairs: &[(String, String)],
    ) -> Result<Self, AppError> {
        let mut filters = Vec::new();
        let mut order = Vec::new();
        let mut limit: Option<i64> = None;
        let mut offset: Option<i64> = None;
        let mut search_text: Option<String> = None;
        let mut search_columns: Vec<String> = Vec::new();

        for (key, value) in pairs {
            match key.as_str() {
                "filter" => filters.push(Filter::parse(meta, value)?),
                "order" => order.push(OrderBy::parse(meta, value)?),
                "limit" => limit = Some(parse_i64(key, value)?),
                "offset" => offset = Some(parse_i64(key, value)?),
                "search" => search_text = Some(value.clone()),
                "search_column" => search_columns.push(value.clone()),
                other => {
                    return Err(AppError::Core(CoreError::Validation(format!(
                        "Unknown query parameter '{other}'"
                    ))));
                }
            }
        }

        let page_size = limit.unwrap_or(DEFAULT_PAGE_SIZE);
        let pagination = Pagination::new(
            offset.unwrap_or(0).max(0) / page_size.max(1),
            page_size,
        );

        let search = search_text.map(|text| SearchQuery {
            text,
            columns: search_columns,
        });

        Ok(Self {
            filters,
            order,
            pagination,
            search,
        })
    }

    /// Parse pairs accepting only `filter` keys (for `/count` and `/exists`).
    pub fn filters_only(
        meta: &'static EntityMeta,
        pairs: &[(String, String)],
    ) -> Result<Vec<Filter>, AppError> {
        let mut filters = Vec::new();
        for (key, value) in pairs {
            match key.as_str() {
                "filter" => filters.push(Filter::parse(meta, value)?),
                other => {
                    return Err(AppError::Core(CoreError::Validation(format!(
                        "Unknown query parameter '{other}'"
                    ))));
                }
            }
        }
        Ok(filters)
    }
}

fn parse_i64(key: &str, value: &str) -> Result<i64, AppError> {
    value.parse().map_err(|_| {
        AppError::Core(CoreError::Validation(format!(
            "Parameter '{key}' must be an integer, got '{value}'"
        )))
    })
}

/// Request body for `POST /<entities>/bulk-delete`.
#[derive(Debug, serde::Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<curby_core::types::DbId>,
}
