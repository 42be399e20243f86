//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope per project conventions.
//! Paged list endpoints additionally carry the unpaged `total`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// List envelope with the unpaged total: `{ "data": [...], "total": n }`.
#[derive(Debug, Serialize)]
pub struct PagedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub total: i64,
}

impl<T: Serialize> From<curby_db::listing::Page<T>> for PagedResponse<T> {
    fn from(page: curby_db::listing::Page<T>) -> Self {
        Self {
            data: page.rows,
            total: page.total,
        }
    }
}
