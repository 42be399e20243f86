//! Multi-column text search condition building.
//!
//! List endpoints accept a free-text `search` term that is matched against an
//! entity's searchable columns. Each column contributes at most one condition
//! based on its type; the DB layer OR-combines whatever this module produces.
//! Columns absent from the entity metadata, or not marked `searchable`, are
//! silently skipped so a stale client can never widen the search surface.

use crate::filter::{parse_timestamp, EntityMeta, FieldType};
use crate::types::{DbId, Timestamp};

/* --------------------------------------------------------------------------
Pagination clamps (shared by listing and ad-hoc repository queries)
-------------------------------------------------------------------------- */

/// Default number of rows returned by unpaged listings.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Maximum number of rows returned by unpaged listings.
pub const MAX_LIST_LIMIT: i64 = 500;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/* --------------------------------------------------------------------------
Search query and conditions
-------------------------------------------------------------------------- */

/// A free-text search request.
///
/// `columns` restricts the search to a subset of the entity's searchable
/// columns; when empty, all searchable columns are used.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    pub columns: Vec<String>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            columns: Vec::new(),
        }
    }
}

/// One per-column search condition, typed by the column it targets.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchCondition {
    /// `column ILIKE '%text%'` with LIKE metacharacters escaped.
    IlikeText {
        column: &'static str,
        pattern: String,
    },
    EqInteger { column: &'static str, value: i64 },
    EqFloat { column: &'static str, value: f64 },
    EqBoolean { column: &'static str, value: bool },
    /// Only produced when the search text is UUID-shaped.
    EqUuid { column: &'static str, value: DbId },
    /// Day range `[start, end)` when the search text parses as a date.
    TimestampRange {
        column: &'static str,
        start: Timestamp,
        end: Timestamp,
    },
}

/// Escape `%`, `_`, and `\` so user text matches literally inside a LIKE
/// pattern.
pub fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build the per-column conditions for a search request.
///
/// Returns an empty vector when the text is blank or no usable column
/// remains, which the DB layer treats as "no search applied".
pub fn build_search_conditions(meta: &EntityMeta, query: &SearchQuery) -> Vec<SearchCondition> {
    let text = query.text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let as_integer = text.parse::<i64>().ok();
    let as_float = text.parse::<f64>().ok();
    let as_boolean = match text {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    };
    let as_uuid = text.parse::<DbId>().ok();
    let as_date = parse_timestamp(text);

    let mut conditions = Vec::new();
    for (column, field) in meta.fields {
        if !field.searchable {
            continue;
        }
        if !query.columns.is_empty() && !query.columns.iter().any(|c| c == column) {
            continue;
        }

        let condition = match field.field_type {
            FieldType::Text => Some(SearchCondition::IlikeText {
                column,
                pattern: format!("%{}%", escape_like(text)),
            }),
            FieldType::Integer => as_integer.map(|value| SearchCondition::EqInteger { column, value }),
            FieldType::Float => as_float.map(|value| SearchCondition::EqFloat { column, value }),
            FieldType::Boolean => {
                as_boolean.map(|value| SearchCondition::EqBoolean { column, value })
            }
            FieldType::Uuid => as_uuid.map(|value| SearchCondition::EqUuid { column, value }),
            FieldType::Timestamp => as_date.map(|start| SearchCondition::TimestampRange {
                column,
                start,
                end: start + chrono::Duration::days(1),
            }),
            // Array columns are never searched.
            FieldType::TextArray => None,
        };

        if let Some(c) = condition {
            conditions.push(c);
        }
    }

    conditions
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FieldMeta;

    const META: EntityMeta = EntityMeta {
        table: "listings",
        fields: &[
            (
                "id",
                FieldMeta {
                    field_type: FieldType::Uuid,
                    searchable: true,
                },
            ),
            (
                "title",
                FieldMeta {
                    field_type: FieldType::Text,
                    searchable: true,
                },
            ),
            (
                "secret",
                FieldMeta {
                    field_type: FieldType::Text,
                    searchable: false,
                },
            ),
            (
                "amount",
                FieldMeta {
                    field_type: FieldType::Integer,
                    searchable: true,
                },
            ),
            (
                "is_active",
                FieldMeta {
                    field_type: FieldType::Boolean,
                    searchable: true,
                },
            ),
            (
                "created_at",
                FieldMeta {
                    field_type: FieldType::Timestamp,
                    searchable: true,
                },
            ),
            (
                "tags",
                FieldMeta {
                    field_type: FieldType::TextArray,
                    searchable: true,
                },
            ),
        ],
    };

    fn columns(conditions: &[SearchCondition]) -> Vec<&'static str> {
        conditions
            .iter()
            .map(|c| match c {
                SearchCondition::IlikeText { column, .. }
                | SearchCondition::EqInteger { column, .. }
                | SearchCondition::EqFloat { column, .. }
                | SearchCondition::EqBoolean { column, .. }
                | SearchCondition::EqUuid { column, .. }
                | SearchCondition::TimestampRange { column, .. } => *column,
            })
            .collect()
    }

    #[test]
    fn plain_text_only_hits_text_columns() {
        let conditions = build_search_conditions(&META, &SearchQuery::new("curby"));
        assert_eq!(columns(&conditions), vec!["title"]);
        assert_eq!(
            conditions[0],
            SearchCondition::IlikeText {
                column: "title",
                pattern: "%curby%".to_string()
            }
        );
    }

    #[test]
    fn non_searchable_columns_never_included() {
        let mut query = SearchQuery::new("x");
        query.columns = vec!["secret".to_string(), "title".to_string()];
        let conditions = build_search_conditions(&META, &query);
        assert_eq!(columns(&conditions), vec!["title"]);
    }

    #[test]
    fn unknown_requested_columns_are_skipped() {
        let mut query = SearchQuery::new("x");
        query.columns = vec!["does_not_exist".to_string()];
        assert!(build_search_conditions(&META, &query).is_empty());
    }

    #[test]
    fn numeric_text_matches_number_and_text_columns() {
        let conditions = build_search_conditions(&META, &SearchQuery::new("42"));
        let cols = columns(&conditions);
        assert!(cols.contains(&"title"));
        assert!(cols.contains(&"amount"));
        assert!(conditions.contains(&SearchCondition::EqInteger {
            column: "amount",
            value: 42
        }));
    }

    #[test]
    fn boolean_text_matches_boolean_columns() {
        let conditions = build_search_conditions(&META, &SearchQuery::new("true"));
        assert!(conditions.contains(&SearchCondition::EqBoolean {
            column: "is_active",
            value: true
        }));
    }

    #[test]
    fn uuid_shaped_text_matches_uuid_columns() {
        let id = "7f1c1b44-9d77-4f0e-a3c8-2f8d2e1a9b10";
        let conditions = build_search_conditions(&META, &SearchQuery::new(id));
        assert!(columns(&conditions).contains(&"id"));

        // Non-UUID text must not touch uuid columns.
        let conditions = build_search_conditions(&META, &SearchQuery::new("curby"));
        assert!(!columns(&conditions).contains(&"id"));
    }

    #[test]
    fn date_text_produces_day_range() {
        let conditions = build_search_conditions(&META, &SearchQuery::new("2026-08-24"));
        let range = conditions
            .iter()
            .find(|c| matches!(c, SearchCondition::TimestampRange { .. }))
            .expect("date search should hit timestamp columns");
        if let SearchCondition::TimestampRange { start, end, .. } = range {
            assert_eq!((*end - *start).num_days(), 1);
        }
    }

    #[test]
    fn array_columns_are_never_searched() {
        let conditions = build_search_conditions(&META, &SearchQuery::new("couch"));
        assert!(!columns(&conditions).contains(&"tags"));
    }

    #[test]
    fn blank_text_yields_no_conditions() {
        assert!(build_search_conditions(&META, &SearchQuery::new("   ")).is_empty());
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("100%_done\\"), "100\\%\\_done\\\\");
    }

    #[test]
    fn clamp_helpers() {
        assert_eq!(clamp_limit(None, 50, 500), 50);
        assert_eq!(clamp_limit(Some(0), 50, 500), 1);
        assert_eq!(clamp_limit(Some(9999), 50, 500), 500);
        assert_eq!(clamp_offset(Some(-1)), 0);
        assert_eq!(clamp_offset(None), 0);
    }
}
