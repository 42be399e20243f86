//! Typed filter/sort/pagination DSL for entity listing queries.
//!
//! Every admin list endpoint accepts the same small query language:
//! `{column, op, value}` filters whose legal operator set depends on the
//! column's declared field type, plus ordering, offset pagination, and an
//! optional keyset cursor. Descriptors are validated here against the
//! entity's [`EntityMeta`]; the DB layer renders validated descriptors into
//! SQL with bound parameters.
//!
//! The wire form is PostgREST-flavoured: `filter=column.op.value` with `in`
//! lists written as `(a,b,c)`, and `order=column.asc|desc`.

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/* --------------------------------------------------------------------------
Field metadata
-------------------------------------------------------------------------- */

/// Runtime type of an entity column, determining its legal operators and how
/// filter values are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Float,
    Boolean,
    Uuid,
    Timestamp,
    /// PostgreSQL `text[]`.
    TextArray,
}

/// Per-column metadata: type plus whether multi-column text search may use it.
#[derive(Debug, Clone, Copy)]
pub struct FieldMeta {
    pub field_type: FieldType,
    pub searchable: bool,
}

impl FieldMeta {
    pub const fn new(field_type: FieldType, searchable: bool) -> Self {
        Self {
            field_type,
            searchable,
        }
    }
}

/// Static field table for one entity.
///
/// Column names in filters, ordering, cursors, and search are validated
/// against this table before any SQL is built, so the DB layer may splice
/// them into query text directly.
#[derive(Debug)]
pub struct EntityMeta {
    /// Table name, used in error messages and by the row watcher.
    pub table: &'static str,
    pub fields: &'static [(&'static str, FieldMeta)],
}

impl EntityMeta {
    /// Look up a column's metadata.
    pub fn field(&self, column: &str) -> Option<&FieldMeta> {
        self.fields
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, meta)| meta)
    }

    /// All columns marked searchable.
    pub fn searchable_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|(_, meta)| meta.searchable)
            .map(|(name, _)| *name)
    }

    fn require_field(&self, column: &str) -> Result<&FieldMeta, CoreError> {
        self.field(column).ok_or_else(|| {
            CoreError::Validation(format!(
                "Unknown column '{column}' for table '{}'",
                self.table
            ))
        })
    }
}

/* --------------------------------------------------------------------------
Operators
-------------------------------------------------------------------------- */

/// Comparison operator in a filter descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Neq,
    Like,
    Ilike,
    In,
    Gt,
    Gte,
    Lt,
    Lte,
    Is,
    /// Array contains (`@>`).
    Cs,
    /// Array contained by (`<@`).
    Cd,
    /// Array overlaps (`&&`).
    Ov,
}

impl FilterOp {
    /// Parse the wire token (`eq`, `ilike`, `cs`, ...).
    pub fn parse(token: &str) -> Result<Self, CoreError> {
        Ok(match token {
            "eq" => Self::Eq,
            "neq" => Self::Neq,
            "like" => Self::Like,
            "ilike" => Self::Ilike,
            "in" => Self::In,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "is" => Self::Is,
            "cs" => Self::Cs,
            "cd" => Self::Cd,
            "ov" => Self::Ov,
            other => {
                return Err(CoreError::Validation(format!(
                    "Unknown filter operator '{other}'"
                )))
            }
        })
    }

    /// The wire token for this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Like => "like",
            Self::Ilike => "ilike",
            Self::In => "in",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Is => "is",
            Self::Cs => "cs",
            Self::Cd => "cd",
            Self::Ov => "ov",
        }
    }
}

/// Legal operators for a field type.
pub fn allowed_ops(field_type: FieldType) -> &'static [FilterOp] {
    use FilterOp::*;
    match field_type {
        FieldType::Text => &[Eq, Neq, Like, Ilike, In, Is],
        FieldType::Integer => &[Eq, Neq, Gt, Gte, Lt, Lte, In, Is],
        FieldType::Float => &[Eq, Neq, Gt, Gte, Lt, Lte, Is],
        FieldType::Boolean => &[Eq, Neq, Is],
        FieldType::Uuid => &[Eq, Neq, In, Is],
        FieldType::Timestamp => &[Eq, Neq, Gt, Gte, Lt, Lte, Is],
        FieldType::TextArray => &[Cs, Cd, Ov],
    }
}

/* --------------------------------------------------------------------------
Values
-------------------------------------------------------------------------- */

/// A typed filter operand.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(DbId),
    Timestamp(Timestamp),
    Null,
    TextList(Vec<String>),
    IntegerList(Vec<i64>),
    UuidList(Vec<DbId>),
}

impl FilterValue {
    fn is_list(&self) -> bool {
        matches!(
            self,
            Self::TextList(_) | Self::IntegerList(_) | Self::UuidList(_)
        )
    }
}

/// Parse a scalar wire value for a column of the given type.
///
/// `null` parses as [`FilterValue::Null`] for every type.
fn parse_scalar(field_type: FieldType, raw: &str) -> Result<FilterValue, CoreError> {
    if raw == "null" {
        return Ok(FilterValue::Null);
    }
    match field_type {
        FieldType::Text => Ok(FilterValue::Text(raw.to_string())),
        FieldType::Integer => raw
            .parse::<i64>()
            .map(FilterValue::Integer)
            .map_err(|_| CoreError::Validation(format!("'{raw}' is not a valid integer"))),
        FieldType::Float => raw
            .parse::<f64>()
            .map(FilterValue::Float)
            .map_err(|_| CoreError::Validation(format!("'{raw}' is not a valid number"))),
        FieldType::Boolean => match raw {
            "true" => Ok(FilterValue::Boolean(true)),
            "false" => Ok(FilterValue::Boolean(false)),
            _ => Err(CoreError::Validation(format!(
                "'{raw}' is not a valid boolean (expected true/false)"
            ))),
        },
        FieldType::Uuid => raw
            .parse::<DbId>()
            .map(FilterValue::Uuid)
            .map_err(|_| CoreError::Validation(format!("'{raw}' is not a valid UUID"))),
        FieldType::Timestamp => parse_timestamp(raw)
            .map(FilterValue::Timestamp)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "'{raw}' is not a valid timestamp (expected RFC 3339 or YYYY-MM-DD)"
                ))
            }),
        FieldType::TextArray => Err(CoreError::Validation(
            "Array columns require a list value, e.g. (a,b,c)".to_string(),
        )),
    }
}

/// Parse a `(a,b,c)` wire list for a column of the given type.
fn parse_list(field_type: FieldType, raw: &str) -> Result<FilterValue, CoreError> {
    let inner = raw
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| {
            CoreError::Validation(format!("List value '{raw}' must be wrapped in parentheses"))
        })?;

    let items: Vec<&str> = inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    match field_type {
        FieldType::Text | FieldType::TextArray => Ok(FilterValue::TextList(
            items.iter().map(|s| s.to_string()).collect(),
        )),
        FieldType::Integer => items
            .iter()
            .map(|s| {
                s.parse::<i64>()
                    .map_err(|_| CoreError::Validation(format!("'{s}' is not a valid integer")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(FilterValue::IntegerList),
        FieldType::Uuid => items
            .iter()
            .map(|s| {
                s.parse::<DbId>()
                    .map_err(|_| CoreError::Validation(format!("'{s}' is not a valid UUID")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(FilterValue::UuidList),
        other => Err(CoreError::Validation(format!(
            "List values are not supported for {other:?} columns"
        ))),
    }
}

/// Accept RFC 3339 (`2026-01-02T03:04:05Z`) or a bare date (`2026-01-02`,
/// interpreted as midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&chrono::Utc));
    }
    let date = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/* --------------------------------------------------------------------------
Filters
-------------------------------------------------------------------------- */

/// A validated `{column, op, value}` filter descriptor.
///
/// Construction goes through [`Filter::new`] or [`Filter::parse`], which
/// check the column against the entity metadata, the operator against the
/// column's type, and the value shape against the operator.
#[derive(Debug, Clone)]
pub struct Filter {
    pub column: &'static str,
    pub op: FilterOp,
    pub value: FilterValue,
}

impl Filter {
    /// Build a filter, validating column, operator, and value shape.
    pub fn new(
        meta: &EntityMeta,
        column: &str,
        op: FilterOp,
        value: FilterValue,
    ) -> Result<Self, CoreError> {
        let field = meta.require_field(column)?;

        if !allowed_ops(field.field_type).contains(&op) {
            return Err(CoreError::Validation(format!(
                "Operator '{}' is not allowed for column '{column}' ({:?})",
                op.as_str(),
                field.field_type
            )));
        }

        match op {
            FilterOp::In | FilterOp::Cs | FilterOp::Cd | FilterOp::Ov => {
                if !value.is_list() {
                    return Err(CoreError::Validation(format!(
                        "Operator '{}' requires a list value",
                        op.as_str()
                    )));
                }
            }
            FilterOp::Is => match &value {
                FilterValue::Null => {}
                FilterValue::Boolean(_) if field.field_type == FieldType::Boolean => {}
                FilterValue::Boolean(_) => {
                    return Err(CoreError::Validation(format!(
                        "Operator 'is' with true/false is only valid for boolean columns, \
                         not '{column}'"
                    )));
                }
                _ => {
                    return Err(CoreError::Validation(
                        "Operator 'is' requires null, true, or false".to_string(),
                    ));
                }
            },
            FilterOp::Eq | FilterOp::Neq => {
                if value.is_list() {
                    return Err(CoreError::Validation(format!(
                        "Operator '{}' requires a scalar value",
                        op.as_str()
                    )));
                }
            }
            FilterOp::Like
            | FilterOp::Ilike
            | FilterOp::Gt
            | FilterOp::Gte
            | FilterOp::Lt
            | FilterOp::Lte => {
                if value.is_list() {
                    return Err(CoreError::Validation(format!(
                        "Operator '{}' requires a scalar value",
                        op.as_str()
                    )));
                }
                if value == FilterValue::Null {
                    return Err(CoreError::Validation(format!(
                        "Operator '{}' cannot compare against null; use eq, neq, or is",
                        op.as_str()
                    )));
                }
            }
        }

        // Store the canonical static column name so the DB layer never
        // splices caller-controlled text into SQL.
        let canonical = meta
            .fields
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(name, _)| *name)
            .expect("column checked above");

        Ok(Self {
            column: canonical,
            op,
            value,
        })
    }

    /// Parse the wire form `column.op.value`.
    ///
    /// The value may itself contain dots (timestamps, free text); only the
    /// first two dots delimit.
    pub fn parse(meta: &EntityMeta, raw: &str) -> Result<Self, CoreError> {
        let mut parts = raw.splitn(3, '.');
        let (column, op_token, value_raw) = match (parts.next(), parts.next(), parts.next()) {
            (Some(c), Some(o), Some(v)) if !c.is_empty() && !v.is_empty() => (c, o, v),
            _ => {
                return Err(CoreError::Validation(format!(
                    "Invalid filter '{raw}'. Expected column.op.value"
                )))
            }
        };

        let op = FilterOp::parse(op_token)?;
        let field = meta.require_field(column)?;

        let value = match op {
            FilterOp::In | FilterOp::Cs | FilterOp::Cd | FilterOp::Ov => {
                parse_list(field.field_type, value_raw)?
            }
            FilterOp::Is => match value_raw {
                "null" => FilterValue::Null,
                "true" => FilterValue::Boolean(true),
                "false" => FilterValue::Boolean(false),
                other => {
                    return Err(CoreError::Validation(format!(
                        "Operator 'is' requires null/true/false, got '{other}'"
                    )))
                }
            },
            _ => parse_scalar(field.field_type, value_raw)?,
        };

        Self::new(meta, column, op, value)
    }
}

/* --------------------------------------------------------------------------
Ordering, cursor, pagination
-------------------------------------------------------------------------- */

/// A validated ordering term.
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub column: &'static str,
    pub descending: bool,
}

impl OrderBy {
    pub fn new(meta: &EntityMeta, column: &str, descending: bool) -> Result<Self, CoreError> {
        meta.require_field(column)?;
        let canonical = meta
            .fields
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(name, _)| *name)
            .expect("column checked above");
        Ok(Self {
            column: canonical,
            descending,
        })
    }

    /// Parse the wire form `column.asc` / `column.desc` (bare column means
    /// ascending).
    pub fn parse(meta: &EntityMeta, raw: &str) -> Result<Self, CoreError> {
        let (column, descending) = match raw.rsplit_once('.') {
            Some((c, "asc")) => (c, false),
            Some((c, "desc")) => (c, true),
            Some((_, other)) => {
                return Err(CoreError::Validation(format!(
                    "Invalid order direction '{other}'. Expected asc or desc"
                )))
            }
            None => (raw, false),
        };
        Self::new(meta, column, descending)
    }
}

/// Keyset cursor: rows strictly beyond `value` in `column`, direction taken
/// from the matching [`OrderBy`] entry (ascending when none matches).
#[derive(Debug, Clone)]
pub struct Cursor {
    pub column: &'static str,
    pub value: FilterValue,
}

impl Cursor {
    pub fn new(meta: &EntityMeta, column: &str, value: FilterValue) -> Result<Self, CoreError> {
        let field = meta.require_field(column)?;
        if value.is_list() || value == FilterValue::Null {
            return Err(CoreError::Validation(
                "Cursor value must be a non-null scalar".to_string(),
            ));
        }
        // A cursor is only meaningful if the value type matches the column.
        let compatible = matches!(
            (field.field_type, &value),
            (FieldType::Text, FilterValue::Text(_))
                | (FieldType::Integer, FilterValue::Integer(_))
                | (FieldType::Float, FilterValue::Float(_))
                | (FieldType::Uuid, FilterValue::Uuid(_))
                | (FieldType::Timestamp, FilterValue::Timestamp(_))
        );
        if !compatible {
            return Err(CoreError::Validation(format!(
                "Cursor value does not match type of column '{column}'"
            )));
        }
        let canonical = meta
            .fields
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(name, _)| *name)
            .expect("column checked above");
        Ok(Self {
            column: canonical,
            value,
        })
    }
}

/// Default page size for paged listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size for paged listings.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Offset pagination, clamped at construction.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page_index: i64,
    pub page_size: i64,
}

impl Pagination {
    pub fn new(page_index: i64, page_size: i64) -> Self {
        Self {
            page_index: page_index.max(0),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        self.page_index * self.page_size
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    const META: EntityMeta = EntityMeta {
        table: "widgets",
        fields: &[
            (
                "id",
                FieldMeta {
                    field_type: FieldType::Uuid,
                    searchable: false,
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
                    searchable: false,
                },
            ),
            (
                "tags",
                FieldMeta {
                    field_type: FieldType::TextArray,
                    searchable: false,
                },
            ),
            (
                "created_at",
                FieldMeta {
                    field_type: FieldType::Timestamp,
                    searchable: false,
                },
            ),
        ],
    };

    #[test]
    fn parse_text_eq() {
        let f = Filter::parse(&META, "title.eq.hello").unwrap();
        assert_eq!(f.column, "title");
        assert_eq!(f.op, FilterOp::Eq);
        assert_eq!(f.value, FilterValue::Text("hello".to_string()));
    }

    #[test]
    fn parse_value_may_contain_dots() {
        let f = Filter::parse(&META, "title.ilike.v1.2.3").unwrap();
        assert_eq!(f.value, FilterValue::Text("v1.2.3".to_string()));
    }

    #[test]
    fn parse_in_list_keeps_exact_elements() {
        let f = Filter::parse(&META, "title.in.(a, b,c)").unwrap();
        assert_eq!(
            f.value,
            FilterValue::TextList(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[test]
    fn parse_integer_in_list() {
        let f = Filter::parse(&META, "amount.in.(1,2,3)").unwrap();
        assert_eq!(f.value, FilterValue::IntegerList(vec![1, 2, 3]));
    }

    #[test]
    fn in_requires_parentheses() {
        assert!(Filter::parse(&META, "title.in.a,b").is_err());
    }

    #[test]
    fn unknown_column_rejected() {
        let err = Filter::parse(&META, "nope.eq.x").unwrap_err();
        assert!(err.to_string().contains("Unknown column"));
    }

    #[test]
    fn unknown_operator_rejected() {
        assert!(Filter::parse(&META, "title.regex.x").is_err());
    }

    #[test]
    fn ordering_op_rejected_for_text() {
        let err = Filter::parse(&META, "title.gt.x").unwrap_err();
        assert!(err.to_string().contains("not allowed"));
    }

    #[test]
    fn like_rejected_for_integer() {
        assert!(Filter::parse(&META, "amount.like.5").is_err());
    }

    #[test]
    fn ordering_ops_allowed_for_integer_and_timestamp() {
        assert!(Filter::parse(&META, "amount.gte.10").is_ok());
        assert!(Filter::parse(&META, "created_at.lt.2026-01-02").is_ok());
    }

    #[test]
    fn boolean_is_and_eq() {
        let f = Filter::parse(&META, "is_active.is.true").unwrap();
        assert_eq!(f.value, FilterValue::Boolean(true));
        let f = Filter::parse(&META, "is_active.eq.false").unwrap();
        assert_eq!(f.value, FilterValue::Boolean(false));
        assert!(Filter::parse(&META, "is_active.is.maybe").is_err());
    }

    #[test]
    fn is_null_accepted_on_any_type() {
        let f = Filter::parse(&META, "title.is.null").unwrap();
        assert_eq!(f.value, FilterValue::Null);
    }

    #[test]
    fn is_boolean_restricted_to_boolean_columns() {
        assert!(Filter::parse(&META, "is_active.is.true").is_ok());
        let err = Filter::parse(&META, "title.is.true").unwrap_err();
        assert!(err.to_string().contains("boolean columns"));
        assert!(Filter::parse(&META, "amount.is.false").is_err());
        assert!(Filter::parse(&META, "created_at.is.true").is_err());
    }

    #[test]
    fn null_rejected_for_pattern_and_ordering_ops() {
        for raw in [
            "title.like.null",
            "title.ilike.null",
            "amount.gt.null",
            "amount.gte.null",
            "created_at.lt.null",
            "created_at.lte.null",
        ] {
            let err = Filter::parse(&META, raw).unwrap_err();
            assert!(err.to_string().contains("null"), "{raw}: {err}");
        }
        // eq/neq keep accepting null (rendered as IS [NOT] NULL).
        assert!(Filter::parse(&META, "title.eq.null").is_ok());
        assert!(Filter::parse(&META, "title.neq.null").is_ok());
    }

    #[test]
    fn array_column_only_accepts_array_ops() {
        assert!(Filter::parse(&META, "tags.cs.(free,couch)").is_ok());
        assert!(Filter::parse(&META, "tags.ov.(a)").is_ok());
        assert!(Filter::parse(&META, "tags.eq.x").is_err());
    }

    #[test]
    fn bad_integer_value_rejected() {
        assert!(Filter::parse(&META, "amount.eq.ten").is_err());
    }

    #[test]
    fn bad_uuid_value_rejected() {
        assert!(Filter::parse(&META, "id.eq.not-a-uuid").is_err());
        assert!(
            Filter::parse(&META, "id.eq.7f1c1b44-9d77-4f0e-a3c8-2f8d2e1a9b10").is_ok()
        );
    }

    #[test]
    fn timestamp_accepts_rfc3339_and_bare_date() {
        assert!(Filter::parse(&META, "created_at.gte.2026-08-24T10:00:00Z").is_ok());
        assert!(Filter::parse(&META, "created_at.gte.2026-08-24").is_ok());
        assert!(Filter::parse(&META, "created_at.gte.yesterday").is_err());
    }

    #[test]
    fn order_parse() {
        let o = OrderBy::parse(&META, "created_at.desc").unwrap();
        assert_eq!(o.column, "created_at");
        assert!(o.descending);

        let o = OrderBy::parse(&META, "title").unwrap();
        assert!(!o.descending);

        assert!(OrderBy::parse(&META, "title.sideways").is_err());
        assert!(OrderBy::parse(&META, "nope.asc").is_err());
    }

    #[test]
    fn cursor_type_must_match_column() {
        assert!(Cursor::new(&META, "amount", FilterValue::Integer(5)).is_ok());
        assert!(Cursor::new(&META, "amount", FilterValue::Text("5".into())).is_err());
        assert!(Cursor::new(&META, "title", FilterValue::Null).is_err());
    }

    #[test]
    fn pagination_clamps() {
        let p = Pagination::new(-3, 0);
        assert_eq!(p.page_index, 0);
        assert_eq!(p.page_size, 1);

        let p = Pagination::new(2, 1000);
        assert_eq!(p.page_size, MAX_PAGE_SIZE);
        assert_eq!(p.offset(), 2 * MAX_PAGE_SIZE);
    }
}
