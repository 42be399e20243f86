//! Generic listing layer: renders validated filter/sort/pagination/search
//! descriptors into SQL and runs them for any entity table.
//!
//! This is the shared machinery behind every admin list endpoint. Entities
//! opt in by implementing [`Table`]; all SQL is built with
//! [`sqlx::QueryBuilder`] and bound parameters. Column names come from the
//! entity's static [`EntityMeta`], never from caller input (the DSL layer
//! rejects unknown columns at parse time), so splicing them into query text
//! is safe.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder};

use curby_core::filter::{Cursor, EntityMeta, Filter, FilterOp, FilterValue, OrderBy, Pagination};
use curby_core::search::{
    build_search_conditions, clamp_limit, SearchCondition, SearchQuery, DEFAULT_LIST_LIMIT,
    MAX_LIST_LIMIT,
};
use curby_core::types::DbId;

/// An entity table usable with the generic listing operations.
pub trait Table {
    /// Row type produced by listing queries.
    type Row: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin;

    /// Table name.
    const TABLE: &'static str;

    /// Column list for SELECT.
    const COLUMNS: &'static str;

    /// Field metadata used to validate filters, ordering, and search.
    fn meta() -> &'static EntityMeta;
}

/// One page of rows plus the unpaged total.
#[derive(Debug)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total: i64,
}

/* --------------------------------------------------------------------------
SQL rendering
-------------------------------------------------------------------------- */

/// Tracks whether ` WHERE ` or ` AND ` should prefix the next predicate.
struct WhereClause {
    started: bool,
}

impl WhereClause {
    fn new() -> Self {
        Self { started: false }
    }

    fn sep(&mut self, qb: &mut QueryBuilder<'_, Postgres>) {
        if self.started {
            qb.push(" AND ");
        } else {
            qb.push(" WHERE ");
            self.started = true;
        }
    }
}

fn push_scalar(qb: &mut QueryBuilder<'_, Postgres>, value: &FilterValue) {
    match value {
        FilterValue::Text(v) => {
            qb.push_bind(v.clone());
        }
        FilterValue::Integer(v) => {
            qb.push_bind(*v);
        }
        FilterValue::Float(v) => {
            qb.push_bind(*v);
        }
        FilterValue::Boolean(v) => {
            qb.push_bind(*v);
        }
        FilterValue::Uuid(v) => {
            qb.push_bind(*v);
        }
        FilterValue::Timestamp(v) => {
            qb.push_bind(*v);
        }
        // Lists and null are handled by the operators that accept them;
        // Filter construction guarantees they never reach here.
        FilterValue::Null
        | FilterValue::TextList(_)
        | FilterValue::IntegerList(_)
        | FilterValue::UuidList(_) => {
            debug_assert!(false, "non-scalar value reached push_scalar");
            qb.push_bind(Option::<String>::None);
        }
    }
}

/// Render `column IN ($1, $2, ...)`. An empty list matches nothing.
fn push_in<'a, T>(qb: &mut QueryBuilder<'a, Postgres>, column: &str, items: &'a [T])
where
    T: Clone + Send + sqlx::Type<Postgres> + sqlx::Encode<'a, Postgres> + 'a,
{
    if items.is_empty() {
        qb.push("FALSE");
        return;
    }
    qb.push(column).push(" IN (");
    let mut separated = qb.separated(", ");
    for item in items {
        separated.push_bind(item.clone());
    }
    qb.push(")");
}

/// Render one validated filter as a SQL predicate with bound parameters.
fn push_filter<'a>(qb: &mut QueryBuilder<'a, Postgres>, filter: &'a Filter) {
    let column = filter.column;
    match (&filter.op, &filter.value) {
        // Null comparisons use IS syntax regardless of operator spelling.
        (FilterOp::Eq, FilterValue::Null) | (FilterOp::Is, FilterValue::Null) => {
            qb.push(column).push(" IS NULL");
        }
        (FilterOp::Neq, FilterValue::Null) => {
            qb.push(column).push(" IS NOT NULL");
        }
        (FilterOp::Is, FilterValue::Boolean(b)) => {
            qb.push(column).push(if *b { " IS TRUE" } else { " IS FALSE" });
        }
        (FilterOp::Eq, v) => {
            qb.push(column).push(" = ");
            push_scalar(qb, v);
        }
        (FilterOp::Neq, v) => {
            qb.push(column).push(" <> ");
            push_scalar(qb, v);
        }
        (FilterOp::Like, v) => {
            qb.push(column).push(" LIKE ");
            push_scalar(qb, v);
        }
        (FilterOp::Ilike, v) => {
            qb.push(column).push(" ILIKE ");
            push_scalar(qb, v);
        }
        (FilterOp::Gt, v) => {
            qb.push(column).push(" > ");
            push_scalar(qb, v);
        }
        (FilterOp::Gte, v) => {
            qb.push(column).push(" >= ");
            push_scalar(qb, v);
        }
        (FilterOp::Lt, v) => {
            qb.push(column).push(" < ");
            push_scalar(qb, v);
        }
        (FilterOp::Lte, v) => {
            qb.push(column).push(" <= ");
            push_scalar(qb, v);
        }
        (FilterOp::In, FilterValue::TextList(items)) => push_in(qb, column, items),
        (FilterOp::In, FilterValue::IntegerList(items)) => push_in(qb, column, items),
        (FilterOp::In, FilterValue::UuidList(items)) => push_in(qb, column, items),
        (FilterOp::Cs, FilterValue::TextList(items)) => {
            qb.push(column).push(" @> ");
            qb.push_bind(items.clone());
        }
        (FilterOp::Cd, FilterValue::TextList(items)) => {
            qb.push(column).push(" <@ ");
            qb.push_bind(items.clone());
        }
        (FilterOp::Ov, FilterValue::TextList(items)) => {
            qb.push(column).push(" && ");
            qb.push_bind(items.clone());
        }
        // Filter construction forbids every other combination.
        (op, value) => {
            debug_assert!(false, "unvalidated filter {op:?} {value:?}");
            qb.push("FALSE");
        }
    }
}

/// Render the OR-combined search group.
fn push_search(qb: &mut QueryBuilder<'_, Postgres>, conditions: &[SearchCondition]) {
    qb.push("(");
    for (i, condition) in conditions.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        match condition {
            SearchCondition::IlikeText { column, pattern } => {
                qb.push(*column).push(" ILIKE ");
                qb.push_bind(pattern.clone());
            }
            SearchCondition::EqInteger { column, value } => {
                qb.push(*column).push(" = ");
                qb.push_bind(*value);
            }
            SearchCondition::EqFloat { column, value } => {
                qb.push(*column).push(" = ");
                qb.push_bind(*value);
            }
            SearchCondition::EqBoolean { column, value } => {
                qb.push(*column).push(" = ");
                qb.push_bind(*value);
            }
            SearchCondition::EqUuid { column, value } => {
                qb.push(*column).push(" = ");
                qb.push_bind(*value);
            }
            SearchCondition::TimestampRange { column, start, end } => {
                qb.push("(").push(*column).push(" >= ");
                qb.push_bind(*start);
                qb.push(" AND ").push(*column).push(" < ");
                qb.push_bind(*end);
                qb.push(")");
            }
        }
    }
    qb.push(")");
}

/// Render the keyset cursor predicate. Direction comes from the matching
/// ordering term (descending order walks backwards through the key).
fn push_cursor<'a>(qb: &mut QueryBuilder<'a, Postgres>, cursor: &'a Cursor, order: &[OrderBy]) {
    let descending = order
        .iter()
        .find(|o| o.column == cursor.column)
        .map(|o| o.descending)
        .unwrap_or(false);
    qb.push(cursor.column).push(if descending { " < " } else { " > " });
    push_scalar(qb, &cursor.value);
}

/// Render all WHERE predicates: filters AND (search group) AND cursor.
fn push_where<'a>(
    qb: &mut QueryBuilder<'a, Postgres>,
    filters: &'a [Filter],
    search: &[SearchCondition],
    cursor: Option<(&'a Cursor, &[OrderBy])>,
) {
    let mut clause = WhereClause::new();
    for filter in filters {
        clause.sep(qb);
        push_filter(qb, filter);
    }
    if !search.is_empty() {
        clause.sep(qb);
        push_search(qb, search);
    }
    if let Some((cursor, order)) = cursor {
        clause.sep(qb);
        push_cursor(qb, cursor, order);
    }
}

fn push_order(qb: &mut QueryBuilder<'_, Postgres>, order: &[OrderBy]) {
    if order.is_empty() {
        return;
    }
    qb.push(" ORDER BY ");
    for (i, term) in order.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(term.column)
            .push(if term.descending { " DESC" } else { " ASC" });
    }
}

fn resolve_search(meta: &EntityMeta, search: Option<&SearchQuery>) -> Vec<SearchCondition> {
    search
        .map(|q| build_search_conditions(meta, q))
        .unwrap_or_default()
}

/* --------------------------------------------------------------------------
Operations
-------------------------------------------------------------------------- */

/// Fetch all matching rows with optional keyset cursor. No total is computed.
pub async fn get_all<T: Table>(
    pool: &PgPool,
    filters: &[Filter],
    order: &[OrderBy],
    cursor: Option<&Cursor>,
    limit: Option<i64>,
) -> Result<Vec<T::Row>, sqlx::Error> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM {}", T::COLUMNS, T::TABLE));
    push_where(&mut qb, filters, &[], cursor.map(|c| (c, order)));
    push_order(&mut qb, order);
    qb.push(" LIMIT ");
    qb.push_bind(clamp_limit(limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT));
    qb.build_query_as::<T::Row>().fetch_all(pool).await
}

/// Fetch one page of rows with offset pagination, an OR-combined multi-column
/// search, and the unpaged total.
pub async fn get_all_paged<T: Table>(
    pool: &PgPool,
    filters: &[Filter],
    order: &[OrderBy],
    pagination: &Pagination,
    search: Option<&SearchQuery>,
) -> Result<Page<T::Row>, sqlx::Error> {
    let conditions = resolve_search(T::meta(), search);

    let mut count_qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", T::TABLE));
    push_where(&mut count_qb, filters, &conditions, None);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::new(format!("SELECT {} FROM {}", T::COLUMNS, T::TABLE));
    push_where(&mut qb, filters, &conditions, None);
    push_order(&mut qb, order);
    qb.push(" LIMIT ");
    qb.push_bind(pagination.page_size);
    qb.push(" OFFSET ");
    qb.push_bind(pagination.offset());
    let rows = qb.build_query_as::<T::Row>().fetch_all(pool).await?;

    Ok(Page { rows, total })
}

/// Count matching rows.
pub async fn count<T: Table>(pool: &PgPool, filters: &[Filter]) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", T::TABLE));
    push_where(&mut qb, filters, &[], None);
    qb.build_query_scalar().fetch_one(pool).await
}

/// Whether any matching row exists.
pub async fn exists<T: Table>(pool: &PgPool, filters: &[Filter]) -> Result<bool, sqlx::Error> {
    let mut qb = QueryBuilder::new(format!("SELECT EXISTS(SELECT 1 FROM {}", T::TABLE));
    push_where(&mut qb, filters, &[], None);
    qb.push(")");
    qb.build_query_scalar().fetch_one(pool).await
}

/// Fetch a row by id, failing with `RowNotFound` when absent.
pub async fn get_by_id<T: Table>(pool: &PgPool, id: DbId) -> Result<T::Row, sqlx::Error> {
    let query = format!("SELECT {} FROM {} WHERE id = $1", T::COLUMNS, T::TABLE);
    sqlx::query_as::<_, T::Row>(&query)
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Fetch a row by id, returning `None` when absent.
pub async fn get_by_id_opt<T: Table>(
    pool: &PgPool,
    id: DbId,
) -> Result<Option<T::Row>, sqlx::Error> {
    let query = format!("SELECT {} FROM {} WHERE id = $1", T::COLUMNS, T::TABLE);
    sqlx::query_as::<_, T::Row>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Fetch the first matching row, failing with `RowNotFound` when none match.
pub async fn get_one<T: Table>(
    pool: &PgPool,
    filters: &[Filter],
    order: &[OrderBy],
) -> Result<T::Row, sqlx::Error> {
    get_one_opt::<T>(pool, filters, order)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

/// Fetch the first matching row, returning `None` when none match.
pub async fn get_one_opt<T: Table>(
    pool: &PgPool,
    filters: &[Filter],
    order: &[OrderBy],
) -> Result<Option<T::Row>, sqlx::Error> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM {}", T::COLUMNS, T::TABLE));
    push_where(&mut qb, filters, &[], None);
    push_order(&mut qb, order);
    qb.push(" LIMIT 1");
    qb.build_query_as::<T::Row>().fetch_optional(pool).await
}

/// Delete a row by id. Returns `true` when a row was deleted.
pub async fn delete_by_id<T: Table>(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
    let query = format!("DELETE FROM {} WHERE id = $1", T::TABLE);
    let result = sqlx::query(&query).bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

/// Delete rows by id list. Returns the number of rows deleted.
pub async fn delete_by_ids<T: Table>(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }
    let query = format!("DELETE FROM {} WHERE id = ANY($1)", T::TABLE);
    let result = sqlx::query(&query).bind(ids).execute(pool).await?;
    Ok(result.rows_affected())
}

/// Delete all rows matching the filters. A no-op when `filters` is empty so
/// a bug can never truncate a table.
pub async fn delete_where<T: Table>(pool: &PgPool, filters: &[Filter]) -> Result<u64, sqlx::Error> {
    if filters.is_empty() {
        return Ok(0);
    }
    let mut qb = QueryBuilder::new(format!("DELETE FROM {}", T::TABLE));
    push_where(&mut qb, filters, &[], None);
    let result = qb.build().execute(pool).await?;
    Ok(result.rows_affected())
}

/* --------------------------------------------------------------------------
Tests (SQL rendering only; execution is covered by crate integration tests)
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use curby_core::filter::{FieldMeta, FieldType};

    const META: EntityMeta = EntityMeta {
        table: "things",
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

    fn rendered(filters: &[Filter], search: &[SearchCondition]) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM things");
        push_where(&mut qb, filters, search, None);
        qb.sql().to_string()
    }

    #[test]
    fn in_filter_binds_one_placeholder_per_element() {
        let filter = Filter::parse(&META, "title.in.(a,b,c)").unwrap();
        let sql = rendered(std::slice::from_ref(&filter), &[]);
        assert!(sql.contains("title IN ($1, $2, $3)"), "got: {sql}");
    }

    #[test]
    fn empty_in_list_matches_nothing() {
        let filter = Filter::parse(&META, "title.in.()").unwrap();
        let sql = rendered(std::slice::from_ref(&filter), &[]);
        assert!(sql.contains("FALSE"), "got: {sql}");
        assert!(!sql.contains("IN ("), "got: {sql}");
    }

    #[test]
    fn filters_are_and_combined() {
        let filters = vec![
            Filter::parse(&META, "title.ilike.%couch%").unwrap(),
            Filter::parse(&META, "amount.gte.3").unwrap(),
        ];
        let sql = rendered(&filters, &[]);
        assert!(
            sql.contains("WHERE title ILIKE $1 AND amount >= $2"),
            "got: {sql}"
        );
    }

    #[test]
    fn null_comparisons_use_is_syntax() {
        let eq_null = Filter::parse(&META, "title.eq.null").unwrap();
        assert!(rendered(std::slice::from_ref(&eq_null), &[]).contains("title IS NULL"));

        let neq_null = Filter::parse(&META, "title.neq.null").unwrap();
        assert!(rendered(std::slice::from_ref(&neq_null), &[]).contains("title IS NOT NULL"));
    }

    #[test]
    fn null_never_reaches_pattern_or_ordering_rendering() {
        // These must fail validation; push_scalar has no rendering for null.
        assert!(Filter::parse(&META, "title.like.null").is_err());
        assert!(Filter::parse(&META, "title.ilike.null").is_err());
        assert!(Filter::parse(&META, "amount.gt.null").is_err());
        assert!(Filter::parse(&META, "created_at.lte.null").is_err());
    }

    #[test]
    fn array_ops_render_postgres_operators() {
        let cs = Filter::parse(&META, "tags.cs.(free,couch)").unwrap();
        assert!(rendered(std::slice::from_ref(&cs), &[]).contains("tags @> $1"));

        let ov = Filter::parse(&META, "tags.ov.(a)").unwrap();
        assert!(rendered(std::slice::from_ref(&ov), &[]).contains("tags && $1"));
    }

    #[test]
    fn search_group_is_or_combined_and_parenthesized() {
        let search = build_search_conditions(&META, &SearchQuery::new("42"));
        let sql = rendered(&[], &search);
        assert!(
            sql.contains("WHERE (title ILIKE $1 OR amount = $2)"),
            "got: {sql}"
        );
    }

    #[test]
    fn filters_and_search_combine_with_and() {
        let filters = vec![Filter::parse(&META, "amount.gt.0").unwrap()];
        let search = build_search_conditions(&META, &SearchQuery::new("curby"));
        let sql = rendered(&filters, &search);
        assert!(
            sql.contains("WHERE amount > $1 AND (title ILIKE $2)"),
            "got: {sql}"
        );
    }

    #[test]
    fn cursor_direction_follows_matching_order_term() {
        let order = vec![OrderBy::new(&META, "created_at", true).unwrap()];
        let cursor = Cursor::new(
            &META,
            "created_at",
            FilterValue::Timestamp(chrono::Utc::now()),
        )
        .unwrap();

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM things");
        push_where(&mut qb, &[], &[], Some((&cursor, &order)));
        assert!(qb.sql().contains("created_at < $1"), "got: {}", qb.sql());

        // Without a matching order term the cursor walks forward.
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM things");
        push_where(&mut qb, &[], &[], Some((&cursor, &[])));
        assert!(qb.sql().contains("created_at > $1"), "got: {}", qb.sql());
    }

    #[test]
    fn order_by_renders_all_terms() {
        let order = vec![
            OrderBy::new(&META, "amount", true).unwrap(),
            OrderBy::new(&META, "title", false).unwrap(),
        ];
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM things");
        push_order(&mut qb, &order);
        assert!(qb.sql().contains(" ORDER BY amount DESC, title ASC"));
    }

    #[test]
    fn no_filters_renders_no_where() {
        let sql = rendered(&[], &[]);
        assert!(!sql.contains("WHERE"), "got: {sql}");
    }
}
