//! SELECT statement builder with Oracle-style pagination and UNION chains.

use crate::error::{QbError, QbResult, record};
use crate::field::{AggFunction, AggregateField, CaseField, Field, SelectField};
use crate::join::{Join, JoinKind, JoinTarget, On};
use crate::order::Order;
use crate::param::{ParamList, Value};
use crate::qb::traits::{Conditional, SqlQb, StatementKind};
use crate::where_builder::{Filter, Where};

/// How a chain entry is attached to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionKind {
    /// `UNION`
    Distinct,
    /// `UNION ALL`
    All,
}

impl UnionKind {
    fn keyword(self) -> &'static str {
        match self {
            UnionKind::Distinct => " UNION ",
            UnionKind::All => " UNION ALL ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Source {
    Table(String),
    Subquery(Box<Select>),
}

/// One SELECT of a union chain.
#[derive(Debug, Clone, Default, PartialEq)]
struct SelectCore {
    /// Link to the previous entry; `None` for the chain head.
    link: Option<UnionKind>,
    fields: Vec<SelectField>,
    distinct: bool,
    source: Option<Source>,
    source_alias: Option<String>,
    joins: Vec<Join>,
    where_clause: Where,
    group_by: Vec<String>,
    having: Option<Where>,
    order_by: Vec<Order>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl SelectCore {
    fn build(&self, params: &mut ParamList) -> QbResult<String> {
        let mut sql = String::from("SELECT");
        if self.distinct {
            sql.push_str(" DISTINCT");
        }

        if self.fields.is_empty() {
            sql.push_str(" *");
        } else {
            let fields = self
                .fields
                .iter()
                .map(|f| f.build(params))
                .collect::<QbResult<Vec<_>>>()?;
            sql.push(' ');
            sql.push_str(&fields.join(", "));
        }

        match &self.source {
            Some(Source::Table(table)) if !table.is_empty() => {
                sql.push_str(" FROM ");
                sql.push_str(table);
            }
            Some(Source::Subquery(select)) => {
                sql.push_str(" FROM (");
                sql.push_str(&select.build_into(params)?);
                sql.push(')');
            }
            _ => return Err(QbError::precondition("Source not specified for SELECT.")),
        }
        if let Some(alias) = self.source_alias.as_deref().filter(|a| !a.is_empty()) {
            sql.push(' ');
            sql.push_str(alias);
        }

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.build(params)?);
        }

        if self.where_clause.is_pending() {
            push_predicate(&mut sql, " WHERE ", &self.where_clause, params)?;
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if let Some(having) = &self.having {
            push_predicate(&mut sql, " HAVING ", having, params)?;
        }

        if !self.order_by.is_empty() {
            let orders = self
                .order_by
                .iter()
                .map(Order::build)
                .collect::<QbResult<Vec<_>>>()?;
            sql.push_str(" ORDER BY ");
            sql.push_str(&orders.join(", "));
        }

        if let Some(limit) = self.limit {
            let offset = self.offset.unwrap_or(0);
            sql.push_str(&format!(" OFFSET {offset} ROWS FETCH NEXT {limit} ROWS ONLY"));
        }

        Ok(sql)
    }
}

/// Append `keyword` and a top-level predicate, wrapping it as `NOT (...)`
/// when the predicate is negated.
pub(crate) fn push_predicate(
    sql: &mut String,
    keyword: &str,
    predicate: &Where,
    params: &mut ParamList,
) -> QbResult<()> {
    let body = predicate.build(params)?;
    sql.push_str(keyword);
    if predicate.is_negated() {
        sql.push_str("NOT (");
        sql.push_str(&body);
        sql.push(')');
    } else {
        sql.push_str(&body);
    }
    Ok(())
}

/// SELECT query builder.
///
/// A `Select` owns a whole UNION chain. [`union`](Select::union) appends a
/// new entry and moves the build cursor to it, so the following calls
/// configure the new SELECT; [`root`](Select::root) moves the cursor back to
/// the head. Rendering always starts from the head.
///
/// # Example
/// ```
/// use oraqb::prelude::*;
///
/// let q = select()
///     .select(&["id", "name"])
///     .from("users", None)
///     .where_("status", "=", Param::string("active"))
///     .order_by_asc("name")
///     .limit(10)
///     .offset(5);
///
/// let built = q.build().unwrap();
/// assert_eq!(
///     built.sql,
///     "SELECT id, name FROM users WHERE status = ? ORDER BY name ASC OFFSET 5 ROWS FETCH NEXT 10 ROWS ONLY"
/// );
/// assert_eq!(built.params.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    chain: Vec<SelectCore>,
    cursor: usize,
    build_error: Option<QbError>,
}

impl Default for Select {
    fn default() -> Self {
        Self::new()
    }
}

impl Select {
    pub fn new() -> Self {
        Self {
            chain: vec![SelectCore::default()],
            cursor: 0,
            build_error: None,
        }
    }

    fn core(&mut self) -> &mut SelectCore {
        let idx = self.cursor;
        &mut self.chain[idx]
    }

    fn fail(&mut self, err: QbError) {
        record(&mut self.build_error, err);
    }

    /// First error recorded while building, if any.
    pub fn build_error(&self) -> Option<&QbError> {
        self.build_error.as_ref()
    }

    // ==================== Fields ====================

    /// Append plain columns.
    pub fn select<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
        let core = self.core();
        core.fields
            .extend(fields.iter().map(|f| SelectField::Plain(Field::new(f.as_ref()))));
        self
    }

    /// Append a prebuilt column entry.
    pub fn field(mut self, field: impl Into<SelectField>) -> Self {
        self.core().fields.push(field.into());
        self
    }

    /// SELECT DISTINCT.
    pub fn distinct(mut self) -> Self {
        self.core().distinct = true;
        self
    }

    /// Alias the last `aliases.len()` fields, in order.
    pub fn alias<S: AsRef<str>>(mut self, aliases: &[S]) -> Self {
        let Some(start) = self.core().fields.len().checked_sub(aliases.len()) else {
            self.fail(QbError::structural(
                "Number of aliases exceeds the number of fields.",
            ));
            return self;
        };
        for (field, alias) in self.core().fields[start..].iter_mut().zip(aliases) {
            field.set_alias(alias.as_ref());
        }
        self
    }

    fn aggregate(mut self, function: AggFunction, field: &str, distinct: bool) -> Self {
        self.core()
            .fields
            .push(AggregateField::new(function, field, distinct).into());
        self
    }

    /// `COUNT([DISTINCT ]field)`.
    pub fn count(self, field: &str, distinct: bool) -> Self {
        self.aggregate(AggFunction::Count, field, distinct)
    }

    /// `AVG([DISTINCT ]field)`.
    pub fn avg(self, field: &str, distinct: bool) -> Self {
        self.aggregate(AggFunction::Avg, field, distinct)
    }

    /// `SUM([DISTINCT ]field)`.
    pub fn sum(self, field: &str, distinct: bool) -> Self {
        self.aggregate(AggFunction::Sum, field, distinct)
    }

    /// `MIN([DISTINCT ]field)`.
    pub fn min(self, field: &str, distinct: bool) -> Self {
        self.aggregate(AggFunction::Min, field, distinct)
    }

    /// `MAX([DISTINCT ]field)`.
    pub fn max(self, field: &str, distinct: bool) -> Self {
        self.aggregate(AggFunction::Max, field, distinct)
    }

    /// `LISTAGG(e1 || e2, 'delimiter')`.
    pub fn listagg<S: AsRef<str>>(mut self, exprs: &[S], delimiter: &str, distinct: bool) -> Self {
        self.core()
            .fields
            .push(AggregateField::listagg(exprs, delimiter, distinct).into());
        self
    }

    /// Attach `WITHIN GROUP (ORDER BY ...)` to the last field, which must be
    /// a LISTAGG.
    pub fn within_group<S: AsRef<str>>(mut self, order_by: &[S]) -> Self {
        let result = match self.core().fields.last_mut() {
            None => Err(QbError::structural(
                "No fields available to apply WITHIN GROUP clause.",
            )),
            Some(SelectField::Aggregate(agg)) => agg.set_within_group(order_by),
            Some(_) => Err(QbError::contract("The last field is not an aggregate field.")),
        };
        if let Err(err) = result {
            self.fail(err);
        }
        self
    }

    // ==================== CASE ====================

    /// Start a CASE expression as a new field.
    pub fn case(mut self) -> Self {
        self.core().fields.push(CaseField::new().into());
        self
    }

    fn with_case(mut self, apply: impl FnOnce(&mut CaseField)) -> Self {
        match self.core().fields.last_mut() {
            Some(SelectField::Case(case)) => apply(case),
            _ => self.fail(QbError::contract("Last field is not a CaseField.")),
        }
        self
    }

    /// Add a WHEN branch to the current CASE.
    pub fn when(self, f: impl FnOnce(Where) -> Where) -> Self {
        self.with_case(|case| case.push_when(f(Where::new())))
    }

    /// THEN value, quoted unless numeric.
    pub fn then(self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.with_case(|case| case.set_then(value, true))
    }

    /// THEN value written verbatim (a column or expression).
    pub fn then_raw(self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.with_case(|case| case.set_then(value, false))
    }

    /// ELSE value, quoted unless numeric.
    pub fn otherwise(self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.with_case(|case| case.set_else(value, true))
    }

    /// ELSE value written verbatim.
    pub fn otherwise_raw(self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.with_case(|case| case.set_else(value, false))
    }

    // ==================== FROM / JOIN ====================

    /// FROM a table, optionally aliased.
    pub fn from<'a>(mut self, table: &str, alias: impl Into<Option<&'a str>>) -> Self {
        let core = self.core();
        core.source = Some(Source::Table(table.to_string()));
        core.source_alias = alias.into().map(str::to_string);
        self
    }

    /// FROM a subquery built by `f`.
    pub fn from_sub<'a>(
        mut self,
        f: impl FnOnce(Select) -> Select,
        alias: impl Into<Option<&'a str>>,
    ) -> Self {
        let sub = f(Select::new());
        let core = self.core();
        core.source = Some(Source::Subquery(Box::new(sub)));
        core.source_alias = alias.into().map(str::to_string);
        self
    }

    /// Add a join against a table.
    pub fn join<'a>(mut self, kind: JoinKind, table: &str, alias: impl Into<Option<&'a str>>) -> Self {
        let join = Join::new(
            kind,
            JoinTarget::Table(table.to_string()),
            alias.into().map(str::to_string),
        );
        self.core().joins.push(join);
        self
    }

    /// Add a join against a subquery built by `f`.
    pub fn join_sub<'a>(
        mut self,
        kind: JoinKind,
        f: impl FnOnce(Select) -> Select,
        alias: impl Into<Option<&'a str>>,
    ) -> Self {
        let target = JoinTarget::Subquery(Box::new(f(Select::new())));
        let join = Join::new(kind, target, alias.into().map(str::to_string));
        self.core().joins.push(join);
        self
    }

    pub fn inner_join<'a>(self, table: &str, alias: impl Into<Option<&'a str>>) -> Self {
        self.join(JoinKind::Inner, table, alias)
    }

    pub fn left_join<'a>(self, table: &str, alias: impl Into<Option<&'a str>>) -> Self {
        self.join(JoinKind::Left, table, alias)
    }

    pub fn right_join<'a>(self, table: &str, alias: impl Into<Option<&'a str>>) -> Self {
        self.join(JoinKind::Right, table, alias)
    }

    pub fn outer_join<'a>(self, table: &str, alias: impl Into<Option<&'a str>>) -> Self {
        self.join(JoinKind::Outer, table, alias)
    }

    pub fn inner_join_sub<'a>(
        self,
        f: impl FnOnce(Select) -> Select,
        alias: impl Into<Option<&'a str>>,
    ) -> Self {
        self.join_sub(JoinKind::Inner, f, alias)
    }

    pub fn left_join_sub<'a>(
        self,
        f: impl FnOnce(Select) -> Select,
        alias: impl Into<Option<&'a str>>,
    ) -> Self {
        self.join_sub(JoinKind::Left, f, alias)
    }

    pub fn right_join_sub<'a>(
        self,
        f: impl FnOnce(Select) -> Select,
        alias: impl Into<Option<&'a str>>,
    ) -> Self {
        self.join_sub(JoinKind::Right, f, alias)
    }

    pub fn outer_join_sub<'a>(
        self,
        f: impl FnOnce(Select) -> Select,
        alias: impl Into<Option<&'a str>>,
    ) -> Self {
        self.join_sub(JoinKind::Outer, f, alias)
    }

    /// Set `ON source = target` on the most recent join.
    pub fn on(mut self, source: &str, target: &str) -> Self {
        match self.core().joins.last_mut() {
            Some(join) => join.set_on(On::new(source, target)),
            None => self.fail(QbError::structural("No join exists in the query.")),
        }
        self
    }

    // ==================== WHERE / GROUP BY / HAVING ====================

    /// Render the WHERE clause as `WHERE NOT (...)`.
    pub fn negate_where(mut self) -> Self {
        self.core().where_clause.set_negated();
        self
    }

    /// Append GROUP BY columns.
    pub fn group_by<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
        if fields.is_empty() {
            self.fail(QbError::structural(
                "At least one GROUP BY field must be provided.",
            ));
            return self;
        }
        self.core()
            .group_by
            .extend(fields.iter().map(|f| f.as_ref().to_string()));
        self
    }

    /// Set the HAVING predicate; GROUP BY must already be present.
    ///
    /// A predicate marked with [`Where::negate`] renders as `HAVING NOT (...)`.
    pub fn having(mut self, f: impl FnOnce(Where) -> Where) -> Self {
        if self.core().group_by.is_empty() {
            self.fail(QbError::structural(
                "Cannot set HAVING clause when GROUP BY list is empty.",
            ));
            return self;
        }
        self.core().having = Some(f(Where::new()));
        self
    }

    // ==================== ORDER BY ====================

    /// ORDER BY a column without direction.
    pub fn order_by(mut self, field: &str) -> Self {
        self.core().order_by.push(Order::new(field, None));
        self
    }

    /// ORDER BY column ASC.
    pub fn order_by_asc(mut self, field: &str) -> Self {
        self.core().order_by.push(Order::asc(field));
        self
    }

    /// ORDER BY column DESC.
    pub fn order_by_desc(mut self, field: &str) -> Self {
        self.core().order_by.push(Order::desc(field));
        self
    }

    /// ORDER BY with a direction given as text (checked at render time).
    pub fn order_by_dir(mut self, field: &str, direction: &str) -> Self {
        self.core().order_by.push(Order::new(field, Some(direction)));
        self
    }

    // ==================== Pagination ====================

    /// Rows to fetch; enables `OFFSET .. ROWS FETCH NEXT .. ROWS ONLY`.
    pub fn limit(mut self, n: i64) -> Self {
        self.core().limit = Some(n);
        self
    }

    /// Rows to skip; only rendered together with a limit.
    pub fn offset(mut self, n: i64) -> Self {
        self.core().offset = Some(n);
        self
    }

    /// Pagination helper.
    ///
    /// `page` is 1-based (clamped to >= 1).
    /// `per_page` is clamped to >= 1.
    pub fn paginate(mut self, page: i64, per_page: i64) -> Self {
        let p = page.max(1);
        let size = per_page.max(1);
        let core = self.core();
        core.limit = Some(size);
        core.offset = Some((p - 1) * size);
        self
    }

    // ==================== UNION ====================

    fn link(mut self, kind: UnionKind) -> Self {
        self.chain.push(SelectCore {
            link: Some(kind),
            ..SelectCore::default()
        });
        self.cursor = self.chain.len() - 1;
        self
    }

    /// Start a new SELECT joined with `UNION`; later calls configure it.
    ///
    /// The new SELECT is always appended at the end of the chain, also after
    /// [`root`](Select::root) moved the cursor back to the head.
    pub fn union(self) -> Self {
        self.link(UnionKind::Distinct)
    }

    /// Start a new SELECT joined with `UNION ALL`.
    pub fn union_all(self) -> Self {
        self.link(UnionKind::All)
    }

    /// Move the build cursor back to the head of the chain.
    pub fn root(mut self) -> Self {
        self.cursor = 0;
        self
    }

    /// Whether the cursor is on the head of the chain.
    pub fn is_root(&self) -> bool {
        self.cursor == 0
    }

    /// Number of SELECTs in the union chain.
    pub fn chain_len(&self) -> usize {
        self.chain.len()
    }
}

impl Filter for Select {
    fn filter_mut(&mut self) -> &mut Where {
        &mut self.core().where_clause
    }
}

impl Conditional for Select {}

impl SqlQb for Select {
    fn build_into(&self, params: &mut ParamList) -> QbResult<String> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }
        let mut sql = String::new();
        for core in &self.chain {
            if let Some(link) = core.link {
                sql.push_str(link.keyword());
            }
            sql.push_str(&core.build(params)?);
        }
        Ok(sql)
    }

    fn kind(&self) -> StatementKind {
        StatementKind::Select
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::Param;

    #[test]
    fn select_star_by_default() {
        assert_eq!(Select::new().from("dual", None).to_sql(), "SELECT * FROM dual");
    }

    #[test]
    fn missing_source_is_a_precondition_error() {
        let err = Select::new().select(&["id"]).build_sql().unwrap_err();
        assert!(err.is_precondition());
        let err = Select::new().from("", None).build_sql().unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn aliases_apply_to_trailing_fields() {
        let q = Select::new()
            .select(&["id", "first_name", "last_name"])
            .alias(&["First", "Last"])
            .from("people", "p");
        assert_eq!(
            q.to_sql(),
            "SELECT id, first_name AS \"First\", last_name AS \"Last\" FROM people p"
        );
    }

    #[test]
    fn too_many_aliases() {
        let err = Select::new()
            .select(&["id"])
            .alias(&["a", "b"])
            .from("t", None)
            .build_sql()
            .unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn offset_defaults_to_zero() {
        let q = Select::new().from("t", None).limit(3);
        assert_eq!(q.to_sql(), "SELECT * FROM t OFFSET 0 ROWS FETCH NEXT 3 ROWS ONLY");
    }

    #[test]
    fn offset_alone_is_not_rendered() {
        let q = Select::new().from("t", None).offset(3);
        assert_eq!(q.to_sql(), "SELECT * FROM t");
    }

    #[test]
    fn paginate_clamps() {
        let q = Select::new().from("t", None).paginate(3, 20);
        assert_eq!(q.to_sql(), "SELECT * FROM t OFFSET 40 ROWS FETCH NEXT 20 ROWS ONLY");
        let q = Select::new().from("t", None).paginate(0, 0);
        assert_eq!(q.to_sql(), "SELECT * FROM t OFFSET 0 ROWS FETCH NEXT 1 ROWS ONLY");
    }

    #[test]
    fn negated_where_is_wrapped_by_the_statement() {
        let q = Select::new()
            .from("t", None)
            .where_("a", "=", 1)
            .or_where("b", "=", 2)
            .negate_where();
        assert_eq!(q.to_sql(), "SELECT * FROM t WHERE NOT (a = 1 OR b = 2)");
    }

    #[test]
    fn having_requires_group_by() {
        let err = Select::new()
            .from("t", None)
            .having(|h| h.where_("COUNT(*)", ">", 1))
            .build_sql()
            .unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn empty_group_by_is_rejected() {
        let err = Select::new()
            .from("t", None)
            .group_by::<&str>(&[])
            .build_sql()
            .unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn group_by_accumulates_and_negated_having() {
        let q = Select::new()
            .select(&["a", "b"])
            .count("*", false)
            .from("t", None)
            .group_by(&["a"])
            .group_by(&["b"])
            .having(|h| h.where_("COUNT(*)", "<", Param::int(2)).negate());
        let built = q.build().unwrap();
        assert_eq!(
            built.sql,
            "SELECT a, b, COUNT(*) FROM t GROUP BY a, b HAVING NOT (COUNT(*) < ?)"
        );
        assert_eq!(built.params.len(), 1);
    }

    #[test]
    fn on_without_join() {
        let err = Select::new().from("t", None).on("a", "b").build_sql().unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn case_ops_need_a_case_field() {
        let err = Select::new()
            .select(&["id"])
            .then("x")
            .from("t", None)
            .build_sql()
            .unwrap_err();
        assert!(err.is_contract());

        let err = Select::new()
            .when(|w| w.where_("a", "=", 1))
            .from("t", None)
            .build_sql()
            .unwrap_err();
        assert!(err.is_contract());
    }

    #[test]
    fn within_group_errors() {
        let err = Select::new().within_group(&["a"]).from("t", None).build_sql().unwrap_err();
        assert!(err.is_structural());

        let err = Select::new()
            .select(&["a"])
            .within_group(&["a"])
            .from("t", None)
            .build_sql()
            .unwrap_err();
        assert!(err.is_contract());

        let err = Select::new()
            .max("a", false)
            .within_group(&["a"])
            .from("t", None)
            .build_sql()
            .unwrap_err();
        assert!(err.is_contract());
    }

    #[test]
    fn invalid_order_direction() {
        let err = Select::new()
            .from("t", None)
            .order_by_dir("a", "up")
            .build_sql()
            .unwrap_err();
        assert!(err.is_operator());
    }

    #[test]
    fn union_cursor_and_root() {
        let q = Select::new()
            .select(&["id"])
            .from("a", None)
            .union_all()
            .select(&["id"])
            .from("b", None);
        assert!(!q.is_root());
        assert_eq!(q.chain_len(), 2);

        let q = q.root().where_("id", ">", Param::int(10));
        assert!(q.is_root());
        let built = q.build().unwrap();
        assert_eq!(
            built.sql,
            "SELECT id FROM a WHERE id > ? UNION ALL SELECT id FROM b"
        );
        assert_eq!(built.params.len(), 1);
    }

    #[test]
    fn failed_first_term_never_drops_the_where_clause() {
        let err = Select::new()
            .from("t", None)
            .where_("a", "<>", 1)
            .build()
            .unwrap_err();
        assert_eq!(err, QbError::operator("Invalid operator: <>"));

        let err = Select::new()
            .from("a", None)
            .union()
            .from("b", None)
            .or_where_group(|w| w.where_("x", "=", 1))
            .build_sql()
            .unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn union_after_root_appends_to_the_chain() {
        let q = Select::new()
            .from("a", None)
            .union()
            .from("b", None)
            .root()
            .union_all()
            .from("c", None);
        assert_eq!(q.chain_len(), 3);
        assert_eq!(
            q.to_sql(),
            "SELECT * FROM a UNION SELECT * FROM b UNION ALL SELECT * FROM c"
        );
    }

    #[test]
    fn rendering_is_idempotent() {
        let q = Select::new()
            .from("t", None)
            .where_("a", "IN", Param::int(vec![1, 2]));
        assert_eq!(q.build().unwrap(), q.build().unwrap());

        let bad = Select::new().from("t", None).where_("a", "?", 1);
        assert_eq!(bad.build().unwrap_err(), bad.build().unwrap_err());
    }
}
