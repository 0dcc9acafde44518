//! Column-list entries of a SELECT: plain fields, aggregates and CASE.

use std::fmt;

use crate::error::{QbError, QbResult, record};
use crate::operand::{cast_literal, quote_literal};
use crate::param::{ParamList, Value, is_numeric_str};
use crate::where_builder::Where;

fn push_alias(sql: &mut String, alias: Option<&str>) {
    if let Some(alias) = alias.filter(|a| !a.is_empty()) {
        sql.push_str(" AS \"");
        sql.push_str(alias);
        sql.push('"');
    }
}

/// A plain column or expression, optionally aliased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    alias: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `name` or `name AS "alias"`.
    pub fn build(&self) -> String {
        let mut sql = self.name.clone();
        push_alias(&mut sql, self.alias.as_deref());
        sql
    }
}

/// Aggregate function name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggFunction {
    Count,
    Avg,
    Sum,
    Min,
    Max,
    ListAgg,
}

impl AggFunction {
    pub fn as_str(self) -> &'static str {
        match self {
            AggFunction::Count => "COUNT",
            AggFunction::Avg => "AVG",
            AggFunction::Sum => "SUM",
            AggFunction::Min => "MIN",
            AggFunction::Max => "MAX",
            AggFunction::ListAgg => "LISTAGG",
        }
    }
}

impl fmt::Display for AggFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `FUNC([DISTINCT ]expr)[ extra][ AS "alias"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateField {
    expr: String,
    function: AggFunction,
    distinct: bool,
    extra: Option<String>,
    alias: Option<String>,
}

impl AggregateField {
    pub fn new(function: AggFunction, expr: impl Into<String>, distinct: bool) -> Self {
        Self {
            expr: expr.into(),
            function,
            distinct,
            extra: None,
            alias: None,
        }
    }

    /// `LISTAGG(expr, 'delim')`. Several expressions are concatenated with `||`.
    pub fn listagg<S: AsRef<str>>(exprs: &[S], delimiter: &str, distinct: bool) -> Self {
        let joined = exprs.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" || ");
        Self::new(AggFunction::ListAgg, format!("{joined}, '{delimiter}'"), distinct)
    }

    pub fn function(&self) -> AggFunction {
        self.function
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Trailing expression rendered after the closing parenthesis.
    pub fn extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    /// Attach `WITHIN GROUP (ORDER BY ...)`; only legal on LISTAGG.
    pub(crate) fn set_within_group<S: AsRef<str>>(&mut self, order_by: &[S]) -> QbResult<()> {
        if self.function != AggFunction::ListAgg {
            return Err(QbError::contract(
                "The aggregation function of the last field is not LISTAGG.",
            ));
        }
        let cols = order_by.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ");
        self.extra = Some(format!("WITHIN GROUP (ORDER BY {cols})"));
        Ok(())
    }

    /// Aggregates over plain expressions bind nothing; `params` is kept so
    /// every column entry renders through the same path.
    pub fn build(&self, _params: &mut ParamList) -> String {
        let distinct = if self.distinct { "DISTINCT " } else { "" };
        let mut sql = format!("{}({distinct}{})", self.function, self.expr);
        if let Some(extra) = self.extra.as_deref().filter(|e| !e.is_empty()) {
            sql.push(' ');
            sql.push_str(extra);
        }
        push_alias(&mut sql, self.alias.as_deref());
        sql
    }
}

/// Render a THEN / ELSE value.
///
/// With `quoted`, non-numeric strings are wrapped as string literals; other
/// values are written as-is.
fn case_value(value: Value, quoted: bool) -> QbResult<String> {
    match value {
        Value::Text(s) if quoted && !is_numeric_str(&s) => Ok(quote_literal(&s)),
        Value::Text(s) => Ok(s),
        other => cast_literal(&other),
    }
}

/// `CASE WHEN ... THEN ... [ELSE ...] END[ AS "alias"]`.
///
/// # Example
/// ```
/// use oraqb::prelude::*;
///
/// let grade = CaseField::new()
///     .when(Where::new().where_("score", ">=", Param::int(50)))
///     .then("Pass", true)
///     .otherwise("Fail", true)
///     .alias("grade");
///
/// let mut params = ParamList::new();
/// assert_eq!(
///     grade.build(&mut params).unwrap(),
///     "CASE WHEN score >= ? THEN 'Pass' ELSE 'Fail' END AS \"grade\""
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseField {
    cases: Vec<(Where, Option<String>)>,
    default: Option<String>,
    alias: Option<String>,
    build_error: Option<QbError>,
}

impl CaseField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new case; its result is set by the next `then`.
    pub fn when(mut self, condition: Where) -> Self {
        self.push_when(condition);
        self
    }

    /// Set the result of the most recent case.
    pub fn then(mut self, value: impl Into<Value>, quoted: bool) -> Self {
        self.set_then(value.into(), quoted);
        self
    }

    /// Set the ELSE value.
    pub fn otherwise(mut self, value: impl Into<Value>, quoted: bool) -> Self {
        self.set_else(value.into(), quoted);
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub(crate) fn push_when(&mut self, condition: Where) {
        self.cases.push((condition, None));
    }

    pub(crate) fn set_then(&mut self, value: Value, quoted: bool) {
        let Some((_, result)) = self.cases.last_mut() else {
            record(
                &mut self.build_error,
                QbError::structural("No case exists to apply then."),
            );
            return;
        };
        match case_value(value, quoted) {
            Ok(value) => *result = Some(value),
            Err(err) => record(&mut self.build_error, err),
        }
    }

    pub(crate) fn set_else(&mut self, value: Value, quoted: bool) {
        match case_value(value, quoted) {
            Ok(value) => self.default = Some(value),
            Err(err) => record(&mut self.build_error, err),
        }
    }

    /// Render the expression; params come from the WHEN conditions in order.
    pub fn build(&self, params: &mut ParamList) -> QbResult<String> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }
        if self.cases.is_empty() {
            return Err(QbError::structural("No cases defined in CASE expression."));
        }

        let mut sql = String::from("CASE");
        for (condition, result) in &self.cases {
            // A WHEN not followed by THEN keeps an empty result.
            let result = result.as_deref().unwrap_or_default();
            let when = condition.build(params)?;
            if condition.is_negated() {
                sql.push_str(&format!(" WHEN NOT ({when}) THEN {result}"));
            } else {
                sql.push_str(&format!(" WHEN {when} THEN {result}"));
            }
        }
        if let Some(default) = self.default.as_deref().filter(|d| !d.is_empty()) {
            sql.push_str(" ELSE ");
            sql.push_str(default);
        }
        sql.push_str(" END");
        push_alias(&mut sql, self.alias.as_deref());
        Ok(sql)
    }
}

/// One entry of a SELECT column list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectField {
    Plain(Field),
    Aggregate(AggregateField),
    Case(CaseField),
}

impl SelectField {
    pub(crate) fn set_alias(&mut self, alias: &str) {
        let slot = match self {
            SelectField::Plain(f) => &mut f.alias,
            SelectField::Aggregate(f) => &mut f.alias,
            SelectField::Case(f) => &mut f.alias,
        };
        *slot = Some(alias.to_string());
    }

    pub fn build(&self, params: &mut ParamList) -> QbResult<String> {
        match self {
            SelectField::Plain(f) => Ok(f.build()),
            SelectField::Aggregate(f) => Ok(f.build(params)),
            SelectField::Case(f) => f.build(params),
        }
    }
}

impl From<Field> for SelectField {
    fn from(f: Field) -> Self {
        SelectField::Plain(f)
    }
}

impl From<AggregateField> for SelectField {
    fn from(f: AggregateField) -> Self {
        SelectField::Aggregate(f)
    }
}

impl From<CaseField> for SelectField {
    fn from(f: CaseField) -> Self {
        SelectField::Case(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::Param;
    use crate::where_builder::Filter;

    #[test]
    fn field_alias_is_quoted() {
        assert_eq!(Field::new("id").build(), "id");
        assert_eq!(Field::new("u.name").alias("Name").build(), "u.name AS \"Name\"");
        assert_eq!(Field::new("id").alias("").build(), "id");
    }

    #[test]
    fn aggregates() {
        let mut params = ParamList::new();
        let count = AggregateField::new(AggFunction::Count, "orders", true);
        assert_eq!(count.build(&mut params), "COUNT(DISTINCT orders)");

        let avg = AggregateField::new(AggFunction::Avg, "salary", false).alias("avg_salary");
        assert_eq!(avg.build(&mut params), "AVG(salary) AS \"avg_salary\"");
        assert!(params.is_empty());
    }

    #[test]
    fn listagg_within_group_goes_after_parenthesis() {
        let mut agg = AggregateField::listagg(&["first_name", "' '", "last_name"], ",", false);
        agg.set_within_group(&["last_name", "first_name"]).unwrap();
        assert_eq!(
            agg.build(&mut ParamList::new()),
            "LISTAGG(first_name || ' ' || last_name, ',') WITHIN GROUP (ORDER BY last_name, first_name)"
        );
    }

    #[test]
    fn within_group_requires_listagg() {
        let mut agg = AggregateField::new(AggFunction::Sum, "amount", false);
        assert!(agg.set_within_group(&["amount"]).unwrap_err().is_contract());
    }

    #[test]
    fn case_quoting_rules() {
        let case = CaseField::new()
            .when(Where::new().where_("a", "=", 1))
            .then("10", true)
            .when(Where::new().where_("a", "=", 2))
            .then("it's", true)
            .when(Where::new().where_("a", "=", 3))
            .then("other_col", false)
            .otherwise(0, true);
        assert_eq!(
            case.build(&mut ParamList::new()).unwrap(),
            r"CASE WHEN a = 1 THEN 10 WHEN a = 2 THEN 'it\'s' WHEN a = 3 THEN other_col ELSE 0 END"
        );
    }

    #[test]
    fn case_params_come_from_when_conditions() {
        let case = CaseField::new()
            .when(Where::new().where_("score", ">=", Param::int(50)))
            .then("Pass", true)
            .when(Where::new().where_("score", "<", Param::int(50)).negate())
            .then("Fail", true);
        let mut params = ParamList::new();
        assert_eq!(
            case.build(&mut params).unwrap(),
            "CASE WHEN score >= ? THEN 'Pass' WHEN NOT (score < ?) THEN 'Fail' END"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn case_errors() {
        let mut params = ParamList::new();
        assert!(CaseField::new().build(&mut params).unwrap_err().is_structural());
        assert!(
            CaseField::new()
                .then("x", true)
                .when(Where::new().where_("a", "=", 1))
                .then("y", true)
                .build(&mut params)
                .unwrap_err()
                .is_structural()
        );
    }

    #[test]
    fn non_finite_case_values_are_rejected() {
        let case = CaseField::new()
            .when(Where::new().where_("a", "=", 1))
            .then(f64::INFINITY, false);
        assert!(case.build(&mut ParamList::new()).unwrap_err().is_shape());

        let case = CaseField::new()
            .when(Where::new().where_("a", "=", 1))
            .then(1.5, true)
            .otherwise(f64::NAN, true);
        assert!(case.build(&mut ParamList::new()).unwrap_err().is_shape());
    }

    #[test]
    fn when_without_then_renders_an_empty_result() {
        let mut params = ParamList::new();
        let case = CaseField::new()
            .when(Where::new().where_("a", "=", Param::int(1)))
            .when(Where::new().where_("b", "=", 2))
            .then("two", true);
        assert_eq!(
            case.build(&mut params).unwrap(),
            "CASE WHEN a = ? THEN  WHEN b = 2 THEN 'two' END"
        );
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn alias_through_select_field() {
        let mut field = SelectField::from(AggregateField::new(AggFunction::Max, "price", false));
        field.set_alias("top");
        assert_eq!(field.build(&mut ParamList::new()).unwrap(), "MAX(price) AS \"top\"");
    }
}
