//! UPDATE statement builder.

use crate::batch::Set;
use crate::error::{QbError, QbResult};
use crate::operand::Operand;
use crate::param::ParamList;
use crate::qb::select::push_predicate;
use crate::qb::traits::{Conditional, SqlQb, StatementKind};
use crate::where_builder::{Filter, Where};

/// UPDATE query builder.
///
/// # Example
/// ```
/// use oraqb::prelude::*;
///
/// let q = update("users")
///     .set("name", None::<&str>)
///     .where_("id", "=", Param::int(1));
/// assert_eq!(q.to_sql(), "UPDATE users SET name = NULL WHERE id = ?");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    table: String,
    sets: Vec<Set>,
    where_clause: Where,
}

impl Update {
    /// Create an UPDATE builder without a table; set it with [`Update::table`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: &str) -> Self {
        self.table = table.to_string();
        self
    }

    /// Add `field = value`.
    pub fn set(mut self, field: &str, value: impl Into<Operand>) -> Self {
        self.sets.push(Set::new(field, value));
        self
    }

    /// Add one assignment per pair, in iteration order.
    pub fn set_many<K, V, I>(mut self, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Operand>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.sets
            .extend(pairs.into_iter().map(|(k, v)| Set::new(k, v)));
        self
    }

    /// Render the WHERE clause as `WHERE NOT (...)`.
    pub fn negate_where(mut self) -> Self {
        self.where_clause.set_negated();
        self
    }
}

impl Filter for Update {
    fn filter_mut(&mut self) -> &mut Where {
        &mut self.where_clause
    }
}

impl Conditional for Update {}

impl SqlQb for Update {
    fn build_into(&self, params: &mut ParamList) -> QbResult<String> {
        if self.table.is_empty() {
            return Err(QbError::precondition("Table not specified for UPDATE."));
        }
        if self.sets.is_empty() {
            return Err(QbError::precondition("No SET clauses provided for UPDATE."));
        }

        let sets = self
            .sets
            .iter()
            .map(|s| s.build(params))
            .collect::<QbResult<Vec<_>>>()?;
        let mut sql = format!("UPDATE {} SET {}", self.table, sets.join(", "));

        if self.where_clause.is_pending() {
            push_predicate(&mut sql, " WHERE ", &self.where_clause, params)?;
        }
        Ok(sql)
    }

    fn kind(&self) -> StatementKind {
        StatementKind::Update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{Param, ParamType};

    #[test]
    fn set_params_precede_where_params() {
        let q = Update::new()
            .table("employees")
            .set("salary", Param::int(75000))
            .where_("id", "=", Param::string("E-1"));
        let built = q.build().unwrap();
        assert_eq!(built.sql, "UPDATE employees SET salary = ? WHERE id = ?");
        assert_eq!(built.params[0].ty, ParamType::Integer);
        assert_eq!(built.params[1].ty, ParamType::String);
    }

    #[test]
    fn set_many_keeps_order() {
        let q = Update::new()
            .table("orders")
            .set_many([("status", "pending"), ("priority", "high")])
            .set("shipping", "standard");
        assert_eq!(
            q.to_sql(),
            "UPDATE orders SET status = 'pending', priority = 'high', shipping = 'standard'"
        );
    }

    #[test]
    fn preconditions() {
        assert!(Update::new().set("a", 1).build_sql().unwrap_err().is_precondition());
        assert!(Update::new().table("t").build_sql().unwrap_err().is_precondition());
    }

    #[test]
    fn array_value_is_rejected() {
        let err = Update::new()
            .table("t")
            .set("tags", Param::string(vec!["a", "b"]))
            .build_sql()
            .unwrap_err();
        assert!(err.is_shape());
    }

    #[test]
    fn failed_first_term_never_drops_the_where_clause() {
        let err = Update::new()
            .table("users")
            .set("x", 1)
            .and_where("id", "=", 1)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            QbError::structural("No initial condition exists for AND condition.")
        );

        let err = Update::new()
            .table("users")
            .set("x", 1)
            .where_("id", "like", 1)
            .negate_where()
            .build_sql()
            .unwrap_err();
        assert!(err.is_operator());
    }

    #[test]
    fn non_finite_float_is_rejected() {
        let err = Update::new()
            .table("metrics")
            .set("ratio", f64::NAN)
            .build_sql()
            .unwrap_err();
        assert!(err.is_shape());
    }

    #[test]
    fn negated_where() {
        let q = Update::new()
            .table("t")
            .set("archived", 1)
            .where_("active", "=", 1)
            .negate_where();
        assert_eq!(q.to_sql(), "UPDATE t SET archived = 1 WHERE NOT (active = 1)");
    }
}
