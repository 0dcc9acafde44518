//! DELETE statement builder.

use crate::error::{QbError, QbResult};
use crate::param::ParamList;
use crate::qb::select::push_predicate;
use crate::qb::traits::{Conditional, SqlQb, StatementKind};
use crate::where_builder::{Filter, Where};

/// DELETE query builder.
///
/// Without a WHERE clause the statement deletes every row of the table.
///
/// # Example
/// ```
/// use oraqb::prelude::*;
///
/// let q = delete("orders").where_("order_id", "=", Param::int(456));
/// let built = q.build().unwrap();
/// assert_eq!(built.sql, "DELETE FROM orders WHERE order_id = ?");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delete {
    table: String,
    where_clause: Where,
}

impl Delete {
    /// Create a DELETE builder without a table; set it with [`Delete::table`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: &str) -> Self {
        self.table = table.to_string();
        self
    }

    /// Render the WHERE clause as `WHERE NOT (...)`.
    pub fn negate_where(mut self) -> Self {
        self.where_clause.set_negated();
        self
    }
}

impl Filter for Delete {
    fn filter_mut(&mut self) -> &mut Where {
        &mut self.where_clause
    }
}

impl Conditional for Delete {}

impl SqlQb for Delete {
    fn build_into(&self, params: &mut ParamList) -> QbResult<String> {
        if self.table.is_empty() {
            return Err(QbError::precondition("Table not specified for DELETE."));
        }
        let mut sql = format!("DELETE FROM {}", self.table);
        if self.where_clause.is_pending() {
            push_predicate(&mut sql, " WHERE ", &self.where_clause, params)?;
        }
        Ok(sql)
    }

    fn kind(&self) -> StatementKind {
        StatementKind::Delete
    }
}
