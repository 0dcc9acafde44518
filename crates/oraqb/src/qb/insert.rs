//! INSERT statement builder (multi-row VALUES).

use crate::batch::{Batch, Record};
use crate::error::{QbError, QbResult, record};
use crate::param::ParamList;
use crate::qb::traits::{Conditional, SqlQb, StatementKind};

/// INSERT query builder.
///
/// # Example
/// ```
/// use oraqb::prelude::*;
///
/// let q = insert("users")
///     .record(Record::new().value("name", "Bob").value("age", 40))
///     .record(Record::new().value("age", Param::int(30)).value("name", Param::string("Ann")));
///
/// let built = q.build().unwrap();
/// assert_eq!(built.sql, "INSERT INTO users (name, age) VALUES ('Bob', 40), (?, ?)");
/// assert_eq!(built.params.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insert {
    table: String,
    batch: Batch,
    build_error: Option<QbError>,
}

impl Insert {
    /// Create an INSERT builder without a table; set it with [`Insert::table`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: &str) -> Self {
        self.table = table.to_string();
        self
    }

    /// Append one row.
    pub fn record(mut self, row: Record) -> Self {
        if let Err(err) = self.batch.add(row) {
            record(&mut self.build_error, err);
        }
        self
    }

    /// Append several rows in order.
    pub fn records(self, rows: impl IntoIterator<Item = Record>) -> Self {
        rows.into_iter().fold(self, Insert::record)
    }

    /// First error recorded while building, if any.
    pub fn build_error(&self) -> Option<&QbError> {
        self.build_error.as_ref()
    }
}

impl Conditional for Insert {}

impl SqlQb for Insert {
    fn build_into(&self, params: &mut ParamList) -> QbResult<String> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }
        if self.table.is_empty() {
            return Err(QbError::precondition("Table name not specified for INSERT."));
        }
        if !self.batch.is_initialized() {
            return Err(QbError::precondition("Batch is not initialized for INSERT query."));
        }
        Ok(format!("INSERT INTO {} {}", self.table, self.batch.build(params)?))
    }

    fn kind(&self) -> StatementKind {
        StatementKind::Insert
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::Param;

    #[test]
    fn single_row() {
        let q = Insert::new()
            .table("users")
            .record(Record::new().value("name", Param::string("Alice")).value("age", Param::int(30)));
        let built = q.build().unwrap();
        assert_eq!(built.sql, "INSERT INTO users (name, age) VALUES (?, ?)");
        assert_eq!(built.params.len(), 2);
    }

    #[test]
    fn null_values_render_inline() {
        let q = Insert::new()
            .table("users")
            .record(Record::new().value("name", "Zed").value("email", None::<&str>));
        assert_eq!(q.to_sql(), "INSERT INTO users (name, email) VALUES ('Zed', NULL)");
    }

    #[test]
    fn infinite_value_fails_at_render() {
        let q = Insert::new()
            .table("readings")
            .record(Record::new().value("sensor", 1).value("value", f64::INFINITY));
        assert!(q.build().unwrap_err().is_shape());
    }

    #[test]
    fn preconditions() {
        let err = Insert::new()
            .record(Record::new().value("a", 1))
            .build_sql()
            .unwrap_err();
        assert!(err.is_precondition());

        let err = Insert::new().table("t").build_sql().unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn mismatched_record_surfaces_at_render() {
        let q = Insert::new().table("t").records([
            Record::new().value("a", 1).value("b", 2),
            Record::new().value("b", 3),
        ]);
        assert!(q.build_sql().unwrap_err().is_structural());
    }

    #[test]
    fn conditional_rows() {
        let with_admin = false;
        let q = Insert::new()
            .table("roles")
            .record(Record::new().value("name", "user"))
            .make_if(with_admin, |q| q.record(Record::new().value("name", "admin")));
        assert_eq!(q.to_sql(), "INSERT INTO roles (name) VALUES ('user')");
    }
}
