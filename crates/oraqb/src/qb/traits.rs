//! Trait definitions for query builders.

use std::fmt;

use serde::Serialize;

use crate::error::QbResult;
use crate::param::{BoundParam, ParamList};

/// Which statement a builder produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendered SQL plus its positional parameters.
///
/// `params[i]` binds to the i-th `?` of `sql`, read left to right.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<BoundParam>,
}

impl BuiltQuery {
    /// Count `?` placeholders outside single-quoted literals.
    ///
    /// Literals produced by this crate escape quotes with a backslash, so a
    /// backslash inside a literal skips the next character.
    pub fn placeholder_count(&self) -> usize {
        let mut count = 0;
        let mut in_literal = false;
        let mut chars = self.sql.chars();
        while let Some(c) = chars.next() {
            match (in_literal, c) {
                (true, '\\') => {
                    chars.next();
                }
                (_, '\'') => in_literal = !in_literal,
                (false, '?') => count += 1,
                _ => {}
            }
        }
        count
    }
}

/// Base trait for all statement builders.
///
/// Rendering is a pure read: calling any of these methods repeatedly on an
/// unchanged builder yields the same result, including the same error.
pub trait SqlQb {
    /// Render the statement, pushing bound values into `params` in
    /// placeholder order.
    fn build_into(&self, params: &mut ParamList) -> QbResult<String>;

    /// The statement kind.
    fn kind(&self) -> StatementKind;

    /// Build the SQL string.
    fn build_sql(&self) -> QbResult<String> {
        let mut params = ParamList::new();
        self.build_into(&mut params)
    }

    /// Collect the bound parameters in placeholder order.
    fn params(&self) -> QbResult<ParamList> {
        let mut params = ParamList::new();
        self.build_into(&mut params)?;
        Ok(params)
    }

    /// Build the output pair handed to a driver.
    fn build(&self) -> QbResult<BuiltQuery> {
        #[cfg(feature = "tracing")]
        {
            self.build_with(&crate::trace::TraceConfig::default())
        }
        #[cfg(not(feature = "tracing"))]
        {
            let mut params = ParamList::new();
            let sql = self.build_into(&mut params)?;
            Ok(BuiltQuery {
                sql,
                params: params.into_vec(),
            })
        }
    }

    /// Build the output pair and emit it through `tracing` using `config`.
    #[cfg(feature = "tracing")]
    fn build_with(&self, config: &crate::trace::TraceConfig) -> QbResult<BuiltQuery> {
        let mut params = ParamList::new();
        let sql = self.build_into(&mut params)?;
        let built = BuiltQuery {
            sql,
            params: params.into_vec(),
        };
        config.emit(self.kind(), &built);
        Ok(built)
    }

    /// Debug helper: the SQL string, or the error message if the builder is
    /// invalid.
    fn to_sql(&self) -> String {
        match self.build_sql() {
            Ok(sql) => sql,
            Err(err) => format!("<invalid {}: {err}>", self.kind()),
        }
    }
}

/// Apply builder steps depending on run-time values.
///
/// # Example
/// ```
/// use oraqb::prelude::*;
///
/// let only_active = true;
/// let q = select()
///     .from("users", None)
///     .make_if(only_active, |q| q.where_("status", "=", "active"));
/// assert_eq!(q.to_sql(), "SELECT * FROM users WHERE status = 'active'");
/// ```
pub trait Conditional: Sized {
    /// Apply `f` when `condition` holds.
    fn make_if(self, condition: bool, f: impl FnOnce(Self) -> Self) -> Self {
        if condition { f(self) } else { self }
    }

    /// Apply `f_if` when `condition` holds, `f_else` otherwise.
    fn make_if_else(
        self,
        condition: bool,
        f_if: impl FnOnce(Self) -> Self,
        f_else: impl FnOnce(Self) -> Self,
    ) -> Self {
        if condition { f_if(self) } else { f_else(self) }
    }

    /// Apply the first case whose key equals `value`; unchanged if none does.
    ///
    /// Cases with different closures need a common type, e.g.
    /// `Box<dyn FnOnce(Self) -> Self>`.
    fn make_switch<K, F, I>(self, value: K, cases: I) -> Self
    where
        K: PartialEq,
        F: FnOnce(Self) -> Self,
        I: IntoIterator<Item = (K, F)>,
    {
        for (key, f) in cases {
            if key == value {
                return f(self);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::ParamType;

    fn built(sql: &str) -> BuiltQuery {
        BuiltQuery {
            sql: sql.to_string(),
            params: Vec::new(),
        }
    }

    #[test]
    fn placeholder_count_skips_literals() {
        assert_eq!(built("SELECT * FROM t WHERE a = ? AND b IN (?, ?)").placeholder_count(), 3);
        assert_eq!(built("SELECT * FROM t WHERE a = '?' AND b = ?").placeholder_count(), 1);
        assert_eq!(built(r"SELECT * FROM t WHERE a = 'it\'s ?' AND b = ?").placeholder_count(), 1);
        assert_eq!(built("SELECT 1 FROM dual").placeholder_count(), 0);
    }

    #[test]
    fn built_query_serializes_as_output_pair() {
        let q = BuiltQuery {
            sql: "DELETE FROM orders WHERE order_id = ?".to_string(),
            params: vec![BoundParam::new(456, ParamType::Integer)],
        };
        assert_eq!(
            serde_json::to_value(&q).unwrap(),
            serde_json::json!({
                "sql": "DELETE FROM orders WHERE order_id = ?",
                "params": [[456, 1]],
            })
        );
    }

    #[test]
    fn statement_kind_display() {
        assert_eq!(StatementKind::Update.to_string(), "UPDATE");
        assert_eq!(serde_json::to_value(StatementKind::Select).unwrap(), "SELECT");
    }
}
