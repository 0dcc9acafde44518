//! Right-hand side values of conditions, SET pairs and batch rows.

use crate::error::{QbError, QbResult};
use crate::param::{Param, ParamList, ParamValue, Value};
use crate::qb::Select;

/// A value placed on the right-hand side of a fragment.
///
/// `Param` renders placeholders and contributes bound parameters; every
/// other variant is inlined into the SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Null,
    Param(Param),
    Raw(Value),
    RawList(Vec<Value>),
    Subquery(Box<Select>),
}

impl Operand {
    pub fn is_null(&self) -> bool {
        matches!(self, Operand::Null)
    }

    /// Whether the operand carries a sequence (raw list or list param).
    pub fn is_list(&self) -> bool {
        match self {
            Operand::RawList(_) => true,
            Operand::Param(p) => p.value().is_list(),
            _ => false,
        }
    }

    /// Render as a single SET / VALUES leaf.
    ///
    /// NULL, `?`, a quoted string, or the value cast to text. Sequences and
    /// subqueries are never legal here.
    pub(crate) fn build_leaf(&self, params: &mut ParamList) -> QbResult<String> {
        match self {
            Operand::Null => Ok("NULL".to_string()),
            Operand::Param(p) => match p.value() {
                ParamValue::Scalar(_) => {
                    params.push_param(p);
                    Ok("?".to_string())
                }
                ParamValue::List(_) => Err(QbError::shape("Value cannot be an array.")),
            },
            Operand::Raw(v) => cast_literal(v),
            Operand::RawList(_) => Err(QbError::shape("Value cannot be an array.")),
            Operand::Subquery(_) => Err(QbError::shape("Value cannot be a subquery.")),
        }
    }
}

macro_rules! impl_operand_from_scalar {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Operand {
                fn from(v: $ty) -> Self {
                    Operand::Raw(v.into())
                }
            }
        )+
    };
}

impl_operand_from_scalar!(i64, i32, i16, i8, u32, u16, u8, f64, f32, bool, String, &str, &String);

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Operand::Null,
            other => Operand::Raw(other),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(v: Option<T>) -> Self {
        Operand::from(Value::from(v))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Operand {
    fn from(items: Vec<T>) -> Self {
        Operand::RawList(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Operand {
    fn from(items: [T; N]) -> Self {
        Operand::RawList(items.into_iter().map(Into::into).collect())
    }
}

impl From<Param> for Operand {
    fn from(p: Param) -> Self {
        Operand::Param(p)
    }
}

impl From<Select> for Operand {
    fn from(s: Select) -> Self {
        Operand::Subquery(Box::new(s))
    }
}

/// Build a subquery operand from a closure over a fresh [`Select`].
///
/// Only `IN` accepts a subquery. The nested statement is wrapped in
/// parentheses, `field IN (SELECT ...)`, and its params are bound in place.
///
/// # Example
/// ```
/// use oraqb::prelude::*;
///
/// let q = select()
///     .select(&["name"])
///     .from("users", None)
///     .where_("id", "IN", subquery(|s| s.select(&["user_id"]).from("orders", None)));
/// assert_eq!(
///     q.to_sql(),
///     "SELECT name FROM users WHERE id IN (SELECT user_id FROM orders)"
/// );
/// ```
pub fn subquery(f: impl FnOnce(Select) -> Select) -> Operand {
    Operand::from(f(Select::new()))
}

/// Wrap a string in single quotes, backslash-escaping quotes, backslashes
/// and NUL bytes.
pub fn quote_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' | '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\0' => out.push_str("\\0"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Comparison literal: strings quoted, numbers as-is, anything else rejected.
pub(crate) fn comparison_literal(v: &Value, op: &str) -> QbResult<String> {
    match v {
        Value::Text(s) => Ok(quote_literal(s)),
        Value::Int(_) | Value::Float(_) if v.is_numeric() => cast_literal(v),
        _ => Err(QbError::shape(format!(
            "{op} operator supports only string or numeric values in raw mode."
        ))),
    }
}

/// Cast a scalar to SQL text: strings quoted, everything else rendered bare.
///
/// NaN and infinities have no SQL literal form and are rejected.
pub(crate) fn cast_literal(v: &Value) -> QbResult<String> {
    Ok(match v {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) if f.is_finite() => f.to_string(),
        Value::Float(f) => {
            return Err(QbError::shape(format!(
                "Value {f} cannot be written as a SQL literal."
            )));
        }
        Value::Text(s) => quote_literal(s),
    })
}
