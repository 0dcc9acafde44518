//! Single comparison fragments for WHERE / HAVING / CASE WHEN.
//!
//! A [`Condition`] is `field OP value`. How `value` renders depends on the
//! operator and on whether it is bound (a [`Param`](crate::Param)), inlined
//! (a raw literal or list), NULL, or a nested SELECT.

use std::fmt;

use crate::error::{QbError, QbResult};
use crate::operand::{Operand, comparison_literal};
use crate::param::{ParamList, ParamValue};
use crate::qb::SqlQb;

/// Comparison operator accepted by a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`
    Eq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Lte,
    /// `>=`
    Gte,
    /// `!=`
    Ne,
    /// `LIKE`
    Like,
    /// `BETWEEN a AND b`
    Between,
    /// `IN (...)`
    In,
}

impl Operator {
    /// Parse an operator from its SQL spelling (exact match).
    pub fn parse(op: &str) -> QbResult<Self> {
        match op {
            "=" => Ok(Self::Eq),
            "<" => Ok(Self::Lt),
            ">" => Ok(Self::Gt),
            "<=" => Ok(Self::Lte),
            ">=" => Ok(Self::Gte),
            "!=" => Ok(Self::Ne),
            "LIKE" => Ok(Self::Like),
            "BETWEEN" => Ok(Self::Between),
            "IN" => Ok(Self::In),
            other => Err(QbError::operator(format!("Invalid operator: {other}"))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Lte => "<=",
            Self::Gte => ">=",
            Self::Ne => "!=",
            Self::Like => "LIKE",
            Self::Between => "BETWEEN",
            Self::In => "IN",
        }
    }

    /// Operators that take `NOT` between field and operator
    /// (`field NOT LIKE ?`) rather than as a prefix (`NOT field = ?`).
    pub fn negates_inline(self) -> bool {
        matches!(self, Self::Like | Self::Between | Self::In)
    }

    /// Operators comparing against exactly one value.
    pub fn is_scalar(self) -> bool {
        !matches!(self, Self::Between | Self::In)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversion into an [`Operator`], so builders accept `"="` or `Operator::Eq`.
pub trait IntoOperator {
    fn into_operator(self) -> QbResult<Operator>;
}

impl IntoOperator for Operator {
    fn into_operator(self) -> QbResult<Operator> {
        Ok(self)
    }
}

impl IntoOperator for &str {
    fn into_operator(self) -> QbResult<Operator> {
        Operator::parse(self)
    }
}

impl IntoOperator for String {
    fn into_operator(self) -> QbResult<Operator> {
        Operator::parse(&self)
    }
}

impl IntoOperator for &String {
    fn into_operator(self) -> QbResult<Operator> {
        Operator::parse(self)
    }
}

/// A single `field OP value` comparison, optionally negated.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    field: String,
    operator: Operator,
    operand: Operand,
    negated: bool,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, operand: impl Into<Operand>) -> Self {
        Self {
            field: field.into(),
            operator,
            operand: operand.into(),
            negated: false,
        }
    }

    /// Same as [`Condition::new`] with the negation flag set.
    pub fn negated(field: impl Into<String>, operator: Operator, operand: impl Into<Operand>) -> Self {
        Self {
            negated: true,
            ..Self::new(field, operator, operand)
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Render the fragment, pushing bound values into `params` in
    /// placeholder order.
    pub fn build(&self, params: &mut ParamList) -> QbResult<String> {
        let op = self.operator;

        if self.operand.is_null() {
            let check = match op {
                Operator::Eq => "IS NULL",
                Operator::Ne => "IS NOT NULL",
                _ => {
                    return Err(QbError::operator(format!(
                        "Operator {op} is not allowed with null value."
                    )));
                }
            };
            let sql = format!("{} {check}", self.field);
            return Ok(if self.negated { format!("NOT {sql}") } else { sql });
        }

        let value = self.build_value(params)?;

        Ok(match (self.negated, op.negates_inline()) {
            (true, true) => format!("{} NOT {op} {value}", self.field),
            (true, false) => format!("NOT {} {op} {value}", self.field),
            (false, _) => format!("{} {op} {value}", self.field),
        })
    }

    fn build_value(&self, params: &mut ParamList) -> QbResult<String> {
        let op = self.operator;

        match &self.operand {
            Operand::Null => Ok("NULL".to_string()),

            Operand::Param(param) => {
                let placeholder = match (op, param.value()) {
                    (Operator::Between, ParamValue::List(items)) if items.len() == 2 => {
                        if !items.iter().all(|v| v.is_numeric()) {
                            return Err(QbError::shape("BETWEEN operator requires numeric values."));
                        }
                        "? AND ?".to_string()
                    }
                    (Operator::Between, _) => {
                        return Err(QbError::shape(
                            "BETWEEN operator requires a two-element array as value.",
                        ));
                    }
                    (Operator::In, ParamValue::List(items)) if items.is_empty() => {
                        return Err(QbError::shape("IN operator requires a non-empty array."));
                    }
                    (Operator::In, ParamValue::List(items)) => {
                        format!("({})", vec!["?"; items.len()].join(", "))
                    }
                    (Operator::In, ParamValue::Scalar(_)) => {
                        return Err(QbError::shape("IN operator requires an array as value."));
                    }
                    (_, ParamValue::List(_)) => {
                        return Err(QbError::operator(format!(
                            "Operator {op} does not support array value."
                        )));
                    }
                    (_, ParamValue::Scalar(_)) => "?".to_string(),
                };
                params.push_param(param);
                Ok(placeholder)
            }

            Operand::Subquery(select) => {
                if op != Operator::In {
                    return Err(QbError::operator(format!(
                        "Operator {op} does not support a subquery value."
                    )));
                }
                Ok(format!("({})", select.build_into(params)?))
            }

            Operand::Raw(value) => {
                if !op.is_scalar() {
                    return Err(QbError::shape(match op {
                        Operator::Between => {
                            "BETWEEN operator requires a two-element array as value in raw mode."
                        }
                        _ => "IN operator requires an array as value in raw mode.",
                    }));
                }
                comparison_literal(value, op.as_str())
            }

            Operand::RawList(items) => match op {
                Operator::Between => {
                    let [first, second] = items.as_slice() else {
                        return Err(QbError::shape(
                            "BETWEEN operator requires a two-element array as value in raw mode.",
                        ));
                    };
                    Ok(format!(
                        "{} AND {}",
                        comparison_literal(first, "BETWEEN")?,
                        comparison_literal(second, "BETWEEN")?
                    ))
                }
                Operator::In => {
                    if items.is_empty() {
                        return Err(QbError::shape("IN operator requires a non-empty array in raw mode."));
                    }
                    let literals = items
                        .iter()
                        .map(|v| comparison_literal(v, "IN"))
                        .collect::<QbResult<Vec<_>>>()?;
                    Ok(format!("({})", literals.join(", ")))
                }
                _ => Err(QbError::operator(format!(
                    "Operator {op} does not support array value in raw mode."
                ))),
            },
        }
    }
}
