//! Boolean predicate tree shared by WHERE, HAVING and CASE WHEN.
//!
//! A [`Where`] is a flat list of terms joined by AND/OR connectives. There is
//! no precedence: grouping only comes from nesting another `Where` through
//! one of the `*_group` methods, which renders in parentheses.
//!
//! # Example
//! ```
//! use oraqb::prelude::*;
//!
//! let w = Where::new()
//!     .where_group(|w| w.where_("score", ">=", Param::int(50)).and_where("score", "<", Param::int(75)))
//!     .or_where("status", "=", Param::string("completed"));
//!
//! let mut params = ParamList::new();
//! assert_eq!(
//!     w.build(&mut params).unwrap(),
//!     "(score >= ? AND score < ?) OR status = ?"
//! );
//! assert_eq!(params.len(), 3);
//! ```

use crate::condition::{Condition, IntoOperator};
use crate::error::{QbError, QbResult, record};
use crate::operand::Operand;
use crate::param::ParamList;
use crate::qb::Conditional;

/// Connective placed between two consecutive terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn as_str(self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

/// One entry of a [`Where`]: a comparison or a nested group.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Condition(Condition),
    Group(Where),
}

/// Composable boolean expression over [`Condition`]s and nested groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Where {
    terms: Vec<Term>,
    connectives: Vec<Connective>,
    negated: bool,
    build_error: Option<QbError>,
}

impl Where {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark this expression as negated.
    ///
    /// A nested group renders its own `NOT (...)`; for the top-level
    /// expression of a statement the container renders `WHERE NOT (...)`.
    pub fn negate(mut self) -> Self {
        self.negated = true;
        self
    }

    pub(crate) fn set_negated(&mut self) {
        self.negated = true;
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn has_conditions(&self) -> bool {
        !self.terms.is_empty()
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn connectives(&self) -> &[Connective] {
        &self.connectives
    }

    /// First error recorded while building, if any.
    pub fn build_error(&self) -> Option<&QbError> {
        self.build_error.as_ref()
    }

    /// Whether a container has to render this predicate: it holds terms or
    /// an error that the render must report.
    pub(crate) fn is_pending(&self) -> bool {
        self.has_conditions() || self.build_error.is_some()
    }

    /// Render the expression (without its own top-level negation), pushing
    /// bound values into `params` depth-first, left to right.
    pub fn build(&self, params: &mut ParamList) -> QbResult<String> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }
        if self.terms.len() != self.connectives.len() + 1 {
            return Err(QbError::structural(
                "Mismatch between conditions and operators: there must be exactly one more condition than operators.",
            ));
        }

        let mut sql = String::new();
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                sql.push(' ');
                sql.push_str(self.connectives[i - 1].as_str());
                sql.push(' ');
            }
            match term {
                Term::Condition(cond) => sql.push_str(&cond.build(params)?),
                Term::Group(group) => {
                    let inner = group.build(params)?;
                    if group.negated {
                        sql.push_str("NOT (");
                    } else {
                        sql.push('(');
                    }
                    sql.push_str(&inner);
                    sql.push(')');
                }
            }
        }
        Ok(sql)
    }

    fn push_first(&mut self, term: QbResult<Term>) {
        if self.has_conditions() {
            record(&mut self.build_error, QbError::structural("Conditions array is not empty."));
            return;
        }
        match term {
            Ok(term) => self.terms.push(term),
            Err(err) => record(&mut self.build_error, err),
        }
    }

    fn push_next(&mut self, connective: Connective, term: QbResult<Term>) {
        if !self.has_conditions() {
            record(
                &mut self.build_error,
                QbError::structural(format!(
                    "No initial condition exists for {} condition.",
                    connective.as_str()
                )),
            );
            return;
        }
        match term {
            Ok(term) => {
                self.connectives.push(connective);
                self.terms.push(term);
            }
            Err(err) => record(&mut self.build_error, err),
        }
    }
}

fn condition_term(
    field: &str,
    op: impl IntoOperator,
    value: impl Into<Operand>,
    negated: bool,
) -> QbResult<Term> {
    let operator = op.into_operator()?;
    let cond = if negated {
        Condition::negated(field, operator, value)
    } else {
        Condition::new(field, operator, value)
    };
    Ok(Term::Condition(cond))
}

fn group_term(f: impl FnOnce(Where) -> Where, negated: bool) -> QbResult<Term> {
    let mut group = f(Where::new());
    if negated {
        group.set_negated();
    }
    Ok(Term::Group(group))
}

/// Fluent predicate methods for anything that owns a [`Where`].
///
/// Implemented by [`Where`] itself and by the SELECT/UPDATE/DELETE builders,
/// so the same `where_` / `and_where` / `or_where_not_group` chain works on
/// each of them.
pub trait Filter: Sized {
    /// The expression new terms are appended to.
    fn filter_mut(&mut self) -> &mut Where;

    /// Set the first term: `field OP value`.
    fn where_(mut self, field: &str, op: impl IntoOperator, value: impl Into<Operand>) -> Self {
        self.filter_mut()
            .push_first(condition_term(field, op, value, false));
        self
    }

    /// Set the first term, negated.
    fn where_not(mut self, field: &str, op: impl IntoOperator, value: impl Into<Operand>) -> Self {
        self.filter_mut()
            .push_first(condition_term(field, op, value, true));
        self
    }

    fn and_where(mut self, field: &str, op: impl IntoOperator, value: impl Into<Operand>) -> Self {
        self.filter_mut()
            .push_next(Connective::And, condition_term(field, op, value, false));
        self
    }

    fn or_where(mut self, field: &str, op: impl IntoOperator, value: impl Into<Operand>) -> Self {
        self.filter_mut()
            .push_next(Connective::Or, condition_term(field, op, value, false));
        self
    }

    fn and_where_not(mut self, field: &str, op: impl IntoOperator, value: impl Into<Operand>) -> Self {
        self.filter_mut()
            .push_next(Connective::And, condition_term(field, op, value, true));
        self
    }

    fn or_where_not(mut self, field: &str, op: impl IntoOperator, value: impl Into<Operand>) -> Self {
        self.filter_mut()
            .push_next(Connective::Or, condition_term(field, op, value, true));
        self
    }

    /// Set the first term to a nested group built by `f`.
    fn where_group(mut self, f: impl FnOnce(Where) -> Where) -> Self {
        self.filter_mut().push_first(group_term(f, false));
        self
    }

    fn where_not_group(mut self, f: impl FnOnce(Where) -> Where) -> Self {
        self.filter_mut().push_first(group_term(f, true));
        self
    }

    fn and_where_group(mut self, f: impl FnOnce(Where) -> Where) -> Self {
        self.filter_mut()
            .push_next(Connective::And, group_term(f, false));
        self
    }

    fn or_where_group(mut self, f: impl FnOnce(Where) -> Where) -> Self {
        self.filter_mut()
            .push_next(Connective::Or, group_term(f, false));
        self
    }

    fn and_where_not_group(mut self, f: impl FnOnce(Where) -> Where) -> Self {
        self.filter_mut()
            .push_next(Connective::And, group_term(f, true));
        self
    }

    fn or_where_not_group(mut self, f: impl FnOnce(Where) -> Where) -> Self {
        self.filter_mut()
            .push_next(Connective::Or, group_term(f, true));
        self
    }
}

impl Filter for Where {
    fn filter_mut(&mut self) -> &mut Where {
        self
    }
}

impl Conditional for Where {}
