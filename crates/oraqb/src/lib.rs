//! # oraqb
//!
//! A fluent builder for parameterized Oracle-dialect SQL.
//!
//! ## Features
//!
//! - **Render, don't run**: builders produce SQL text plus an ordered list of
//!   bound parameters; executing them is left to the driver
//! - **Positional binding**: `params[i]` always binds to the i-th `?` of the
//!   SQL, at any nesting depth (groups, subqueries, CASE, UNION chains)
//! - **Explicit grouping**: AND/OR terms have no precedence; nesting is
//!   written as nested groups and rendered in parentheses
//! - **Oracle pagination**: `limit`/`offset` render as
//!   `OFFSET n ROWS FETCH NEXT m ROWS ONLY`
//! - **Deferred errors**: builders never panic; the first mistake is returned
//!   by the next render call
//!
//! ## Query Builder (qb)
//!
//! ```
//! use oraqb::prelude::*;
//!
//! let q = select()
//!     .select(&["department"])
//!     .count("orders", true)
//!     .from("employees", None)
//!     .group_by(&["department"])
//!     .having(|h| h.where_("COUNT(DISTINCT orders)", ">", Param::int(5)));
//!
//! let built = q.build().unwrap();
//! assert_eq!(
//!     built.sql,
//!     "SELECT department, COUNT(DISTINCT orders) FROM employees GROUP BY department HAVING COUNT(DISTINCT orders) > ?"
//! );
//! assert_eq!(built.params, vec![BoundParam::new(5, ParamType::Integer)]);
//! ```
//!
//! ## Tracing
//!
//! With the `tracing` feature, [`SqlQb::build`] emits one DEBUG event per
//! built statement on target `oraqb.sql`. Use `SqlQb::build_with` and a
//! `TraceConfig` to change the level or SQL truncation.

pub mod batch;
pub mod condition;
pub mod error;
pub mod field;
pub mod join;
pub mod operand;
pub mod order;
pub mod param;
pub mod prelude;
pub mod qb;
pub mod where_builder;

#[cfg(feature = "tracing")]
pub mod trace;

pub use batch::{Batch, Record, Set};
pub use condition::{Condition, IntoOperator, Operator};
pub use error::{QbError, QbResult};
pub use field::{AggFunction, AggregateField, CaseField, Field, SelectField};
pub use join::{Join, JoinKind, JoinTarget, On};
pub use operand::{Operand, quote_literal, subquery};
pub use order::Order;
pub use param::{BoundParam, Param, ParamList, ParamType, ParamValue, Value};
pub use where_builder::{Connective, Filter, Term, Where};

// Re-export qb module for easy access
pub use qb::{
    BuiltQuery, Conditional, Delete, Insert, Select, SqlQb, StatementKind, UnionKind, Update,
    delete, insert, select, update,
};

#[cfg(feature = "tracing")]
pub use trace::TraceConfig;
