//! Convenient imports for typical `oraqb` usage.
//!
//! ```
//! use oraqb::prelude::*;
//! ```

pub use crate::{
    BoundParam, BuiltQuery, CaseField, Conditional, Filter, Param, ParamList, ParamType, QbError,
    QbResult, Record, SqlQb, Value, Where, delete, insert, select, subquery, update,
};
