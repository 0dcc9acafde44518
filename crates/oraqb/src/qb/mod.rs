//! Statement builders.
//!
//! Each builder is a consuming, infallible fluent API. Mistakes made while
//! building are recorded and returned by the next render call
//! ([`SqlQb::build`], [`SqlQb::build_sql`], [`SqlQb::params`]).
//!
//! # Usage
//!
//! ```
//! use oraqb::prelude::*;
//!
//! // SELECT
//! let q = select()
//!     .select(&["id"])
//!     .from("exams", None)
//!     .where_group(|w| w.where_("score", ">=", Param::int(50)).and_where("score", "<", Param::int(75)))
//!     .or_where("status", "=", Param::string("completed"));
//! assert_eq!(
//!     q.to_sql(),
//!     "SELECT id FROM exams WHERE (score >= ? AND score < ?) OR status = ?"
//! );
//!
//! // INSERT
//! let q = insert("users").record(Record::new().value("name", Param::string("alice")));
//! assert_eq!(q.to_sql(), "INSERT INTO users (name) VALUES (?)");
//!
//! // UPDATE
//! let q = update("users").set("status", "inactive").where_("id", "=", Param::int(1));
//! assert_eq!(q.to_sql(), "UPDATE users SET status = 'inactive' WHERE id = ?");
//!
//! // DELETE
//! let q = delete("users").where_("id", "=", Param::int(1));
//! assert_eq!(q.to_sql(), "DELETE FROM users WHERE id = ?");
//! ```

mod delete;
mod insert;
mod select;
mod traits;
mod update;


pub use delete::Delete;
pub use insert::Insert;
pub use select::{Select, UnionKind};
pub use traits::{BuiltQuery, Conditional, SqlQb, StatementKind};
pub use update::Update;

/// Create an empty SELECT builder.
pub fn select() -> Select {
    Select::new()
}

/// Create an INSERT builder for the given table.
pub fn insert(table: &str) -> Insert {
    Insert::new().table(table)
}

/// Create an UPDATE builder for the given table.
pub fn update(table: &str) -> Update {
    Update::new().table(table)
}

/// Create a DELETE builder for the given table.
pub fn delete(table: &str) -> Delete {
    Delete::new().table(table)
}
