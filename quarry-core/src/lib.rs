//! Quarry Core - a fluent SQL query builder and compiler
//!
//! A [`Builder`] records a query as typed clauses and bindings; a [`Compiler`]
//! renders it for one database driver into SQL with `?` placeholders plus the
//! values to bind, in the same order.
//!
//! ```
//! use quarry_core::{op, table};
//!
//! let query = table("users")
//!     .select(("id", "name"))
//!     .where_(("age", op::GT, 18))
//!     .where_in("status", ["active", "invited"])
//!     .order_by("name", "asc")
//!     .limit(10);
//!
//! assert_eq!(
//!     query.to_sql()?,
//!     "select `id`, `name` from `users` where `age` > ? and `status` in (?, ?) order by `name` asc limit 10"
//! );
//! assert_eq!(query.bindings().len(), 3);
//! # Ok::<(), quarry_core::Error>(())
//! ```

pub mod builder;
pub mod compiler;
pub mod config;
pub mod error;
pub mod expression;
pub mod forge;
pub mod operator;
pub mod value;

// Re-export main types
pub use builder::{
    Aggregate, AggregateFunction, Boolean, Builder, Column, Having, IndexHint, IndexHintKind,
    IntoColumnComparison, IntoColumns, IntoCondition, IntoDirection, IntoRow, JoinClause,
    JoinType, Lock, Order, QueryBuilder, Row, SortDirection, Where,
};
pub use compiler::{CompiledQuery, Compiler};
pub use config::{CompilerConfig, Driver};
pub use error::{Error, Result};
pub use expression::{raw, Expression};
pub use forge::{BindingCategory, Bindings};
pub use operator::{op, Operator};
pub use value::Value;

/// Create a query builder for the given table, rendered for MySQL
///
/// Use [`Compiler::table`] to target another driver.
pub fn table(name: impl Into<String>) -> Builder {
    Compiler::default().table(name)
}

/// Create an empty query builder rendered for MySQL
pub fn query() -> Builder {
    Compiler::default().query()
}
