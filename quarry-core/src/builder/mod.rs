//! Query builder module
//!
//! [`Builder`] accumulates the description of one query. Every fluent method
//! consumes the builder and hands it back, recording clauses and their
//! bindings in call order. Rendering is left to the [`Compiler`] the builder
//! was created with.

pub mod clause;
pub mod common;
pub mod delete;
pub mod insert;
pub mod join;
pub mod select;
pub mod update;
pub mod wheres;

use crate::compiler::{CompiledQuery, Compiler};
use crate::forge::{self, BindingCategory, Bindings};
use crate::{Error, Result, Value};

pub use clause::{Having, Order, Where};
pub use common::{
    Aggregate, AggregateFunction, Boolean, Column, ColumnComparison, Condition, IndexHint,
    IndexHintKind, IntoColumnComparison, IntoColumns, IntoCondition, IntoDirection, JoinType,
    Lock, QueryBuilder, SortDirection,
};
pub use insert::{IntoRow, Row};
pub use join::JoinClause;

/// Mutable description of a single query
#[derive(Debug, Clone)]
pub struct Builder {
    pub(crate) compiler: Compiler,
    /// Set on the ON-condition builder of a join
    pub(crate) is_join: bool,
    pub(crate) distinct: bool,
    pub(crate) columns: Vec<Column>,
    pub(crate) from: Option<String>,
    pub(crate) index_hint: Option<IndexHint>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) wheres: Vec<Where>,
    pub(crate) groups: Vec<Column>,
    pub(crate) havings: Vec<Having>,
    pub(crate) orders: Vec<Order>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
    pub(crate) aggregate: Option<Aggregate>,
    pub(crate) lock: Option<Lock>,
    pub(crate) bindings: Bindings,
    /// First error raised by a fluent call, returned on compile
    pub(crate) error: Option<Error>,
}

impl Builder {
    /// Create an empty builder rendering through `compiler`
    pub fn new(compiler: Compiler) -> Self {
        Self {
            compiler,
            is_join: false,
            distinct: false,
            columns: Vec::new(),
            from: None,
            index_hint: None,
            joins: Vec::new(),
            wheres: Vec::new(),
            groups: Vec::new(),
            havings: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
            aggregate: None,
            lock: None,
            bindings: forge::empty_bindings(),
            error: None,
        }
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// Whether this builder holds the ON conditions of a join
    pub fn is_join(&self) -> bool {
        self.is_join
    }

    /// Fresh builder of the same kind, used for nested groups
    pub(crate) fn new_query(&self) -> Self {
        let mut query = Self::new(self.compiler.clone());
        query.is_join = self.is_join;
        query
    }

    /// Fresh plain builder, used for sub-selects
    pub(crate) fn for_sub_query(&self) -> Self {
        Self::new(self.compiler.clone())
    }

    /// Keyword the compiled condition list starts with
    pub(crate) fn where_keyword(&self) -> &'static str {
        if self.is_join {
            "on"
        } else {
            "where"
        }
    }

    pub fn from_table(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn wheres(&self) -> &[Where] {
        &self.wheres
    }

    pub fn havings(&self) -> &[Having] {
        &self.havings
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Add a binding to the given category.
    ///
    /// Arrays are flattened and raw expressions skipped, the same way the
    /// fluent methods record their values.
    pub fn add_binding(mut self, value: impl Into<Value>, category: BindingCategory) -> Self {
        self.push_bindings(vec![value.into()], category);
        self
    }

    /// Append all of `other`'s bindings, category by category
    pub fn merge_bindings(mut self, other: &Builder) -> Self {
        forge::merge(&mut self.bindings, &other.bindings);
        self
    }

    pub(crate) fn push_bindings<I>(&mut self, values: I, category: BindingCategory)
    where
        I: IntoIterator<Item = Value>,
    {
        let values = forge::clean(forge::flatten(values));
        self.bindings.entry(category).or_default().extend(values);
    }

    /// Bindings grouped by category
    pub fn raw_bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Bindings flattened in placeholder order
    pub fn bindings(&self) -> Vec<Value> {
        forge::flatten_map(&self.bindings)
    }

    pub(crate) fn fail(&mut self, err: Error) {
        tracing::debug!(target: "quarry", error = %err, "recorded builder error");
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Carry a child builder's error up to this one
    pub(crate) fn absorb(&mut self, child: &Builder) {
        if let Some(err) = &child.error {
            self.fail(err.clone());
        }
    }

    /// The error a previous fluent call recorded, if any
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub(crate) fn check(&self) -> Result<()> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Render the SELECT statement
    pub fn to_sql(&self) -> Result<String> {
        self.compiler.compile_select(self)
    }

    /// SELECT statement and bindings together
    pub fn compile(&self) -> Result<CompiledQuery> {
        Ok(CompiledQuery::new(self.to_sql()?, self.bindings()))
    }

    /// Render `select exists(<query>) as "exists"`
    pub fn to_exists_sql(&self) -> Result<String> {
        self.compiler.compile_exists(self)
    }

    /// Drop every clause and binding so the builder can describe a new query
    pub fn reset(&mut self) {
        let is_join = self.is_join;
        *self = Self::new(self.compiler.clone());
        self.is_join = is_join;
    }
}

impl QueryBuilder for Builder {
    fn to_sql(&self) -> Result<String> {
        Builder::to_sql(self)
    }

    fn bindings(&self) -> Vec<Value> {
        Builder::bindings(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_basic_select() {
        let query = table("users");
        assert_eq!(query.to_sql().unwrap(), "select * from `users`");
        assert!(query.bindings().is_empty());
    }

    #[test]
    fn test_add_binding_skips_expressions() {
        let query = table("users")
            .add_binding(1, BindingCategory::Where)
            .add_binding(crate::raw("NOW()"), BindingCategory::Where)
            .add_binding(vec![2, 3], BindingCategory::Select);
        assert_eq!(
            query.bindings(),
            vec![Value::I32(2), Value::I32(3), Value::I32(1)]
        );
    }

    #[test]
    fn test_merge_bindings() {
        let other = table("posts").where_(("id", 9));
        let query = table("users").where_(("id", 1)).merge_bindings(&other);
        assert_eq!(query.bindings(), vec![Value::I32(1), Value::I32(9)]);
    }

    #[test]
    fn test_reset_returns_to_empty() {
        let mut query = table("users")
            .where_(("id", 1))
            .order_by("name", "asc")
            .limit(5);
        query.reset();
        assert!(query.wheres().is_empty());
        assert!(query.bindings().is_empty());
        assert_eq!(query.from_table(), None);

        let query = query.from("posts");
        assert_eq!(query.to_sql().unwrap(), "select * from `posts`");
    }

    #[test]
    fn test_first_error_wins() {
        let query = table("users")
            .order_by("name", "up")
            .order_by("name", "down");
        assert_eq!(
            query.to_sql().unwrap_err(),
            Error::invalid_order_direction("up")
        );
    }

    #[test]
    fn test_query_builder_trait_compile() {
        let compiled = QueryBuilder::compile(&table("users").where_(("id", 3))).unwrap();
        assert_eq!(compiled.sql, "select * from `users` where `id` = ?");
        assert_eq!(compiled.bindings, vec![Value::I32(3)]);
    }
}
