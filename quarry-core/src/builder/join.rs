//! JOIN clauses
//!
//! A [`JoinClause`] wraps a builder flagged as a join, so its condition list
//! compiles with `on` instead of `where` and reuses every where variant.

use super::common::{Boolean, Column, IntoColumnComparison, IntoCondition, JoinType};
use super::Builder;
use crate::forge::BindingCategory;
use crate::Value;

/// One JOIN: its type, target table and ON conditions
#[derive(Debug, Clone)]
pub struct JoinClause {
    pub(crate) kind: JoinType,
    pub(crate) table: String,
    pub(crate) query: Builder,
}

impl JoinClause {
    pub(crate) fn new(kind: JoinType, table: String, parent: &Builder) -> Self {
        let mut query = parent.for_sub_query();
        query.is_join = true;
        Self { kind, table, query }
    }

    pub fn kind(&self) -> JoinType {
        self.kind
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// The builder holding the ON conditions
    pub fn conditions(&self) -> &Builder {
        &self.query
    }

    /// Compare two columns
    ///
    /// # Examples
    /// ```
    /// use quarry_core::table;
    ///
    /// let sql = table("users")
    ///     .join_on("contacts", |j| {
    ///         j.on(("users.id", "contacts.user_id"))
    ///             .or_on(("users.email", "=", "contacts.email"))
    ///     })
    ///     .to_sql()?;
    /// assert_eq!(
    ///     sql,
    ///     "select * from `users` inner join `contacts` on `users`.`id` = `contacts`.`user_id` or `users`.`email` = `contacts`.`email`"
    /// );
    /// # Ok::<(), quarry_core::Error>(())
    /// ```
    pub fn on<C>(mut self, comparison: C) -> Self
    where
        C: IntoColumnComparison,
    {
        self.query = self.query.add_where_column(comparison, Boolean::And);
        self
    }

    pub fn or_on<C>(mut self, comparison: C) -> Self
    where
        C: IntoColumnComparison,
    {
        self.query = self.query.add_where_column(comparison, Boolean::Or);
        self
    }

    /// Parenthesized group of ON conditions
    pub fn on_group<F>(self, f: F) -> Self
    where
        F: FnOnce(JoinClause) -> JoinClause,
    {
        self.add_nested(f, Boolean::And)
    }

    pub fn or_on_group<F>(self, f: F) -> Self
    where
        F: FnOnce(JoinClause) -> JoinClause,
    {
        self.add_nested(f, Boolean::Or)
    }

    fn add_nested<F>(mut self, f: F, boolean: Boolean) -> Self
    where
        F: FnOnce(JoinClause) -> JoinClause,
    {
        let nested = f(JoinClause::new(self.kind, self.table.clone(), &self.query));
        self.query = self.query.add_nested_where_query(nested.query, boolean);
        self
    }

    /// Compare a column against a bound value
    pub fn where_<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.query = self.query.where_(condition);
        self
    }

    pub fn or_where<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.query = self.query.or_where(condition);
        self
    }

    pub fn where_in<C, I, V>(mut self, column: C, values: I) -> Self
    where
        C: Into<Column>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.query = self.query.where_in(column, values);
        self
    }

    pub fn where_not_in<C, I, V>(mut self, column: C, values: I) -> Self
    where
        C: Into<Column>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.query = self.query.where_not_in(column, values);
        self
    }

    pub fn where_null(mut self, column: impl Into<Column>) -> Self {
        self.query = self.query.where_null(column);
        self
    }

    pub fn where_not_null(mut self, column: impl Into<Column>) -> Self {
        self.query = self.query.where_not_null(column);
        self
    }

    pub fn or_where_null(mut self, column: impl Into<Column>) -> Self {
        self.query = self.query.or_where_null(column);
        self
    }

    pub fn where_raw(mut self, sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.query = self.query.where_raw(sql, bindings);
        self
    }
}

impl Builder {
    /// INNER JOIN on a single column comparison
    ///
    /// # Examples
    /// ```
    /// use quarry_core::table;
    ///
    /// let sql = table("users")
    ///     .join("orders", "users.id", "=", "orders.user_id")
    ///     .where_(("users.id", 5))
    ///     .to_sql()?;
    /// assert_eq!(
    ///     sql,
    ///     "select * from `users` inner join `orders` on `users`.`id` = `orders`.`user_id` where `users`.`id` = ?"
    /// );
    /// # Ok::<(), quarry_core::Error>(())
    /// ```
    pub fn join<F, S>(self, table: impl Into<String>, first: F, operator: &str, second: S) -> Self
    where
        F: Into<Column>,
        S: Into<Column>,
    {
        self.join_columns(JoinType::Inner, table.into(), first, operator, second)
    }

    pub fn left_join<F, S>(
        self,
        table: impl Into<String>,
        first: F,
        operator: &str,
        second: S,
    ) -> Self
    where
        F: Into<Column>,
        S: Into<Column>,
    {
        self.join_columns(JoinType::Left, table.into(), first, operator, second)
    }

    pub fn right_join<F, S>(
        self,
        table: impl Into<String>,
        first: F,
        operator: &str,
        second: S,
    ) -> Self
    where
        F: Into<Column>,
        S: Into<Column>,
    {
        self.join_columns(JoinType::Right, table.into(), first, operator, second)
    }

    fn join_columns<F, S>(
        self,
        kind: JoinType,
        table: String,
        first: F,
        operator: &str,
        second: S,
    ) -> Self
    where
        F: Into<Column>,
        S: Into<Column>,
    {
        let join = JoinClause::new(kind, table, &self).on((first, operator, second));
        self.add_join(join)
    }

    /// INNER JOIN with ON conditions built by `f`
    pub fn join_on<F>(self, table: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(JoinClause) -> JoinClause,
    {
        self.join_with(JoinType::Inner, table.into(), f)
    }

    pub fn left_join_on<F>(self, table: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(JoinClause) -> JoinClause,
    {
        self.join_with(JoinType::Left, table.into(), f)
    }

    pub fn right_join_on<F>(self, table: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(JoinClause) -> JoinClause,
    {
        self.join_with(JoinType::Right, table.into(), f)
    }

    pub fn cross_join_on<F>(self, table: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(JoinClause) -> JoinClause,
    {
        self.join_with(JoinType::Cross, table.into(), f)
    }

    fn join_with<F>(self, kind: JoinType, table: String, f: F) -> Self
    where
        F: FnOnce(JoinClause) -> JoinClause,
    {
        let join = f(JoinClause::new(kind, table, &self));
        self.add_join(join)
    }

    /// INNER JOIN whose right-hand side is a bound value
    pub fn join_where<C, V>(
        self,
        table: impl Into<String>,
        first: C,
        operator: &str,
        value: V,
    ) -> Self
    where
        C: Into<Column>,
        V: Into<Value>,
    {
        self.join_value(JoinType::Inner, table.into(), first, operator, value)
    }

    pub fn left_join_where<C, V>(
        self,
        table: impl Into<String>,
        first: C,
        operator: &str,
        value: V,
    ) -> Self
    where
        C: Into<Column>,
        V: Into<Value>,
    {
        self.join_value(JoinType::Left, table.into(), first, operator, value)
    }

    pub fn right_join_where<C, V>(
        self,
        table: impl Into<String>,
        first: C,
        operator: &str,
        value: V,
    ) -> Self
    where
        C: Into<Column>,
        V: Into<Value>,
    {
        self.join_value(JoinType::Right, table.into(), first, operator, value)
    }

    fn join_value<C, V>(
        self,
        kind: JoinType,
        table: String,
        first: C,
        operator: &str,
        value: V,
    ) -> Self
    where
        C: Into<Column>,
        V: Into<Value>,
    {
        let join = JoinClause::new(kind, table, &self).where_((first, operator, value));
        self.add_join(join)
    }

    /// CROSS JOIN without conditions
    pub fn cross_join(self, table: impl Into<String>) -> Self {
        let join = JoinClause::new(JoinType::Cross, table.into(), &self);
        self.add_join(join)
    }

    fn add_join(mut self, join: JoinClause) -> Self {
        self.absorb(&join.query);
        self.push_bindings(join.query.bindings(), BindingCategory::Join);
        self.joins.push(join);
        self
    }
}
