//! Column selection, grouping, having, ordering and paging

use super::common::{
    Aggregate, AggregateFunction, Boolean, Column, Condition, IndexHint, IndexHintKind,
    IntoColumns, IntoCondition, IntoDirection, Lock, SortDirection,
};
use super::wheres::first_two;
use super::{Builder, Having, Order};
use crate::forge::{self, BindingCategory};
use crate::{Error, Expression, Operator, Value};

impl Builder {
    /// Replace the selected columns
    ///
    /// # Examples
    /// ```
    /// use quarry_core::table;
    ///
    /// let sql = table("users").select(("id", "name as full_name")).to_sql()?;
    /// assert_eq!(sql, "select `id`, `name` as `full_name` from `users`");
    /// # Ok::<(), quarry_core::Error>(())
    /// ```
    pub fn select<C>(mut self, columns: C) -> Self
    where
        C: IntoColumns,
    {
        self.columns = columns.into_columns();
        self.bindings.insert(BindingCategory::Select, Vec::new());
        self
    }

    /// Append to the selected columns
    pub fn add_select<C>(mut self, columns: C) -> Self
    where
        C: IntoColumns,
    {
        self.columns.extend(columns.into_columns());
        self
    }

    /// Append a raw column expression with its own bindings
    pub fn select_raw(mut self, sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.columns.push(Column::Raw(Expression::new(sql)));
        self.push_bindings(bindings, BindingCategory::Select);
        self
    }

    /// Append `(<sub-select>) as alias`
    ///
    /// # Examples
    /// ```
    /// use quarry_core::table;
    ///
    /// let sql = table("users")
    ///     .select("name")
    ///     .select_sub(|q| q.from("posts").count("*"), "post_count")
    ///     .to_sql()?;
    /// assert_eq!(
    ///     sql,
    ///     "select `name`, (select count(*) as aggregate from `posts`) as `post_count` from `users`"
    /// );
    /// # Ok::<(), quarry_core::Error>(())
    /// ```
    pub fn select_sub<F>(mut self, f: F, alias: &str) -> Self
    where
        F: FnOnce(Builder) -> Builder,
    {
        let query = f(self.for_sub_query());
        self.absorb(&query);
        match query.to_sql() {
            Ok(sql) => {
                let column = format!("({}) as {}", sql, self.compiler.wrap_value(alias));
                self.columns.push(Column::Raw(Expression::new(column)));
                self.push_bindings(query.bindings(), BindingCategory::Select);
            }
            Err(err) => self.fail(err),
        }
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Set the table to select from; `"users as u"` gives it an alias
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.from = Some(table.into());
        self
    }

    pub fn use_index(self, index: impl Into<String>) -> Self {
        self.index_hint(IndexHintKind::Use, index.into())
    }

    pub fn force_index(self, index: impl Into<String>) -> Self {
        self.index_hint(IndexHintKind::Force, index.into())
    }

    pub fn ignore_index(self, index: impl Into<String>) -> Self {
        self.index_hint(IndexHintKind::Ignore, index.into())
    }

    fn index_hint(mut self, kind: IndexHintKind, index: String) -> Self {
        self.index_hint = Some(IndexHint { kind, index });
        self
    }

    /// Add GROUP BY columns
    pub fn group_by<C>(mut self, columns: C) -> Self
    where
        C: IntoColumns,
    {
        self.groups.extend(columns.into_columns());
        self
    }

    pub fn group_by_raw(mut self, sql: impl Into<String>) -> Self {
        self.groups.push(Column::Raw(Expression::new(sql)));
        self
    }

    /// Add a HAVING condition
    ///
    /// Takes the same shapes as [`Builder::where_`]. Bitwise operators compare
    /// the result against zero.
    ///
    /// # Examples
    /// ```
    /// use quarry_core::{raw, table};
    ///
    /// let sql = table("orders")
    ///     .select(("user_id", raw("sum(total) as spent")))
    ///     .group_by("user_id")
    ///     .having(("spent", ">", 100))
    ///     .to_sql()?;
    /// assert_eq!(
    ///     sql,
    ///     "select `user_id`, sum(total) as spent from `orders` group by `user_id` having `spent` > ?"
    /// );
    /// # Ok::<(), quarry_core::Error>(())
    /// ```
    pub fn having<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.add_having(condition.into_condition(), Boolean::And)
    }

    pub fn or_having<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.add_having(condition.into_condition(), Boolean::Or)
    }

    fn add_having(mut self, condition: Condition, boolean: Boolean) -> Self {
        let Condition {
            column,
            operator,
            value,
        } = condition;

        if value.is_null() {
            let not = operator != Operator::EQ;
            return self.add_having_null(column, not, boolean);
        }

        let value = forge::head(value);
        self.push_bindings(vec![value.clone()], BindingCategory::Having);
        self.havings.push(if operator.is_bitwise() {
            Having::Bit {
                column,
                operator,
                value,
                boolean,
            }
        } else {
            Having::Basic {
                column,
                operator,
                value,
                boolean,
            }
        });
        self
    }

    pub fn having_raw(self, sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.add_having_raw(sql.into(), bindings, Boolean::And)
    }

    pub fn or_having_raw(self, sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.add_having_raw(sql.into(), bindings, Boolean::Or)
    }

    fn add_having_raw(mut self, sql: String, bindings: Vec<Value>, boolean: Boolean) -> Self {
        self.havings.push(Having::Raw { sql, boolean });
        self.push_bindings(bindings, BindingCategory::Having);
        self
    }

    pub fn having_null(self, column: impl Into<Column>) -> Self {
        self.add_having_null(column.into(), false, Boolean::And)
    }

    pub fn having_not_null(self, column: impl Into<Column>) -> Self {
        self.add_having_null(column.into(), true, Boolean::And)
    }

    fn add_having_null(mut self, column: Column, not: bool, boolean: Boolean) -> Self {
        self.havings.push(if not {
            Having::NotNull { column, boolean }
        } else {
            Having::Null { column, boolean }
        });
        self
    }

    pub fn having_between<C, I, V>(self, column: C, values: I) -> Self
    where
        C: Into<Column>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_having_between(column.into(), values, false)
    }

    pub fn having_not_between<C, I, V>(self, column: C, values: I) -> Self
    where
        C: Into<Column>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_having_between(column.into(), values, true)
    }

    fn add_having_between<I, V>(mut self, column: Column, values: I, not: bool) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        match first_two(values) {
            Some(values) => {
                self.push_bindings(values.clone(), BindingCategory::Having);
                self.havings.push(Having::Between {
                    column,
                    values,
                    not,
                    boolean: Boolean::And,
                });
            }
            None => self.fail(Error::invalid_query("having_between requires two values")),
        }
        self
    }

    pub fn having_expression(mut self, expression: Expression) -> Self {
        self.havings.push(Having::Expression {
            expression,
            boolean: Boolean::And,
        });
        self
    }

    /// Add a parenthesized group of HAVING conditions built by `f`
    pub fn having_group<F>(self, f: F) -> Self
    where
        F: FnOnce(Builder) -> Builder,
    {
        self.add_nested_having(f, Boolean::And)
    }

    pub fn or_having_group<F>(self, f: F) -> Self
    where
        F: FnOnce(Builder) -> Builder,
    {
        self.add_nested_having(f, Boolean::Or)
    }

    fn add_nested_having<F>(mut self, f: F, boolean: Boolean) -> Self
    where
        F: FnOnce(Builder) -> Builder,
    {
        let query = f(self.for_sub_query());
        self.absorb(&query);
        if !query.havings.is_empty() {
            let bindings = query
                .bindings
                .get(&BindingCategory::Having)
                .cloned()
                .unwrap_or_default();
            self.push_bindings(bindings, BindingCategory::Having);
            self.havings.push(Having::Nested {
                query: Box::new(query),
                boolean,
            });
        }
        self
    }

    /// Add an ORDER BY column
    ///
    /// The direction is `asc` or `desc` in any case. Anything else is
    /// recorded as an error and returned when the query is compiled.
    ///
    /// # Examples
    /// ```
    /// use quarry_core::{table, SortDirection};
    ///
    /// let sql = table("users")
    ///     .order_by("name", "ASC")
    ///     .order_by("id", SortDirection::Desc)
    ///     .to_sql()?;
    /// assert_eq!(sql, "select * from `users` order by `name` asc, `id` desc");
    ///
    /// assert!(table("users").order_by("name", "sideways").to_sql().is_err());
    /// # Ok::<(), quarry_core::Error>(())
    /// ```
    pub fn order_by<C, D>(mut self, column: C, direction: D) -> Self
    where
        C: Into<Column>,
        D: IntoDirection,
    {
        match direction.into_direction() {
            Ok(direction) => self.orders.push(Order::Column {
                column: column.into(),
                direction,
            }),
            Err(err) => self.fail(err),
        }
        self
    }

    pub fn order_by_desc(self, column: impl Into<Column>) -> Self {
        self.order_by(column, SortDirection::Desc)
    }

    /// Newest first by the given timestamp column
    pub fn latest(self, column: impl Into<Column>) -> Self {
        self.order_by(column, SortDirection::Desc)
    }

    /// Oldest first by the given timestamp column
    pub fn oldest(self, column: impl Into<Column>) -> Self {
        self.order_by(column, SortDirection::Asc)
    }

    pub fn order_by_raw(mut self, sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.orders.push(Order::Raw { sql: sql.into() });
        self.push_bindings(bindings, BindingCategory::Order);
        self
    }

    /// Order by the driver's random function
    pub fn in_random_order(mut self) -> Self {
        let sql = self.compiler.compile_random();
        self.orders.push(Order::Raw { sql });
        self
    }

    /// Drop every ORDER BY entry and its bindings
    pub fn reorder(mut self) -> Self {
        self.orders.clear();
        self.bindings.insert(BindingCategory::Order, Vec::new());
        self
    }

    /// Set the row limit; negative values count as zero
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(clamp(limit));
        self
    }

    /// Set the row offset; negative values count as zero
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(clamp(offset));
        self
    }

    /// Alias for [`Builder::limit`]
    pub fn take(self, limit: i64) -> Self {
        self.limit(limit)
    }

    /// Alias for [`Builder::offset`]
    pub fn skip(self, offset: i64) -> Self {
        self.offset(offset)
    }

    /// Limit and offset for a 1-based page number
    pub fn for_page(self, page: i64, per_page: i64) -> Self {
        let offset = page.saturating_sub(1).saturating_mul(per_page);
        self.offset(offset).limit(per_page)
    }

    /// Select an aggregate instead of the column list
    ///
    /// With havings the select is kept intact and aggregated as a subquery,
    /// so havings can refer to selected aliases. Without groups the ordering
    /// is dropped as well, since it has no effect on a single aggregate row.
    pub fn aggregate<C>(mut self, function: AggregateFunction, columns: C) -> Self
    where
        C: IntoColumns,
    {
        if self.havings.is_empty() {
            self.columns.clear();
            self.bindings.insert(BindingCategory::Select, Vec::new());
        }
        if self.groups.is_empty() {
            self.orders.clear();
            self.bindings.insert(BindingCategory::Order, Vec::new());
        }
        self.aggregate = Some(Aggregate {
            function,
            columns: columns.into_columns(),
        });
        self
    }

    pub fn count<C>(self, columns: C) -> Self
    where
        C: IntoColumns,
    {
        self.aggregate(AggregateFunction::Count, columns)
    }

    pub fn sum(self, column: impl Into<Column>) -> Self {
        self.aggregate(AggregateFunction::Sum, column.into())
    }

    pub fn avg(self, column: impl Into<Column>) -> Self {
        self.aggregate(AggregateFunction::Avg, column.into())
    }

    pub fn min(self, column: impl Into<Column>) -> Self {
        self.aggregate(AggregateFunction::Min, column.into())
    }

    pub fn max(self, column: impl Into<Column>) -> Self {
        self.aggregate(AggregateFunction::Max, column.into())
    }

    pub fn lock_for_update(self) -> Self {
        self.lock(Lock::Update)
    }

    pub fn shared_lock(self) -> Self {
        self.lock(Lock::Shared)
    }

    pub fn lock(mut self, lock: Lock) -> Self {
        self.lock = Some(lock);
        self
    }
}

fn clamp(value: i64) -> u64 {
    u64::try_from(value.max(0)).unwrap_or(0)
}
