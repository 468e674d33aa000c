//! WHERE clause methods

use super::common::{Boolean, Column, Condition, IntoColumnComparison, IntoCondition};
use super::{Builder, Where};
use crate::forge::{self, BindingCategory};
use crate::{Error, Expression, Operator, Value};

impl Builder {
    /// Add a WHERE condition
    ///
    /// # Examples
    /// ```
    /// use quarry_core::{table, op};
    ///
    /// let query = table("users")
    ///     .where_(("age", op::GT, 18))
    ///     .where_(("name", "John"));
    /// ```
    pub fn where_<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.add_where(condition.into_condition(), Boolean::And)
    }

    /// Add an OR WHERE condition
    pub fn or_where<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.add_where(condition.into_condition(), Boolean::Or)
    }

    /// Add an AND NOT WHERE condition
    pub fn where_not<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.add_where(condition.into_condition(), Boolean::AndNot)
    }

    pub fn or_where_not<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.add_where(condition.into_condition(), Boolean::OrNot)
    }

    /// Add an AND WHERE condition (same as where_)
    pub fn and_where<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.where_(condition)
    }

    pub(crate) fn add_where(mut self, condition: Condition, boolean: Boolean) -> Self {
        let Condition {
            column,
            operator,
            value,
        } = condition;

        if operator == Operator::IN {
            return self.add_where_in(column, forge::wrap(value), false, boolean);
        }
        if operator == Operator::NOT_IN {
            return self.add_where_in(column, forge::wrap(value), true, boolean);
        }
        if operator == Operator::BETWEEN {
            return self.add_where_between(column, forge::wrap(value), false, boolean);
        }
        if operator == Operator::NOT_BETWEEN {
            return self.add_where_between(column, forge::wrap(value), true, boolean);
        }
        if value.is_null() {
            return self.add_where_null(column, operator != Operator::EQ, boolean);
        }

        let value = forge::head(value);
        self.push_bindings(vec![value.clone()], BindingCategory::Where);
        self.wheres.push(Where::Basic {
            column,
            operator,
            value,
            boolean,
        });
        self
    }

    /// Add every condition, `and`-joined, inside one parenthesized group
    ///
    /// # Examples
    /// ```
    /// use quarry_core::table;
    ///
    /// let sql = table("users")
    ///     .where_all(vec![("status", "active"), ("role", "admin")])
    ///     .to_sql()?;
    /// assert_eq!(sql, "select * from `users` where (`status` = ? and `role` = ?)");
    /// # Ok::<(), quarry_core::Error>(())
    /// ```
    pub fn where_all<I, C>(self, conditions: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoCondition,
    {
        self.add_where_all(conditions, Boolean::And)
    }

    pub fn or_where_all<I, C>(self, conditions: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoCondition,
    {
        self.add_where_all(conditions, Boolean::Or)
    }

    fn add_where_all<I, C>(self, conditions: I, boolean: Boolean) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoCondition,
    {
        self.add_nested_where(
            |query| {
                conditions
                    .into_iter()
                    .fold(query, |query, condition| query.where_(condition))
            },
            boolean,
        )
    }

    /// Add a parenthesized group of conditions built by `f`
    ///
    /// # Examples
    /// ```
    /// use quarry_core::table;
    ///
    /// let sql = table("users")
    ///     .where_(("active", 1))
    ///     .where_group(|q| q.where_(("role", "admin")).or_where(("role", "owner")))
    ///     .to_sql()?;
    /// assert_eq!(
    ///     sql,
    ///     "select * from `users` where `active` = ? and (`role` = ? or `role` = ?)"
    /// );
    /// # Ok::<(), quarry_core::Error>(())
    /// ```
    pub fn where_group<F>(self, f: F) -> Self
    where
        F: FnOnce(Builder) -> Builder,
    {
        self.add_nested_where(f, Boolean::And)
    }

    pub fn or_where_group<F>(self, f: F) -> Self
    where
        F: FnOnce(Builder) -> Builder,
    {
        self.add_nested_where(f, Boolean::Or)
    }

    pub fn where_not_group<F>(self, f: F) -> Self
    where
        F: FnOnce(Builder) -> Builder,
    {
        self.add_nested_where(f, Boolean::AndNot)
    }

    pub fn or_where_not_group<F>(self, f: F) -> Self
    where
        F: FnOnce(Builder) -> Builder,
    {
        self.add_nested_where(f, Boolean::OrNot)
    }

    fn add_nested_where<F>(self, f: F, boolean: Boolean) -> Self
    where
        F: FnOnce(Builder) -> Builder,
    {
        let query = f(self.new_query());
        self.add_nested_where_query(query, boolean)
    }

    /// Attach an already built group; a group without conditions is ignored
    pub(crate) fn add_nested_where_query(mut self, query: Builder, boolean: Boolean) -> Self {
        self.absorb(&query);
        if !query.wheres.is_empty() {
            let bindings = query
                .bindings
                .get(&BindingCategory::Where)
                .cloned()
                .unwrap_or_default();
            self.push_bindings(bindings, BindingCategory::Where);
            self.wheres.push(Where::Nested {
                query: Box::new(query),
                boolean,
            });
        }
        self
    }

    /// Add a raw WHERE fragment with its own bindings
    pub fn where_raw(self, sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.add_where_raw(sql.into(), bindings, Boolean::And)
    }

    pub fn or_where_raw(self, sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.add_where_raw(sql.into(), bindings, Boolean::Or)
    }

    fn add_where_raw(mut self, sql: String, bindings: Vec<Value>, boolean: Boolean) -> Self {
        self.wheres.push(Where::Raw { sql, boolean });
        self.push_bindings(bindings, BindingCategory::Where);
        self
    }

    /// Add an expression used as a whole condition; binds nothing
    pub fn where_expression(mut self, expression: Expression) -> Self {
        self.wheres.push(Where::Expression {
            expression,
            boolean: Boolean::And,
        });
        self
    }

    pub fn or_where_expression(mut self, expression: Expression) -> Self {
        self.wheres.push(Where::Expression {
            expression,
            boolean: Boolean::Or,
        });
        self
    }

    /// Add a WHERE IN condition
    ///
    /// An empty list yields a condition that never matches.
    pub fn where_in<C, I, V>(self, column: C, values: I) -> Self
    where
        C: Into<Column>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_where_in(column.into(), collect(values), false, Boolean::And)
    }

    pub fn or_where_in<C, I, V>(self, column: C, values: I) -> Self
    where
        C: Into<Column>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_where_in(column.into(), collect(values), false, Boolean::Or)
    }

    /// Add a WHERE NOT IN condition
    ///
    /// An empty list yields a condition that always matches.
    pub fn where_not_in<C, I, V>(self, column: C, values: I) -> Self
    where
        C: Into<Column>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_where_in(column.into(), collect(values), true, Boolean::And)
    }

    pub fn or_where_not_in<C, I, V>(self, column: C, values: I) -> Self
    where
        C: Into<Column>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_where_in(column.into(), collect(values), true, Boolean::Or)
    }

    fn add_where_in(
        mut self,
        column: Column,
        values: Vec<Value>,
        not: bool,
        boolean: Boolean,
    ) -> Self {
        if forge::has_nested_arrays(&values) {
            let method = if not { "where_not_in" } else { "where_in" };
            self.fail(Error::nested_array(method));
            return self;
        }

        self.push_bindings(values.clone(), BindingCategory::Where);
        self.wheres.push(if not {
            Where::NotIn {
                column,
                values,
                boolean,
            }
        } else {
            Where::In {
                column,
                values,
                boolean,
            }
        });
        self
    }

    /// Add a WHERE column IS NULL condition
    pub fn where_null(self, column: impl Into<Column>) -> Self {
        self.add_where_null(column.into(), false, Boolean::And)
    }

    pub fn or_where_null(self, column: impl Into<Column>) -> Self {
        self.add_where_null(column.into(), false, Boolean::Or)
    }

    pub fn where_not_null(self, column: impl Into<Column>) -> Self {
        self.add_where_null(column.into(), true, Boolean::And)
    }

    pub fn or_where_not_null(self, column: impl Into<Column>) -> Self {
        self.add_where_null(column.into(), true, Boolean::Or)
    }

    fn add_where_null(mut self, column: Column, not: bool, boolean: Boolean) -> Self {
        self.wheres.push(if not {
            Where::NotNull { column, boolean }
        } else {
            Where::Null { column, boolean }
        });
        self
    }

    /// Add a WHERE BETWEEN condition
    ///
    /// Only the first two values (after flattening) are used.
    pub fn where_between<C, I, V>(self, column: C, values: I) -> Self
    where
        C: Into<Column>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_where_between(column.into(), collect(values), false, Boolean::And)
    }

    pub fn or_where_between<C, I, V>(self, column: C, values: I) -> Self
    where
        C: Into<Column>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_where_between(column.into(), collect(values), false, Boolean::Or)
    }

    pub fn where_not_between<C, I, V>(self, column: C, values: I) -> Self
    where
        C: Into<Column>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_where_between(column.into(), collect(values), true, Boolean::And)
    }

    pub fn or_where_not_between<C, I, V>(self, column: C, values: I) -> Self
    where
        C: Into<Column>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_where_between(column.into(), collect(values), true, Boolean::Or)
    }

    fn add_where_between(
        mut self,
        column: Column,
        values: Vec<Value>,
        not: bool,
        boolean: Boolean,
    ) -> Self {
        match first_two(values) {
            Some(values) => {
                self.push_bindings(values.clone(), BindingCategory::Where);
                self.wheres.push(Where::Between {
                    column,
                    values,
                    not,
                    boolean,
                });
            }
            None => self.fail(Error::invalid_query("where_between requires two values")),
        }
        self
    }

    /// Add a condition that `column` lies between two other columns
    pub fn where_between_columns<C, A, B>(self, column: C, columns: (A, B)) -> Self
    where
        C: Into<Column>,
        A: Into<Column>,
        B: Into<Column>,
    {
        self.add_where_between_columns(column.into(), columns, false, Boolean::And)
    }

    pub fn or_where_between_columns<C, A, B>(self, column: C, columns: (A, B)) -> Self
    where
        C: Into<Column>,
        A: Into<Column>,
        B: Into<Column>,
    {
        self.add_where_between_columns(column.into(), columns, false, Boolean::Or)
    }

    pub fn where_not_between_columns<C, A, B>(self, column: C, columns: (A, B)) -> Self
    where
        C: Into<Column>,
        A: Into<Column>,
        B: Into<Column>,
    {
        self.add_where_between_columns(column.into(), columns, true, Boolean::And)
    }

    pub fn or_where_not_between_columns<C, A, B>(self, column: C, columns: (A, B)) -> Self
    where
        C: Into<Column>,
        A: Into<Column>,
        B: Into<Column>,
    {
        self.add_where_between_columns(column.into(), columns, true, Boolean::Or)
    }

    fn add_where_between_columns<A, B>(
        mut self,
        column: Column,
        columns: (A, B),
        not: bool,
        boolean: Boolean,
    ) -> Self
    where
        A: Into<Column>,
        B: Into<Column>,
    {
        self.wheres.push(Where::BetweenColumns {
            column,
            columns: [columns.0.into(), columns.1.into()],
            not,
            boolean,
        });
        self
    }

    /// Compare two columns
    ///
    /// # Examples
    /// ```
    /// use quarry_core::table;
    ///
    /// let sql = table("users").where_column(("updated_at", ">", "created_at")).to_sql()?;
    /// assert_eq!(sql, "select * from `users` where `updated_at` > `created_at`");
    /// # Ok::<(), quarry_core::Error>(())
    /// ```
    pub fn where_column<C>(self, comparison: C) -> Self
    where
        C: IntoColumnComparison,
    {
        self.add_where_column(comparison, Boolean::And)
    }

    pub fn or_where_column<C>(self, comparison: C) -> Self
    where
        C: IntoColumnComparison,
    {
        self.add_where_column(comparison, Boolean::Or)
    }

    pub(crate) fn add_where_column<C>(mut self, comparison: C, boolean: Boolean) -> Self
    where
        C: IntoColumnComparison,
    {
        let comparison = comparison.into_column_comparison();
        self.wheres.push(Where::Column {
            first: comparison.first,
            operator: comparison.operator,
            second: comparison.second,
            boolean,
        });
        self
    }

    /// Add a WHERE EXISTS condition with a sub-select built by `f`
    pub fn where_exists<F>(self, f: F) -> Self
    where
        F: FnOnce(Builder) -> Builder,
    {
        self.add_where_exists(f, false, Boolean::And)
    }

    pub fn or_where_exists<F>(self, f: F) -> Self
    where
        F: FnOnce(Builder) -> Builder,
    {
        self.add_where_exists(f, false, Boolean::Or)
    }

    pub fn where_not_exists<F>(self, f: F) -> Self
    where
        F: FnOnce(Builder) -> Builder,
    {
        self.add_where_exists(f, true, Boolean::And)
    }

    pub fn or_where_not_exists<F>(self, f: F) -> Self
    where
        F: FnOnce(Builder) -> Builder,
    {
        self.add_where_exists(f, true, Boolean::Or)
    }

    fn add_where_exists<F>(mut self, f: F, not: bool, boolean: Boolean) -> Self
    where
        F: FnOnce(Builder) -> Builder,
    {
        let query = f(self.for_sub_query());
        self.absorb(&query);
        self.push_bindings(query.bindings(), BindingCategory::Where);

        let query = Box::new(query);
        self.wheres.push(if not {
            Where::NotExists { query, boolean }
        } else {
            Where::Exists { query, boolean }
        });
        self
    }
}

fn collect<I, V>(values: I) -> Vec<Value>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    values.into_iter().map(Into::into).collect()
}

/// First two scalars of a value list, or None when there are fewer
pub(crate) fn first_two(values: Vec<Value>) -> Option<[Value; 2]> {
    let mut flat = forge::flatten(values).into_iter();
    match (flat.next(), flat.next()) {
        (Some(low), Some(high)) => Some([low, high]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::operator::op;
    use crate::{raw, table, Error, Value};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_select_with_where() {
        let query = table("users").where_(("age", op::GT, 18)).where_(("active", 1));
        assert_eq!(
            query.to_sql().unwrap(),
            "select * from `users` where `age` > ? and `active` = ?"
        );
        assert_eq!(query.bindings(), vec![Value::I32(18), Value::I32(1)]);
    }

    #[test]
    fn test_or_where() {
        let query = table("users").where_(("a", 1)).or_where(("b", 2));
        assert_eq!(
            query.to_sql().unwrap(),
            "select * from `users` where `a` = ? or `b` = ?"
        );
        assert_eq!(query.bindings(), vec![Value::I32(1), Value::I32(2)]);
    }

    #[test]
    fn test_where_not() {
        let query = table("users").where_not(("banned", true)).or_where_not(("role", "guest"));
        assert_eq!(
            query.to_sql().unwrap(),
            "select * from `users` where not `banned` = ? or not `role` = ?"
        );
    }

    #[test]
    fn test_invalid_operator_becomes_value() {
        let query = table("users").where_(("name", "John", "unused"));
        assert_eq!(query.to_sql().unwrap(), "select * from `users` where `name` = ?");
        assert_eq!(query.bindings(), vec![Value::from("John")]);
    }

    #[test]
    fn test_null_value_degrades_to_null_checks() {
        let query = table("users")
            .where_(("deleted_at", Value::Null))
            .where_(("verified_at", "!=", Value::Null));
        assert_eq!(
            query.to_sql().unwrap(),
            "select * from `users` where `deleted_at` is null and `verified_at` is not null"
        );
        assert!(query.bindings().is_empty());
    }

    #[test]
    fn test_operator_in_routes_to_where_in() {
        let query = table("users").where_(("id", "in", vec![1, 2]));
        assert_eq!(query.to_sql().unwrap(), "select * from `users` where `id` in (?, ?)");
        assert_eq!(query.bindings().len(), 2);
    }

    #[test]
    fn test_array_value_binds_first_element() {
        let query = table("users").where_(("id", vec![4, 5]));
        assert_eq!(query.to_sql().unwrap(), "select * from `users` where `id` = ?");
        assert_eq!(query.bindings(), vec![Value::I32(4)]);
    }

    #[test]
    fn test_expression_value_is_not_bound() {
        let query = table("events").where_(("starts_at", "<", raw("NOW()")));
        assert_eq!(
            query.to_sql().unwrap(),
            "select * from `events` where `starts_at` < NOW()"
        );
        assert!(query.bindings().is_empty());
    }

    #[test]
    fn test_where_in_and_not_in() {
        let query = table("users")
            .where_in("id", vec![1, 2, 3])
            .or_where_not_in("status", ["banned"]);
        assert_eq!(
            query.to_sql().unwrap(),
            "select * from `users` where `id` in (?, ?, ?) or `status` not in (?)"
        );
        assert_eq!(query.bindings().len(), 4);
    }

    #[test]
    fn test_empty_where_in_short_circuits() {
        let query = table("users")
            .where_in("id", Vec::<i32>::new())
            .where_not_in("id", Vec::<i32>::new());
        assert_eq!(
            query.to_sql().unwrap(),
            "select * from `users` where 0 = 1 and 1 = 1"
        );
        assert!(query.bindings().is_empty());
    }

    #[test]
    fn test_where_in_rejects_nested_arrays() {
        let query = table("users").where_in("id", vec![vec![1, 2], vec![3]]);
        assert_eq!(
            query.to_sql().unwrap_err(),
            Error::nested_array("where_in")
        );
        assert!(query.wheres().is_empty());
    }

    #[test]
    fn test_where_between() {
        let query = table("scores").where_between("score", [10, 20]);
        assert_eq!(
            query.to_sql().unwrap(),
            "select * from `scores` where `score` between ? and ?"
        );
        assert_eq!(query.bindings(), vec![Value::I32(10), Value::I32(20)]);
    }

    #[test]
    fn test_where_between_uses_first_two_values() {
        let query = table("scores").where_not_between("score", vec![1, 2, 3, 4]);
        assert_eq!(
            query.to_sql().unwrap(),
            "select * from `scores` where `score` not between ? and ?"
        );
        assert_eq!(query.bindings(), vec![Value::I32(1), Value::I32(2)]);
    }

    #[test]
    fn test_where_between_requires_two_values() {
        let query = table("scores").where_between("score", [10]);
        assert!(matches!(
            query.to_sql().unwrap_err(),
            Error::InvalidQuery { .. }
        ));
    }

    #[test]
    fn test_where_between_columns() {
        let query = table("readings")
            .where_between_columns("value", ("min_value", "max_value"))
            .or_where_between_columns("value", ("low", "high"));
        assert_eq!(
            query.to_sql().unwrap(),
            "select * from `readings` where `value` between `min_value` and `max_value` or `value` between `low` and `high`"
        );
        assert!(query.bindings().is_empty());
    }

    #[test]
    fn test_where_null_variants() {
        let query = table("users")
            .where_null("deleted_at")
            .or_where_not_null("email");
        assert_eq!(
            query.to_sql().unwrap(),
            "select * from `users` where `deleted_at` is null or `email` is not null"
        );
    }

    #[test]
    fn test_where_raw() {
        let query = table("users")
            .where_(("id", 1))
            .or_where_raw("age > ? and age < ?", vec![18.into(), 65.into()]);
        assert_eq!(
            query.to_sql().unwrap(),
            "select * from `users` where `id` = ? or age > ? and age < ?"
        );
        assert_eq!(
            query.bindings(),
            vec![Value::I32(1), Value::I32(18), Value::I32(65)]
        );
    }

    #[test]
    fn test_where_expression() {
        let query = table("users").where_expression(raw("1 = 1"));
        assert_eq!(query.to_sql().unwrap(), "select * from `users` where 1 = 1");
    }

    #[test]
    fn test_nested_where_group() {
        let query = table("users")
            .where_(("age", ">", 18))
            .or_where_group(|q| q.where_(("role", "admin")).where_(("active", 1)));
        assert_eq!(
            query.to_sql().unwrap(),
            "select * from `users` where `age` > ? or (`role` = ? and `active` = ?)"
        );
        assert_eq!(
            query.bindings(),
            vec![Value::I32(18), Value::from("admin"), Value::I32(1)]
        );
    }

    #[test]
    fn test_empty_group_is_ignored() {
        let query = table("users").where_group(|q| q);
        assert_eq!(query.to_sql().unwrap(), "select * from `users`");
    }

    #[test]
    fn test_where_not_group() {
        let query = table("users").where_not_group(|q| q.where_(("a", 1)).or_where(("b", 2)));
        assert_eq!(
            query.to_sql().unwrap(),
            "select * from `users` where not (`a` = ? or `b` = ?)"
        );
    }

    #[test]
    fn test_group_error_propagates() {
        let query = table("users").where_group(|q| q.where_in("id", vec![vec![1]]));
        assert_eq!(query.to_sql().unwrap_err(), Error::nested_array("where_in"));
    }

    #[test]
    fn test_where_all_groups_conditions() {
        let query = table("users").where_(("id", 1)).or_where_all(vec![("a", 2), ("b", 3)]);
        assert_eq!(
            query.to_sql().unwrap(),
            "select * from `users` where `id` = ? or (`a` = ? and `b` = ?)"
        );
        assert_eq!(query.bindings().len(), 3);
    }

    #[test]
    fn test_where_column() {
        let query = table("users")
            .where_column(("first_name", "last_name"))
            .or_where_column(("updated_at", ">", "created_at"));
        assert_eq!(
            query.to_sql().unwrap(),
            "select * from `users` where `first_name` = `last_name` or `updated_at` > `created_at`"
        );
        assert!(query.bindings().is_empty());
    }

    #[test]
    fn test_where_exists() {
        let query = table("users").where_exists(|q| {
            q.from("orders")
                .where_column(("orders.user_id", "users.id"))
                .where_(("orders.total", ">", 100))
        });
        assert_eq!(
            query.to_sql().unwrap(),
            "select * from `users` where exists (select * from `orders` where `orders`.`user_id` = `users`.`id` and `orders`.`total` > ?)"
        );
        assert_eq!(query.bindings(), vec![Value::I32(100)]);
    }

    #[test]
    fn test_where_not_exists() {
        let query = table("users")
            .where_(("active", 1))
            .or_where_not_exists(|q| q.from("bans").where_column(("bans.user_id", "users.id")));
        assert_eq!(
            query.to_sql().unwrap(),
            "select * from `users` where `active` = ? or not exists (select * from `bans` where `bans`.`user_id` = `users`.`id`)"
        );
    }
}
