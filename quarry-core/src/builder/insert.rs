//! INSERT statements

use super::Builder;
use crate::compiler::CompiledQuery;
use crate::{Result, Value};
use std::collections::{BTreeMap, HashMap};

/// Column values of one row, kept in column-name order
pub type Row = BTreeMap<String, Value>;

/// Trait for types that can be converted to a row of column values
pub trait IntoRow {
    fn into_row(self) -> Row;
}

impl<S, V> IntoRow for BTreeMap<S, V>
where
    S: Into<String>,
    V: Into<Value>,
{
    fn into_row(self) -> Row {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl<S, V> IntoRow for HashMap<S, V>
where
    S: Into<String>,
    V: Into<Value>,
{
    fn into_row(self) -> Row {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl<S, V> IntoRow for Vec<(S, V)>
where
    S: Into<String>,
    V: Into<Value>,
{
    fn into_row(self) -> Row {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl<S, V, const N: usize> IntoRow for [(S, V); N]
where
    S: Into<String>,
    V: Into<Value>,
{
    fn into_row(self) -> Row {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl Builder {
    /// Compile an INSERT of one row
    ///
    /// # Examples
    /// ```
    /// use quarry_core::table;
    ///
    /// let query = table("users").insert([("name", "Jane"), ("email", "jane@example.com")])?;
    /// assert_eq!(query.sql, "insert into `users` (`email`, `name`) values (?, ?)");
    /// assert_eq!(query.bindings.len(), 2);
    /// # Ok::<(), quarry_core::Error>(())
    /// ```
    pub fn insert<R>(&self, row: R) -> Result<CompiledQuery>
    where
        R: IntoRow,
    {
        self.insert_many(vec![row])
    }

    /// Compile a multi-row INSERT; every row must name the same columns
    pub fn insert_many<I, R>(&self, rows: I) -> Result<CompiledQuery>
    where
        I: IntoIterator<Item = R>,
        R: IntoRow,
    {
        self.check()?;
        let rows = collect_rows(rows);
        self.compiler.compile_insert(self, &rows)
    }

    /// Compile an INSERT that skips rows conflicting with existing keys
    pub fn insert_or_ignore<I, R>(&self, rows: I) -> Result<CompiledQuery>
    where
        I: IntoIterator<Item = R>,
        R: IntoRow,
    {
        self.check()?;
        let rows = collect_rows(rows);
        self.compiler.compile_insert_or_ignore(self, &rows)
    }

    /// Compile an INSERT whose statement reports the new key
    ///
    /// Only PostgreSQL renders the `returning` clause; `sequence` defaults to
    /// `id`.
    pub fn insert_get_id<R>(&self, row: R, sequence: Option<&str>) -> Result<CompiledQuery>
    where
        R: IntoRow,
    {
        self.check()?;
        self.compiler
            .compile_insert_get_id(self, &row.into_row(), sequence)
    }
}

fn collect_rows<I, R>(rows: I) -> Vec<Row>
where
    I: IntoIterator<Item = R>,
    R: IntoRow,
{
    rows.into_iter().map(IntoRow::into_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Compiler;
    use crate::config::Driver;
    use crate::{raw, table, Error};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_single_row() {
        let mut row = HashMap::new();
        row.insert("name", Value::from("John"));
        row.insert("age", Value::from(30));

        let query = table("users").insert(row).unwrap();
        assert_eq!(query.sql, "insert into `users` (`age`, `name`) values (?, ?)");
        assert_eq!(query.bindings, vec![Value::I32(30), Value::from("John")]);
    }

    #[test]
    fn test_insert_many_rows() {
        let query = table("users")
            .insert_many(vec![
                vec![("name", "a"), ("email", "a@x")],
                vec![("name", "b"), ("email", "b@x")],
            ])
            .unwrap();
        assert_eq!(
            query.sql,
            "insert into `users` (`email`, `name`) values (?, ?), (?, ?)"
        );
        assert_eq!(
            query.bindings,
            vec![
                Value::from("a@x"),
                Value::from("a"),
                Value::from("b@x"),
                Value::from("b"),
            ]
        );
        assert_eq!(query.placeholder_count(), query.bindings.len());
    }

    #[test]
    fn test_insert_rows_must_share_columns() {
        let err = table("users")
            .insert_many(vec![vec![("name", "a")], vec![("email", "b@x")]])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidQuery { .. }));
    }

    #[test]
    fn test_insert_empty_first_row_still_checks_columns() {
        let err = table("t")
            .insert_many(vec![vec![], vec![("a", 1)]])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidQuery { .. }));

        let query = table("t")
            .insert_many(vec![Vec::<(&str, i32)>::new(), Vec::new()])
            .unwrap();
        assert_eq!(query.sql, "insert into `t` () values ()");
        assert!(query.bindings.is_empty());
    }

    #[test]
    fn test_insert_expression_is_spliced() {
        let query = table("users")
            .insert([("name", Value::from("a")), ("created_at", raw("now()").into())])
            .unwrap();
        assert_eq!(
            query.sql,
            "insert into `users` (`created_at`, `name`) values (now(), ?)"
        );
        assert_eq!(query.bindings, vec![Value::from("a")]);
    }

    #[test]
    fn test_insert_empty_row() {
        let mysql = table("logs").insert(Vec::<(&str, i32)>::new()).unwrap();
        assert_eq!(mysql.sql, "insert into `logs` () values ()");

        let pgsql = Compiler::for_driver(Driver::Pgsql)
            .table("logs")
            .insert(Vec::<(&str, i32)>::new())
            .unwrap();
        assert_eq!(pgsql.sql, "insert into \"logs\" default values");
    }

    #[test]
    fn test_insert_requires_table() {
        let err = Compiler::default()
            .query()
            .insert([("a", 1)])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidQuery { .. }));
    }

    #[test]
    fn test_insert_or_ignore_per_driver() {
        let row = [("email", "a@x")];
        assert_eq!(
            table("users").insert_or_ignore(vec![row]).unwrap().sql,
            "insert ignore into `users` (`email`) values (?)"
        );
        assert_eq!(
            Compiler::for_driver(Driver::Sqlite)
                .table("users")
                .insert_or_ignore(vec![row])
                .unwrap()
                .sql,
            "insert or ignore into \"users\" (\"email\") values (?)"
        );
        assert_eq!(
            Compiler::for_driver(Driver::Pgsql)
                .table("users")
                .insert_or_ignore(vec![row])
                .unwrap()
                .sql,
            "insert into \"users\" (\"email\") values (?) on conflict do nothing"
        );
    }

    #[test]
    fn test_insert_get_id() {
        let pgsql = Compiler::for_driver(Driver::Pgsql)
            .table("users")
            .insert_get_id([("name", "a")], None)
            .unwrap();
        assert_eq!(
            pgsql.sql,
            "insert into \"users\" (\"name\") values (?) returning \"id\""
        );

        let mysql = table("users")
            .insert_get_id([("name", "a")], Some("user_id"))
            .unwrap();
        assert_eq!(mysql.sql, "insert into `users` (`name`) values (?)");
    }

    #[test]
    fn test_insert_returns_deferred_error() {
        let err = table("users")
            .order_by("id", "up")
            .insert([("a", 1)])
            .unwrap_err();
        assert_eq!(err, Error::invalid_order_direction("up"));
    }
}
