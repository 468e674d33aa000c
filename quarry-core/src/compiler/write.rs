//! INSERT, UPDATE, DELETE and TRUNCATE rendering

use super::{CompiledQuery, Compiler};
use crate::builder::{Builder, Row};
use crate::config::Driver;
use crate::forge::{self, BindingCategory};
use crate::{Error, Result, Value};

impl Compiler {
    /// Compile an INSERT of one or more rows sharing the same columns
    pub fn compile_insert(&self, query: &Builder, rows: &[Row]) -> Result<CompiledQuery> {
        let table = self.target_table(query, "insert")?;
        let sql = self.render_insert("insert into", &table, rows)?;
        Ok(self.finish("insert", sql, insert_bindings(rows)))
    }

    /// Compile an INSERT that skips conflicting rows
    pub fn compile_insert_or_ignore(
        &self,
        query: &Builder,
        rows: &[Row],
    ) -> Result<CompiledQuery> {
        let table = self.target_table(query, "insert")?;
        let sql = match self.driver() {
            Driver::Mysql => self.render_insert("insert ignore into", &table, rows)?,
            Driver::Sqlite => self.render_insert("insert or ignore into", &table, rows)?,
            Driver::Pgsql => format!(
                "{} on conflict do nothing",
                self.render_insert("insert into", &table, rows)?
            ),
        };
        Ok(self.finish("insert", sql, insert_bindings(rows)))
    }

    /// Compile an INSERT that returns the generated key on PostgreSQL
    pub fn compile_insert_get_id(
        &self,
        query: &Builder,
        row: &Row,
        sequence: Option<&str>,
    ) -> Result<CompiledQuery> {
        let table = self.target_table(query, "insert")?;
        let rows = std::slice::from_ref(row);
        let mut sql = self.render_insert("insert into", &table, rows)?;
        if self.driver() == Driver::Pgsql {
            sql = format!(
                "{} returning {}",
                sql,
                self.wrap_value(sequence.unwrap_or("id"))
            );
        }
        Ok(self.finish("insert", sql, insert_bindings(rows)))
    }

    fn render_insert(&self, verb: &str, table: &str, rows: &[Row]) -> Result<String> {
        let table = self.wrap_table(table);
        let columns: Vec<&String> = match rows.first() {
            Some(first) => first.keys().collect(),
            None => Vec::new(),
        };

        if rows.iter().any(|row| !row.keys().eq(columns.iter().copied())) {
            return Err(Error::invalid_query(
                "every inserted row must name the same columns",
            ));
        }

        if columns.is_empty() {
            return Ok(match self.driver() {
                Driver::Mysql => format!("{} {} () values ()", verb, table),
                Driver::Pgsql | Driver::Sqlite => format!("{} {} default values", verb, table),
            });
        }

        let columns = columns
            .iter()
            .map(|column| self.wrap_name(column))
            .collect::<Vec<_>>()
            .join(", ");
        let values = rows
            .iter()
            .map(|row| {
                let values: Vec<Value> = row.values().cloned().map(forge::head).collect();
                format!("({})", self.parameterize(&values))
            })
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("{} {} ({}) values {}", verb, table, columns, values))
    }

    /// Compile an UPDATE
    ///
    /// MySQL renders joins between the table and `set`. PostgreSQL and SQLite
    /// have no joined UPDATE, so the joined rows are matched by their row
    /// identifier in a subquery instead.
    pub fn compile_update(&self, query: &Builder, values: &Row) -> Result<CompiledQuery> {
        let table = self.target_table(query, "update")?;
        if values.is_empty() {
            return Err(Error::invalid_query("update requires at least one column"));
        }

        let columns = values
            .iter()
            .map(|(column, value)| {
                format!(
                    "{} = {}",
                    self.wrap_update_column(column),
                    self.parameter(&forge::head(value.clone()))
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        let ordered = self.renders_order_and_limit(query);
        let mut parts = vec![format!("update {}", self.wrap_table(&table))];
        match self.row_identifier() {
            Some(row_id) if !query.joins.is_empty() => {
                parts.push(format!("set {}", columns));
                parts.push(self.compile_joined_rows(query, &table, row_id));
            }
            _ => {
                if !query.joins.is_empty() {
                    parts.push(self.compile_joins(&query.joins));
                }
                parts.push(format!("set {}", columns));
                parts.push(self.compile_wheres(query));
            }
        }
        if ordered {
            parts.extend(self.order_and_limit(query));
        }

        let sql = join_parts(parts);
        let bindings = self.prepare_bindings_for_update(query, values, ordered);
        Ok(self.finish("update", sql, bindings))
    }

    /// Bindings of an UPDATE in placeholder order
    ///
    /// On MySQL join bindings come first, then the new column values. Where a
    /// joined update becomes a row subquery the values come first. The where
    /// bindings follow and, when order by is rendered, the order bindings.
    pub fn prepare_bindings_for_update(
        &self,
        query: &Builder,
        values: &Row,
        ordered: bool,
    ) -> Vec<Value> {
        let values = forge::clean(values.values().cloned().map(forge::head));
        let joins = category(query, BindingCategory::Join);
        let mut bindings = if self.row_identifier().is_some() {
            [values, joins].concat()
        } else {
            [joins, values].concat()
        };
        bindings.extend(category(query, BindingCategory::Where));
        if ordered {
            bindings.extend(category(query, BindingCategory::Order));
        }
        bindings
    }

    /// Compile a DELETE
    ///
    /// With joins MySQL names the deleted table explicitly; PostgreSQL and
    /// SQLite match the joined rows by row identifier.
    pub fn compile_delete(&self, query: &Builder) -> Result<CompiledQuery> {
        let table = self.target_table(query, "delete")?;
        let ordered = self.renders_order_and_limit(query);

        let mut parts = vec![];
        match self.row_identifier() {
            _ if query.joins.is_empty() => {
                parts.push(format!("delete {}", self.compile_from(&table)));
                parts.push(self.compile_wheres(query));
            }
            Some(row_id) => {
                parts.push(format!("delete {}", self.compile_from(&table)));
                parts.push(self.compile_joined_rows(query, &table, row_id));
            }
            None => {
                parts.push(format!(
                    "delete {} {}",
                    self.wrap_table(table_alias(&table)),
                    self.compile_from(&table)
                ));
                parts.push(self.compile_joins(&query.joins));
                parts.push(self.compile_wheres(query));
            }
        }
        if ordered {
            parts.extend(self.order_and_limit(query));
        }

        let sql = join_parts(parts);
        let bindings = self.prepare_bindings_for_delete(query, ordered);
        Ok(self.finish("delete", sql, bindings))
    }

    /// Bindings of a DELETE in placeholder order: join, where, then order
    /// when it is rendered
    pub fn prepare_bindings_for_delete(&self, query: &Builder, ordered: bool) -> Vec<Value> {
        let mut skip = vec![BindingCategory::Select, BindingCategory::Having];
        if !ordered {
            skip.push(BindingCategory::Order);
        }
        forge::flatten_map(&forge::except(&query.bindings, &skip))
    }

    /// Compile a statement removing every row of the table
    pub fn compile_truncate(&self, query: &Builder) -> Result<CompiledQuery> {
        let table = self.wrap_table(&self.target_table(query, "truncate")?);
        let sql = match self.driver() {
            Driver::Mysql => format!("truncate table {}", table),
            Driver::Pgsql => format!("truncate {} restart identity cascade", table),
            Driver::Sqlite => format!("delete from {}", table),
        };
        Ok(self.finish("truncate", sql, Vec::new()))
    }

    // Only MySQL accepts order by and limit on single-table UPDATE/DELETE
    fn renders_order_and_limit(&self, query: &Builder) -> bool {
        self.driver() == Driver::Mysql && query.joins.is_empty()
    }

    // Hidden per-row column used to address joined rows in a subquery
    fn row_identifier(&self) -> Option<&'static str> {
        match self.driver() {
            Driver::Mysql => None,
            Driver::Pgsql => Some("ctid"),
            Driver::Sqlite => Some("rowid"),
        }
    }

    // PostgreSQL and SQLite reject a table-qualified column in `set`
    fn wrap_update_column(&self, column: &str) -> String {
        match self.driver() {
            Driver::Mysql => self.wrap_name(column),
            Driver::Pgsql | Driver::Sqlite => {
                let column = column.rsplit('.').next().unwrap_or(column);
                self.wrap_name(column)
            }
        }
    }

    fn compile_joined_rows(&self, query: &Builder, table: &str, row_id: &str) -> String {
        let select = join_parts(vec![
            format!(
                "select {}.{} {}",
                self.wrap_table(table_alias(table)),
                row_id,
                self.compile_from(table)
            ),
            self.compile_joins(&query.joins),
            self.compile_wheres(query),
        ]);
        format!("where {} in ({})", row_id, select)
    }

    fn order_and_limit(&self, query: &Builder) -> Vec<String> {
        let mut parts = vec![self.compile_orders(&query.orders)];
        if let Some(limit) = query.limit {
            parts.push(format!("limit {}", limit));
        }
        parts
    }

    fn target_table(&self, query: &Builder, statement: &str) -> Result<String> {
        query
            .from
            .clone()
            .ok_or_else(|| Error::invalid_query(format!("{} requires a table", statement)))
    }

    fn finish(&self, kind: &str, sql: String, bindings: Vec<Value>) -> CompiledQuery {
        tracing::debug!(
            target: "quarry",
            kind,
            sql = %sql,
            bindings = bindings.len(),
            "compiled statement"
        );
        CompiledQuery::new(sql, bindings)
    }
}

fn category(query: &Builder, category: BindingCategory) -> Vec<Value> {
    query.bindings.get(&category).cloned().unwrap_or_default()
}

// Alias of `users as u`, or the table itself
fn table_alias(table: &str) -> &str {
    table
        .to_ascii_lowercase()
        .rfind(" as ")
        .map(|at| table[at + 4..].trim())
        .unwrap_or(table)
}

fn join_parts(parts: Vec<String>) -> String {
    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn insert_bindings(rows: &[Row]) -> Vec<Value> {
    forge::clean(
        rows.iter()
            .flat_map(|row| row.values().cloned().map(forge::head)),
    )
}
