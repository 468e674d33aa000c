//! SQL compiler
//!
//! The [`Compiler`] turns a [`Builder`] snapshot into SQL text. It keeps no
//! state besides its [`CompilerConfig`], so one compiler can render any number
//! of builders and the same builder always renders to the same string.
//!
//! Rendering is split by statement: `select` walks the fixed component list,
//! `wheres` renders condition lists for WHERE, ON and HAVING, and
//! `write` covers INSERT, UPDATE, DELETE and TRUNCATE.

mod select;
mod wheres;
mod write;

#[cfg(test)]
mod tests;

use crate::builder::{Builder, Column};
use crate::config::{CompilerConfig, Driver};
use crate::Value;
use serde::Serialize;

/// SQL text plus its bindings in placeholder order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub sql: String,
    pub bindings: Vec<Value>,
}

impl CompiledQuery {
    pub fn new(sql: String, bindings: Vec<Value>) -> Self {
        Self { sql, bindings }
    }

    /// Number of `?` placeholders in the SQL text
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}

/// Renders builders for one database driver
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Compiler with default settings for `driver`
    pub fn for_driver(driver: Driver) -> Self {
        Self::new(CompilerConfig::new(driver))
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn driver(&self) -> Driver {
        self.config.driver
    }

    pub fn table_prefix(&self) -> &str {
        &self.config.table_prefix
    }

    pub fn set_table_prefix(&mut self, prefix: impl Into<String>) {
        self.config.table_prefix = prefix.into();
    }

    /// Empty builder rendering through this compiler
    pub fn query(&self) -> Builder {
        Builder::new(self.clone())
    }

    /// Builder selecting from `table`
    ///
    /// # Examples
    /// ```
    /// use quarry_core::{Compiler, Driver};
    ///
    /// let sql = Compiler::for_driver(Driver::Pgsql).table("users").to_sql()?;
    /// assert_eq!(sql, r#"select * from "users""#);
    /// # Ok::<(), quarry_core::Error>(())
    /// ```
    pub fn table(&self, table: impl Into<String>) -> Builder {
        self.query().from(table)
    }

    /// Quote a column reference; expressions pass through untouched
    pub fn wrap(&self, column: &Column) -> String {
        match column {
            Column::Name(name) => self.wrap_name(name),
            Column::Raw(expression) => expression.to_string(),
        }
    }

    /// Quote a possibly qualified, possibly aliased column name
    ///
    /// The table segment of `table.column` receives the table prefix.
    pub fn wrap_name(&self, name: &str) -> String {
        if let Some((column, alias)) = split_alias(name) {
            return format!("{} as {}", self.wrap_name(column), self.wrap_value(alias));
        }

        match name.rsplit_once('.') {
            Some((table, column)) => {
                format!("{}.{}", self.wrap_table(table), self.wrap_value(column))
            }
            None => self.wrap_value(name),
        }
    }

    /// Quote a table name, applying the table prefix to it and to its alias
    pub fn wrap_table(&self, table: &str) -> String {
        let prefix = self.table_prefix();
        if let Some((table, alias)) = split_alias(table) {
            return format!(
                "{} as {}",
                self.wrap_table(table),
                self.wrap_value(&format!("{}{}", prefix, alias))
            );
        }

        format!("{}{}", prefix, table)
            .split('.')
            .map(|segment| self.wrap_value(segment))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quote a single identifier segment
    pub fn wrap_value(&self, value: &str) -> String {
        if value == "*" {
            return value.to_string();
        }
        let quote = self.driver().quote_char();
        let doubled: String = [quote, quote].iter().collect();
        format!(
            "{quote}{}{quote}",
            value.replace(quote, &doubled),
            quote = quote
        )
    }

    /// Comma separated list of wrapped columns
    pub fn columnize(&self, columns: &[Column]) -> String {
        columns
            .iter()
            .map(|column| self.wrap(column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Placeholder for a value; expressions are spliced in
    pub fn parameter(&self, value: &Value) -> String {
        match value {
            Value::Raw(expression) => expression.to_string(),
            _ => "?".to_string(),
        }
    }

    pub fn parameterize(&self, values: &[Value]) -> String {
        values
            .iter()
            .map(|value| self.parameter(value))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The driver's random ordering function
    pub fn compile_random(&self) -> String {
        self.driver().random_function().to_string()
    }
}

/// Split `"name as alias"` (keyword in any case) into its two halves
fn split_alias(value: &str) -> Option<(&str, &str)> {
    let lower = value.to_ascii_lowercase();
    lower
        .find(" as ")
        .map(|at| (value[..at].trim(), value[at + 4..].trim()))
}
