//! Compiler configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Target database family. Controls identifier quoting and the handful of
/// clauses whose spelling differs between engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    #[default]
    #[serde(alias = "mariadb")]
    Mysql,
    #[serde(alias = "postgres", alias = "postgresql")]
    Pgsql,
    Sqlite,
}

impl Driver {
    /// Character used to quote identifiers
    pub fn quote_char(self) -> char {
        match self {
            Driver::Mysql => '`',
            Driver::Pgsql | Driver::Sqlite => '"',
        }
    }

    /// Function used for `in_random_order`
    pub fn random_function(self) -> &'static str {
        match self {
            Driver::Mysql => "RAND()",
            Driver::Pgsql | Driver::Sqlite => "RANDOM()",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Driver::Mysql => "mysql",
            Driver::Pgsql => "pgsql",
            Driver::Sqlite => "sqlite",
        }
    }
}

impl Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Driver {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Driver::Mysql),
            "pgsql" | "postgres" | "postgresql" => Ok(Driver::Pgsql),
            "sqlite" => Ok(Driver::Sqlite),
            other => Err(Error::config(format!("unknown driver '{}'", other))),
        }
    }
}

/// Settings the compiler is constructed with.
///
/// # Examples
/// ```
/// use quarry_core::{CompilerConfig, Driver};
///
/// let config = CompilerConfig::from_json(r#"{"driver": "postgres", "table_prefix": "app_"}"#)?;
/// assert_eq!(config.driver, Driver::Pgsql);
/// # Ok::<(), quarry_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub driver: Driver,
    /// Prepended to every table name the compiler wraps
    pub table_prefix: String,
}

impl CompilerConfig {
    pub fn new(driver: Driver) -> Self {
        Self {
            driver,
            table_prefix: String::new(),
        }
    }

    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    /// Read a configuration from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
