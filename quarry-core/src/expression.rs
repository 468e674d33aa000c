//! Raw SQL fragments

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A fragment of SQL that is spliced into the statement as-is.
///
/// Expressions are never quoted as identifiers and never produce a binding.
/// Whatever placeholders they contain must be matched by bindings the caller
/// supplies alongside them (see `where_raw`, `select_raw`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Expression(String);

impl Expression {
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    /// The SQL text of the expression
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Expression {
    fn from(sql: &str) -> Self {
        Self::new(sql)
    }
}

impl From<String> for Expression {
    fn from(sql: String) -> Self {
        Self(sql)
    }
}

/// Shorthand for [`Expression::new`]
///
/// # Examples
/// ```
/// use quarry_core::{raw, table};
///
/// let query = table("users").select(raw("count(*) as user_count"));
/// ```
pub fn raw(sql: impl Into<String>) -> Expression {
    Expression::new(sql)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_keeps_text_verbatim() {
        let expr = raw("NOW() - interval '1 day'");
        assert_eq!(expr.as_str(), "NOW() - interval '1 day'");
        assert_eq!(expr.to_string(), "NOW() - interval '1 day'");
    }

    #[test]
    fn test_expression_conversions() {
        assert_eq!(Expression::from("a"), Expression::new("a".to_string()));
        assert_eq!(raw("x").into_inner(), "x");
    }
}
