//! SQL comparison operators

use std::fmt::{self, Display};

/// Every operator a predicate accepts when given as text.
///
/// Anything outside this list is treated as a value by `where_` (see
/// [`crate::builder::IntoCondition`]).
const OPERATORS: &[&str] = &[
    "=", "<", ">", "<=", ">=", "<>", "!=", "<=>",
    "like", "like binary", "not like", "ilike", "not ilike",
    "&", "|", "^", "<<", ">>", "&~",
    "rlike", "not rlike", "regexp", "not regexp",
    "~", "~*", "!~", "!~*", "~~*", "!~~*",
    "similar to", "not similar to",
    "in", "not in", "between", "not between",
];

const BITWISE_OPERATORS: &[&str] = &["&", "|", "^", "<<", ">>", "&~"];

/// Type-safe SQL operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operator(&'static str);

impl Operator {
    pub const EQ: Self = Operator("=");
    pub const NEQ: Self = Operator("!=");
    pub const GT: Self = Operator(">");
    pub const LT: Self = Operator("<");
    pub const GTE: Self = Operator(">=");
    pub const LTE: Self = Operator("<=");
    pub const LIKE: Self = Operator("like");
    pub const NOT_LIKE: Self = Operator("not like");
    pub const ILIKE: Self = Operator("ilike");
    pub const IN: Self = Operator("in");
    pub const NOT_IN: Self = Operator("not in");
    pub const BETWEEN: Self = Operator("between");
    pub const NOT_BETWEEN: Self = Operator("not between");

    /// Create a custom operator for database-specific operations
    ///
    /// Custom operators skip the whitelist entirely.
    ///
    /// # Examples
    /// ```
    /// use quarry_core::Operator;
    ///
    /// // PostgreSQL full-text search
    /// let fts_op = Operator::custom("@@");
    /// ```
    pub const fn custom(op: &'static str) -> Self {
        Operator(op)
    }

    /// Look up a whitelisted operator, ignoring ASCII case.
    pub fn parse(op: &str) -> Option<Self> {
        let op = op.trim();
        OPERATORS
            .iter()
            .copied()
            .find(|known| known.eq_ignore_ascii_case(op))
            .map(Operator)
    }

    /// Whether `op` is on the whitelist
    pub fn is_valid(op: &str) -> bool {
        Self::parse(op).is_some()
    }

    pub fn is_bitwise(&self) -> bool {
        BITWISE_OPERATORS.contains(&self.0)
    }

    /// Get the string representation of the operator
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Convenience module for operator constants
pub mod op {
    use super::Operator;

    pub const EQ: Operator = Operator::EQ;
    pub const NEQ: Operator = Operator::NEQ;
    pub const GT: Operator = Operator::GT;
    pub const LT: Operator = Operator::LT;
    pub const GTE: Operator = Operator::GTE;
    pub const LTE: Operator = Operator::LTE;
    pub const LIKE: Operator = Operator::LIKE;
    pub const NOT_LIKE: Operator = Operator::NOT_LIKE;
    pub const ILIKE: Operator = Operator::ILIKE;
    pub const IN: Operator = Operator::IN;
    pub const NOT_IN: Operator = Operator::NOT_IN;
    pub const BETWEEN: Operator = Operator::BETWEEN;
    pub const NOT_BETWEEN: Operator = Operator::NOT_BETWEEN;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_constants() {
        assert_eq!(Operator::GT.as_str(), ">");
        assert_eq!(Operator::EQ.as_str(), "=");
        assert_eq!(Operator::LIKE.as_str(), "like");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Operator::parse("LIKE"), Some(Operator::LIKE));
        assert_eq!(Operator::parse("Not In"), Some(Operator::NOT_IN));
        assert_eq!(Operator::parse(">="), Some(Operator::GTE));
    }

    #[test]
    fn test_unknown_operator_is_rejected() {
        assert_eq!(Operator::parse("John"), None);
        assert!(!Operator::is_valid("=="));
    }

    #[test]
    fn test_bitwise_operators() {
        assert!(Operator::parse("&").unwrap().is_bitwise());
        assert!(Operator::parse("<<").unwrap().is_bitwise());
        assert!(!Operator::GT.is_bitwise());
    }

    #[test]
    fn test_custom_operator() {
        let custom_op = Operator::custom("@@");
        assert_eq!(custom_op.as_str(), "@@");
        assert_eq!(format!("{}", custom_op), "@@");
    }
}
