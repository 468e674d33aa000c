//! Error types for Quarry

use thiserror::Error;

/// The main error type for Quarry operations
///
/// Errors are plain values so a builder can hold on to the first one raised
/// by a fluent call and hand it back from `to_sql`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// ORDER BY direction other than `asc` / `desc`
    #[error("Order direction must be \"asc\" or \"desc\", got \"{direction}\"")]
    InvalidOrderDirection { direction: String },

    /// A nested array was handed to a list predicate
    #[error("Nested arrays may not be passed to {method} method")]
    NestedArray { method: String },

    /// Invalid query configuration
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    /// Compiler configuration could not be read
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Convenience Result type for Quarry operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new invalid order direction error
    pub fn invalid_order_direction(direction: impl Into<String>) -> Self {
        Self::InvalidOrderDirection {
            direction: direction.into(),
        }
    }

    /// Create a new nested array error for the given builder method
    pub fn nested_array(method: impl Into<String>) -> Self {
        Self::NestedArray {
            method: method.into(),
        }
    }

    /// Create a new invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_order_direction_error() {
        let err = Error::invalid_order_direction("sideways");
        assert!(matches!(err, Error::InvalidOrderDirection { .. }));
        assert_eq!(
            err.to_string(),
            "Order direction must be \"asc\" or \"desc\", got \"sideways\""
        );
    }

    #[test]
    fn test_nested_array_error() {
        let err = Error::nested_array("where_in");
        assert_eq!(
            err.to_string(),
            "Nested arrays may not be passed to where_in method"
        );
    }

    #[test]
    fn test_invalid_query_error() {
        let err = Error::invalid_query("UPDATE requires values");
        assert!(matches!(err, Error::InvalidQuery { .. }));
        assert_eq!(err.to_string(), "Invalid query: UPDATE requires values");
    }

    #[test]
    fn test_config_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().starts_with("Configuration error: "));
    }
}
