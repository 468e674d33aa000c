//! Clause records stored on a builder.
//!
//! Each variant has exactly one rendering arm in the compiler; adding a
//! variant without teaching the compiler about it does not build.

use super::common::{Boolean, Column, SortDirection};
use super::Builder;
use crate::{Expression, Operator, Value};

/// One entry of a WHERE (or join ON) list
#[derive(Debug, Clone)]
pub enum Where {
    Basic {
        column: Column,
        operator: Operator,
        value: Value,
        boolean: Boolean,
    },
    Raw {
        sql: String,
        boolean: Boolean,
    },
    Expression {
        expression: Expression,
        boolean: Boolean,
    },
    In {
        column: Column,
        values: Vec<Value>,
        boolean: Boolean,
    },
    NotIn {
        column: Column,
        values: Vec<Value>,
        boolean: Boolean,
    },
    Null {
        column: Column,
        boolean: Boolean,
    },
    NotNull {
        column: Column,
        boolean: Boolean,
    },
    Between {
        column: Column,
        values: [Value; 2],
        not: bool,
        boolean: Boolean,
    },
    BetweenColumns {
        column: Column,
        columns: [Column; 2],
        not: bool,
        boolean: Boolean,
    },
    Column {
        first: Column,
        operator: Operator,
        second: Column,
        boolean: Boolean,
    },
    Nested {
        query: Box<Builder>,
        boolean: Boolean,
    },
    Exists {
        query: Box<Builder>,
        boolean: Boolean,
    },
    NotExists {
        query: Box<Builder>,
        boolean: Boolean,
    },
}

impl Where {
    pub fn boolean(&self) -> Boolean {
        match self {
            Where::Basic { boolean, .. }
            | Where::Raw { boolean, .. }
            | Where::Expression { boolean, .. }
            | Where::In { boolean, .. }
            | Where::NotIn { boolean, .. }
            | Where::Null { boolean, .. }
            | Where::NotNull { boolean, .. }
            | Where::Between { boolean, .. }
            | Where::BetweenColumns { boolean, .. }
            | Where::Column { boolean, .. }
            | Where::Nested { boolean, .. }
            | Where::Exists { boolean, .. }
            | Where::NotExists { boolean, .. } => *boolean,
        }
    }
}

/// One entry of a HAVING list
#[derive(Debug, Clone)]
pub enum Having {
    Basic {
        column: Column,
        operator: Operator,
        value: Value,
        boolean: Boolean,
    },
    Raw {
        sql: String,
        boolean: Boolean,
    },
    Expression {
        expression: Expression,
        boolean: Boolean,
    },
    Between {
        column: Column,
        values: [Value; 2],
        not: bool,
        boolean: Boolean,
    },
    Null {
        column: Column,
        boolean: Boolean,
    },
    NotNull {
        column: Column,
        boolean: Boolean,
    },
    /// Bitwise comparison, true when the result is non-zero
    Bit {
        column: Column,
        operator: Operator,
        value: Value,
        boolean: Boolean,
    },
    Nested {
        query: Box<Builder>,
        boolean: Boolean,
    },
}

impl Having {
    pub fn boolean(&self) -> Boolean {
        match self {
            Having::Basic { boolean, .. }
            | Having::Raw { boolean, .. }
            | Having::Expression { boolean, .. }
            | Having::Between { boolean, .. }
            | Having::Null { boolean, .. }
            | Having::NotNull { boolean, .. }
            | Having::Bit { boolean, .. }
            | Having::Nested { boolean, .. } => *boolean,
        }
    }
}

/// An ORDER BY entry
#[derive(Debug, Clone, PartialEq)]
pub enum Order {
    Column {
        column: Column,
        direction: SortDirection,
    },
    Raw {
        sql: String,
    },
}
