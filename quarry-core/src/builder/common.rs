//! Common types and traits shared across the builder

use crate::compiler::CompiledQuery;
use crate::{Error, Expression, Operator, Result, Value};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Core trait for anything that renders to SQL plus bindings
pub trait QueryBuilder {
    /// Generate the SQL query string
    fn to_sql(&self) -> Result<String>;

    /// Get the bindings for the query, in placeholder order
    fn bindings(&self) -> Vec<Value>;

    /// SQL and bindings in one value
    fn compile(&self) -> Result<CompiledQuery> {
        Ok(CompiledQuery::new(self.to_sql()?, self.bindings()))
    }
}

/// A column reference: a name the compiler quotes, or a raw expression it
/// leaves alone.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Name(String),
    Raw(Expression),
}

impl From<&str> for Column {
    fn from(name: &str) -> Self {
        Column::Name(name.to_string())
    }
}

impl From<String> for Column {
    fn from(name: String) -> Self {
        Column::Name(name)
    }
}

impl From<&String> for Column {
    fn from(name: &String) -> Self {
        Column::Name(name.clone())
    }
}

impl From<Expression> for Column {
    fn from(expr: Expression) -> Self {
        Column::Raw(expr)
    }
}

/// A normalized `column operator value` triple
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: Column,
    pub operator: Operator,
    pub value: Value,
}

/// Trait for conditions that can be used in WHERE / HAVING clauses
pub trait IntoCondition {
    fn into_condition(self) -> Condition;
}

// Shorthand equality: where_(("age", 18))
impl<C, T> IntoCondition for (C, T)
where
    C: Into<Column>,
    T: Into<Value>,
{
    fn into_condition(self) -> Condition {
        Condition {
            column: self.0.into(),
            operator: Operator::EQ,
            value: self.1.into(),
        }
    }
}

// Typed operator: where_(("age", op::GT, 18))
impl<C, T> IntoCondition for (C, Operator, T)
where
    C: Into<Column>,
    T: Into<Value>,
{
    fn into_condition(self) -> Condition {
        Condition {
            column: self.0.into(),
            operator: self.1,
            value: self.2.into(),
        }
    }
}

// Textual operator: where_(("age", ">", 18)).
//
// An operator outside the whitelist is read as the value and the comparison
// becomes `=`; the third element is dropped. Kept for compatibility with
// callers that pass `(column, value, _)`.
impl<'a, C, T> IntoCondition for (C, &'a str, T)
where
    C: Into<Column>,
    T: Into<Value>,
{
    fn into_condition(self) -> Condition {
        match Operator::parse(self.1) {
            Some(operator) => Condition {
                column: self.0.into(),
                operator,
                value: self.2.into(),
            },
            None => {
                tracing::trace!(
                    target: "quarry",
                    operator = self.1,
                    "unknown operator, comparing with `=` instead"
                );
                Condition {
                    column: self.0.into(),
                    operator: Operator::EQ,
                    value: Value::from(self.1),
                }
            }
        }
    }
}

/// A `first operator second` comparison between two columns
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnComparison {
    pub first: Column,
    pub operator: Operator,
    pub second: Column,
}

pub trait IntoColumnComparison {
    fn into_column_comparison(self) -> ColumnComparison;
}

impl<A, B> IntoColumnComparison for (A, B)
where
    A: Into<Column>,
    B: Into<Column>,
{
    fn into_column_comparison(self) -> ColumnComparison {
        ColumnComparison {
            first: self.0.into(),
            operator: Operator::EQ,
            second: self.1.into(),
        }
    }
}

impl<A, B> IntoColumnComparison for (A, Operator, B)
where
    A: Into<Column>,
    B: Into<Column>,
{
    fn into_column_comparison(self) -> ColumnComparison {
        ColumnComparison {
            first: self.0.into(),
            operator: self.1,
            second: self.2.into(),
        }
    }
}

// Same fallback as the value form: an unknown operator names the second column.
impl<'a, A, B> IntoColumnComparison for (A, &'a str, B)
where
    A: Into<Column>,
    B: Into<Column>,
{
    fn into_column_comparison(self) -> ColumnComparison {
        match Operator::parse(self.1) {
            Some(operator) => ColumnComparison {
                first: self.0.into(),
                operator,
                second: self.2.into(),
            },
            None => {
                tracing::trace!(
                    target: "quarry",
                    operator = self.1,
                    "unknown operator, comparing columns with `=` instead"
                );
                ColumnComparison {
                    first: self.0.into(),
                    operator: Operator::EQ,
                    second: Column::from(self.1),
                }
            }
        }
    }
}

/// How a clause is attached to the clauses before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boolean {
    And,
    Or,
    AndNot,
    OrNot,
}

impl Boolean {
    pub fn as_str(self) -> &'static str {
        match self {
            Boolean::And => "and",
            Boolean::Or => "or",
            Boolean::AndNot => "and not",
            Boolean::OrNot => "or not",
        }
    }
}

impl Display for Boolean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregation function types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateFunction::Count => write!(f, "count"),
            AggregateFunction::Sum => write!(f, "sum"),
            AggregateFunction::Avg => write!(f, "avg"),
            AggregateFunction::Min => write!(f, "min"),
            AggregateFunction::Max => write!(f, "max"),
        }
    }
}

/// Aggregate selected instead of the column list
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub function: AggregateFunction,
    pub columns: Vec<Column>,
}

/// JOIN types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Cross,
}

impl Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "inner"),
            JoinType::Left => write!(f, "left"),
            JoinType::Right => write!(f, "right"),
            JoinType::Cross => write!(f, "cross"),
        }
    }
}

/// Sort direction for ORDER BY clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(Error::invalid_order_direction(s))
        }
    }
}

/// Anything `order_by` accepts as a direction
pub trait IntoDirection {
    fn into_direction(self) -> Result<SortDirection>;
}

impl IntoDirection for SortDirection {
    fn into_direction(self) -> Result<SortDirection> {
        Ok(self)
    }
}

impl IntoDirection for &str {
    fn into_direction(self) -> Result<SortDirection> {
        self.parse()
    }
}

impl IntoDirection for String {
    fn into_direction(self) -> Result<SortDirection> {
        self.parse()
    }
}

/// Row locking mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lock {
    Update,
    Shared,
    /// Rendered verbatim
    Raw(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexHintKind {
    Use,
    Force,
    Ignore,
}

/// Index hint placed after the FROM clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHint {
    pub kind: IndexHintKind,
    pub index: String,
}

/// Trait to convert various types into columns
pub trait IntoColumns {
    fn into_columns(self) -> Vec<Column>;
}

impl IntoColumns for &str {
    fn into_columns(self) -> Vec<Column> {
        vec![self.into()]
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> Vec<Column> {
        vec![self.into()]
    }
}

impl IntoColumns for Expression {
    fn into_columns(self) -> Vec<Column> {
        vec![self.into()]
    }
}

impl IntoColumns for Column {
    fn into_columns(self) -> Vec<Column> {
        vec![self]
    }
}

impl IntoColumns for Vec<String> {
    fn into_columns(self) -> Vec<Column> {
        self.into_iter().map(Column::from).collect()
    }
}

impl IntoColumns for Vec<&str> {
    fn into_columns(self) -> Vec<Column> {
        self.into_iter().map(Column::from).collect()
    }
}

impl IntoColumns for Vec<Column> {
    fn into_columns(self) -> Vec<Column> {
        self
    }
}

impl<const N: usize> IntoColumns for [&str; N] {
    fn into_columns(self) -> Vec<Column> {
        self.into_iter().map(Column::from).collect()
    }
}

impl<A, B> IntoColumns for (A, B)
where
    A: Into<Column>,
    B: Into<Column>,
{
    fn into_columns(self) -> Vec<Column> {
        vec![self.0.into(), self.1.into()]
    }
}

impl<A, B, C> IntoColumns for (A, B, C)
where
    A: Into<Column>,
    B: Into<Column>,
    C: Into<Column>,
{
    fn into_columns(self) -> Vec<Column> {
        vec![self.0.into(), self.1.into(), self.2.into()]
    }
}

impl<A, B, C, D> IntoColumns for (A, B, C, D)
where
    A: Into<Column>,
    B: Into<Column>,
    C: Into<Column>,
    D: Into<Column>,
{
    fn into_columns(self) -> Vec<Column> {
        vec![self.0.into(), self.1.into(), self.2.into(), self.3.into()]
    }
}
