//! WHERE, ON and HAVING rendering

use super::Compiler;
use crate::builder::{Builder, Having, Where};

const HAVING: &str = "having";

impl Compiler {
    /// Render the condition list of `query`, or `""` when it has none
    ///
    /// Each clause is prefixed with its boolean; the leading boolean is then
    /// replaced by `where`, or by `on` for a join.
    pub fn compile_wheres(&self, query: &Builder) -> String {
        if query.wheres.is_empty() {
            return String::new();
        }
        let sql = query
            .wheres
            .iter()
            .map(|clause| format!("{} {}", clause.boolean(), self.compile_where(clause)))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{} {}", query.where_keyword(), remove_leading_boolean(&sql))
    }

    fn compile_where(&self, clause: &Where) -> String {
        match clause {
            Where::Basic {
                column,
                operator,
                value,
                ..
            } => format!("{} {} {}", self.wrap(column), operator, self.parameter(value)),
            Where::Raw { sql, .. } => sql.clone(),
            Where::Expression { expression, .. } => expression.to_string(),
            Where::In { column, values, .. } => {
                if values.is_empty() {
                    "0 = 1".to_string()
                } else {
                    format!("{} in ({})", self.wrap(column), self.parameterize(values))
                }
            }
            Where::NotIn { column, values, .. } => {
                if values.is_empty() {
                    "1 = 1".to_string()
                } else {
                    format!("{} not in ({})", self.wrap(column), self.parameterize(values))
                }
            }
            Where::Null { column, .. } => format!("{} is null", self.wrap(column)),
            Where::NotNull { column, .. } => format!("{} is not null", self.wrap(column)),
            Where::Between {
                column,
                values: [low, high],
                not,
                ..
            } => format!(
                "{} {}between {} and {}",
                self.wrap(column),
                if *not { "not " } else { "" },
                self.parameter(low),
                self.parameter(high)
            ),
            Where::BetweenColumns {
                column,
                columns: [low, high],
                not,
                ..
            } => format!(
                "{} {}between {} and {}",
                self.wrap(column),
                if *not { "not " } else { "" },
                self.wrap(low),
                self.wrap(high)
            ),
            Where::Column {
                first,
                operator,
                second,
                ..
            } => format!("{} {} {}", self.wrap(first), operator, self.wrap(second)),
            Where::Nested { query, .. } => {
                let offset = query.where_keyword().len() + 1;
                let sql = self.compile_wheres(query);
                format!("({})", sql.get(offset..).unwrap_or_default())
            }
            Where::Exists { query, .. } => format!("exists ({})", self.render_select(query)),
            Where::NotExists { query, .. } => {
                format!("not exists ({})", self.render_select(query))
            }
        }
    }

    /// Render the HAVING list of `query`, or `""` when it has none
    pub fn compile_havings(&self, query: &Builder) -> String {
        if query.havings.is_empty() {
            return String::new();
        }
        let sql = query
            .havings
            .iter()
            .map(|clause| format!("{} {}", clause.boolean(), self.compile_having(clause)))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{} {}", HAVING, remove_leading_boolean(&sql))
    }

    fn compile_having(&self, clause: &Having) -> String {
        match clause {
            Having::Basic {
                column,
                operator,
                value,
                ..
            } => format!("{} {} {}", self.wrap(column), operator, self.parameter(value)),
            Having::Raw { sql, .. } => sql.clone(),
            Having::Expression { expression, .. } => expression.to_string(),
            Having::Between {
                column,
                values: [low, high],
                not,
                ..
            } => format!(
                "{} {}between {} and {}",
                self.wrap(column),
                if *not { "not " } else { "" },
                self.parameter(low),
                self.parameter(high)
            ),
            Having::Null { column, .. } => format!("{} is null", self.wrap(column)),
            Having::NotNull { column, .. } => format!("{} is not null", self.wrap(column)),
            Having::Bit {
                column,
                operator,
                value,
                ..
            } => format!(
                "({} {} {}) != 0",
                self.wrap(column),
                operator,
                self.parameter(value)
            ),
            Having::Nested { query, .. } => {
                let sql = self.compile_havings(query);
                format!("({})", sql.get(HAVING.len() + 1..).unwrap_or_default())
            }
        }
    }
}

/// Drop the `and ` or `or ` in front of the first clause
fn remove_leading_boolean(sql: &str) -> &str {
    sql.strip_prefix("and ")
        .or_else(|| sql.strip_prefix("or "))
        .unwrap_or(sql)
}
