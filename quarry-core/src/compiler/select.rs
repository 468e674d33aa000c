//! SELECT rendering

use super::Compiler;
use crate::builder::{Aggregate, Builder, IndexHint, IndexHintKind, JoinClause, Lock, Order};
use crate::config::Driver;
use crate::Result;

/// Parts of a SELECT in the order they are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Aggregate,
    Columns,
    From,
    IndexHint,
    Joins,
    Wheres,
    Groups,
    Havings,
    Orders,
    Limit,
    Offset,
    Lock,
}

const SELECT_COMPONENTS: [Component; 12] = [
    Component::Aggregate,
    Component::Columns,
    Component::From,
    Component::IndexHint,
    Component::Joins,
    Component::Wheres,
    Component::Groups,
    Component::Havings,
    Component::Orders,
    Component::Limit,
    Component::Offset,
    Component::Lock,
];

impl Compiler {
    /// Compile a SELECT statement
    pub fn compile_select(&self, query: &Builder) -> Result<String> {
        query.check()?;
        let sql = self.render_select(query);
        tracing::debug!(
            target: "quarry",
            kind = "select",
            sql = %sql,
            bindings = query.bindings().len(),
            "compiled statement"
        );
        Ok(sql)
    }

    /// Compile `select exists(<query>) as "exists"`
    pub fn compile_exists(&self, query: &Builder) -> Result<String> {
        query.check()?;
        let sql = format!(
            "select exists({}) as {}",
            self.render_select(query),
            self.wrap_value("exists")
        );
        tracing::debug!(target: "quarry", kind = "exists", sql = %sql, "compiled statement");
        Ok(sql)
    }

    pub(crate) fn render_select(&self, query: &Builder) -> String {
        if let Some(aggregate) = &query.aggregate {
            if !query.havings.is_empty() {
                return self.compile_union_aggregate(query, aggregate);
            }
        }

        SELECT_COMPONENTS
            .iter()
            .filter_map(|component| self.compile_component(query, *component))
            .filter(|sql| !sql.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn compile_component(&self, query: &Builder, component: Component) -> Option<String> {
        match component {
            Component::Aggregate => query
                .aggregate
                .as_ref()
                .map(|aggregate| self.compile_aggregate(query, aggregate)),
            Component::Columns => {
                if query.aggregate.is_some() {
                    None
                } else {
                    Some(self.compile_columns(query))
                }
            }
            Component::From => query.from.as_deref().map(|from| self.compile_from(from)),
            Component::IndexHint => query
                .index_hint
                .as_ref()
                .and_then(|hint| self.compile_index_hint(hint)),
            Component::Joins => {
                if query.joins.is_empty() {
                    None
                } else {
                    Some(self.compile_joins(&query.joins))
                }
            }
            Component::Wheres => Some(self.compile_wheres(query)),
            Component::Groups => {
                if query.groups.is_empty() {
                    None
                } else {
                    Some(format!("group by {}", self.columnize(&query.groups)))
                }
            }
            Component::Havings => Some(self.compile_havings(query)),
            Component::Orders => Some(self.compile_orders(&query.orders)),
            Component::Limit => match (query.limit, query.offset) {
                (Some(limit), _) => Some(format!("limit {}", limit)),
                (None, Some(_)) => self.unbounded_limit().map(str::to_string),
                (None, None) => None,
            },
            Component::Offset => query.offset.map(|offset| format!("offset {}", offset)),
            Component::Lock => query.lock.as_ref().and_then(|lock| self.compile_lock(lock)),
        }
    }

    // MySQL and SQLite only accept offset after a limit
    fn unbounded_limit(&self) -> Option<&'static str> {
        match self.driver() {
            Driver::Mysql => Some("limit 18446744073709551615"),
            Driver::Sqlite => Some("limit -1"),
            Driver::Pgsql => None,
        }
    }

    fn compile_aggregate(&self, query: &Builder, aggregate: &Aggregate) -> String {
        let mut column = self.columnize(&aggregate.columns);
        if query.distinct && column != "*" {
            column = format!("distinct {}", column);
        }
        format!("select {}({}) as aggregate", aggregate.function, column)
    }

    // The aggregate runs over the full grouped select
    fn compile_union_aggregate(&self, query: &Builder, aggregate: &Aggregate) -> String {
        let mut inner = query.clone();
        inner.aggregate = None;
        format!(
            "{} from ({}) as {}",
            self.compile_aggregate(query, aggregate),
            self.render_select(&inner),
            self.wrap_table("temp_table")
        )
    }

    fn compile_columns(&self, query: &Builder) -> String {
        let select = if query.distinct {
            "select distinct"
        } else {
            "select"
        };
        if query.columns.is_empty() {
            format!("{} *", select)
        } else {
            format!("{} {}", select, self.columnize(&query.columns))
        }
    }

    pub(crate) fn compile_from(&self, table: &str) -> String {
        format!("from {}", self.wrap_table(table))
    }

    fn compile_index_hint(&self, hint: &IndexHint) -> Option<String> {
        match (self.driver(), hint.kind) {
            (Driver::Mysql, IndexHintKind::Use) => Some(format!("use index ({})", hint.index)),
            (Driver::Mysql, IndexHintKind::Force) => {
                Some(format!("force index ({})", hint.index))
            }
            (Driver::Mysql, IndexHintKind::Ignore) => {
                Some(format!("ignore index ({})", hint.index))
            }
            (Driver::Sqlite, IndexHintKind::Force) => Some(format!("indexed by {}", hint.index)),
            _ => None,
        }
    }

    pub(crate) fn compile_joins(&self, joins: &[JoinClause]) -> String {
        joins
            .iter()
            .map(|join| {
                let table = self.wrap_table(&join.table);
                let conditions = self.compile_wheres(&join.query);
                if conditions.is_empty() {
                    format!("{} join {}", join.kind, table)
                } else {
                    format!("{} join {} {}", join.kind, table, conditions)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub(crate) fn compile_orders(&self, orders: &[Order]) -> String {
        if orders.is_empty() {
            return String::new();
        }
        let orders = orders
            .iter()
            .map(|order| match order {
                Order::Column { column, direction } => {
                    format!("{} {}", self.wrap(column), direction)
                }
                Order::Raw { sql } => sql.clone(),
            })
            .collect::<Vec<_>>();
        format!("order by {}", orders.join(", "))
    }

    fn compile_lock(&self, lock: &Lock) -> Option<String> {
        let sql = match (self.driver(), lock) {
            (Driver::Sqlite, _) => return None,
            (_, Lock::Raw(sql)) => sql.clone(),
            (_, Lock::Update) => "for update".to_string(),
            (Driver::Mysql, Lock::Shared) => "lock in share mode".to_string(),
            (Driver::Pgsql, Lock::Shared) => "for share".to_string(),
        };
        Some(sql)
    }
}
