//! Properties that hold across every statement the compiler renders

use crate::builder::Builder;
use crate::config::{CompilerConfig, Driver};
use crate::{op, raw, table, Compiler, Value};
use pretty_assertions::assert_eq;

fn placeholders(sql: &str) -> usize {
    sql.matches('?').count()
}

fn assert_balanced(query: &Builder) {
    let sql = query.to_sql().unwrap();
    assert_eq!(
        placeholders(&sql),
        query.bindings().len(),
        "placeholder mismatch in {}",
        sql
    );
}

#[test]
fn test_placeholders_match_bindings() {
    let queries = vec![
        table("users"),
        table("users").where_(("age", ">", 18)).where_(("active", 1)),
        table("users")
            .select_raw("? as flag", vec![true.into()])
            .join_on("orders", |j| {
                j.on(("users.id", "orders.user_id"))
                    .where_(("orders.total", ">", 5))
            })
            .where_in("users.id", vec![1, 2, 3])
            .where_not_in("users.role", Vec::<&str>::new())
            .or_where_between("users.age", [18, 30])
            .where_group(|q| q.where_(("a", 1)).or_where_raw("b = ?", vec![2.into()]))
            .where_exists(|q| q.from("bans").where_(("bans.reason", "spam")))
            .group_by("users.id")
            .having(("total", ">", 3))
            .having_between("total", [1, 9])
            .order_by_raw("field(users.id, ?, ?)", vec![1.into(), 2.into()])
            .limit(10)
            .offset(20),
        table("events")
            .where_(("starts_at", "<", raw("now()")))
            .where_null("cancelled_at")
            .where_column(("ends_at", ">", "starts_at")),
        table("orders").group_by("user_id").having(("n", ">", 1)).count("*"),
    ];

    for query in &queries {
        assert_balanced(query);
    }
}

#[test]
fn test_write_placeholders_match_bindings() {
    let query = table("users")
        .join_where("teams", "teams.plan", "=", "pro")
        .where_(("users.active", 1));
    let update = query.update([("users.tier", 2)]).unwrap();
    assert_eq!(update.placeholder_count(), update.bindings.len());

    let delete = query.delete().unwrap();
    assert_eq!(delete.placeholder_count(), delete.bindings.len());

    let having = table("users")
        .having(("x", ">", 1))
        .select_raw("? as y", vec![1.into()])
        .where_(("id", 1));
    let update = having.update([("a", 1)]).unwrap();
    assert_eq!(update.sql, "update `users` set `a` = ? where `id` = ?");
    assert_eq!(update.bindings, vec![Value::I32(1), Value::I32(1)]);
}

#[test]
fn test_empty_in_lists() {
    assert_eq!(
        table("t").where_in("c", Vec::<i32>::new()).to_sql().unwrap(),
        "select * from `t` where 0 = 1"
    );
    assert_eq!(
        table("t").where_not_in("c", Vec::<i32>::new()).to_sql().unwrap(),
        "select * from `t` where 1 = 1"
    );
}

#[test]
fn test_nested_group_matches_standalone_compilation() {
    let inner = |q: Builder| q.where_(("a", 1)).or_where_in("b", [2, 3]);

    let standalone = inner(table("t")).to_sql().unwrap();
    let standalone = standalone
        .strip_prefix("select * from `t` where ")
        .unwrap()
        .to_string();

    let nested = table("t").where_(("z", 0)).or_where_group(inner).to_sql().unwrap();
    let group = nested
        .strip_prefix("select * from `t` where `z` = ? or (")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap();

    assert_eq!(group, standalone);
}

#[test]
fn test_nested_join_group_strips_on_keyword() {
    let query = table("a").join_on("b", |j| {
        j.on(("a.id", "b.a_id"))
            .or_on_group(|g| g.on(("a.x", "b.x")).on(("a.y", "b.y")))
    });
    assert_eq!(
        query.to_sql().unwrap(),
        "select * from `a` inner join `b` on `a`.`id` = `b`.`a_id` or (`a`.`x` = `b`.`x` and `a`.`y` = `b`.`y`)"
    );
}

#[test]
fn test_order_direction_case() {
    assert_eq!(
        table("t").order_by("x", "asc").to_sql().unwrap(),
        table("t").order_by("x", "ASC").to_sql().unwrap()
    );
    assert!(table("t").order_by("x", "sideways").to_sql().is_err());
}

#[test]
fn test_compiling_twice_is_idempotent() {
    let query = table("users")
        .join("posts", "users.id", "=", "posts.user_id")
        .where_(("posts.published", true))
        .where_in("users.id", [1, 2])
        .order_by("users.id", "desc")
        .limit(5);

    let first = query.compile().unwrap();
    let second = query.compile().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_documented_examples() {
    let query = table("users").where_(("age", ">", 18)).where_(("active", 1));
    assert_eq!(
        query.to_sql().unwrap(),
        "select * from `users` where `age` > ? and `active` = ?"
    );
    assert_eq!(query.bindings(), vec![Value::I32(18), Value::I32(1)]);

    let query = table("t").where_(("a", 1)).or_where(("b", 2));
    assert_eq!(query.to_sql().unwrap(), "select * from `t` where `a` = ? or `b` = ?");
    assert_eq!(query.bindings(), vec![Value::I32(1), Value::I32(2)]);

    let query = table("t").where_between("score", [10, 20]);
    assert_eq!(
        query.to_sql().unwrap(),
        "select * from `t` where `score` between ? and ?"
    );
    assert_eq!(query.bindings(), vec![Value::I32(10), Value::I32(20)]);

    let query = table("users")
        .join("orders", "users.id", "=", "orders.user_id")
        .where_(("users.id", 5));
    let sql = query.to_sql().unwrap();
    assert!(sql.find("inner join").unwrap() < sql.find("where").unwrap());
    assert_eq!(query.bindings(), vec![Value::I32(5)]);
}

#[test]
fn test_mutation_after_compile_only_affects_later_renders() {
    let query = table("users").where_(("id", 1));
    let before = query.to_sql().unwrap();
    let query = query.where_(("active", op::EQ, true));
    assert_eq!(before, "select * from `users` where `id` = ?");
    assert_eq!(
        query.to_sql().unwrap(),
        "select * from `users` where `id` = ? and `active` = ?"
    );
}

#[test]
fn test_exists_wraps_select() {
    let query = Compiler::for_driver(Driver::Pgsql)
        .table("users")
        .where_(("id", 1));
    assert_eq!(
        query.to_exists_sql().unwrap(),
        "select exists(select * from \"users\" where \"id\" = ?) as \"exists\""
    );
}

#[test]
fn test_compiler_from_config() {
    let config = CompilerConfig::from_json(r#"{"driver": "postgres", "table_prefix": "wp_"}"#)
        .unwrap();
    let compiler = Compiler::new(config);
    assert_eq!(compiler.driver(), Driver::Pgsql);
    assert_eq!(
        compiler.table("posts").select("posts.title").to_sql().unwrap(),
        "select \"wp_posts\".\"title\" from \"wp_posts\""
    );
}

#[test]
fn test_compiled_query_serializes() {
    let compiled = table("users").where_(("id", 3)).compile().unwrap();
    let json = serde_json::to_value(&compiled).unwrap();
    assert_eq!(json["sql"], "select * from `users` where `id` = ?");
    assert_eq!(json["bindings"].as_array().map(Vec::len), Some(1));
}
