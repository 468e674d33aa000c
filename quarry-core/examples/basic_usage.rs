use quarry_core::{op, raw, table, Compiler, Driver, Operator, Value};
use std::collections::HashMap;

fn main() -> quarry_core::Result<()> {
    // SELECT with the tuple condition syntax
    let select_query = table("users")
        .select(("id", "name", "email"))
        .where_(("age", op::GT, 18)) // Using op constants
        .where_(("status", "active")) // Defaults to =
        .where_(("city", "LIKE", "%York%")) // Using string operators
        .limit(10)
        .offset(5);

    println!("SELECT SQL: {}", select_query.to_sql()?);
    println!("Bindings: {:?}", select_query.bindings());

    // Grouped conditions, joins and aggregates
    let report = table("orders as o")
        .join("users as u", "u.id", "=", "o.user_id")
        .where_group(|q| q.where_(("o.status", "paid")).or_where(("o.status", "shipped")))
        .where_between("o.created_at", ["2024-01-01", "2024-12-31"])
        .group_by("u.id")
        .having(("total", ">", 100))
        .select(("u.id", raw("sum(o.amount) as total")))
        .order_by("total", "desc");

    let compiled = report.compile()?;
    println!("REPORT SQL: {}", compiled.sql);
    println!("REPORT bindings: {:?}", compiled.bindings);

    // INSERT
    let mut user_data: HashMap<&str, Value> = HashMap::new();
    user_data.insert("name", "John Doe".into());
    user_data.insert("email", "john@example.com".into());
    user_data.insert("age", 30.into());

    let insert_query = table("users").insert(user_data)?;
    println!("INSERT SQL: {}", insert_query.sql);

    // UPDATE
    let update_query = table("users")
        .where_(("id", 123))
        .and_where(("active", true))
        .update([("email", "newemail@example.com"), ("last_login", "2024-01-15")])?;

    println!("UPDATE SQL: {}", update_query.sql);

    // DELETE
    let delete_query = table("users")
        .where_(("age", op::LT, 13))
        .or_where(("last_login", op::LT, "2020-01-01"))
        .delete()?;

    println!("DELETE SQL: {}", delete_query.sql);

    // Custom operators for driver specific features
    let postgres_fts_query = Compiler::for_driver(Driver::Pgsql)
        .table("documents")
        .select(("title", "content"))
        .where_(("content", Operator::custom("@@"), raw("to_tsquery('search')")))
        .limit(20);

    println!("PostgreSQL FTS: {}", postgres_fts_query.to_sql()?);

    Ok(())
}
