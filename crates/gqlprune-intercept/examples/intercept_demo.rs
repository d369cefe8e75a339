//! Example: intercepting a query with a GraphQL field context
//!
//! Demonstrates the full hand-off: install the selection tree for the
//! current thread, run a query through the interceptor, and show the
//! fallback when no context is present.

use gqlprune_engine::{FieldSelection, SelectionTree};
use gqlprune_intercept::{FieldContext, SqlInterceptor, StatementKind};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let sql = "SELECT u.id, u.name, u.email, p.bio, p.avatar_url FROM user u \
         JOIN profile p ON u.id = p.user_id WHERE u.active = true";

    let interceptor = SqlInterceptor::default();

    println!("Original SQL:\n  {sql}\n");

    // The GraphQL operation only asked for id and name.
    let context = SelectionTree::new(vec![
        FieldSelection::new("id"),
        FieldSelection::new("name"),
    ]);

    {
        let _guard = FieldContext::enter(context);
        let rewritten = interceptor.intercept(StatementKind::Select, sql);
        println!("Rewritten for {{ id name }}:\n  {rewritten}\n");
    }

    // A nested selection reaching into the profile keeps the join.
    let context = SelectionTree::new(vec![
        FieldSelection::new("id"),
        FieldSelection::nested("profile", vec![FieldSelection::new("bio")]),
    ]);

    {
        let _guard = FieldContext::enter(context);
        let rewritten = interceptor.intercept(StatementKind::Select, sql);
        println!("Rewritten for {{ id profile {{ bio }} }}:\n  {rewritten}\n");
    }

    // Without a field context the statement runs untouched.
    let untouched = interceptor.intercept(StatementKind::Select, sql);
    println!("Without context:\n  {untouched}");

    Ok(())
}
