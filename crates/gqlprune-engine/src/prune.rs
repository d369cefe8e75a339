//! Pruning passes over the statement model
//!
//! Each pass reads the original statement and produces a reduced copy; the
//! input is never mutated. Table aliases that must survive are accumulated
//! in a needed-alias set: aliases of kept select items, aliases referenced
//! by the WHERE clause, and aliases referenced by ORDER BY.

use std::collections::HashSet;

use gqlprune_sql::{ColumnRef, Expr, JoinClause, SelectItem, SelectStatement};

use crate::selection::RequestedFieldSet;

/// Collect every column reference in an expression tree.
///
/// Binary nodes recurse left then right, parenthesized subtrees descend,
/// literals contribute nothing, and opaque nodes contribute the references
/// captured at lowering time without being descended further.
pub fn collect_columns(expr: &Expr, out: &mut Vec<ColumnRef>) {
    match expr {
        Expr::Binary { left, right, .. } => {
            collect_columns(left, out);
            collect_columns(right, out);
        }
        Expr::Column(col) => out.push(col.clone()),
        Expr::Paren(inner) => collect_columns(inner, out),
        Expr::Literal(_) => {}
        Expr::Opaque { columns, .. } => out.extend(columns.iter().cloned()),
    }
}

fn retain_aliases(columns: &[ColumnRef], aliases: &mut HashSet<String>) {
    for col in columns {
        if let Some(table) = &col.table {
            aliases.insert(table.clone());
        }
    }
}

/// Keep only the select items whose column name was requested, recording
/// the table alias of every kept item.
///
/// Items that are not plain columns cannot be matched against a field name;
/// they are kept as-is and every alias they reference is retained. An empty
/// requested set legitimately empties the item list; deciding whether that
/// is acceptable is the orchestrator's job.
fn prune_select_items(
    items: &[SelectItem],
    requested: &RequestedFieldSet,
    needed: &mut HashSet<String>,
) -> Vec<SelectItem> {
    let mut kept = Vec::with_capacity(items.len());
    for item in items {
        match &item.expr {
            Expr::Column(col) => {
                if requested.contains(&col.column) {
                    if let Some(table) = &col.table {
                        needed.insert(table.clone());
                    }
                    kept.push(item.clone());
                } else {
                    tracing::debug!(column = %col.column, "select item removed");
                }
            }
            other => {
                let mut columns = Vec::new();
                collect_columns(other, &mut columns);
                retain_aliases(&columns, needed);
                kept.push(item.clone());
            }
        }
    }
    kept
}

/// Keep only the joins whose right-hand binding is still needed.
///
/// No join-kind check is made: removing an inner join that only narrowed
/// the result set changes row counts. Callers accept that trade-off for
/// queries whose joins exist solely to supply columns.
fn prune_joins(joins: &[JoinClause], needed: &HashSet<String>) -> Vec<JoinClause> {
    let mut kept = Vec::with_capacity(joins.len());
    for join in joins {
        if needed.contains(join.table.binding()) {
            kept.push(join.clone());
        } else {
            tracing::debug!(table = %join.table.name, "join removed");
        }
    }
    kept
}

/// Build the reduced statement for the given requested-field set.
///
/// Select items are pruned first (collecting needed aliases), then every
/// alias referenced by the WHERE clause and by ORDER BY is unioned in, and
/// finally joins not in the union are dropped. Item and join order are
/// preserved.
pub fn prune_statement(stmt: &SelectStatement, requested: &RequestedFieldSet) -> SelectStatement {
    let mut needed = HashSet::new();

    let items = prune_select_items(&stmt.items, requested, &mut needed);

    if let Some(selection) = &stmt.selection {
        let mut columns = Vec::new();
        collect_columns(selection, &mut columns);
        retain_aliases(&columns, &mut needed);
    }

    for key in &stmt.order_by {
        let mut columns = Vec::new();
        collect_columns(&key.expr, &mut columns);
        retain_aliases(&columns, &mut needed);
    }

    let joins = prune_joins(&stmt.joins, &needed);

    SelectStatement {
        items,
        joins,
        ..stmt.clone()
    }
}
