//! Rendering the statement model back to SQL text
//!
//! Output is a deterministic single line. Statements of the supported shape
//! round-trip: `parse_select(to_sql(stmt))` succeeds and renders to the same
//! text again.

use std::fmt::Write;

use crate::{Expr, SelectStatement};

/// Render a [`SelectStatement`] to SQL text.
pub fn to_sql(stmt: &SelectStatement) -> String {
    let mut sql = String::new();

    sql.push_str("SELECT ");
    if stmt.distinct {
        sql.push_str("DISTINCT ");
    }
    let items = stmt
        .items
        .iter()
        .map(|item| match &item.output_alias {
            Some(alias) => format!("{} AS {}", render_expr(&item.expr), alias),
            None => render_expr(&item.expr),
        })
        .collect::<Vec<_>>()
        .join(", ");
    sql.push_str(&items);

    sql.push_str(" FROM ");
    sql.push_str(&stmt.from.name);
    if let Some(alias) = &stmt.from.alias {
        let _ = write!(sql, " {}", alias);
    }

    for join in &stmt.joins {
        let _ = write!(sql, " {} {}", join.kind.keyword(), join.table.name);
        if let Some(alias) = &join.table.alias {
            let _ = write!(sql, " {}", alias);
        }
        if let Some(on) = &join.on {
            let _ = write!(sql, " ON {}", render_expr(on));
        }
    }

    if let Some(selection) = &stmt.selection {
        let _ = write!(sql, " WHERE {}", render_expr(selection));
    }

    if !stmt.order_by.is_empty() {
        let keys = stmt
            .order_by
            .iter()
            .map(|item| match item.asc {
                Some(true) => format!("{} ASC", render_expr(&item.expr)),
                Some(false) => format!("{} DESC", render_expr(&item.expr)),
                None => render_expr(&item.expr),
            })
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(sql, " ORDER BY {}", keys);
    }

    if let Some(limit) = stmt.limit {
        let _ = write!(sql, " LIMIT {}", limit);
    }
    if let Some(offset) = stmt.offset {
        let _ = write!(sql, " OFFSET {}", offset);
    }

    sql
}

fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Column(col) => match &col.table {
            Some(table) => format!("{}.{}", table, col.column),
            None => col.column.clone(),
        },
        Expr::Literal(text) => text.clone(),
        Expr::Binary { left, op, right } => {
            format!("{} {} {}", render_expr(left), op, render_expr(right))
        }
        Expr::Paren(inner) => format!("({})", render_expr(inner)),
        Expr::Opaque { sql, .. } => sql.clone(),
    }
}
