//! Lowering from the sqlparser AST into the gqlprune statement model
//!
//! The external parser accepts far more SQL than this crate models. Lowering
//! either maps a construct onto the model, folds it into an [`Expr::Opaque`]
//! node (expressions only), or rejects the statement with
//! [`ParseError::Unsupported`] so callers can fall back to the original text.

use core::ops::ControlFlow;

use sqlparser::ast::{self as sq, Visit, Visitor};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use thiserror::Error;

use crate::{
    ColumnRef, Expr, JoinClause, JoinKind, OrderByItem, SelectItem, SelectStatement, TableRef,
};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed sql: {0}")]
    Malformed(#[from] sqlparser::parser::ParserError),

    #[error("unsupported statement shape: {0}")]
    Unsupported(&'static str),
}

/// Parse SQL text into a [`SelectStatement`].
///
/// Exactly one statement is accepted, and it must be a flat `SELECT` over a
/// single base table: no CTEs, set operations, grouping, sub-selects, or
/// wildcard projections.
pub fn parse_select(sql: &str) -> Result<SelectStatement, ParseError> {
    let dialect = GenericDialect {};
    let statements = Parser::parse_sql(&dialect, sql)?;
    if statements.len() != 1 {
        return Err(ParseError::Unsupported("multi-statement input"));
    }
    match &statements[0] {
        sq::Statement::Query(query) => lower_query(query),
        _ => Err(ParseError::Unsupported("not a SELECT")),
    }
}

fn lower_query(query: &sq::Query) -> Result<SelectStatement, ParseError> {
    if query.with.is_some() {
        return Err(ParseError::Unsupported("WITH clause"));
    }
    if !query.limit_by.is_empty() {
        return Err(ParseError::Unsupported("LIMIT BY"));
    }
    if query.fetch.is_some() {
        return Err(ParseError::Unsupported("FETCH clause"));
    }
    if !query.locks.is_empty() {
        return Err(ParseError::Unsupported("locking clause"));
    }

    let select = match query.body.as_ref() {
        sq::SetExpr::Select(select) => select,
        sq::SetExpr::SetOperation { .. } => {
            return Err(ParseError::Unsupported("set operation"));
        }
        _ => return Err(ParseError::Unsupported("query body")),
    };

    lower_select(select, query)
}

fn lower_select(
    select: &sq::Select,
    query: &sq::Query,
) -> Result<SelectStatement, ParseError> {
    let distinct = match &select.distinct {
        None => false,
        Some(sq::Distinct::Distinct) => true,
        Some(sq::Distinct::On(_)) => return Err(ParseError::Unsupported("DISTINCT ON")),
    };
    if select.top.is_some() {
        return Err(ParseError::Unsupported("TOP clause"));
    }
    if select.into.is_some() {
        return Err(ParseError::Unsupported("SELECT INTO"));
    }
    match &select.group_by {
        sq::GroupByExpr::Expressions(exprs, _) if exprs.is_empty() => {}
        _ => return Err(ParseError::Unsupported("GROUP BY")),
    }
    if select.having.is_some() {
        return Err(ParseError::Unsupported("HAVING"));
    }

    if select.from.len() != 1 {
        return Err(ParseError::Unsupported("exactly one FROM table required"));
    }
    let table_with_joins = &select.from[0];
    let from = lower_table_factor(&table_with_joins.relation)?;

    let mut joins = Vec::with_capacity(table_with_joins.joins.len());
    for join in &table_with_joins.joins {
        joins.push(lower_join(join)?);
    }

    let mut items = Vec::with_capacity(select.projection.len());
    for item in &select.projection {
        items.push(lower_select_item(item)?);
    }

    let selection = select.selection.as_ref().map(lower_expr);

    let mut order_by = Vec::new();
    if let Some(ob) = &query.order_by {
        for obe in &ob.exprs {
            if obe.nulls_first.is_some() {
                return Err(ParseError::Unsupported("NULLS FIRST/LAST"));
            }
            order_by.push(OrderByItem {
                expr: lower_expr(&obe.expr),
                asc: obe.asc,
            });
        }
    }

    let limit = match &query.limit {
        None => None,
        Some(sq::Expr::Value(sq::Value::Number(n, _))) => n.parse().ok(),
        Some(_) => return Err(ParseError::Unsupported("non-numeric LIMIT")),
    };
    let offset = match &query.offset {
        None => None,
        Some(offset) => match &offset.value {
            sq::Expr::Value(sq::Value::Number(n, _)) => n.parse().ok(),
            _ => return Err(ParseError::Unsupported("non-numeric OFFSET")),
        },
    };

    Ok(SelectStatement {
        items,
        from,
        joins,
        selection,
        order_by,
        limit,
        offset,
        distinct,
    })
}

fn lower_select_item(item: &sq::SelectItem) -> Result<SelectItem, ParseError> {
    match item {
        sq::SelectItem::UnnamedExpr(expr) => Ok(SelectItem {
            expr: lower_expr(expr),
            output_alias: None,
        }),
        sq::SelectItem::ExprWithAlias { expr, alias } => Ok(SelectItem {
            expr: lower_expr(expr),
            output_alias: Some(alias.value.clone()),
        }),
        sq::SelectItem::Wildcard(_) | sq::SelectItem::QualifiedWildcard(..) => {
            Err(ParseError::Unsupported("wildcard projection"))
        }
    }
}

fn lower_join(join: &sq::Join) -> Result<JoinClause, ParseError> {
    let table = lower_table_factor(&join.relation)?;
    let (kind, constraint) = match &join.join_operator {
        sq::JoinOperator::Inner(c) => (JoinKind::Inner, Some(c)),
        sq::JoinOperator::LeftOuter(c) => (JoinKind::Left, Some(c)),
        sq::JoinOperator::RightOuter(c) => (JoinKind::Right, Some(c)),
        sq::JoinOperator::FullOuter(c) => (JoinKind::Full, Some(c)),
        sq::JoinOperator::CrossJoin => (JoinKind::Cross, None),
        _ => return Err(ParseError::Unsupported("join operator")),
    };
    let on = match constraint {
        Some(sq::JoinConstraint::On(expr)) => Some(lower_expr(expr)),
        Some(sq::JoinConstraint::None) | None => None,
        Some(sq::JoinConstraint::Using(_)) => return Err(ParseError::Unsupported("JOIN USING")),
        Some(sq::JoinConstraint::Natural) => return Err(ParseError::Unsupported("NATURAL JOIN")),
    };
    Ok(JoinClause { kind, table, on })
}

fn lower_table_factor(factor: &sq::TableFactor) -> Result<TableRef, ParseError> {
    match factor {
        sq::TableFactor::Table { name, alias, .. } => Ok(TableRef {
            name: object_name(name),
            alias: alias.as_ref().map(|a| a.name.value.clone()),
        }),
        _ => Err(ParseError::Unsupported("derived or nested table")),
    }
}

fn object_name(name: &sq::ObjectName) -> String {
    name.0
        .iter()
        .map(|ident| ident.value.clone())
        .collect::<Vec<_>>()
        .join(".")
}

fn lower_expr(expr: &sq::Expr) -> Expr {
    match expr {
        sq::Expr::Identifier(ident) => Expr::Column(ColumnRef {
            table: None,
            column: ident.value.clone(),
        }),
        sq::Expr::CompoundIdentifier(parts) if parts.len() == 2 => Expr::Column(ColumnRef {
            table: Some(parts[0].value.clone()),
            column: parts[1].value.clone(),
        }),
        sq::Expr::BinaryOp { left, op, right } => Expr::Binary {
            left: Box::new(lower_expr(left)),
            op: op.to_string(),
            right: Box::new(lower_expr(right)),
        },
        sq::Expr::Value(value) => Expr::Literal(value.to_string()),
        sq::Expr::Nested(inner) => Expr::Paren(Box::new(lower_expr(inner))),
        other => opaque(other),
    }
}

/// Fold an unrecognized expression into an opaque node, keeping its exact
/// text and every column reference found anywhere inside it.
fn opaque(expr: &sq::Expr) -> Expr {
    Expr::Opaque {
        sql: expr.to_string(),
        columns: sweep_columns(expr),
    }
}

fn sweep_columns(expr: &sq::Expr) -> Vec<ColumnRef> {
    let mut sweep = ColumnSweep::default();
    let _ = expr.visit(&mut sweep);
    sweep.columns
}

/// Generic walk over an arbitrary sqlparser expression collecting every
/// identifier that looks like a column reference.
#[derive(Default)]
struct ColumnSweep {
    columns: Vec<ColumnRef>,
}

impl Visitor for ColumnSweep {
    type Break = ();

    fn pre_visit_expr(&mut self, expr: &sq::Expr) -> ControlFlow<Self::Break> {
        match expr {
            sq::Expr::Identifier(ident) => self.columns.push(ColumnRef {
                table: None,
                column: ident.value.clone(),
            }),
            sq::Expr::CompoundIdentifier(parts) if parts.len() == 2 => {
                self.columns.push(ColumnRef {
                    table: Some(parts[0].value.clone()),
                    column: parts[1].value.clone(),
                });
            }
            _ => {}
        }
        ControlFlow::Continue(())
    }
}
