//! SQL statement model for gqlprune
//!
//! A deliberately small model of one flat `SELECT`: output items, a single
//! base table, a join list, and an optional WHERE tree. Statements are
//! lowered from the sqlparser AST ([`parse_select`]) and rendered back to
//! text ([`to_sql`]). Anything the model does not understand is carried as
//! an [`Expr::Opaque`] node so the original text survives rendering and the
//! column references inside it stay visible to callers.
//!
//! All types serialize deterministically to JSON for caching and debugging.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

mod parser;
mod render;

pub use parser::{parse_select, ParseError};
pub use render::to_sql;

/// One flat `SELECT` statement of the supported shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStatement {
    pub items: Vec<SelectItem>,

    pub from: TableRef,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<JoinClause>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Expr>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderByItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    #[serde(default)]
    pub distinct: bool,
}

impl SelectStatement {
    /// Calculate fingerprint (SHA-256) for deterministic caching
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("statement should always serialize");
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl std::fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&to_sql(self))
    }
}

/// A table bound to an optional alias within one statement's scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRef {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl TableRef {
    /// The name this table is referenced by elsewhere in the statement:
    /// its alias when one is declared, otherwise the table name itself.
    pub fn binding(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// One output expression of the SELECT clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectItem {
    pub expr: Expr,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinClause {
    pub kind: JoinKind,
    pub table: TableRef,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinKind::Inner => "JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByItem {
    pub expr: Expr,

    /// `Some(true)` renders `ASC`, `Some(false)` renders `DESC`, `None`
    /// renders no keyword at all so the original text round-trips.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asc: Option<bool>,
}

/// Expression tree of the supported shape.
///
/// Only `Binary` and `Column` nodes carry meaning for pruning. Every other
/// construct is lowered into `Opaque`, which keeps the exact original SQL
/// text plus every column reference found anywhere inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Column(ColumnRef),
    Literal(String),
    Binary {
        left: Box<Expr>,
        op: String,
        right: Box<Expr>,
    },
    Paren(Box<Expr>),
    Opaque {
        sql: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        columns: Vec<ColumnRef>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            column: column.into(),
        }
    }

    pub fn bare(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into(),
        }
    }
}
