//! End-to-end rewrite: parse, flatten, prune, render

use thiserror::Error;

use gqlprune_sql::{parse_select, ParseError};

use crate::prune::prune_statement;
use crate::selection::{RequestedFieldSet, SelectionTree};

#[derive(Debug, Error)]
pub enum RewriteError {
    /// The original SQL failed to parse. Callers fall back to executing the
    /// original text; rewritten output is never produced from a statement
    /// that did not parse.
    #[error("malformed query: {0}")]
    MalformedQuery(String),

    /// The statement contains a construct the pruning model cannot reason
    /// about (sub-select, set operation, wildcard projection, ...).
    #[error("unsupported query shape: {0}")]
    UnsupportedShape(&'static str),

    /// Pruning removed every select item. A statement with no output
    /// columns is invalid, so callers fall back to the original text.
    #[error("pruning removed every select item")]
    EmptyProjection,
}

impl From<ParseError> for RewriteError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Malformed(inner) => RewriteError::MalformedQuery(inner.to_string()),
            ParseError::Unsupported(what) => RewriteError::UnsupportedShape(what),
        }
    }
}

/// Rewrite `sql` so it selects only what `context` asked for.
///
/// Without a context the input text is returned verbatim: the engine has
/// no field information and must not touch the query. With a context the
/// statement is parsed, its select items are pruned against the flattened
/// field set, aliases referenced by WHERE and ORDER BY are retained, and
/// joins nothing refers to anymore are dropped.
///
/// Pure function of its inputs; no state is shared between calls.
pub fn rewrite(sql: &str, context: Option<&SelectionTree>) -> Result<String, RewriteError> {
    let Some(tree) = context else {
        return Ok(sql.to_string());
    };

    let stmt = parse_select(sql)?;
    let requested = RequestedFieldSet::from_tree(tree);
    tracing::debug!(fields = requested.len(), "pruning query against requested fields");

    let pruned = prune_statement(&stmt, &requested);
    if pruned.items.is_empty() {
        return Err(RewriteError::EmptyProjection);
    }

    Ok(pruned.to_string())
}
