//! Field-driven SQL pruning engine
//!
//! Given a flat `SELECT` and the set of fields a GraphQL operation actually
//! requested, [`rewrite`] produces a reduced statement that selects only the
//! needed columns and keeps only the joins required to supply them or to
//! satisfy the WHERE clause. The engine holds no state; each call works on
//! its own parse result and is safe from any thread.

mod prune;
mod rewrite;
mod selection;

pub use prune::{collect_columns, prune_statement};
pub use rewrite::{rewrite, RewriteError};
pub use selection::{to_snake_case, FieldSelection, RequestedFieldSet, SelectionTree};
