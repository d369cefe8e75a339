//! GraphQL selection model and requested-field flattening

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// The nested structure of fields requested by a single GraphQL operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionTree {
    pub fields: Vec<FieldSelection>,
}

impl SelectionTree {
    pub fn new(fields: Vec<FieldSelection>) -> Self {
        Self { fields }
    }
}

/// One requested field, possibly carrying a nested selection set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSelection {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selection: Vec<FieldSelection>,
}

impl FieldSelection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selection: Vec::new(),
        }
    }

    pub fn nested(name: impl Into<String>, selection: Vec<FieldSelection>) -> Self {
        Self {
            name: name.into(),
            selection,
        }
    }
}

/// Convert a lower-camel-case identifier to lower-snake-case.
///
/// Applied identically to every requested field name before comparing
/// against SQL column names, which are assumed to already be snake_case.
/// Input without uppercase boundaries passes through unchanged.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// The flat set of requested field names, normalized to SQL naming
/// convention. Derived once per rewrite from the selection tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestedFieldSet {
    names: HashSet<String>,
}

impl RequestedFieldSet {
    /// Depth-first flatten: the union, at every depth, of every field name.
    ///
    /// An empty tree yields an empty set, which means "no fields requested".
    /// Distinguishing that from "no field information at all" is the
    /// caller's job; this type never guesses.
    pub fn from_tree(tree: &SelectionTree) -> Self {
        let mut names = HashSet::new();
        for field in &tree.fields {
            flatten(field, &mut names);
        }
        Self { names }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.names.contains(column)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn flatten(field: &FieldSelection, names: &mut HashSet<String>) {
    names.insert(to_snake_case(&field.name));
    for child in &field.selection {
        flatten(child, names);
    }
}
