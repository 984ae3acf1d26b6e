//! Row records and the flattened tree-row view.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A host-supplied data record: an ordered map of field key to JSON value.
pub type Row = serde_json::Map<String, Value>;

/// Read a row field, treating JSON `null` as absent.
#[must_use]
pub fn field<'a>(row: &'a Row, key: &str) -> Option<&'a Value> {
    row.get(key).filter(|v| !v.is_null())
}

/// Identity of a tree node.
///
/// Derived from the configured id field when the row carries one, else a
/// positional `parent.index` path assigned while the node's level is
/// visited (before that level is re-sorted, so the id travels with the
/// row across sorts).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(String);

impl NodeId {
    /// Derive a node id for `row` at `index` within its parent's children.
    #[must_use]
    pub fn derive(row: &Row, id_field: &str, parent: Option<&NodeId>, index: usize) -> Self {
        if let Some(value) = field(row, id_field) {
            let text = match value.as_str() {
                Some(s) => s.to_string(),
                None => value.to_string(),
            };
            return Self(text);
        }
        match parent {
            Some(parent) => Self(format!("{parent}.{index}")),
            None => Self(index.to_string()),
        }
    }

    /// The id as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A row of the flattened hierarchy, annotated for linear rendering.
///
/// Recreated on every flatten pass; a derived view, never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeRow {
    /// The original data record
    pub row: Row,
    /// Node identity
    pub node_id: NodeId,
    /// Depth in the hierarchy, root = 0
    pub level: usize,
    /// Parent node id, absent for roots
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    /// Node has (or can lazily load) children
    pub has_children: bool,
    /// Node has no children to show
    pub is_leaf: bool,
    /// Children are currently shown
    pub expanded: bool,
    /// A lazy child load is in flight
    pub loading: bool,
    /// Left indent in pixels (`level` × configured indent width)
    pub indent: f32,
}
