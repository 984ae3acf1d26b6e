//! Tree data engine: expansion state, lazy subtrees, per-level sort, and
//! flattening into a linear render-ready row sequence.
//!
//! All operations are synchronous and pure over an explicit [`TreeState`];
//! the widget facade owns the state cell and wires lazy-load resolution.

mod state;

pub use state::TreeState;

use std::collections::BTreeSet;

use serde_json::Value;

use crate::capability::GridCapabilities;
use crate::sort::{compare_rows, resolve_sort, ResolvedSort, SortState};
use crate::types::{field, LeafColumn, NodeId, Row, TreeConfig, TreeRow};

/// Sort inputs for per-level re-sorting during a flatten pass.
///
/// Top-level order and every nested level use the identical column/state
/// pair, so children always render immediately under their parent
/// regardless of sort key.
pub struct SortContext<'a> {
    /// Flattened leaf columns (for comparator lookup)
    pub leaves: &'a [LeafColumn],
    /// The active sort
    pub state: &'a SortState,
    /// Host capabilities (comparator scripts)
    pub capabilities: &'a GridCapabilities,
}

/// Child rows embedded in a record's children field.
fn child_rows(row: &Row, config: &TreeConfig) -> Vec<Row> {
    row.get(&config.children_field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Whether a node has children to show or load.
///
/// Lazy mode trusts the configured marker field (or an already resolved
/// cache entry); eager mode inspects the embedded child array.
fn node_has_children(
    row: &Row,
    id: &NodeId,
    eager: &[Row],
    config: &TreeConfig,
    tree: &TreeState,
) -> bool {
    if config.lazy {
        field(row, &config.has_children_field)
            .and_then(Value::as_bool)
            .unwrap_or(false)
            || tree.cached_children(id).is_some_and(|c| !c.is_empty())
    } else {
        !eager.is_empty()
    }
}

/// Compute the initial expansion for a freshly loaded dataset.
///
/// Policy: expand everything (`defaultExpandAll`, or a negative
/// `defaultExpandLevel`), expand the first N levels, or start fully
/// collapsed. Runs exactly once per dataset reference: the returned
/// state carries the `initialized` marker so re-sorts of the same
/// dataset never re-run it and silently collapse user-opened nodes.
#[must_use]
pub fn initial_expansion(rows: &[Row], config: &TreeConfig) -> TreeState {
    let bound = if config.default_expand_all {
        None
    } else {
        match config.default_expand_level {
            Some(level) if level < 0 => None,
            Some(level) => Some(usize::try_from(level.unsigned_abs()).unwrap_or(usize::MAX)),
            None => Some(0),
        }
    };

    let mut expanded = BTreeSet::new();
    let empty = TreeState::default();
    collect_expandable(rows, None, 0, config, &empty, bound, &mut expanded);
    TreeState {
        expanded,
        initialized: true,
        ..TreeState::default()
    }
}

/// Open every node with children, including resolved lazy subtrees.
#[must_use]
pub fn expand_all(rows: &[Row], config: &TreeConfig, tree: &TreeState) -> TreeState {
    let mut expanded = BTreeSet::new();
    collect_expandable(rows, None, 0, config, tree, None, &mut expanded);
    let mut next = tree.clone();
    next.expanded = expanded;
    next.revision += 1;
    next
}

/// Close every node. Caches and in-flight loads survive.
#[must_use]
pub fn collapse_all(tree: &TreeState) -> TreeState {
    tree.with_all_collapsed()
}

fn collect_expandable(
    rows: &[Row],
    parent: Option<&NodeId>,
    level: usize,
    config: &TreeConfig,
    tree: &TreeState,
    bound: Option<usize>,
    out: &mut BTreeSet<NodeId>,
) {
    if bound.is_some_and(|limit| level >= limit) {
        return;
    }
    for (index, row) in rows.iter().enumerate() {
        let id = NodeId::derive(row, &config.id_field, parent, index);
        let eager = child_rows(row, config);
        if node_has_children(row, &id, &eager, config, tree) {
            out.insert(id.clone());
        }
        let children = if config.lazy {
            tree.cached_children(&id).map(<[Row]>::to_vec).unwrap_or_default()
        } else {
            eager
        };
        if !children.is_empty() {
            collect_expandable(&children, Some(&id), level + 1, config, tree, bound, out);
        }
    }
}

/// Outcome of a toggle request on a node.
#[derive(Debug)]
pub struct ToggleResult {
    /// The updated state
    pub state: TreeState,
    /// The expand needs a lazy child load (node marked loading)
    pub needs_load: bool,
}

/// Flip a node's expansion.
///
/// Expanding a lazy node whose children are not cached also marks it
/// loading; the caller invokes the loader capability and later applies
/// [`TreeState::with_loaded_children`] or [`TreeState::with_load_failed`].
/// Rapid repeated toggles before resolution are intentionally unguarded.
#[must_use]
pub fn toggle_node(tree: &TreeState, node: &TreeRow, lazy: bool) -> ToggleResult {
    if tree.is_expanded(&node.node_id) {
        return ToggleResult {
            state: tree.with_collapsed(&node.node_id),
            needs_load: false,
        };
    }

    let needs_load =
        lazy && node.has_children && tree.cached_children(&node.node_id).is_none();
    let mut next = tree.with_expanded(&node.node_id);
    if needs_load {
        next = next.with_loading(&node.node_id);
    }
    ToggleResult {
        state: next,
        needs_load,
    }
}

/// Flatten the hierarchy into a linear render-ready sequence.
///
/// Depth-first: each visited node emits one [`TreeRow`]; expanded nodes
/// recurse into their children (the lazy cache in lazy mode, the embedded
/// child array otherwise) before the parent's later siblings. Node ids
/// are assigned per level before that level is re-sorted, so positional
/// ids travel with their rows across sorts. Unexpanded children are never
/// sorted nor emitted, and uncached lazy children produce no rows.
#[must_use]
pub fn flatten_tree(
    rows: &[Row],
    config: &TreeConfig,
    tree: &TreeState,
    sort: Option<&SortContext<'_>>,
) -> Vec<TreeRow> {
    let resolved =
        sort.and_then(|ctx| resolve_sort(ctx.leaves, ctx.state, ctx.capabilities));
    let mut out = Vec::new();
    visit_level(rows, None, 0, config, tree, resolved.as_ref(), &mut out);
    out
}

fn visit_level(
    rows: &[Row],
    parent: Option<&NodeId>,
    level: usize,
    config: &TreeConfig,
    tree: &TreeState,
    sort: Option<&ResolvedSort>,
    out: &mut Vec<TreeRow>,
) {
    let mut entries: Vec<(NodeId, &Row)> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| (NodeId::derive(row, &config.id_field, parent, index), row))
        .collect();

    if let Some(sort) = sort {
        entries.sort_by(|(_, a), (_, b)| {
            compare_rows(a, b, &sort.prop, sort.order, sort.script.as_ref())
        });
    }

    for (id, row) in entries {
        let eager = child_rows(row, config);
        let has_children = node_has_children(row, &id, &eager, config, tree);
        let expanded = has_children && tree.is_expanded(&id);

        out.push(TreeRow {
            row: row.clone(),
            node_id: id.clone(),
            level,
            parent_id: parent.cloned(),
            has_children,
            is_leaf: !has_children,
            expanded,
            loading: tree.is_loading(&id),
            indent: level as f32 * config.indent,
        });

        if expanded {
            let children = if config.lazy {
                tree.cached_children(&id).map(<[Row]>::to_vec).unwrap_or_default()
            } else {
                eager
            };
            if !children.is_empty() {
                visit_level(&children, Some(&id), level + 1, config, tree, sort, out);
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: Value) -> Vec<Row> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    fn sample_tree() -> Vec<Row> {
        rows(json!([
            {"id": 1, "name": "root a", "children": [
                {"id": 2, "name": "child a1"},
                {"id": 3, "name": "child a2", "children": [
                    {"id": 4, "name": "grandchild"}
                ]}
            ]},
            {"id": 5, "name": "root b"}
        ]))
    }

    fn ids(flat: &[TreeRow]) -> Vec<String> {
        flat.iter().map(|r| r.node_id.to_string()).collect()
    }

    #[test]
    fn test_expand_level_one_shows_first_children() {
        let config = TreeConfig {
            default_expand_level: Some(1),
            ..TreeConfig::default()
        };
        let tree = initial_expansion(&sample_tree(), &config);
        let flat = flatten_tree(&sample_tree(), &config, &tree, None);
        assert_eq!(ids(&flat), ["1", "2", "3", "5"]);
    }

    #[test]
    fn test_expand_level_zero_shows_roots_only() {
        let config = TreeConfig {
            default_expand_level: Some(0),
            ..TreeConfig::default()
        };
        let tree = initial_expansion(&sample_tree(), &config);
        let flat = flatten_tree(&sample_tree(), &config, &tree, None);
        assert_eq!(ids(&flat), ["1", "5"]);
    }

    #[test]
    fn test_negative_level_expands_all() {
        let config = TreeConfig {
            default_expand_level: Some(-1),
            ..TreeConfig::default()
        };
        let tree = initial_expansion(&sample_tree(), &config);
        let flat = flatten_tree(&sample_tree(), &config, &tree, None);
        assert_eq!(ids(&flat), ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_flatten_annotates_depth_and_parent() {
        let config = TreeConfig {
            default_expand_all: true,
            ..TreeConfig::default()
        };
        let tree = initial_expansion(&sample_tree(), &config);
        let flat = flatten_tree(&sample_tree(), &config, &tree, None);

        let grandchild = flat.iter().find(|r| r.node_id.as_str() == "4").unwrap();
        assert_eq!(grandchild.level, 2);
        assert_eq!(grandchild.parent_id.as_ref().unwrap().as_str(), "3");
        assert!(grandchild.is_leaf);
        assert_eq!(grandchild.indent, 32.0);

        let root = flat.iter().find(|r| r.node_id.as_str() == "1").unwrap();
        assert!(root.has_children);
        assert!(root.expanded);
        assert_eq!(root.level, 0);
        assert!(root.parent_id.is_none());
    }

    #[test]
    fn test_expand_then_collapse_all_round_trip() {
        let config = TreeConfig::default();
        let data = sample_tree();
        let tree = initial_expansion(&data, &config);
        let expanded = expand_all(&data, &config, &tree);
        assert_eq!(
            ids(&flatten_tree(&data, &config, &expanded, None)),
            ["1", "2", "3", "4", "5"]
        );

        let collapsed = collapse_all(&expanded);
        assert_eq!(
            ids(&flatten_tree(&data, &config, &collapsed, None)),
            ["1", "5"]
        );
    }

    #[test]
    fn test_positional_ids_for_rows_without_id_field() {
        let config = TreeConfig {
            default_expand_all: true,
            ..TreeConfig::default()
        };
        let data = rows(json!([
            {"name": "a", "children": [{"name": "a1"}]},
            {"name": "b"}
        ]));
        let tree = initial_expansion(&data, &config);
        let flat = flatten_tree(&data, &config, &tree, None);
        assert_eq!(ids(&flat), ["0", "0.0", "1"]);
    }

    #[test]
    fn test_lazy_uncached_children_produce_no_rows() {
        let config = TreeConfig {
            lazy: true,
            ..TreeConfig::default()
        };
        let data = rows(json!([{"id": 1, "name": "root", "hasChildren": true}]));
        let tree = TreeState::default().with_expanded(&"1".into());
        let flat = flatten_tree(&data, &config, &tree, None);

        assert_eq!(ids(&flat), ["1"]);
        assert!(flat[0].has_children);
        assert!(flat[0].expanded);
    }

    #[test]
    fn test_lazy_cached_children_appear_after_resolution() {
        let config = TreeConfig {
            lazy: true,
            ..TreeConfig::default()
        };
        let data = rows(json!([{"id": 1, "name": "root", "hasChildren": true}]));
        let children = rows(json!([{"id": 10, "name": "loaded"}]));

        let tree = TreeState::default()
            .with_expanded(&"1".into())
            .with_loading(&"1".into())
            .with_loaded_children(&"1".into(), children);

        let flat = flatten_tree(&data, &config, &tree, None);
        assert_eq!(ids(&flat), ["1", "10"]);
        assert!(!flat[0].loading);
        assert_eq!(flat[1].level, 1);
    }

    #[test]
    fn test_toggle_marks_lazy_load() {
        let config = TreeConfig {
            lazy: true,
            ..TreeConfig::default()
        };
        let data = rows(json!([{"id": 1, "hasChildren": true}]));
        let tree = TreeState::default();
        let flat = flatten_tree(&data, &config, &tree, None);

        let result = toggle_node(&tree, &flat[0], true);
        assert!(result.needs_load);
        assert!(result.state.is_loading(&"1".into()));
        assert!(result.state.is_expanded(&"1".into()));

        // Collapse does not need a load
        let result = toggle_node(&result.state, &flat[0], true);
        assert!(!result.needs_load);
        assert!(!result.state.is_expanded(&"1".into()));
    }

    #[test]
    fn test_load_failure_clears_loading_and_closes() {
        let tree = TreeState::default()
            .with_expanded(&"1".into())
            .with_loading(&"1".into());
        let cleared = tree.with_load_failed(&"1".into());
        assert!(!cleared.is_loading(&"1".into()));
        assert!(!cleared.is_expanded(&"1".into()));
        assert!(cleared.cached_children(&"1".into()).is_none());
    }
}
