//! Interaction entry points for `DashGrid`.
//!
//! Each handler mutates state inside a single borrow of the shared cell
//! and invokes host callbacks (event emitter, child loader) only after
//! the borrow ends, so a callback may re-enter the grid synchronously.

use crate::capability::guard;
use crate::sort;
use crate::tree::{collapse_all, expand_all, initial_expansion, toggle_node};
use crate::types::{field, ColumnRef, GridEvent, NodeId};

use super::{DashGrid, LoadHandle};

impl DashGrid {
    /// A header cell for the leaf at `leaf_index` was clicked: cycle the
    /// sort state and emit `sortChange`. Non-sortable columns ignore the
    /// click entirely.
    pub fn click_header(&mut self, leaf_index: usize) {
        let emission = {
            let shared = self.shared();
            let mut state = shared.borrow_mut();
            let layout = state.column_layout();
            let Some(leaf) = layout.leaves.get(leaf_index) else {
                return;
            };
            if !leaf.sortable {
                return;
            }
            state.sort = sort::toggle(&state.sort, leaf);

            let data = state.visible_rows();
            let next = state.sort.clone();
            state.emitter.clone().map(|emitter| {
                (
                    emitter,
                    GridEvent::SortChange {
                        prop: next.prop,
                        order: next.order,
                        column: next.column,
                        data: data.as_ref().clone(),
                    },
                )
            })
        };
        if let Some((emitter, event)) = emission {
            emitter(event);
        }
    }

    /// A body row was clicked: emit `rowClick`.
    pub fn click_row(&mut self, row_index: usize) {
        let emission = {
            let shared = self.shared();
            let mut state = shared.borrow_mut();
            let rows = state.visible_rows();
            let Some(tree_row) = rows.get(row_index) else {
                return;
            };
            let row = tree_row.row.clone();
            state.emitter.clone().map(|emitter| {
                (
                    emitter,
                    GridEvent::RowClick {
                        row,
                        row_index,
                        data: rows.as_ref().clone(),
                    },
                )
            })
        };
        if let Some((emitter, event)) = emission {
            emitter(event);
        }
    }

    /// A body cell was clicked: emit `cellClick` with the cell value.
    pub fn click_cell(&mut self, row_index: usize, col_index: usize) {
        let emission = {
            let shared = self.shared();
            let mut state = shared.borrow_mut();
            let layout = state.column_layout();
            let rows = state.visible_rows();
            let Some(leaf) = layout.leaves.get(col_index) else {
                return;
            };
            let Some(tree_row) = rows.get(row_index) else {
                return;
            };
            let value = leaf
                .prop
                .as_deref()
                .and_then(|prop| field(&tree_row.row, prop))
                .cloned();
            let row = tree_row.row.clone();
            let column = ColumnRef::of(leaf);
            state.emitter.clone().map(|emitter| {
                (
                    emitter,
                    GridEvent::CellClick {
                        row,
                        column,
                        row_index,
                        col_index,
                        value,
                        data: rows.as_ref().clone(),
                    },
                )
            })
        };
        if let Some((emitter, event)) = emission {
            emitter(event);
        }
    }

    /// Toggle a tree node's expansion by id.
    ///
    /// Expanding a lazy node with uncached children marks it loading and
    /// invokes the loader capability with a resolve handle. A loader
    /// failure (or a missing loader) clears the load so the node can be
    /// retried.
    pub fn toggle_tree_node(&mut self, node_id: &str) {
        let pending_load = {
            let shared = self.shared();
            let mut state = shared.borrow_mut();
            let Some(tree_config) = state.config.tree.clone() else {
                return;
            };
            let rows = state.visible_rows();
            let id = NodeId::from(node_id);
            let Some(node) = rows.iter().find(|r| r.node_id == id).cloned() else {
                return;
            };
            let result = toggle_node(&state.tree, &node, tree_config.lazy);
            let needs_load = result.needs_load;
            state.tree = result.state;
            needs_load.then(|| (state.capabilities.child_loader.clone(), node))
        };

        let Some((loader, node)) = pending_load else {
            return;
        };
        match loader {
            Some(loader) => {
                let handle = LoadHandle {
                    state: self.shared(),
                    node_id: node.node_id.clone(),
                };
                if guard("load", loader(&node, handle)).is_none() {
                    let shared = self.shared();
                    let mut state = shared.borrow_mut();
                    state.tree = state.tree.with_load_failed(&node.node_id);
                }
            }
            None => {
                log::warn!(
                    "no child loader registered, cannot expand lazy node '{}'",
                    node.node_id
                );
                let shared = self.shared();
                let mut state = shared.borrow_mut();
                state.tree = state.tree.with_load_failed(&node.node_id);
            }
        }
    }

    /// Open every node with children (including resolved lazy subtrees).
    pub fn expand_all_nodes(&mut self) {
        let shared = self.shared();
        let mut state = shared.borrow_mut();
        let Some(tree_config) = state.config.tree.clone() else {
            return;
        };
        if !state.tree.initialized {
            state.tree = initial_expansion(&state.rows, &tree_config);
        }
        let rows = state.rows.clone();
        state.tree = expand_all(&rows, &tree_config, &state.tree);
    }

    /// Close every node. Caches and in-flight loads survive.
    pub fn collapse_all_nodes(&mut self) {
        let shared = self.shared();
        let mut state = shared.borrow_mut();
        let Some(tree_config) = state.config.tree.clone() else {
            return;
        };
        if !state.tree.initialized {
            state.tree = initial_expansion(&state.rows, &tree_config);
        }
        state.tree = collapse_all(&state.tree);
    }

    /// Toggle a row's detail panel.
    pub fn toggle_detail(&mut self, row_index: usize) {
        self.shared().borrow_mut().detail.toggle(row_index);
    }
}
