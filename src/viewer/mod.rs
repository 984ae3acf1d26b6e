//! Main `DashGrid` struct - the widget facade for a dashboard host.
//!
//! This module provides the state owner that handles:
//! - Holding configuration, capabilities, rows, and interaction state
//! - Memoizing the derived column layout and visible row sequence
//! - Wiring lazy child loads through a resolve handle
//! - Emitting interaction events back to the host
//!
//! The host re-invokes the accessors on every state change; recomputation
//! is idempotent and served from revision-keyed caches.

mod events;

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use crate::capability::{guard, GridCapabilities};
use crate::detail::DetailRows;
use crate::layout::{fixed_offsets, flatten_columns, header_rows, FixedOffsets};
use crate::sort::{sort_rows, SortState};
use crate::tree::{flatten_tree, initial_expansion, SortContext, TreeState};
use crate::types::{
    Column, EventEmitter, GridConfig, HeaderCell, LeafColumn, NodeId, Row, SortOrder, TreeRow,
};

/// Derived column layout: leaves, header grid, and pinning offsets.
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    /// Flattened leaf columns in render order
    pub leaves: Vec<LeafColumn>,
    /// Header grid, one cell list per header row
    pub header_rows: Vec<Vec<HeaderCell>>,
    /// Pinning offsets per leaf
    pub fixed: FixedOffsets,
}

/// Cache key for the visible row sequence.
type RowsKey = (u64, u64, (Option<String>, Option<SortOrder>), u64);

struct ColumnCache {
    key: (u64, u64),
    layout: Rc<ColumnLayout>,
}

struct RowsCache {
    key: RowsKey,
    rows: Rc<Vec<TreeRow>>,
}

/// Shared state that interaction handlers and resolve handles access.
pub(crate) struct SharedState {
    pub(crate) config: GridConfig,
    pub(crate) capabilities: GridCapabilities,
    pub(crate) rows: Vec<Row>,
    pub(crate) sort: SortState,
    pub(crate) tree: TreeState,
    pub(crate) detail: DetailRows,
    pub(crate) emitter: Option<EventEmitter>,
    pub(crate) config_revision: u64,
    pub(crate) data_revision: u64,
    column_cache: Option<ColumnCache>,
    rows_cache: Option<RowsCache>,
}

impl SharedState {
    /// Columns for the current dataset: configured, capability-derived,
    /// or auto-generated from the first row's keys.
    fn resolve_columns(&self) -> Vec<Column> {
        if !self.config.columns.is_empty() {
            return self.config.columns.clone();
        }
        if let Some(source) = &self.capabilities.column_source {
            if let Some(columns) = guard("columnSource", source(&self.rows)) {
                if !columns.is_empty() {
                    return columns;
                }
            }
        }
        auto_columns(&self.rows)
    }

    fn column_layout(&mut self) -> Rc<ColumnLayout> {
        let key = (self.config_revision, self.data_revision);
        if let Some(cache) = &self.column_cache {
            if cache.key == key {
                return Rc::clone(&cache.layout);
            }
        }

        let columns = self.resolve_columns();
        let leaves = flatten_columns(&columns);
        let layout = Rc::new(ColumnLayout {
            fixed: fixed_offsets(&leaves),
            header_rows: header_rows(&columns),
            leaves,
        });
        self.column_cache = Some(ColumnCache {
            key,
            layout: Rc::clone(&layout),
        });
        layout
    }

    fn visible_rows(&mut self) -> Rc<Vec<TreeRow>> {
        let layout = self.column_layout();

        // Initial expansion runs once per dataset; re-sorts of the same
        // dataset must not collapse user-opened nodes.
        if let Some(tree_config) = &self.config.tree {
            if !self.tree.initialized {
                self.tree = initial_expansion(&self.rows, tree_config);
            }
        }

        let key = (
            self.config_revision,
            self.data_revision,
            self.sort.fingerprint(),
            self.tree.revision,
        );
        if let Some(cache) = &self.rows_cache {
            if cache.key == key {
                return Rc::clone(&cache.rows);
            }
        }

        let flat = match &self.config.tree {
            Some(tree_config) => {
                let context = SortContext {
                    leaves: &layout.leaves,
                    state: &self.sort,
                    capabilities: &self.capabilities,
                };
                flatten_tree(&self.rows, tree_config, &self.tree, Some(&context))
            }
            None => {
                let sorted = sort_rows(&self.rows, &layout.leaves, &self.sort, &self.capabilities);
                sorted
                    .iter()
                    .enumerate()
                    .map(|(index, row)| plain_row(row, index))
                    .collect()
            }
        };

        let rows = Rc::new(flat);
        self.rows_cache = Some(RowsCache {
            key,
            rows: Rc::clone(&rows),
        });
        rows
    }
}

/// A flat-mode row wrapped in the tree-row shape (level 0, no children).
fn plain_row(row: &Row, index: usize) -> TreeRow {
    TreeRow {
        node_id: NodeId::derive(row, "id", None, index),
        row: row.clone(),
        level: 0,
        parent_id: None,
        has_children: false,
        is_leaf: true,
        expanded: false,
        loading: false,
        indent: 0.0,
    }
}

/// Generate leaf columns from the first row's keys.
fn auto_columns(rows: &[Row]) -> Vec<Column> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    first
        .keys()
        .map(|key| Column::field(key.clone(), key.clone()))
        .collect()
}

/// Resolve handle for one lazy child load.
///
/// Handed to the loader capability; the loader resolves synchronously or
/// stashes the handle and resolves later from the host's event loop. A
/// handle that is dropped without resolving leaves its node loading
/// forever (no timeout, no cancellation).
pub struct LoadHandle {
    state: Rc<RefCell<SharedState>>,
    node_id: NodeId,
}

impl LoadHandle {
    /// The node being loaded.
    #[must_use]
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Store the loaded children and clear the loading mark. The children
    /// appear in the next flatten pass.
    pub fn resolve(self, children: Vec<Row>) {
        let mut state = self.state.borrow_mut();
        state.tree = state.tree.with_loaded_children(&self.node_id, children);
    }

    /// Report a failed load: the loading mark clears, nothing is cached,
    /// and the node closes so the next toggle retries.
    pub fn fail(self, reason: &str) {
        log::warn!("lazy load for node '{}' failed: {reason}", self.node_id);
        let mut state = self.state.borrow_mut();
        state.tree = state.tree.with_load_failed(&self.node_id);
    }
}

/// The grid widget core.
///
/// Owns all interaction state and serves the host render-ready views:
/// [`column_layout`](Self::column_layout) for the header/offset grid and
/// [`visible_rows`](Self::visible_rows) for the linear row sequence.
pub struct DashGrid {
    state: Rc<RefCell<SharedState>>,
}

impl DashGrid {
    /// Create a grid for a configuration and the host's capabilities.
    #[must_use]
    pub fn new(config: GridConfig, capabilities: GridCapabilities) -> Self {
        let leaves = flatten_columns(&config.columns);
        let sort = SortState::from_default(config.default_sort.as_ref(), &leaves);
        let detail = DetailRows::new(&config.detail.clone().unwrap_or_default());
        Self {
            state: Rc::new(RefCell::new(SharedState {
                sort,
                detail,
                capabilities,
                config,
                rows: Vec::new(),
                tree: TreeState::default(),
                emitter: None,
                config_revision: 0,
                data_revision: 0,
                column_cache: None,
                rows_cache: None,
            })),
        }
    }

    /// Register the host's event callback.
    pub fn set_event_emitter(&mut self, emitter: EventEmitter) {
        self.state.borrow_mut().emitter = Some(emitter);
    }

    /// Load a new dataset.
    ///
    /// Bumps the dataset revision: tree expansion re-initializes from the
    /// configured policy and the detail tracker resets. The sort state is
    /// kept for the display session.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        let mut state = self.state.borrow_mut();
        let row_count = rows.len();
        state.rows = rows;
        state.data_revision += 1;
        state.tree = TreeState::default();
        state.detail.reset(row_count);
    }

    /// Load a dataset from JSON. Absent or non-array data is treated as
    /// an empty dataset, never an error.
    pub fn set_rows_json(&mut self, json: &str) {
        let rows = match serde_json::from_str::<Value>(json) {
            Ok(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(row) => Some(row),
                    _ => None,
                })
                .collect(),
            Ok(Value::Null) => Vec::new(),
            Ok(_) => {
                log::warn!("row data is not an array, treating as empty");
                Vec::new()
            }
            Err(e) => {
                log::warn!("malformed row data, treating as empty: {e}");
                Vec::new()
            }
        };
        self.set_rows(rows);
    }

    /// Replace the configuration.
    ///
    /// Disabling the tree feature clears its state; the sort state is
    /// re-derived from the new default-sort configuration. The detail
    /// tracker is rebuilt for the (possibly changed) mode.
    pub fn set_config(&mut self, config: GridConfig) {
        let mut state = self.state.borrow_mut();
        let leaves = flatten_columns(&config.columns);
        state.sort = SortState::from_default(config.default_sort.as_ref(), &leaves);
        if config.tree.is_none() {
            state.tree = TreeState::default();
        }
        state.detail = DetailRows::new(&config.detail.clone().unwrap_or_default());
        let row_count = state.rows.len();
        state.detail.reset(row_count);
        state.config = config;
        state.config_revision += 1;
    }

    /// The derived column layout for the current configuration and data.
    #[must_use]
    pub fn column_layout(&self) -> Rc<ColumnLayout> {
        self.state.borrow_mut().column_layout()
    }

    /// The linear, render-ready row sequence.
    #[must_use]
    pub fn visible_rows(&self) -> Rc<Vec<TreeRow>> {
        self.state.borrow_mut().visible_rows()
    }

    /// The current sort state.
    #[must_use]
    pub fn sort_state(&self) -> SortState {
        self.state.borrow().sort.clone()
    }

    /// Clear any active sort.
    pub fn clear_sort(&mut self) {
        self.state.borrow_mut().sort = SortState::default();
    }

    /// The current tree expansion state.
    #[must_use]
    pub fn tree_state(&self) -> TreeState {
        self.state.borrow().tree.clone()
    }

    /// Whether a row's detail panel is open.
    #[must_use]
    pub fn is_detail_open(&self, row_index: usize) -> bool {
        self.state.borrow().detail.is_open(row_index)
    }

    /// Indices of rows with an open detail panel.
    #[must_use]
    pub fn open_detail_rows(&self) -> Vec<usize> {
        self.state.borrow().detail.open_rows()
    }

    /// Row style override from the host's capability, if any. A failing
    /// hook logs and yields `None` (default rendering).
    #[must_use]
    pub fn row_style(&self, row_index: usize) -> Option<Value> {
        let (hook, row) = {
            let mut state = self.state.borrow_mut();
            let rows = state.visible_rows();
            (
                state.capabilities.row_style.clone(),
                rows.get(row_index).cloned(),
            )
        };
        let hook = hook?;
        let row = row?;
        guard("rowStyle", hook(row_index, &row))
    }

    /// Cell style override from the host's capability, if any.
    #[must_use]
    pub fn cell_style(&self, row_index: usize, leaf_index: usize) -> Option<Value> {
        let (hook, leaf, row) = {
            let mut state = self.state.borrow_mut();
            let layout = state.column_layout();
            let rows = state.visible_rows();
            (
                state.capabilities.cell_style.clone(),
                layout.leaves.get(leaf_index).cloned(),
                rows.get(row_index).cloned(),
            )
        };
        let hook = hook?;
        guard("cellStyle", hook(row_index, &leaf?, &row?))
    }

    /// Header cell style override from the host's capability, if any.
    #[must_use]
    pub fn header_style(&self, header_row: usize, cell_index: usize) -> Option<Value> {
        let (hook, cell) = {
            let mut state = self.state.borrow_mut();
            let layout = state.column_layout();
            (
                state.capabilities.header_style.clone(),
                layout
                    .header_rows
                    .get(header_row)
                    .and_then(|row| row.get(cell_index))
                    .cloned(),
            )
        };
        let hook = hook?;
        guard("headerStyle", hook(header_row, &cell?))
    }

    pub(crate) fn shared(&self) -> Rc<RefCell<SharedState>> {
        Rc::clone(&self.state)
    }
}
