//! Interaction events emitted back to the dashboard host.
//!
//! Emission is fire-and-forget: the core never consumes a return value.

use serde::Serialize;
use serde_json::Value;

use crate::types::{LeafColumn, Row, SortOrder, TreeRow};

/// Shorthand column reference carried in cell-click payloads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRef {
    /// Field key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prop: Option<String>,
    /// Header label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ColumnRef {
    /// Reference a leaf column.
    #[must_use]
    pub fn of(column: &LeafColumn) -> Self {
        Self {
            prop: column.prop.clone(),
            label: column.label.clone(),
        }
    }
}

/// An interaction event for the host.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "type")]
pub enum GridEvent {
    /// A body row was clicked.
    RowClick {
        /// The clicked record
        row: Row,
        /// Index into the current visible row sequence
        row_index: usize,
        /// Snapshot of the current visible rows
        data: Vec<TreeRow>,
    },
    /// A body cell was clicked.
    CellClick {
        /// The clicked record
        row: Row,
        /// The clicked column
        column: ColumnRef,
        /// Index into the current visible row sequence
        row_index: usize,
        /// Leaf column index
        col_index: usize,
        /// The cell value, absent when the row lacks the field
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
        /// Snapshot of the current visible rows
        data: Vec<TreeRow>,
    },
    /// The sort state changed through a header toggle.
    SortChange {
        /// Sorted field key, absent when the sort was cleared
        #[serde(skip_serializing_if = "Option::is_none")]
        prop: Option<String>,
        /// Direction, absent when the sort was cleared
        #[serde(skip_serializing_if = "Option::is_none")]
        order: Option<SortOrder>,
        /// The sorted column, absent when the sort was cleared
        #[serde(skip_serializing_if = "Option::is_none")]
        column: Option<LeafColumn>,
        /// Snapshot of the visible rows under the new ordering
        data: Vec<TreeRow>,
    },
}

/// Host callback receiving interaction events.
///
/// Held behind `Rc` so handlers can clone it out of the state cell and
/// emit after their borrow ends.
pub type EventEmitter = std::rc::Rc<dyn Fn(GridEvent)>;
