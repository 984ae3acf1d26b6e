//! Common test utilities and builder helpers.
//!
//! This module provides helper functions for building rows, columns, and
//! grids, and for capturing emitted events.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use dashgrid::types::{Column, GridEvent, Row, TreeRow};
use dashgrid::{DashGrid, GridCapabilities, GridConfig};

// ============================================================================
// Row Builders
// ============================================================================

/// Parse a JSON array literal into rows, panicking on malformed input.
#[must_use]
pub fn rows(json: serde_json::Value) -> Vec<Row> {
    json.as_array()
        .expect("rows helper needs a JSON array")
        .iter()
        .map(|item| item.as_object().expect("row must be an object").clone())
        .collect()
}

/// A sortable leaf column bound to `prop`.
#[must_use]
pub fn sortable(prop: &str) -> Column {
    let mut column = Column::field(prop, prop.to_uppercase());
    column.sortable = true;
    column
}

// ============================================================================
// Grid Builders
// ============================================================================

/// Build a grid from a configuration JSON literal and a rows JSON literal.
#[must_use]
pub fn grid(config: &str, data: serde_json::Value) -> DashGrid {
    grid_with(config, data, GridCapabilities::default())
}

/// Build a grid with explicit capabilities.
#[must_use]
pub fn grid_with(
    config: &str,
    data: serde_json::Value,
    capabilities: GridCapabilities,
) -> DashGrid {
    let mut grid = DashGrid::new(GridConfig::from_json_str(config), capabilities);
    grid.set_rows(rows(data));
    grid
}

/// Attach a capturing event emitter; the returned cell accumulates every
/// emitted event.
pub fn capture_events(grid: &mut DashGrid) -> Rc<RefCell<Vec<GridEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    grid.set_event_emitter(Rc::new(move |event| sink.borrow_mut().push(event)));
    events
}

// ============================================================================
// Assertions
// ============================================================================

/// The values of `prop` across the visible rows, as JSON values.
#[must_use]
pub fn column_values(rows: &[TreeRow], prop: &str) -> Vec<serde_json::Value> {
    rows.iter()
        .map(|r| r.row.get(prop).cloned().unwrap_or(serde_json::Value::Null))
        .collect()
}

/// The node ids of the visible rows, as strings.
#[must_use]
pub fn visible_ids(rows: &[TreeRow]) -> Vec<String> {
    rows.iter().map(|r| r.node_id.to_string()).collect()
}
