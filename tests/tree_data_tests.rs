//! Tests for hierarchical rows: expansion policy, lazy loading, and
//! per-level sorting, driven through the widget facade.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{column_values, grid, grid_with, visible_ids};
use dashgrid::error::DashGridError;
use dashgrid::GridCapabilities;
use serde_json::json;

// ============================================================================
// Test Helpers
// ============================================================================

const TREE_CONFIG: &str = r#"{
    "columns": [{"prop": "name", "label": "Name", "sortable": true}],
    "tree": {}
}"#;

fn org_chart() -> serde_json::Value {
    json!([
        {"id": 1, "name": "walnut", "children": [
            {"id": 2, "name": "cedar"},
            {"id": 3, "name": "aspen", "children": [
                {"id": 4, "name": "birch"}
            ]}
        ]},
        {"id": 5, "name": "maple"}
    ])
}

// ============================================================================
// Expansion Policy
// ============================================================================

#[test]
fn test_collapsed_by_default() {
    let grid = grid(TREE_CONFIG, org_chart());
    assert_eq!(visible_ids(&grid.visible_rows()), ["1", "5"]);
}

#[test]
fn test_default_expand_level_one() {
    let config = r#"{"columns":[{"prop":"name"}],"tree":{"defaultExpandLevel":1}}"#;
    let grid = grid(config, org_chart());
    assert_eq!(visible_ids(&grid.visible_rows()), ["1", "2", "3", "5"]);
}

#[test]
fn test_default_expand_all() {
    let config = r#"{"columns":[{"prop":"name"}],"tree":{"defaultExpandAll":true}}"#;
    let grid = grid(config, org_chart());
    assert_eq!(visible_ids(&grid.visible_rows()), ["1", "2", "3", "4", "5"]);
}

#[test]
fn test_expand_then_collapse_all_round_trip() {
    let mut grid = grid(TREE_CONFIG, org_chart());
    let roots = visible_ids(&grid.visible_rows());

    grid.expand_all_nodes();
    assert_eq!(visible_ids(&grid.visible_rows()), ["1", "2", "3", "4", "5"]);

    grid.collapse_all_nodes();
    assert_eq!(visible_ids(&grid.visible_rows()), roots);
}

#[test]
fn test_toggle_opens_and_closes_a_subtree() {
    let mut grid = grid(TREE_CONFIG, org_chart());

    grid.toggle_tree_node("1");
    assert_eq!(visible_ids(&grid.visible_rows()), ["1", "2", "3", "5"]);

    grid.toggle_tree_node("3");
    assert_eq!(visible_ids(&grid.visible_rows()), ["1", "2", "3", "4", "5"]);

    // Collapsing the parent hides the grandchild without forgetting it
    grid.toggle_tree_node("1");
    assert_eq!(visible_ids(&grid.visible_rows()), ["1", "5"]);
    grid.toggle_tree_node("1");
    assert_eq!(visible_ids(&grid.visible_rows()), ["1", "2", "3", "4", "5"]);
}

#[test]
fn test_dataset_change_reinitializes_expansion() {
    let mut grid = grid(TREE_CONFIG, org_chart());
    grid.expand_all_nodes();
    assert_eq!(visible_ids(&grid.visible_rows()).len(), 5);

    grid.set_rows(common::rows(json!([
        {"id": 9, "name": "oak", "children": [{"id": 10, "name": "elm"}]}
    ])));
    assert_eq!(visible_ids(&grid.visible_rows()), ["9"]);
}

// ============================================================================
// Re-sort Preserves Expansion
// ============================================================================

#[test]
fn test_resort_does_not_collapse_user_opened_nodes() {
    let mut grid = grid(TREE_CONFIG, org_chart());
    grid.toggle_tree_node("1");
    grid.toggle_tree_node("3");
    assert_eq!(visible_ids(&grid.visible_rows()).len(), 5);

    // Sorting the same dataset must not re-run initial expansion.
    grid.click_header(0);
    let after = grid.visible_rows();
    assert_eq!(after.len(), 5);
    assert!(after.iter().any(|r| r.node_id.as_str() == "4"));
}

#[test]
fn test_per_level_sort_keeps_children_grouped() {
    let mut grid = grid(TREE_CONFIG, org_chart());
    grid.toggle_tree_node("1");
    grid.click_header(0); // ascending by name

    // Roots ordered (maple < walnut), children re-sorted inside walnut.
    let rows = grid.visible_rows();
    assert_eq!(
        column_values(&rows, "name"),
        [json!("maple"), json!("walnut"), json!("aspen"), json!("cedar")]
    );
    let walnut = rows.iter().find(|r| r.node_id.as_str() == "1").unwrap();
    let aspen = rows.iter().find(|r| r.node_id.as_str() == "3").unwrap();
    assert_eq!(aspen.parent_id.as_ref().unwrap(), &walnut.node_id);
    assert_eq!(aspen.level, 1);
}

// ============================================================================
// Lazy Loading
// ============================================================================

const LAZY_CONFIG: &str = r#"{
    "columns": [{"prop": "name", "label": "Name"}],
    "tree": {"lazy": true}
}"#;

fn lazy_rows() -> serde_json::Value {
    json!([
        {"id": 1, "name": "root", "hasChildren": true},
        {"id": 2, "name": "leaf"}
    ])
}

#[test]
fn test_lazy_toggle_sets_loading_until_resolved() {
    let pending = Rc::new(RefCell::new(None));
    let stash = Rc::clone(&pending);
    let mut capabilities = GridCapabilities::default();
    capabilities.child_loader = Some(Rc::new(move |_node, handle| {
        stash.borrow_mut().replace(handle);
        Ok(())
    }));
    let mut grid = grid_with(LAZY_CONFIG, lazy_rows(), capabilities);

    grid.toggle_tree_node("1");
    let rows = grid.visible_rows();
    assert_eq!(visible_ids(&rows), ["1", "2"]); // children not yet loaded
    assert!(rows[0].loading);
    assert!(rows[0].expanded);

    // Resolution caches the children and clears the loading mark.
    let handle = pending.borrow_mut().take().unwrap();
    handle.resolve(common::rows(json!([{"id": 10, "name": "loaded child"}])));

    let rows = grid.visible_rows();
    assert_eq!(visible_ids(&rows), ["1", "10", "2"]);
    assert!(!rows[0].loading);
    assert_eq!(rows[1].level, 1);
}

#[test]
fn test_lazy_second_expand_uses_cache() {
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let mut capabilities = GridCapabilities::default();
    capabilities.child_loader = Some(Rc::new(move |node, handle| {
        *counter.borrow_mut() += 1;
        assert_eq!(node.node_id.as_str(), "1");
        handle.resolve(common::rows(json!([{"id": 10, "name": "child"}])));
        Ok(())
    }));
    let mut grid = grid_with(LAZY_CONFIG, lazy_rows(), capabilities);

    grid.toggle_tree_node("1");
    grid.toggle_tree_node("1");
    grid.toggle_tree_node("1");

    assert_eq!(*calls.borrow(), 1);
    assert_eq!(visible_ids(&grid.visible_rows()), ["1", "10", "2"]);
}

#[test]
fn test_lazy_load_failure_allows_retry() {
    let attempts = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&attempts);
    let mut capabilities = GridCapabilities::default();
    capabilities.child_loader = Some(Rc::new(move |_node, handle| {
        *counter.borrow_mut() += 1;
        if *counter.borrow() == 1 {
            return Err(DashGridError::capability("load", "backend unavailable"));
        }
        handle.resolve(common::rows(json!([{"id": 10, "name": "child"}])));
        Ok(())
    }));
    let mut grid = grid_with(LAZY_CONFIG, lazy_rows(), capabilities);

    grid.toggle_tree_node("1");
    let rows = grid.visible_rows();
    assert!(!rows[0].loading); // failure cleared the mark
    assert!(!rows[0].expanded);

    grid.toggle_tree_node("1");
    assert_eq!(*attempts.borrow(), 2);
    assert_eq!(visible_ids(&grid.visible_rows()), ["1", "10", "2"]);
}

#[test]
fn test_lazy_node_without_marker_is_a_leaf() {
    let mut capabilities = GridCapabilities::default();
    capabilities.child_loader = Some(Rc::new(|_node, _handle| {
        panic!("loader must not run for a leaf");
    }));
    let mut grid = grid_with(LAZY_CONFIG, lazy_rows(), capabilities);

    grid.toggle_tree_node("2");
    let rows = grid.visible_rows();
    assert!(rows[1].is_leaf);
    assert!(!rows[1].loading);
}
