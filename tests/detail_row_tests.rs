//! Tests for the row-detail panel tracker through the widget facade.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use common::grid;
use serde_json::json;

fn three_rows() -> serde_json::Value {
    json!([{"id": 1}, {"id": 2}, {"id": 3}])
}

#[test]
fn test_multi_open_mode_is_independent() {
    let mut grid = grid(r#"{"detail":{}}"#, three_rows());

    grid.toggle_detail(0);
    grid.toggle_detail(2);
    assert!(grid.is_detail_open(0));
    assert!(!grid.is_detail_open(1));
    assert!(grid.is_detail_open(2));

    grid.toggle_detail(2);
    assert_eq!(grid.open_detail_rows(), [0]);
}

#[test]
fn test_accordion_mode_keeps_single_row_open() {
    let mut grid = grid(r#"{"detail":{"accordion":true}}"#, three_rows());

    grid.toggle_detail(0);
    grid.toggle_detail(1);
    assert_eq!(grid.open_detail_rows(), [1]);

    grid.toggle_detail(1);
    assert!(grid.open_detail_rows().is_empty());
}

#[test]
fn test_default_expand_all_opens_on_dataset_load() {
    let grid = grid(r#"{"detail":{"defaultExpandAll":true}}"#, three_rows());
    assert_eq!(grid.open_detail_rows(), [0, 1, 2]);
}

#[test]
fn test_dataset_change_resets_to_initial_state() {
    let mut grid = grid(r#"{"detail":{"defaultExpandAll":true}}"#, three_rows());
    grid.toggle_detail(1);
    assert_eq!(grid.open_detail_rows(), [0, 2]);

    grid.set_rows(common::rows(json!([{"id": 9}, {"id": 10}])));
    assert_eq!(grid.open_detail_rows(), [0, 1]);
}

#[test]
fn test_disabling_feature_clears_state() {
    let mut grid = grid(r#"{"detail":{}}"#, three_rows());
    grid.toggle_detail(1);
    assert!(grid.is_detail_open(1));

    grid.set_config(dashgrid::GridConfig::from_json_str("{}"));
    assert!(grid.open_detail_rows().is_empty());
}

#[test]
fn test_detail_state_is_orthogonal_to_tree_expansion() {
    let config = r#"{
        "columns": [{"prop": "name"}],
        "tree": {},
        "detail": {}
    }"#;
    let mut grid = grid(
        config,
        json!([{"id": 1, "name": "root", "children": [{"id": 2, "name": "child"}]}]),
    );

    grid.toggle_detail(0);
    grid.toggle_tree_node("1");
    assert!(grid.is_detail_open(0));
    assert_eq!(grid.visible_rows().len(), 2);
}
