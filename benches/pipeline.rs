//! Benchmarks for the grid transformation pipeline.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dashgrid::layout::{fixed_offsets, flatten_columns, header_rows};
use dashgrid::sort::{sort_rows, SortState};
use dashgrid::tree::{flatten_tree, initial_expansion};
use dashgrid::{Column, FixedPosition, GridCapabilities, Row, SortDefault, SortOrder, TreeConfig};

/// A wide column tree: 10 groups of 5 leaf columns, first group pinned left.
fn wide_columns() -> Vec<Column> {
    (0..10)
        .map(|g| {
            let mut group = Column::group(
                format!("Group {g}"),
                (0..5)
                    .map(|i| {
                        let mut leaf =
                            Column::field(format!("f{g}_{i}"), format!("Field {g}.{i}"));
                        leaf.sortable = true;
                        leaf
                    })
                    .collect(),
            );
            if g == 0 {
                group.fixed = Some(FixedPosition::Left);
            }
            group
        })
        .collect()
}

/// Flat rows with interleaved numeric and text fields.
fn flat_rows(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| {
            let mut row = Row::new();
            row.insert("f0_0".into(), serde_json::json!(count - i));
            row.insert("f0_1".into(), serde_json::json!(format!("row {i}")));
            row
        })
        .collect()
}

/// A three-level tree, ten children per node.
fn deep_rows() -> Vec<Row> {
    fn node(id: usize, depth: usize) -> serde_json::Value {
        if depth == 0 {
            serde_json::json!({"id": id, "f0_0": id})
        } else {
            serde_json::json!({
                "id": id,
                "f0_0": id,
                "children": (0..10).map(|i| node(id * 10 + i, depth - 1)).collect::<Vec<_>>(),
            })
        }
    }
    (0..10)
        .filter_map(|i| node(i + 1, 2).as_object().cloned())
        .collect()
}

fn bench_column_layout(c: &mut Criterion) {
    let columns = wide_columns();
    c.bench_function("flatten_columns_50_leaves", |b| {
        b.iter(|| flatten_columns(black_box(&columns)))
    });
    c.bench_function("header_rows_50_leaves", |b| {
        b.iter(|| header_rows(black_box(&columns)))
    });

    let leaves = flatten_columns(&columns);
    c.bench_function("fixed_offsets_50_leaves", |b| {
        b.iter(|| fixed_offsets(black_box(&leaves)))
    });
}

fn bench_sort(c: &mut Criterion) {
    let leaves = flatten_columns(&wide_columns());
    let rows = flat_rows(5000);
    let capabilities = GridCapabilities::default();
    let state = SortState::from_default(
        Some(&SortDefault {
            prop: "f0_0".to_string(),
            order: Some(SortOrder::Ascending),
        }),
        &leaves,
    );

    c.bench_function("sort_5000_numeric", |b| {
        b.iter(|| sort_rows(black_box(&rows), &leaves, &state, &capabilities))
    });
}

fn bench_tree_flatten(c: &mut Criterion) {
    let rows = deep_rows();
    let config = TreeConfig {
        default_expand_all: true,
        ..TreeConfig::default()
    };
    let tree = initial_expansion(&rows, &config);

    c.bench_function("flatten_tree_1110_nodes_expanded", |b| {
        b.iter(|| flatten_tree(black_box(&rows), &config, &tree, None))
    });
}

criterion_group!(benches, bench_column_layout, bench_sort, bench_tree_flatten);
criterion_main!(benches);
