//! Column tree flattening and header grid derivation.

use crate::types::{Column, FixedPosition, HeaderCell, LeafColumn};

/// Flatten the column tree into leaf columns in depth-first,
/// left-to-right order.
///
/// That order is the authoritative column order for both header and body
/// rendering. A node's resolved `fixed` value propagates to descendants
/// whose own value is unset; a child's explicit value always wins.
#[must_use]
pub fn flatten_columns(columns: &[Column]) -> Vec<LeafColumn> {
    let mut leaves = Vec::new();
    flatten_into(columns, FixedPosition::None, &mut leaves);
    leaves
}

fn flatten_into(nodes: &[Column], inherited: FixedPosition, leaves: &mut Vec<LeafColumn>) {
    for node in nodes {
        let fixed = node.fixed.unwrap_or(inherited);
        if node.is_leaf() {
            leaves.push(LeafColumn {
                index: leaves.len(),
                prop: node.prop.clone(),
                label: node.label.clone(),
                width: node.width,
                min_width: node.min_width,
                align: node.align.unwrap_or_default(),
                header_align: node.header_align.or(node.align).unwrap_or_default(),
                fixed,
                sortable: node.sortable,
                sort_orders: node.sort_orders.clone(),
                sort_script: node.sort_script.clone(),
            });
        } else {
            flatten_into(&node.children, fixed, leaves);
        }
    }
}

/// Number of header rows: the deepest leaf path, minimum 1.
#[must_use]
pub fn header_row_count(columns: &[Column]) -> usize {
    tree_depth(columns).max(1)
}

fn tree_depth(nodes: &[Column]) -> usize {
    nodes
        .iter()
        .map(|node| {
            if node.is_leaf() {
                1
            } else {
                1 + tree_depth(&node.children)
            }
        })
        .max()
        .unwrap_or(0)
}

/// Number of leaf columns under a node, minimum 1.
fn leaf_count(node: &Column) -> usize {
    if node.is_leaf() {
        return 1;
    }
    node.children.iter().map(leaf_count).sum::<usize>().max(1)
}

/// Build the header grid: one cell list per header row.
///
/// A node lands in the row matching its depth. Group headers span their
/// leaf-descendant count with a row span of 1; leaves span one column and
/// stretch down to the bottom header row.
#[must_use]
pub fn header_rows(columns: &[Column]) -> Vec<Vec<HeaderCell>> {
    let max_depth = header_row_count(columns);
    let mut rows: Vec<Vec<HeaderCell>> = vec![Vec::new(); max_depth];
    let mut leaf_index = 0;
    append_cells(
        columns,
        1,
        FixedPosition::None,
        max_depth,
        &mut rows,
        &mut leaf_index,
    );
    rows
}

fn append_cells(
    nodes: &[Column],
    depth: usize,
    inherited: FixedPosition,
    max_depth: usize,
    rows: &mut [Vec<HeaderCell>],
    leaf_index: &mut usize,
) {
    for node in nodes {
        let fixed = node.fixed.unwrap_or(inherited);
        let is_leaf = node.is_leaf();
        let cell = HeaderCell {
            prop: node.prop.clone(),
            label: node.label.clone(),
            align: node.header_align.or(node.align).unwrap_or_default(),
            fixed,
            sortable: node.sortable,
            col_span: leaf_count(node),
            row_span: if is_leaf {
                max_depth.saturating_sub(depth) + 1
            } else {
                1
            },
            is_leaf,
            leaf_index: is_leaf.then(|| {
                let index = *leaf_index;
                *leaf_index += 1;
                index
            }),
        };
        if let Some(row) = rows.get_mut(depth.saturating_sub(1)) {
            row.push(cell);
        }
        if !is_leaf {
            append_cells(&node.children, depth + 1, fixed, max_depth, rows, leaf_index);
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
    use crate::types::Column;

    fn nested_columns() -> Vec<Column> {
        vec![
            Column::field("id", "ID"),
            Column::group(
                "Person",
                vec![
                    Column::field("name", "Name"),
                    Column::group(
                        "Contact",
                        vec![
                            Column::field("email", "Email"),
                            Column::field("phone", "Phone"),
                        ],
                    ),
                ],
            ),
            Column::field("notes", "Notes"),
        ]
    }

    #[test]
    fn test_flatten_preserves_depth_first_order() {
        let leaves = flatten_columns(&nested_columns());
        let props: Vec<_> = leaves.iter().filter_map(|l| l.prop.as_deref()).collect();
        assert_eq!(props, ["id", "name", "email", "phone", "notes"]);
        for (i, leaf) in leaves.iter().enumerate() {
            assert_eq!(leaf.index, i);
        }
    }

    #[test]
    fn test_fixed_inheritance_fills_gaps_only() {
        let mut group = Column::group(
            "G",
            vec![Column::field("a", "A"), {
                let mut b = Column::field("b", "B");
                b.fixed = Some(FixedPosition::Right);
                b
            }],
        );
        group.fixed = Some(FixedPosition::Left);

        let leaves = flatten_columns(&[group]);
        assert_eq!(leaves[0].fixed, FixedPosition::Left); // inherited
        assert_eq!(leaves[1].fixed, FixedPosition::Right); // own value wins
    }

    #[test]
    fn test_header_row_count_minimum_one() {
        assert_eq!(header_row_count(&[]), 1);
        assert_eq!(header_row_count(&[Column::field("a", "A")]), 1);
        assert_eq!(header_row_count(&nested_columns()), 3);
    }

    #[test]
    fn test_header_rows_spans() {
        let rows = header_rows(&nested_columns());
        assert_eq!(rows.len(), 3);

        // Row 0: id (leaf, reaches bottom), Person (spans 3), notes (leaf)
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[0][0].row_span, 3);
        assert_eq!(rows[0][0].col_span, 1);
        assert_eq!(rows[0][1].label.as_deref(), Some("Person"));
        assert_eq!(rows[0][1].col_span, 3);
        assert_eq!(rows[0][1].row_span, 1);
        assert_eq!(rows[0][2].row_span, 3);

        // Row 1: name (leaf, 2 remaining rows), Contact (spans 2)
        assert_eq!(rows[1].len(), 2);
        assert_eq!(rows[1][0].label.as_deref(), Some("Name"));
        assert_eq!(rows[1][0].row_span, 2);
        assert_eq!(rows[1][1].col_span, 2);

        // Row 2: email, phone
        assert_eq!(rows[2].len(), 2);
        assert_eq!(rows[2][0].row_span, 1);
    }

    #[test]
    fn test_group_col_span_equals_leaf_sum() {
        let columns = nested_columns();
        let rows = header_rows(&columns);
        let person = &rows[0][1];
        let leaf_total: usize = rows
            .iter()
            .flatten()
            .filter(|c| c.is_leaf && matches!(c.prop.as_deref(), Some("name" | "email" | "phone")))
            .map(|c| c.col_span)
            .sum();
        assert_eq!(person.col_span, leaf_total);
    }

    #[test]
    fn test_leaf_indices_match_flatten_order() {
        let columns = nested_columns();
        let leaves = flatten_columns(&columns);
        let rows = header_rows(&columns);

        let mut by_leaf_index: Vec<(usize, String)> = rows
            .iter()
            .flatten()
            .filter(|c| c.is_leaf)
            .map(|c| (c.leaf_index.unwrap(), c.prop.clone().unwrap_or_default()))
            .collect();
        by_leaf_index.sort();

        for (leaf, (index, prop)) in leaves.iter().zip(&by_leaf_index) {
            assert_eq!(leaf.index, *index);
            assert_eq!(leaf.prop.as_deref(), Some(prop.as_str()));
        }
    }

    #[test]
    fn test_childless_group_degenerates_to_span_one() {
        // A group header with no children should not occur with valid
        // configuration, but must not break the grid.
        let rows = header_rows(&[Column::group("Empty", vec![]), Column::field("a", "A")]);
        assert_eq!(rows[0][0].col_span, 1);
    }
}
