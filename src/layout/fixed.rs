//! Pinning offsets for fixed columns.
//!
//! Offsets are computed independently per side: a single left-to-right
//! pass accumulates the sticky `left` offset of left-fixed columns, and a
//! single right-to-left pass accumulates the sticky `right` offset of
//! right-fixed columns. They are stable only as long as widths and the
//! fixed assignment are unchanged.

use crate::types::{FixedPosition, LeafColumn};

/// Per-leaf pinning offsets.
#[derive(Debug, Clone, Default)]
pub struct FixedOffsets {
    /// Cumulative width of preceding left-fixed columns; `None` for
    /// columns that are not left-fixed
    pub left: Vec<Option<f32>>,
    /// Cumulative width of following right-fixed columns; `None` for
    /// columns that are not right-fixed
    pub right: Vec<Option<f32>>,
    /// Any column is pinned left
    pub has_fixed_left: bool,
    /// Any column is pinned right
    pub has_fixed_right: bool,
}

impl FixedOffsets {
    /// Left offset of the leaf at `index`, when it is left-fixed.
    #[must_use]
    pub fn left_offset(&self, index: usize) -> Option<f32> {
        self.left.get(index).copied().flatten()
    }

    /// Right offset of the leaf at `index`, when it is right-fixed.
    #[must_use]
    pub fn right_offset(&self, index: usize) -> Option<f32> {
        self.right.get(index).copied().flatten()
    }
}

/// Compute pinning offsets for the flattened leaf columns.
///
/// A column fixed on one side never receives an offset for the other.
/// Widths resolve as `width`, else `minWidth`, else the default.
#[must_use]
pub fn fixed_offsets(leaves: &[LeafColumn]) -> FixedOffsets {
    let mut offsets = FixedOffsets {
        left: vec![None; leaves.len()],
        right: vec![None; leaves.len()],
        has_fixed_left: false,
        has_fixed_right: false,
    };

    let mut acc = 0.0_f32;
    for (i, leaf) in leaves.iter().enumerate() {
        if leaf.fixed == FixedPosition::Left {
            offsets.has_fixed_left = true;
            if let Some(slot) = offsets.left.get_mut(i) {
                *slot = Some(acc);
            }
            acc += leaf.resolved_width();
        }
    }

    let mut acc = 0.0_f32;
    for (i, leaf) in leaves.iter().enumerate().rev() {
        if leaf.fixed == FixedPosition::Right {
            offsets.has_fixed_right = true;
            if let Some(slot) = offsets.right.get_mut(i) {
                *slot = Some(acc);
            }
            acc += leaf.resolved_width();
        }
    }

    offsets
}

/// True when the leaf at `index` is left-fixed and no later leaf is.
///
/// The host draws the scroll-shadow affordance after this column.
#[must_use]
pub fn is_last_fixed_left(leaves: &[LeafColumn], index: usize) -> bool {
    match leaves.get(index) {
        Some(leaf) if leaf.fixed == FixedPosition::Left => {}
        _ => return false,
    }
    !leaves
        .iter()
        .skip(index + 1)
        .any(|leaf| leaf.fixed == FixedPosition::Left)
}

/// True when the leaf at `index` is right-fixed and no earlier leaf is.
#[must_use]
pub fn is_first_fixed_right(leaves: &[LeafColumn], index: usize) -> bool {
    match leaves.get(index) {
        Some(leaf) if leaf.fixed == FixedPosition::Right => {}
        _ => return false,
    }
    !leaves
        .iter()
        .take(index)
        .any(|leaf| leaf.fixed == FixedPosition::Right)
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
    use crate::layout::flatten_columns;
    use crate::types::Column;

    fn leaf(prop: &str, fixed: FixedPosition, width: Option<f32>) -> Column {
        let mut column = Column::field(prop, prop.to_uppercase());
        column.fixed = Some(fixed);
        column.width = width;
        column
    }

    fn leaves(columns: &[Column]) -> Vec<LeafColumn> {
        flatten_columns(columns)
    }

    #[test]
    fn test_left_offsets_accumulate() {
        let cols = leaves(&[
            leaf("a", FixedPosition::Left, Some(80.0)),
            leaf("b", FixedPosition::Left, Some(120.0)),
            leaf("c", FixedPosition::None, Some(200.0)),
        ]);
        let offsets = fixed_offsets(&cols);

        assert_eq!(offsets.left_offset(0), Some(0.0));
        assert_eq!(offsets.left_offset(1), Some(80.0));
        assert_eq!(offsets.left_offset(2), None);
        assert!(offsets.has_fixed_left);
        assert!(!offsets.has_fixed_right);
    }

    #[test]
    fn test_right_offsets_accumulate_from_end() {
        let cols = leaves(&[
            leaf("a", FixedPosition::None, Some(200.0)),
            leaf("b", FixedPosition::Right, Some(90.0)),
            leaf("c", FixedPosition::Right, Some(110.0)),
        ]);
        let offsets = fixed_offsets(&cols);

        assert_eq!(offsets.right_offset(2), Some(0.0));
        assert_eq!(offsets.right_offset(1), Some(110.0));
        assert_eq!(offsets.right_offset(0), None);
    }

    #[test]
    fn test_one_side_never_gets_the_other_offset() {
        let cols = leaves(&[
            leaf("a", FixedPosition::Left, Some(80.0)),
            leaf("b", FixedPosition::Right, Some(90.0)),
        ]);
        let offsets = fixed_offsets(&cols);

        assert_eq!(offsets.right_offset(0), None);
        assert_eq!(offsets.left_offset(1), None);
    }

    #[test]
    fn test_default_width_applies() {
        let cols = leaves(&[
            leaf("a", FixedPosition::Left, None),
            leaf("b", FixedPosition::Left, None),
        ]);
        let offsets = fixed_offsets(&cols);
        assert_eq!(offsets.left_offset(1), Some(crate::types::DEFAULT_COLUMN_WIDTH));
    }

    #[test]
    fn test_min_width_used_when_width_unset() {
        let mut a = leaf("a", FixedPosition::Left, None);
        a.min_width = Some(60.0);
        let cols = leaves(&[a, leaf("b", FixedPosition::Left, None)]);
        let offsets = fixed_offsets(&cols);
        assert_eq!(offsets.left_offset(1), Some(60.0));
    }

    #[test]
    fn test_boundary_predicates() {
        let cols = leaves(&[
            leaf("a", FixedPosition::Left, None),
            leaf("b", FixedPosition::Left, None),
            leaf("c", FixedPosition::None, None),
            leaf("d", FixedPosition::Right, None),
            leaf("e", FixedPosition::Right, None),
        ]);

        assert!(!is_last_fixed_left(&cols, 0));
        assert!(is_last_fixed_left(&cols, 1));
        assert!(!is_last_fixed_left(&cols, 2));
        assert!(is_first_fixed_right(&cols, 3));
        assert!(!is_first_fixed_right(&cols, 4));
        assert!(!is_first_fixed_right(&cols, 2));
    }

    #[test]
    fn test_out_of_range_index_is_false() {
        let cols = leaves(&[leaf("a", FixedPosition::Left, None)]);
        assert!(!is_last_fixed_left(&cols, 5));
        assert!(!is_first_fixed_right(&cols, 5));
    }
}
