//! Layout engine for the column grid.
//!
//! This module handles:
//! - Flattening the declarative column tree into ordered leaf columns
//! - Building the multi-level header grid with col/row spans
//! - Computing left/right pinning offsets for fixed columns

mod column_tree;
mod fixed;

pub use column_tree::{flatten_columns, header_row_count, header_rows};
pub use fixed::{fixed_offsets, is_first_fixed_right, is_last_fixed_left, FixedOffsets};
