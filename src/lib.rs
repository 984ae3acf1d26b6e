//! dashgrid - data-grid widget core for dashboard hosts
//!
//! Transforms host-supplied rows and a declarative configuration into a
//! render-ready grid:
//! - Multi-level column headers with span metadata and fixed-column offsets
//! - Stable column-aware sorting (default or host comparator) with cyclic
//!   toggle state
//! - Hierarchical rows with expansion state, lazy-loaded subtrees, and
//!   per-level re-sort, flattened for linear rendering
//! - Row-detail panel tracking (multi-open or accordion)
//! - `rowClick` / `cellClick` / `sortChange` events emitted back to the host
//!
//! Painting, theming, and event transport stay with the host; this crate
//! only computes what to draw and reports what was interacted with.
//!
//! # Usage
//!
//! ```
//! use dashgrid::{DashGrid, GridCapabilities, GridConfig};
//!
//! let config = GridConfig::from_json_str(
//!     r#"{"columns":[{"prop":"name","label":"Name","sortable":true}]}"#,
//! );
//! let mut grid = DashGrid::new(config, GridCapabilities::default());
//! grid.set_rows_json(r#"[{"name":"b"},{"name":"a"}]"#);
//! grid.click_header(0);
//! assert_eq!(grid.visible_rows()[0].row["name"], "a");
//! ```

// Transformation modules
pub mod capability;
pub mod detail;
pub mod error;
pub mod layout;
pub mod sort;
pub mod tree;
pub mod types;

// Widget facade
pub mod viewer;

pub use capability::GridCapabilities;
pub use error::{DashGridError, Result};
pub use viewer::{DashGrid, LoadHandle};

pub use types::*;

/// Get the library version
#[must_use]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
