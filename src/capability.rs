//! Host-supplied capability callbacks.
//!
//! A capability is a pluggable behavior (comparator, child loader, column
//! generator, style hook) the host injects as a plain callable. The core
//! treats them as opaque and trusted but never lets one break the
//! pipeline: every invocation goes through [`guard`], which logs a
//! failure and substitutes the safe default.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::error::DashGridError;
use crate::types::{Column, HeaderCell, LeafColumn, Row, SortOrder, TreeRow};
use crate::viewer::LoadHandle;

/// Outcome of a capability invocation.
pub type CapabilityResult<T> = std::result::Result<T, DashGridError>;

/// Comparator capability, invoked with `(a, b, prop, order)`.
///
/// The returned ordering is used as the final comparator result: the
/// capability applies direction itself and the sort engine does not
/// reverse it for descending order.
pub type SortScript = Rc<dyn Fn(&Row, &Row, &str, SortOrder) -> CapabilityResult<Ordering>>;

/// Column source capability: derives the column tree from the loaded
/// rows. Evaluated once per data change.
pub type ColumnSource = Rc<dyn Fn(&[Row]) -> CapabilityResult<Vec<Column>>>;

/// Lazy child loader, invoked with the expanding node and a resolve
/// handle. The loader may resolve synchronously or stash the handle and
/// resolve later from the host's event loop.
pub type ChildLoader = Rc<dyn Fn(&TreeRow, LoadHandle) -> CapabilityResult<()>>;

/// Row style hook: opaque style payload for one visible row.
pub type RowStyleHook = Rc<dyn Fn(usize, &TreeRow) -> CapabilityResult<Value>>;

/// Cell style hook: opaque style payload for one visible cell.
pub type CellStyleHook = Rc<dyn Fn(usize, &LeafColumn, &TreeRow) -> CapabilityResult<Value>>;

/// Header style hook: opaque style payload for one header cell.
pub type HeaderStyleHook = Rc<dyn Fn(usize, &HeaderCell) -> CapabilityResult<Value>>;

/// The set of capabilities a host registers with the widget.
#[derive(Default, Clone)]
pub struct GridCapabilities {
    /// Comparators, keyed by a column's `sortScript` reference (or its
    /// `prop` when the configuration omits one)
    pub sort_scripts: HashMap<String, SortScript>,
    /// Derives columns from rows when the configuration has none
    pub column_source: Option<ColumnSource>,
    /// Loads children of lazy tree nodes
    pub child_loader: Option<ChildLoader>,
    /// Row style override
    pub row_style: Option<RowStyleHook>,
    /// Cell style override
    pub cell_style: Option<CellStyleHook>,
    /// Header cell style override
    pub header_style: Option<HeaderStyleHook>,
}

impl GridCapabilities {
    /// Register a comparator under `key` (a column's `sortScript`
    /// reference, or its `prop`).
    pub fn register_sort_script(&mut self, key: impl Into<String>, script: SortScript) {
        self.sort_scripts.insert(key.into(), script);
    }

    /// The comparator a column declares, if the host registered one.
    #[must_use]
    pub fn sort_script_for(&self, column: &LeafColumn) -> Option<&SortScript> {
        let key = column
            .sort_script
            .as_deref()
            .or(column.prop.as_deref())?;
        self.sort_scripts.get(key)
    }
}

/// Run a capability result through the recovery policy: a failure is
/// logged and becomes `None`, so the caller falls back to its default.
pub(crate) fn guard<T>(name: &str, result: CapabilityResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("capability '{name}' failed, falling back to default: {e}");
            None
        }
    }
}
