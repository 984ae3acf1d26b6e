//! Sort engine: column-aware row ordering and cyclic toggle state.
//!
//! Sorting is stable and never mutates the input; when no sort is active
//! (or the referenced column does not exist) the input is returned
//! borrowed, so callers must not assume a fresh copy in that case.

use std::borrow::Cow;
use std::cmp::Ordering;

use deunicode::deunicode;
use serde_json::Value;

use crate::capability::GridCapabilities;
use crate::types::{field, LeafColumn, Row, SortDefault, SortOrder};

/// The active sort: which column, which direction.
///
/// Mutated only by explicit toggle requests; held for the widget's
/// display session.
#[derive(Debug, Clone, Default)]
pub struct SortState {
    /// Field key of the sorted column
    pub prop: Option<String>,
    /// Direction; `None` means no sort is active
    pub order: Option<SortOrder>,
    /// The sorted leaf column
    pub column: Option<LeafColumn>,
}

impl SortState {
    /// Build the initial state from an optional default-sort configuration.
    #[must_use]
    pub fn from_default(default: Option<&SortDefault>, leaves: &[LeafColumn]) -> Self {
        let Some(default) = default else {
            return Self::default();
        };
        let Some(order) = default.order else {
            return Self::default();
        };
        let column = leaves
            .iter()
            .find(|leaf| leaf.prop.as_deref() == Some(default.prop.as_str()));
        Self {
            prop: Some(default.prop.clone()),
            order: Some(order),
            column: column.cloned(),
        }
    }

    /// True when a direction is set.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.order.is_some()
    }

    /// Cheap identity for cache keys.
    #[must_use]
    pub fn fingerprint(&self) -> (Option<String>, Option<SortOrder>) {
        (self.prop.clone(), self.order)
    }
}

/// The order a toggle on `column` would move to.
///
/// The next entry of the column's `sortOrders` cycle after the current
/// order, wrapping. Toggling a column other than the currently sorted one
/// restarts the cycle at its first entry.
#[must_use]
pub fn next_order(column: &LeafColumn, state: &SortState) -> Option<SortOrder> {
    let default_cycle;
    let cycle: &[Option<SortOrder>] = if column.sort_orders.is_empty() {
        default_cycle = crate::types::default_sort_orders();
        &default_cycle
    } else {
        &column.sort_orders
    };
    let same_column = state.prop.is_some() && state.prop == column.prop;
    let position = if same_column {
        cycle.iter().position(|entry| *entry == state.order)
    } else {
        None
    };
    let next = match position {
        Some(i) => (i + 1) % cycle.len(),
        None => 0,
    };
    cycle.get(next).copied().flatten()
}

/// Apply a sort-toggle request for `column`.
///
/// Non-sortable columns ignore the request entirely. A `null` cycle entry
/// clears the state back to unsorted.
#[must_use]
pub fn toggle(state: &SortState, column: &LeafColumn) -> SortState {
    if !column.sortable {
        return state.clone();
    }
    match next_order(column, state) {
        Some(order) => SortState {
            prop: column.prop.clone(),
            order: Some(order),
            column: Some(column.clone()),
        },
        None => SortState::default(),
    }
}

/// Produce a totally ordered row sequence.
///
/// Returns the input borrowed when no sort is active or when no leaf
/// column matches `state.prop` (a sort referencing a missing column is
/// silently ignored). Otherwise returns a freshly allocated, stably
/// sorted copy; ties keep their original relative order.
#[must_use]
pub fn sort_rows<'a>(
    rows: &'a [Row],
    leaves: &[LeafColumn],
    state: &SortState,
    capabilities: &GridCapabilities,
) -> Cow<'a, [Row]> {
    let Some(order) = state.order else {
        return Cow::Borrowed(rows);
    };
    let Some(prop) = state.prop.as_deref() else {
        return Cow::Borrowed(rows);
    };
    let Some(column) = leaves
        .iter()
        .find(|leaf| leaf.prop.as_deref() == Some(prop))
    else {
        return Cow::Borrowed(rows);
    };

    let script = capabilities.sort_script_for(column).cloned();
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| compare_rows(a, b, prop, order, script.as_ref()));
    Cow::Owned(sorted)
}

/// Comparator inputs resolved once per sort pass.
pub(crate) struct ResolvedSort {
    pub prop: String,
    pub order: SortOrder,
    pub script: Option<crate::capability::SortScript>,
}

/// Resolve the active sort against the leaf columns, if any.
///
/// `None` when no sort is active or the referenced column is missing.
pub(crate) fn resolve_sort(
    leaves: &[LeafColumn],
    state: &SortState,
    capabilities: &GridCapabilities,
) -> Option<ResolvedSort> {
    let order = state.order?;
    let prop = state.prop.as_deref()?;
    let column = leaves
        .iter()
        .find(|leaf| leaf.prop.as_deref() == Some(prop))?;
    Some(ResolvedSort {
        prop: prop.to_string(),
        order,
        script: capabilities.sort_script_for(column).cloned(),
    })
}

/// Compare two rows under the resolved comparator policy.
///
/// A registered comparator capability wins and its result is final (it
/// applies direction itself). If it fails, the failure is logged and the
/// default comparator takes over for that pair.
pub(crate) fn compare_rows(
    a: &Row,
    b: &Row,
    prop: &str,
    order: SortOrder,
    script: Option<&crate::capability::SortScript>,
) -> Ordering {
    if let Some(script) = script {
        match script(a, b, prop, order) {
            Ok(ordering) => return ordering,
            Err(e) => {
                log::warn!("sort script for '{prop}' failed, using default comparator: {e}");
            }
        }
    }

    let ordering = compare_values(field(a, prop), field(b, prop));
    match order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}

/// The default comparator over row field values.
///
/// Missing and `null` values compare greater than any defined value, so
/// they land last under ascending order and first under descending order
/// (direction is applied after this comparison). Numbers compare
/// numerically; everything else compares as folded text.
#[must_use]
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            if a == b {
                return Ordering::Equal;
            }
            match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => compare_text(&value_text(a), &value_text(b)),
            }
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// Case- and diacritic-insensitive primary key, raw byte order as tie-break.
fn compare_text(a: &str, b: &str) -> Ordering {
    let folded_a = deunicode(a).to_lowercase();
    let folded_b = deunicode(b).to_lowercase();
    folded_a.cmp(&folded_b).then_with(|| a.cmp(b))
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
    use serde_json::json;
    use test_case::test_case;

    fn sortable(prop: &str) -> LeafColumn {
        let mut column = crate::types::Column::field(prop, prop.to_uppercase());
        column.sortable = true;
        crate::layout::flatten_columns(&[column]).remove(0)
    }

    #[test_case(json!(2), json!(10), Ordering::Less; "numbers compare numerically")]
    #[test_case(json!(3.5), json!(3.5), Ordering::Equal; "equal numbers")]
    #[test_case(json!("apple"), json!("Banana"), Ordering::Less; "case-insensitive text")]
    #[test_case(json!("éclair"), json!("edge"), Ordering::Less; "diacritics fold")]
    #[test_case(json!("10"), json!(9), Ordering::Less; "mixed types compare as text")]
    fn test_compare_values(a: Value, b: Value, expected: Ordering) {
        assert_eq!(compare_values(Some(&a), Some(&b)), expected);
    }

    #[test]
    fn test_null_sorts_greater_before_direction() {
        let value = json!(1);
        assert_eq!(compare_values(None, Some(&value)), Ordering::Greater);
        assert_eq!(compare_values(Some(&value), None), Ordering::Less);
        assert_eq!(compare_values(None, None), Ordering::Equal);
    }

    #[test]
    fn test_toggle_cycles_through_default_orders() {
        let column = sortable("amount");
        let s0 = SortState::default();
        let s1 = toggle(&s0, &column);
        assert_eq!(s1.order, Some(SortOrder::Ascending));
        let s2 = toggle(&s1, &column);
        assert_eq!(s2.order, Some(SortOrder::Descending));
        let s3 = toggle(&s2, &column);
        assert!(s3.order.is_none());
        assert!(s3.prop.is_none());
        assert!(s3.column.is_none());
    }

    #[test]
    fn test_toggle_other_column_restarts_cycle() {
        let amount = sortable("amount");
        let name = sortable("name");
        let state = toggle(&toggle(&SortState::default(), &amount), &amount);
        assert_eq!(state.order, Some(SortOrder::Descending));

        let state = toggle(&state, &name);
        assert_eq!(state.prop.as_deref(), Some("name"));
        assert_eq!(state.order, Some(SortOrder::Ascending));
    }

    #[test]
    fn test_toggle_unsortable_is_ignored() {
        let mut column = sortable("amount");
        column.sortable = false;
        let state = toggle(&SortState::default(), &column);
        assert!(state.order.is_none());
    }

    #[test]
    fn test_toggle_custom_cycle() {
        let mut column = sortable("amount");
        column.sort_orders = vec![Some(SortOrder::Descending), None];
        let s1 = toggle(&SortState::default(), &column);
        assert_eq!(s1.order, Some(SortOrder::Descending));
        let s2 = toggle(&s1, &column);
        assert!(s2.order.is_none());
    }
}
