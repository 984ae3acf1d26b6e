//! Grid configuration as supplied by the dashboard host.
//!
//! Everything here deserializes from camelCase JSON with defaults filling
//! gaps, so a partial configuration object is always usable. Malformed
//! configuration is recovered, not surfaced (see
//! [`GridConfig::from_json_str`]).

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Column, SortOrder};

/// Top-level widget configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Declarative column tree. Empty means "derive columns from the data"
    /// unless the host registered a column-source capability.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Column>,
    /// Sort applied when a dataset is (re)loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<SortDefault>,
    /// Hierarchical row display. Present enables the tree feature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<TreeConfig>,
    /// Row-detail (auxiliary panel) expansion. Present enables the feature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<DetailConfig>,
}

impl GridConfig {
    /// Parse configuration JSON, surfacing the error.
    pub fn try_from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse configuration JSON, recovering to defaults on failure.
    ///
    /// A malformed configuration object is never fatal: the failure is
    /// logged and an empty configuration (auto-generated columns, no
    /// tree, no detail panel) is substituted.
    #[must_use]
    pub fn from_json_str(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("malformed grid configuration, using defaults: {e}");
                Self::default()
            }
        }
    }
}

/// Initial sort applied on dataset load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortDefault {
    /// Field key of the column to sort by
    pub prop: String,
    /// Direction; `null` leaves the dataset unsorted
    #[serde(default)]
    pub order: Option<SortOrder>,
}

/// Hierarchical row configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeConfig {
    /// Row field holding the child row array
    pub children_field: String,
    /// Row field marking a lazy node as having loadable children
    pub has_children_field: String,
    /// Row field providing node identity; rows without it fall back to a
    /// positional id
    pub id_field: String,
    /// Indent width per level, in pixels
    pub indent: f32,
    /// Load children on demand through the registered loader capability
    pub lazy: bool,
    /// Expand every node with children on dataset load
    pub default_expand_all: bool,
    /// Expand the first N levels on dataset load (0 = none, negative = all).
    /// Ignored when `defaultExpandAll` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_expand_level: Option<i32>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            children_field: "children".to_string(),
            has_children_field: "hasChildren".to_string(),
            id_field: "id".to_string(),
            indent: 16.0,
            lazy: false,
            default_expand_all: false,
            default_expand_level: None,
        }
    }
}

/// Row-detail panel configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetailConfig {
    /// Opening one row's panel closes every other
    pub accordion: bool,
    /// Open every row's panel on dataset load
    pub default_expand_all: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::FixedPosition;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = GridConfig::try_from_json(r#"{"columns":[{"prop":"name"}]}"#).unwrap();
        assert_eq!(config.columns.len(), 1);
        assert!(config.tree.is_none());
        assert!(config.detail.is_none());
        assert!(!config.columns[0].sortable);
        assert_eq!(config.columns[0].sort_orders.len(), 3);
    }

    #[test]
    fn test_legacy_fixed_boolean_alias() {
        let config = GridConfig::try_from_json(
            r#"{"columns":[{"prop":"a","fixed":true},{"prop":"b","fixed":"right"},{"prop":"c","fixed":false}]}"#,
        )
        .unwrap();
        assert_eq!(config.columns[0].fixed, Some(FixedPosition::Left));
        assert_eq!(config.columns[1].fixed, Some(FixedPosition::Right));
        assert_eq!(config.columns[2].fixed, Some(FixedPosition::None));
    }

    #[test]
    fn test_malformed_config_recovers_to_defaults() {
        let config = GridConfig::from_json_str("{not json");
        assert!(config.columns.is_empty());
        assert!(config.default_sort.is_none());
    }

    #[test]
    fn test_tree_config_defaults() {
        let config =
            GridConfig::try_from_json(r#"{"tree":{"lazy":true,"defaultExpandLevel":2}}"#).unwrap();
        let tree = config.tree.unwrap();
        assert!(tree.lazy);
        assert_eq!(tree.children_field, "children");
        assert_eq!(tree.has_children_field, "hasChildren");
        assert_eq!(tree.id_field, "id");
        assert_eq!(tree.default_expand_level, Some(2));
        assert_eq!(tree.indent, 16.0);
    }

    #[test]
    fn test_default_sort_order_optional() {
        let config =
            GridConfig::try_from_json(r#"{"defaultSort":{"prop":"age","order":"descending"}}"#)
                .unwrap();
        let sort = config.default_sort.unwrap();
        assert_eq!(sort.prop, "age");
        assert_eq!(sort.order, Some(SortOrder::Descending));

        let config = GridConfig::try_from_json(r#"{"defaultSort":{"prop":"age"}}"#).unwrap();
        assert!(config.default_sort.unwrap().order.is_none());
    }
}
