//! Row-detail panel tracking.
//!
//! Orthogonal to tree expansion: which rows currently show their
//! auxiliary detail panel. Resets to the configured initial state when
//! the feature is disabled or the dataset reference changes.

use std::collections::BTreeSet;

use crate::types::DetailConfig;

/// Detail-panel state over the visible row sequence.
#[derive(Debug, Clone, Default)]
pub struct DetailRows {
    accordion: bool,
    default_expand_all: bool,
    open: BTreeSet<usize>,
}

impl DetailRows {
    /// Create the tracker for a configuration, with no rows yet.
    #[must_use]
    pub fn new(config: &DetailConfig) -> Self {
        Self {
            accordion: config.accordion,
            default_expand_all: config.default_expand_all,
            open: BTreeSet::new(),
        }
    }

    /// Reset to the configured initial state for a dataset of
    /// `row_count` rows: everything open under `defaultExpandAll`
    /// (capped at one row in accordion mode), else everything closed.
    pub fn reset(&mut self, row_count: usize) {
        self.open.clear();
        if self.default_expand_all {
            if self.accordion {
                if row_count > 0 {
                    self.open.insert(0);
                }
            } else {
                self.open.extend(0..row_count);
            }
        }
    }

    /// Toggle one row's panel.
    ///
    /// Multi-open mode toggles the row independently. Accordion mode
    /// closes every other row when opening one, and toggling the open
    /// row closes it.
    pub fn toggle(&mut self, row_index: usize) {
        if self.open.contains(&row_index) {
            self.open.remove(&row_index);
            return;
        }
        if self.accordion {
            self.open.clear();
        }
        self.open.insert(row_index);
    }

    /// Whether a row's panel is open.
    #[must_use]
    pub fn is_open(&self, row_index: usize) -> bool {
        self.open.contains(&row_index)
    }

    /// Indices of all open rows, ascending.
    #[must_use]
    pub fn open_rows(&self) -> Vec<usize> {
        self.open.iter().copied().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use super::*;

    fn tracker(accordion: bool, default_expand_all: bool) -> DetailRows {
        DetailRows::new(&DetailConfig {
            accordion,
            default_expand_all,
        })
    }

    #[test]
    fn test_multi_open_rows_toggle_independently() {
        let mut detail = tracker(false, false);
        detail.toggle(0);
        detail.toggle(2);
        assert!(detail.is_open(0));
        assert!(!detail.is_open(1));
        assert!(detail.is_open(2));

        detail.toggle(0);
        assert!(!detail.is_open(0));
        assert!(detail.is_open(2));
    }

    #[test]
    fn test_accordion_keeps_one_open() {
        let mut detail = tracker(true, false);
        detail.toggle(1);
        assert_eq!(detail.open_rows(), [1]);

        detail.toggle(3);
        assert_eq!(detail.open_rows(), [3]);

        detail.toggle(3);
        assert!(detail.open_rows().is_empty());
    }

    #[test]
    fn test_default_expand_all_reset() {
        let mut detail = tracker(false, true);
        detail.reset(3);
        assert_eq!(detail.open_rows(), [0, 1, 2]);

        detail.toggle(1);
        detail.reset(2);
        assert_eq!(detail.open_rows(), [0, 1]);
    }

    #[test]
    fn test_reset_clears_without_default() {
        let mut detail = tracker(false, false);
        detail.toggle(0);
        detail.reset(5);
        assert!(detail.open_rows().is_empty());
    }
}
