//! Copy-on-write expansion and lazy-load state.
//!
//! Every update produces a new state value, keeping the tree engine's
//! public operations referentially transparent. The sets are small (one
//! entry per open or loading node), so the clones stay cheap.

use std::collections::{BTreeSet, HashMap};

use crate::types::{NodeId, Row};

/// Expansion state of the hierarchy, plus the lazy-load bookkeeping.
///
/// Cleared when the tree feature is disabled or the dataset reference
/// changes; preserved across re-sorts of the same dataset.
#[derive(Debug, Clone, Default)]
pub struct TreeState {
    /// Node ids currently open
    pub expanded: BTreeSet<NodeId>,
    /// Node ids with an in-flight child load
    pub loading: BTreeSet<NodeId>,
    /// Lazily loaded children, by node id
    pub lazy_children: HashMap<NodeId, Vec<Row>>,
    /// Initial expansion has run for the current dataset
    pub initialized: bool,
    /// Bumped on every update; cache key for flatten passes
    pub revision: u64,
}

impl TreeState {
    /// Node is currently open.
    #[must_use]
    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.expanded.contains(id)
    }

    /// Node has an in-flight child load.
    #[must_use]
    pub fn is_loading(&self, id: &NodeId) -> bool {
        self.loading.contains(id)
    }

    /// Lazily loaded children of a node, if resolved.
    #[must_use]
    pub fn cached_children(&self, id: &NodeId) -> Option<&[Row]> {
        self.lazy_children.get(id).map(Vec::as_slice)
    }

    /// Open a node.
    #[must_use]
    pub fn with_expanded(&self, id: &NodeId) -> Self {
        let mut next = self.clone();
        next.expanded.insert(id.clone());
        next.revision += 1;
        next
    }

    /// Close a node.
    #[must_use]
    pub fn with_collapsed(&self, id: &NodeId) -> Self {
        let mut next = self.clone();
        next.expanded.remove(id);
        next.revision += 1;
        next
    }

    /// Close every node. Caches and in-flight loads survive.
    #[must_use]
    pub fn with_all_collapsed(&self) -> Self {
        let mut next = self.clone();
        next.expanded.clear();
        next.revision += 1;
        next
    }

    /// Mark a node's child load as in flight.
    #[must_use]
    pub fn with_loading(&self, id: &NodeId) -> Self {
        let mut next = self.clone();
        next.loading.insert(id.clone());
        next.revision += 1;
        next
    }

    /// Store resolved children and clear the loading mark.
    #[must_use]
    pub fn with_loaded_children(&self, id: &NodeId, children: Vec<Row>) -> Self {
        let mut next = self.clone();
        next.lazy_children.insert(id.clone(), children);
        next.loading.remove(id);
        next.revision += 1;
        next
    }

    /// Clear a failed load: the loading mark goes away, nothing is
    /// cached, and the node closes so the next toggle retries.
    #[must_use]
    pub fn with_load_failed(&self, id: &NodeId) -> Self {
        let mut next = self.clone();
        next.loading.remove(id);
        next.expanded.remove(id);
        next.revision += 1;
        next
    }
}
