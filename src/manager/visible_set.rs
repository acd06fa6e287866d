use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::atlas::StructureNode;

/// Structures shown (or shown before) since the last clear.
///
/// Add-only: hiding a structure keeps it here. Iteration follows insertion
/// order so snapshots and exploded-view passes are deterministic.
#[derive(Debug, Default)]
pub struct VisibleSet {
    nodes: Vec<Rc<StructureNode>>,
    ids: FxHashSet<i32>,
}

impl VisibleSet {
    /// Track `node`. Returns `false` if it was already tracked.
    pub fn insert(&mut self, node: &Rc<StructureNode>) -> bool {
        if !self.ids.insert(node.id()) {
            return false;
        }
        self.nodes.push(Rc::clone(node));
        true
    }

    /// Whether a structure is tracked.
    #[must_use]
    pub fn contains(&self, id: i32) -> bool {
        self.ids.contains(&id)
    }

    /// Tracked nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<StructureNode>> {
        self.nodes.iter()
    }

    /// Tracked IDs in insertion order.
    #[must_use]
    pub fn ids(&self) -> Vec<i32> {
        self.nodes.iter().map(|n| n.id()).collect()
    }

    /// Number of tracked structures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Stop tracking everything, returning the nodes that were tracked.
    pub fn clear(&mut self) -> Vec<Rc<StructureNode>> {
        self.ids.clear();
        std::mem::take(&mut self.nodes)
    }
}
