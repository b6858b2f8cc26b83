//! Unique table for ZDD canonicalization.
//!
//! The unique table ensures that each `(var, lo, hi)` triple maps to exactly
//! one node, enabling maximal structure sharing and constant-time equality.

use rustc_hash::FxHashMap;

use crate::node::ZddNode;
use crate::reference::ZddId;
use crate::types::Var;

/// Append-only node storage with a hash index.
///
/// Guarantees:
/// 1. Canonicity: identical `(var, lo, hi)` → same node ID
/// 2. Insert-once: a triple is stored exactly once, no matter how often
///    (or from how many threads, via the store's write path) it is built
/// 3. Stability: node IDs are never reused, so every handle and every memo
///    cache entry stays valid for the lifetime of the table
///
/// Index 0 holds the ⊥ terminal and index 1 the ⊤ terminal; decision nodes
/// start at index 2. Zero-suppression is applied by the store *before*
/// reaching the table.
pub struct UniqueTable {
    /// Storage for all nodes. Slots 0 and 1 are terminal placeholders.
    nodes: Vec<ZddNode>,
    /// Index: node → id for O(1) lookup.
    index: FxHashMap<ZddNode, u32>,
}

impl UniqueTable {
    /// Creates a new table holding only the two terminals.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Creates a table with preallocated node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(2));
        // Terminal placeholders: ⊥ at 0, ⊤ at 1.
        nodes.push(ZddNode::default());
        nodes.push(ZddNode::default());
        Self {
            nodes,
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Looks up the node for a triple, if it exists.
    pub fn find(&self, var: Var, lo: ZddId, hi: ZddId) -> Option<ZddId> {
        let node = ZddNode::new(var, lo, hi);
        self.index.get(&node).map(|&id| ZddId::new(id))
    }

    /// Inserts a triple, returning the canonical handle.
    ///
    /// Re-checks the index first so that two racing creators of the same
    /// triple (serialized by the store's write lock) observe one node.
    pub fn insert(&mut self, var: Var, lo: ZddId, hi: ZddId) -> ZddId {
        let node = ZddNode::new(var, lo, hi);
        if let Some(&id) = self.index.get(&node) {
            return ZddId::new(id);
        }
        let id = self.nodes.len() as u32;
        assert!(id != u32::MAX, "unique table is full");
        self.nodes.push(node);
        self.index.insert(node, id);
        ZddId::new(id)
    }

    /// Returns the node stored at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds; terminal slots hold placeholders.
    #[inline]
    pub fn node(&self, id: ZddId) -> ZddNode {
        self.nodes[id.index()]
    }

    /// Total number of slots, terminals included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the table holds only the terminals.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 2
    }

    /// Iterates over the decision nodes with their handles.
    pub fn iter_nodes(&self) -> impl Iterator<Item = (ZddId, &ZddNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .skip(2)
            .map(|(i, node)| (ZddId::new(i as u32), node))
    }
}

impl Default for UniqueTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_once() {
        let mut table = UniqueTable::new();

        let r1 = table.insert(Var::new(1), ZddId::ZERO, ZddId::ONE);
        assert!(!r1.is_terminal());
        assert_eq!(table.len(), 3);

        // Same triple returns the same node.
        let r2 = table.insert(Var::new(1), ZddId::ZERO, ZddId::ONE);
        assert_eq!(r1, r2);
        assert_eq!(table.len(), 3);

        // Different triple creates a new node.
        let r3 = table.insert(Var::new(2), ZddId::ZERO, ZddId::ONE);
        assert_ne!(r1, r3);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_find() {
        let mut table = UniqueTable::new();
        assert_eq!(table.find(Var::new(5), ZddId::ZERO, ZddId::ONE), None);

        let r = table.insert(Var::new(5), ZddId::ZERO, ZddId::ONE);
        assert_eq!(table.find(Var::new(5), ZddId::ZERO, ZddId::ONE), Some(r));
    }

    #[test]
    fn test_node_roundtrip() {
        let mut table = UniqueTable::new();
        let r = table.insert(Var::new(5), ZddId::ZERO, ZddId::ONE);

        let node = table.node(r);
        assert_eq!(node.var, Var::new(5));
        assert_eq!(node.lo, ZddId::ZERO);
        assert_eq!(node.hi, ZddId::ONE);
    }

    #[test]
    fn test_canonicity() {
        let mut table = UniqueTable::new();

        let n1 = table.insert(Var::new(1), ZddId::ZERO, ZddId::ONE);
        let n2 = table.insert(Var::new(2), n1, ZddId::ONE);
        let n3 = table.insert(Var::new(3), n2, n1);

        // Same structure built again yields identical handles.
        let m1 = table.insert(Var::new(1), ZddId::ZERO, ZddId::ONE);
        let m2 = table.insert(Var::new(2), m1, ZddId::ONE);
        let m3 = table.insert(Var::new(3), m2, m1);

        assert_eq!(n1, m1);
        assert_eq!(n2, m2);
        assert_eq!(n3, m3);
    }
}
