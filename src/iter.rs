//! Iterator for enumerating sets in a family.

use crate::reference::ZddId;
use crate::store::ZddStore;
use crate::types::Var;

/// Iterator that yields all variable sets in a family.
///
/// Enumeration can visit O(2ⁿ) sets for a diagram of n nodes; this is a
/// debugging and testing aid, not a query path.
pub struct SetIterator<'a> {
    store: &'a ZddStore,
    /// Stack of (node, set built so far, lo branch already explored).
    stack: Vec<(ZddId, Vec<Var>, bool)>,
}

impl<'a> SetIterator<'a> {
    /// Creates a new iterator over the sets of `root`.
    pub fn new(store: &'a ZddStore, root: ZddId) -> Self {
        let mut iter = Self { store, stack: Vec::new() };
        if !root.is_zero() {
            iter.stack.push((root, Vec::new(), false));
        }
        iter
    }
}

impl<'a> Iterator for SetIterator<'a> {
    type Item = Vec<Var>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, current_set, visited_lo)) = self.stack.pop() {
            if id.is_zero() {
                continue;
            }

            if id.is_one() {
                return Some(current_set);
            }

            let node = self.store.node(id);

            if !visited_lo {
                // First visit: revisit for hi later, explore lo now.
                self.stack.push((id, current_set.clone(), true));
                self.stack.push((node.lo, current_set, false));
            } else {
                let mut hi_set = current_set;
                hi_set.push(node.var);
                self.stack.push((node.hi, hi_set, false));
            }
        }
        None
    }
}

impl ZddStore {
    /// Returns an iterator over all sets in the family.
    pub fn iter_sets(&self, f: ZddId) -> SetIterator<'_> {
        SetIterator::new(self, f)
    }

    /// Collects all sets into a vector of vectors.
    pub fn collect_sets(&self, f: ZddId) -> Vec<Vec<Var>> {
        self.iter_sets(f).collect()
    }

    /// Returns one arbitrary set from the family, if non-empty.
    pub fn pick_one(&self, f: ZddId) -> Option<Vec<Var>> {
        if f.is_zero() {
            return None;
        }

        let mut result = Vec::new();
        let mut current = f;
        while !current.is_terminal() {
            let node = self.node(current);
            result.push(node.var);
            current = node.hi;
        }
        Some(result)
    }
}
