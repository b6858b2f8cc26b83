use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::reference::ZddId;
use crate::types::Var;

/// A ZDD node representing a decision point in the diagram.
///
/// # Fields
///
/// - `var`: Variable (element) at this decision point
/// - `lo`: Low child — sets NOT containing this variable
/// - `hi`: High child — sets containing this variable (with it removed)
///
/// # Invariants
///
/// - **Zero-suppression**: `hi` is never `ZddId::ZERO`; such nodes are
///   replaced by `lo` at construction.
/// - **Ordering**: `var` is strictly below the variable of any internal
///   child in the numeric `u64` order.
///
/// # Semantics
///
/// ```text
/// F(node) = F(lo) ∪ {S ∪ {var} | S ∈ F(hi)}
/// ```
///
/// The hash of `(var, lo, hi)` is precomputed at construction so unique
/// table lookups never rehash the children.
#[derive(Debug, Copy, Clone)]
pub struct ZddNode {
    /// Decision variable (element that may or may not be in the set).
    pub var: Var,
    /// Low child: sets NOT containing var.
    pub lo: ZddId,
    /// High child: sets containing var (never ZERO).
    pub hi: ZddId,
    /// Precomputed hash for unique table lookup.
    hash: u64,
}

impl Default for ZddNode {
    fn default() -> Self {
        Self {
            var: Var::ZERO,
            lo: ZddId::INVALID,
            hi: ZddId::INVALID,
            hash: 0,
        }
    }
}

impl ZddNode {
    /// Creates a new ZDD node.
    ///
    /// # Panics
    ///
    /// Debug-panics if `hi == ZddId::ZERO` (violates zero-suppression).
    pub fn new(var: Var, lo: ZddId, hi: ZddId) -> Self {
        debug_assert!(!hi.is_zero(), "ZDD node cannot have hi=ZERO (zero-suppression rule)");
        let hash = Self::compute_hash(var, lo, hi);
        Self { var, lo, hi, hash }
    }

    /// Computes the hash of `(var, lo, hi)`.
    fn compute_hash(var: Var, lo: ZddId, hi: ZddId) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write_u64(var.id());
        hasher.write_u32(lo.raw());
        hasher.write_u32(hi.raw());
        hasher.finish()
    }

    /// Returns the precomputed hash.
    pub fn precomputed_hash(&self) -> u64 {
        self.hash
    }
}

impl Hash for ZddNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl PartialEq for ZddNode {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.var == other.var && self.lo == other.lo && self.hi == other.hi
    }
}

impl Eq for ZddNode {}
