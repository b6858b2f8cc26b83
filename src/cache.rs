//! Memo keys for ZDD operations.
//!
//! Results of the binary set operations are cached in the store, keyed on
//! the operand handles. Commutative operations normalize operand order so
//! `op(f, g)` and `op(g, f)` share one entry.

use crate::reference::ZddId;

/// Cache key for binary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub op: OpType,
    pub f: ZddId,
    pub g: ZddId,
}

/// Operation types for caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpType {
    Union,
    Intersection,
    Difference,
    CrossUnion,
    CrossIntersection,
    CrossDifference,
}

impl CacheKey {
    /// Create a key for a commutative operation, normalizing operand order.
    pub fn commutative(op: OpType, f: ZddId, g: ZddId) -> Self {
        let (f, g) = if f.raw() <= g.raw() { (f, g) } else { (g, f) };
        Self { op, f, g }
    }

    /// Create a key for a non-commutative operation.
    pub fn non_commutative(op: OpType, f: ZddId, g: ZddId) -> Self {
        Self { op, f, g }
    }
}
