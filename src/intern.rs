//! Label interner: naming tree positions with 64-bit variables.
//!
//! Every edge of an observation tree is named by a variable derived from
//! the hash of `(parent variable, label bytes)`. Two trees share a variable
//! exactly when they share a labeled position below the same path from the
//! root, so equal labeled trees always compile to equal variable sets
//! regardless of construction order, thread, or call site.
//!
//! There is no interner table: the function is pure, which is what lets
//! concurrent compilations agree on names with no coordination. Collisions
//! are negligible at 64 bits.

use std::hash::Hasher;

use rustc_hash::FxHasher;

use crate::types::Var;

/// Parent value for edges hanging off the root.
pub const ROOT: u64 = 0;

/// Derives the variable for the edge labeled `label` below `parent`.
///
/// `parent` is [`ROOT`] for root edges, otherwise the `id()` of the parent
/// edge's variable. The reserved value 0 is remapped so it never escapes.
///
/// # Example
///
/// ```
/// use treecube::intern::{edge_var, ROOT};
///
/// let a = edge_var(ROOT, "a");
/// let ab = edge_var(a.id(), "b");
///
/// // Pure: same inputs, same variable.
/// assert_eq!(a, edge_var(ROOT, "a"));
/// // Position-sensitive: "b" under "a" is not "b" under the root.
/// assert_ne!(ab, edge_var(ROOT, "b"));
/// ```
pub fn edge_var(parent: u64, label: impl AsRef<[u8]>) -> Var {
    let mut hasher = FxHasher::default();
    hasher.write_u64(parent);
    hasher.write(label.as_ref());
    let raw = hasher.finish();
    if raw == 0 {
        Var::new(u64::MAX)
    } else {
        Var::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let v1 = edge_var(ROOT, "clicks");
        let v2 = edge_var(ROOT, "clicks");
        assert_eq!(v1, v2);
    }

    #[test]
    fn test_labels_distinct() {
        assert_ne!(edge_var(ROOT, "a"), edge_var(ROOT, "b"));
    }

    #[test]
    fn test_parent_sensitive() {
        let a = edge_var(ROOT, "a");
        let b = edge_var(ROOT, "b");
        assert_ne!(edge_var(a.id(), "c"), edge_var(b.id(), "c"));
    }

    #[test]
    fn test_never_zero() {
        // Not a proof, but the remap path is the only way to get ZERO out.
        for label in ["", "a", "b", "0", "\0"] {
            assert!(!edge_var(ROOT, label).is_zero());
        }
    }
}
