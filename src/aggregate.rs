//! The aggregation engine: fold weighted observations, answer count queries.
//!
//! An observation is a pair of a signed weight and a tree expression. Each
//! observation becomes a [`ZddNumber`] giving its weight to *every subtree*
//! of its trees; observations combine with the associative, commutative
//! [`add`]. A query then asks: what is the total weight of observations
//! whose subtree decomposition contains this tree? That is one negabinary
//! coefficient read from the accumulator.
//!
//! Everything here is stateless over `&ZddStore`; accumulators are plain
//! values sharing structure through the store, so a parallel fold can
//! [`merge`] partial accumulators in any order and arrive at the identical
//! result.
//!
//! # Example
//!
//! ```
//! use treecube::aggregate;
//! use treecube::store::ZddStore;
//! use treecube::tree::Tree;
//!
//! let store = ZddStore::new();
//! let acc = aggregate::sum_subtrees(
//!     &store,
//!     [
//!         (1, Tree::cross([Tree::path(["a", "b"]), Tree::path(["a", "c"])])),
//!         (1, Tree::cross([Tree::path(["a", "b"]), Tree::path(["a", "d"])])),
//!     ],
//! );
//!
//! let hits = aggregate::count_trees(&store, &Tree::path(["a", "b"]), &acc).unwrap();
//! assert_eq!(hits, 2);
//! ```

use crate::error::QueryError;
use crate::number::ZddNumber;
use crate::store::ZddStore;
use crate::tree::Tree;

/// Promotes one weighted observation: every subtree of `tree` gets
/// coefficient `weight`.
pub fn subtrees(store: &ZddStore, weight: i64, tree: &Tree) -> ZddNumber {
    ZddNumber::negabinary(weight, store.subtrees(tree))
}

/// Adds two accumulators. Associative and commutative;
/// [`ZddNumber::nil`] is the neutral element.
pub fn add(store: &ZddStore, a: &ZddNumber, b: &ZddNumber) -> ZddNumber {
    a.negabinary_add(store, b)
}

/// Subtracts one accumulator from another. `sub(z, z)` is nil, so an
/// observation is retracted by subtracting its own [`subtrees`] number.
pub fn sub(store: &ZddStore, a: &ZddNumber, b: &ZddNumber) -> ZddNumber {
    a.negabinary_sub(store, b)
}

/// Merges two partial accumulators — the reduce step of a parallel fold.
pub fn merge(store: &ZddStore, a: &ZddNumber, b: &ZddNumber) -> ZddNumber {
    add(store, a, b)
}

/// Folds one observation into an accumulator.
pub fn accumulate(store: &ZddStore, acc: &ZddNumber, weight: i64, tree: &Tree) -> ZddNumber {
    add(store, acc, &subtrees(store, weight, tree))
}

/// Total weight of observations whose subtrees contain `query`.
///
/// `query` must denote exactly one tree (e.g. a `path` or a `cross` of
/// paths); anything else has no single coefficient to read and is rejected.
pub fn count_trees(store: &ZddStore, query: &Tree, acc: &ZddNumber) -> Result<i64, QueryError> {
    let q = store.trees(query);
    let sets = store.count(q);
    if sets != 1 {
        return Err(QueryError::NonSingletonQuery { sets });
    }
    Ok(acc.negabinary_coefficient(store, q))
}

/// Folds a whole observation sequence into one accumulator.
pub fn sum_subtrees(
    store: &ZddStore,
    observations: impl IntoIterator<Item = (i64, Tree)>,
) -> ZddNumber {
    let mut acc = ZddNumber::nil();
    for (weight, tree) in observations {
        acc = accumulate(store, &acc, weight, &tree);
    }
    acc
}
