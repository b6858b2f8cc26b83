//! # treecube: multi-dimensional aggregate counts over labeled trees
//!
//! **`treecube`** computes aggregate counts over hierarchically structured
//! observations. Each observation is a weighted set of labeled trees (a URL
//! path crossed with a demographic path crossed with a time path, say); the
//! crate answers, for any query tree, the total weight of observations
//! whose subtree decomposition contains it — the full hierarchical cube,
//! without materializing it.
//!
//! The representation that makes this tractable is the **Zero-suppressed
//! Decision Diagram (ZDD)**: a canonical, hash-consed DAG encoding a family
//! of sets. Observation trees become variable sets, their subtree
//! decompositions become ZDDs, and weighted multisets of them become
//! ZDD-numbers — positional numbers whose digits are ZDDs, in base 2 for
//! nonnegative counts or base −2 for signed ones. Combinatorial sharing
//! keeps everything compact where the explicit cube would be exponential.
//!
//! ## Key Features
//!
//! - **Store-Centric Architecture**: all operations go through the
//!   [`ZddStore`][crate::store::ZddStore], which hash-conses nodes and
//!   memoizes operations; handle equality is semantic equality.
//! - **Thread-Safe**: the store takes `&self` everywhere; parallel folds
//!   reduce with an associative, commutative merge and agree bit-for-bit.
//! - **Signed Weights**: base −2 arithmetic gives addition and subtraction
//!   one uniform digit recurrence, with no sign bit.
//! - **Deterministic Naming**: tree positions are named by pure hashing, so
//!   equal labeled trees compile identically from any thread.
//!
//! ## Quick Start
//!
//! ```rust
//! use treecube::aggregate;
//! use treecube::store::ZddStore;
//! use treecube::tree::Tree;
//!
//! let store = ZddStore::new();
//!
//! // Two click events: page1 and page2, both by a female visitor.
//! let acc = aggregate::sum_subtrees(
//!     &store,
//!     [
//!         (1, Tree::cross([
//!             Tree::path(["www.company.com", "page1"]),
//!             Tree::path(["gender", "female"]),
//!         ])),
//!         (1, Tree::cross([
//!             Tree::path(["www.company.com", "page2"]),
//!             Tree::path(["gender", "female"]),
//!         ])),
//!     ],
//! );
//!
//! // Slice the cube along any dimension, or combinations of them.
//! let q = |t| aggregate::count_trees(&store, &t, &acc).unwrap();
//! assert_eq!(q(Tree::path(["www.company.com"])), 2);
//! assert_eq!(q(Tree::path(["www.company.com", "page1"])), 1);
//! assert_eq!(q(Tree::cross([
//!     Tree::path(["www.company.com", "page2"]),
//!     Tree::path(["gender", "female"]),
//! ])), 1);
//! ```
//!
//! ## Core Components
//!
//! - **[`store`]**: the hash-consed ZDD store and its set operations
//!   (union, intersection, difference, and the cross-product family).
//! - **[`number`]**: ZDD-numbers — integer-weighted multisets of sets with
//!   binary and negabinary ripple-carry arithmetic.
//! - **[`tree`]**: the symbolic tree algebra and its compilation into
//!   `trees` / `subtrees` families.
//! - **[`aggregate`]**: folding weighted observations and answering count
//!   queries.
//! - **[`intern`]**: pure hashing of labeled positions to variables.

pub mod aggregate;
pub mod cache;
pub mod debug;
pub mod dot;
pub mod error;
pub mod intern;
pub mod iter;
pub mod node;
pub mod number;
pub mod reference;
pub mod store;
pub mod table;
pub mod tree;
pub mod types;

pub use crate::error::QueryError;
pub use crate::number::ZddNumber;
pub use crate::reference::ZddId;
pub use crate::store::ZddStore;
pub use crate::tree::{Label, Tree};
pub use crate::types::Var;
