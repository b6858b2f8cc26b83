//! The symbolic tree algebra and its compilation into set families.
//!
//! A [`Tree`] expression denotes a set of labeled, unordered, rooted trees:
//!
//! - [`Tree::top`] — the set containing only the empty tree
//! - [`Tree::bot`] — the empty set of trees
//! - [`Tree::prefix`] — hang every tree of the argument below one labeled edge
//! - [`Tree::path`] — a chain of prefixes over `top`
//! - [`Tree::cross`] — pointwise union of trees (one tree per combination)
//! - [`Tree::sum`] — union of tree sets (alternatives)
//!
//! Compilation names every labeled position with an [interned
//! variable][crate::intern] and produces two families per expression: the
//! full trees ([`ZddStore::trees`]) and every subtree of every tree,
//! empty tree included ([`ZddStore::subtrees`]). Because variables encode
//! the whole path from the root, equal labeled trees compile to equal
//! variable sets, and the store's canonicity turns the algebraic laws
//! (commutativity, associativity, distribution of `cross` over `sum`, …)
//! into handle equality.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::intern;
use crate::reference::ZddId;
use crate::store::ZddStore;

/// An edge label: an opaque byte sequence (UTF-8 recommended).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(Arc<[u8]>);

impl Label {
    /// The raw label bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label(s.as_bytes().into())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label(s.into_bytes().into())
    }
}

impl From<&[u8]> for Label {
    fn from(bytes: &[u8]) -> Self {
        Label(bytes.into())
    }
}

impl From<Vec<u8>> for Label {
    fn from(bytes: Vec<u8>) -> Self {
        Label(bytes.into())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum TreeKind {
    Top,
    Bot,
    Prefix(Label, Tree),
    Cross(Vec<Tree>),
    Sum(Vec<Tree>),
}

/// A symbolic tree expression.
///
/// Cheap to clone: expressions share structure through `Arc`, and the
/// compiler memoizes on that shared identity.
///
/// # Example
///
/// ```
/// use treecube::tree::Tree;
///
/// // One observation: a page hit carrying a demographic dimension.
/// let hit = Tree::cross([
///     Tree::path(["www.company.com", "page1"]),
///     Tree::path(["gender", "female"]),
/// ]);
/// # let _ = hit;
/// ```
#[derive(Debug, Clone)]
pub struct Tree(Arc<TreeKind>);

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl Eq for Tree {}

impl Tree {
    /// The set containing only the empty tree.
    pub fn top() -> Tree {
        Tree(Arc::new(TreeKind::Top))
    }

    /// The empty set of trees.
    pub fn bot() -> Tree {
        Tree(Arc::new(TreeKind::Bot))
    }

    /// Every tree of `child`, hung below a single edge labeled `label`.
    pub fn prefix(label: impl Into<Label>, child: Tree) -> Tree {
        Tree(Arc::new(TreeKind::Prefix(label.into(), child)))
    }

    /// A single chain of labels: `path([a, b, c])` is
    /// `prefix(a, prefix(b, prefix(c, top)))`.
    pub fn path<L: Into<Label>>(labels: impl IntoIterator<Item = L>) -> Tree {
        let labels: Vec<Label> = labels.into_iter().map(Into::into).collect();
        let mut tree = Tree::top();
        for label in labels.into_iter().rev() {
            tree = Tree::prefix(label, tree);
        }
        tree
    }

    /// Pointwise union of trees: one combined tree per choice of one tree
    /// from each part. The empty product is [`Tree::top`].
    pub fn cross(parts: impl IntoIterator<Item = Tree>) -> Tree {
        Tree(Arc::new(TreeKind::Cross(parts.into_iter().collect())))
    }

    /// Union of tree sets: the trees of any part. The empty sum is
    /// [`Tree::bot`].
    pub fn sum(parts: impl IntoIterator<Item = Tree>) -> Tree {
        Tree(Arc::new(TreeKind::Sum(parts.into_iter().collect())))
    }

    fn key(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

/// One evaluation pass: memoizes per `(expression identity, parent)` so a
/// shared subexpression compiles once per position. Across passes the
/// store's own caches take over, since variables are pure hashes.
struct Compiler<'a> {
    store: &'a ZddStore,
    trees_memo: FxHashMap<(usize, u64), ZddId>,
    subtrees_memo: FxHashMap<(usize, u64), ZddId>,
}

impl<'a> Compiler<'a> {
    fn new(store: &'a ZddStore) -> Self {
        Self {
            store,
            trees_memo: FxHashMap::default(),
            subtrees_memo: FxHashMap::default(),
        }
    }

    fn trees(&mut self, tree: &Tree, parent: u64) -> ZddId {
        let key = (tree.key(), parent);
        if let Some(&result) = self.trees_memo.get(&key) {
            return result;
        }

        let result = match &*tree.0 {
            TreeKind::Top => ZddId::ONE,
            TreeKind::Bot => ZddId::ZERO,
            TreeKind::Prefix(label, child) => {
                let var = intern::edge_var(parent, label.as_bytes());
                let inner = self.trees(child, var.id());
                // cross_union, not a raw node: the hashed child variables
                // need not sort above `var`.
                self.store.cross_union(self.store.base(var), inner)
            }
            TreeKind::Cross(parts) => {
                let mut acc = ZddId::ONE;
                for part in parts {
                    let compiled = self.trees(part, parent);
                    acc = self.store.cross_union(acc, compiled);
                }
                acc
            }
            TreeKind::Sum(parts) => {
                let mut acc = ZddId::ZERO;
                for part in parts {
                    let compiled = self.trees(part, parent);
                    acc = self.store.union(acc, compiled);
                }
                acc
            }
        };

        self.trees_memo.insert(key, result);
        result
    }

    fn subtrees(&mut self, tree: &Tree, parent: u64) -> ZddId {
        let key = (tree.key(), parent);
        if let Some(&result) = self.subtrees_memo.get(&key) {
            return result;
        }

        let result = match &*tree.0 {
            // The empty tree is a subtree of everything, including the
            // absence of trees.
            TreeKind::Top => ZddId::ONE,
            TreeKind::Bot => ZddId::ONE,
            TreeKind::Prefix(label, child) => {
                let var = intern::edge_var(parent, label.as_bytes());
                let inner = self.subtrees(child, var.id());
                let below = self.store.cross_union(self.store.base(var), inner);
                self.store.union(ZddId::ONE, below)
            }
            TreeKind::Cross(parts) => {
                let mut acc = ZddId::ONE;
                for part in parts {
                    let compiled = self.subtrees(part, parent);
                    acc = self.store.cross_union(acc, compiled);
                }
                acc
            }
            TreeKind::Sum(parts) => {
                let mut acc = ZddId::ZERO;
                for part in parts {
                    let compiled = self.subtrees(part, parent);
                    acc = self.store.union(acc, compiled);
                }
                self.store.union(acc, ZddId::ONE)
            }
        };

        self.subtrees_memo.insert(key, result);
        result
    }
}

impl ZddStore {
    /// Compiles a tree expression into the family of variable sets naming
    /// its full trees.
    pub fn trees(&self, tree: &Tree) -> ZddId {
        Compiler::new(self).trees(tree, intern::ROOT)
    }

    /// Compiles a tree expression into the family of variable sets naming
    /// every subtree (empty tree included) of its trees.
    pub fn subtrees(&self, tree: &Tree) -> ZddId {
        Compiler::new(self).subtrees(tree, intern::ROOT)
    }
}
