//! The ZDD store: hash-consed nodes and the memoized set operations.
//!
//! # Overview
//!
//! All diagrams live in one [`ZddStore`]. The store owns the unique table
//! and the operation caches; every operation goes through it, which is what
//! maintains the canonical form invariant and makes handle equality mean
//! semantic equality.
//!
//! The store is thread-safe: every method takes `&self`, and callers may
//! drive it from many threads at once. Racing creations of the same
//! `(var, lo, hi)` triple produce one node and hand the same `ZddId` to
//! both callers.
//!
//! # Quick Start
//!
//! ```
//! use treecube::store::ZddStore;
//! use treecube::types::Var;
//!
//! let store = ZddStore::new();
//!
//! let s1 = store.base(Var::new(1)); // {{1}}
//! let s2 = store.base(Var::new(2)); // {{2}}
//!
//! let union = store.union(s1, s2);       // {{1}, {2}}
//! let joined = store.cross_union(s1, s2); // {{1, 2}}
//!
//! assert_eq!(store.count(union), 2);
//! assert_eq!(store.count(joined), 1);
//! ```

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;
use rustc_hash::FxHashMap;

use crate::cache::{CacheKey, OpType};
use crate::node::ZddNode;
use crate::reference::ZddId;
use crate::table::UniqueTable;
use crate::types::Var;

/// The ZDD store: owns all nodes and performs all operations.
///
/// # Design
///
/// - **Uniqueness**: identical nodes are shared (hash consing)
/// - **Zero-suppression**: nodes with `hi = ⊥` are never materialized
/// - **Canonicity**: each family has exactly one representation, so
///   `ZddId` equality decides family equality
/// - **Monotone state**: nodes and memo entries are only ever added, never
///   invalidated; ids stay valid for the lifetime of the store
///
/// # Concurrency
///
/// The unique table and the memo caches sit behind [`RwLock`]s. No lock is
/// held across a recursive call: reads take the read guard briefly, and the
/// insert path re-checks under the write guard, so two racing inserts of
/// one triple observe a single node. Memo inserts may race; that is
/// harmless because the value for a key is canonical.
pub struct ZddStore {
    /// Node storage and the `(var, lo, hi)` index.
    table: RwLock<UniqueTable>,

    /// Memo for the binary set operations.
    op_cache: RwLock<FxHashMap<CacheKey, ZddId>>,

    /// Memo for the inclusion predicate.
    subset_cache: RwLock<FxHashMap<(ZddId, ZddId), bool>>,

    /// Memo for set counting.
    count_cache: RwLock<FxHashMap<ZddId, u64>>,
}

impl Default for ZddStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ZddStore {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Creates a new store.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Creates a store with the given initial node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: RwLock::new(UniqueTable::with_capacity(capacity)),
            op_cache: RwLock::new(FxHashMap::default()),
            subset_cache: RwLock::new(FxHashMap::default()),
            count_cache: RwLock::new(FxHashMap::default()),
        }
    }

    // ========================================================================
    // Lock plumbing
    // ========================================================================

    // A poisoned lock only means a panic elsewhere; the state itself is
    // monotone and usable, so guards absorb poisoning.

    fn table_read(&self) -> RwLockReadGuard<'_, UniqueTable> {
        self.table.read().unwrap_or_else(|e| e.into_inner())
    }

    fn table_write(&self) -> RwLockWriteGuard<'_, UniqueTable> {
        self.table.write().unwrap_or_else(|e| e.into_inner())
    }

    fn op_cached(&self, key: &CacheKey) -> Option<ZddId> {
        self.op_cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .copied()
    }

    fn op_remember(&self, key: CacheKey, value: ZddId) -> ZddId {
        self.op_cache
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, value);
        value
    }

    // ========================================================================
    // Terminals and node access
    // ========================================================================

    /// Returns the empty family (⊥): contains no sets.
    #[inline(always)]
    pub fn zero(&self) -> ZddId {
        ZddId::ZERO
    }

    /// Returns the family containing only the empty set (⊤): {∅}.
    #[inline(always)]
    pub fn one(&self) -> ZddId {
        ZddId::ONE
    }

    /// Returns true if this is the empty family.
    #[inline(always)]
    pub fn is_zero(&self, f: ZddId) -> bool {
        f.is_zero()
    }

    /// Returns true if this is the {∅} family.
    #[inline(always)]
    pub fn is_one(&self, f: ZddId) -> bool {
        f.is_one()
    }

    /// Returns true if this is a terminal.
    #[inline(always)]
    pub fn is_terminal(&self, f: ZddId) -> bool {
        f.is_terminal()
    }

    /// Returns the node behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` is a terminal or out of bounds.
    pub fn node(&self, id: ZddId) -> ZddNode {
        debug_assert!(!id.is_terminal(), "terminals have no node data");
        self.table_read().node(id)
    }

    /// Total number of table slots, terminals included.
    pub fn num_nodes(&self) -> usize {
        self.table_read().len()
    }

    // ========================================================================
    // Canonical constructor
    // ========================================================================

    /// Creates or retrieves the node `(var, lo, hi)`.
    ///
    /// This is the only way nodes come into existence. It enforces the
    /// zero-suppression rule (`hi = ⊥` returns `lo`) and, in debug builds,
    /// the variable ordering invariant; calling it with children whose top
    /// variables are not above `var` is a programming error.
    pub fn get_node(&self, var: Var, lo: ZddId, hi: ZddId) -> ZddId {
        debug_assert!(!var.is_zero(), "variable 0 is reserved");

        // Zero-suppression rule: if hi = ⊥, return lo.
        if hi.is_zero() {
            return lo;
        }

        #[cfg(debug_assertions)]
        {
            if !lo.is_terminal() {
                debug_assert!(var < self.node(lo).var, "ordering violated on lo child");
            }
            if !hi.is_terminal() {
                debug_assert!(var < self.node(hi).var, "ordering violated on hi child");
            }
        }

        {
            let table = self.table_read();
            if let Some(id) = table.find(var, lo, hi) {
                return id;
            }
        }

        // Double-checked under the write guard: racing creators of the
        // same triple observe one node.
        self.table_write().insert(var, lo, hi)
    }

    // ========================================================================
    // Primitive constructors
    // ========================================================================

    /// Creates a base family: `{{var}}`.
    pub fn base(&self, var: Var) -> ZddId {
        self.get_node(var, ZddId::ZERO, ZddId::ONE)
    }

    /// Creates a singleton family `{{v1, …, vn}}` from arbitrary variables.
    ///
    /// Duplicates are collapsed; the chain is built bottom-up in descending
    /// variable order.
    pub fn singleton(&self, vars: impl IntoIterator<Item = Var>) -> ZddId {
        let mut vars: Vec<Var> = vars.into_iter().collect();
        vars.sort_unstable();
        vars.dedup();

        let mut result = ZddId::ONE;
        for &var in vars.iter().rev() {
            result = self.get_node(var, ZddId::ZERO, result);
        }
        result
    }

    // ========================================================================
    // Set-theoretic operations
    // ========================================================================

    /// Union: `F ∪ G` — sets in either family.
    pub fn union(&self, f: ZddId, g: ZddId) -> ZddId {
        debug!("union({}, {})", f, g);

        if f.is_zero() {
            return g;
        }
        if g.is_zero() || f == g {
            return f;
        }

        let key = CacheKey::commutative(OpType::Union, f, g);
        if let Some(result) = self.op_cached(&key) {
            return result;
        }

        let result = if f.is_one() {
            // Insert ∅ into g.
            let g_node = self.node(g);
            let lo = self.union(ZddId::ONE, g_node.lo);
            self.get_node(g_node.var, lo, g_node.hi)
        } else if g.is_one() {
            let f_node = self.node(f);
            let lo = self.union(f_node.lo, ZddId::ONE);
            self.get_node(f_node.var, lo, f_node.hi)
        } else {
            let f_node = self.node(f);
            let g_node = self.node(g);

            if f_node.var < g_node.var {
                let lo = self.union(f_node.lo, g);
                self.get_node(f_node.var, lo, f_node.hi)
            } else if f_node.var > g_node.var {
                let lo = self.union(f, g_node.lo);
                self.get_node(g_node.var, lo, g_node.hi)
            } else {
                let lo = self.union(f_node.lo, g_node.lo);
                let hi = self.union(f_node.hi, g_node.hi);
                self.get_node(f_node.var, lo, hi)
            }
        };

        self.op_remember(key, result)
    }

    /// Intersection: `F ∩ G` — sets in both families.
    pub fn intersection(&self, f: ZddId, g: ZddId) -> ZddId {
        debug!("intersection({}, {})", f, g);

        if f.is_zero() || g.is_zero() {
            return ZddId::ZERO;
        }
        if f == g {
            return f;
        }

        let key = CacheKey::commutative(OpType::Intersection, f, g);
        if let Some(result) = self.op_cached(&key) {
            return result;
        }

        let result = if f.is_one() {
            // {∅} ∩ G keeps ∅ iff G contains it.
            if self.contains_empty(g) {
                ZddId::ONE
            } else {
                ZddId::ZERO
            }
        } else if g.is_one() {
            if self.contains_empty(f) {
                ZddId::ONE
            } else {
                ZddId::ZERO
            }
        } else {
            let f_node = self.node(f);
            let g_node = self.node(g);

            if f_node.var < g_node.var {
                // g has no set containing f's top variable.
                self.intersection(f_node.lo, g)
            } else if f_node.var > g_node.var {
                self.intersection(f, g_node.lo)
            } else {
                let lo = self.intersection(f_node.lo, g_node.lo);
                let hi = self.intersection(f_node.hi, g_node.hi);
                self.get_node(f_node.var, lo, hi)
            }
        };

        self.op_remember(key, result)
    }

    /// Difference: `F ∖ G` — sets in F but not in G.
    pub fn difference(&self, f: ZddId, g: ZddId) -> ZddId {
        debug!("difference({}, {})", f, g);

        if f.is_zero() || f == g {
            return ZddId::ZERO;
        }
        if g.is_zero() {
            return f;
        }

        let key = CacheKey::non_commutative(OpType::Difference, f, g);
        if let Some(result) = self.op_cached(&key) {
            return result;
        }

        let result = if f.is_one() {
            if self.contains_empty(g) {
                ZddId::ZERO
            } else {
                ZddId::ONE
            }
        } else if g.is_one() {
            // Remove ∅ from f.
            let f_node = self.node(f);
            let lo = self.difference(f_node.lo, ZddId::ONE);
            self.get_node(f_node.var, lo, f_node.hi)
        } else {
            let f_node = self.node(f);
            let g_node = self.node(g);

            if f_node.var < g_node.var {
                let lo = self.difference(f_node.lo, g);
                self.get_node(f_node.var, lo, f_node.hi)
            } else if f_node.var > g_node.var {
                self.difference(f, g_node.lo)
            } else {
                let lo = self.difference(f_node.lo, g_node.lo);
                let hi = self.difference(f_node.hi, g_node.hi);
                self.get_node(f_node.var, lo, hi)
            }
        };

        self.op_remember(key, result)
    }

    /// Symmetric difference: `F △ G` — sets in exactly one of F or G.
    pub fn symmetric_difference(&self, f: ZddId, g: ZddId) -> ZddId {
        // F △ G = (F ∪ G) ∖ (F ∩ G)
        let union = self.union(f, g);
        let inter = self.intersection(f, g);
        self.difference(union, inter)
    }

    // ========================================================================
    // Cross-product operations
    // ========================================================================

    /// Cross-union: `{S ∪ T | S ∈ F, T ∈ G}`.
    ///
    /// The pointwise union over the Cartesian product of the two families.
    /// `cross_union(F, ⊤) = F` and `cross_union(F, ⊥) = ⊥`.
    pub fn cross_union(&self, f: ZddId, g: ZddId) -> ZddId {
        debug!("cross_union({}, {})", f, g);

        if f.is_zero() || g.is_zero() {
            return ZddId::ZERO;
        }
        if f.is_one() {
            return g; // {∅} ⊗ G = G
        }
        if g.is_one() {
            return f;
        }

        let key = CacheKey::commutative(OpType::CrossUnion, f, g);
        if let Some(result) = self.op_cached(&key) {
            return result;
        }

        let f_node = self.node(f);
        let g_node = self.node(g);

        let result = if f_node.var < g_node.var {
            // f's top variable is absent from g: it survives in every pair
            // exactly when the f-side set had it.
            let lo = self.cross_union(f_node.lo, g);
            let hi = self.cross_union(f_node.hi, g);
            self.get_node(f_node.var, lo, hi)
        } else if f_node.var > g_node.var {
            let lo = self.cross_union(f, g_node.lo);
            let hi = self.cross_union(f, g_node.hi);
            self.get_node(g_node.var, lo, hi)
        } else {
            // Pairs keep the variable when at least one side has it.
            let lo_lo = self.cross_union(f_node.lo, g_node.lo);
            let hi_lo = self.cross_union(f_node.hi, g_node.lo);
            let lo_hi = self.cross_union(f_node.lo, g_node.hi);
            let hi_hi = self.cross_union(f_node.hi, g_node.hi);

            let hi = self.union(hi_lo, self.union(lo_hi, hi_hi));
            self.get_node(f_node.var, lo_lo, hi)
        };

        self.op_remember(key, result)
    }

    /// Cross-intersection: `{S ∩ T | S ∈ F, T ∈ G}`.
    ///
    /// Empty intersections are kept: disjoint pairs contribute ∅.
    pub fn cross_intersection(&self, f: ZddId, g: ZddId) -> ZddId {
        debug!("cross_intersection({}, {})", f, g);

        if f.is_zero() || g.is_zero() {
            return ZddId::ZERO;
        }
        if f.is_one() || g.is_one() {
            // ∅ ∩ T = ∅ for every pair.
            return ZddId::ONE;
        }

        let key = CacheKey::commutative(OpType::CrossIntersection, f, g);
        if let Some(result) = self.op_cached(&key) {
            return result;
        }

        let f_node = self.node(f);
        let g_node = self.node(g);

        let result = if f_node.var < g_node.var {
            // The variable is absent from g, so it never survives.
            let lo = self.cross_intersection(f_node.lo, g);
            let hi = self.cross_intersection(f_node.hi, g);
            self.union(lo, hi)
        } else if f_node.var > g_node.var {
            let lo = self.cross_intersection(f, g_node.lo);
            let hi = self.cross_intersection(f, g_node.hi);
            self.union(lo, hi)
        } else {
            // Only hi-hi pairs keep the variable.
            let lo_lo = self.cross_intersection(f_node.lo, g_node.lo);
            let lo_hi = self.cross_intersection(f_node.lo, g_node.hi);
            let hi_lo = self.cross_intersection(f_node.hi, g_node.lo);
            let hi_hi = self.cross_intersection(f_node.hi, g_node.hi);

            let lo = self.union(lo_lo, self.union(lo_hi, hi_lo));
            self.get_node(f_node.var, lo, hi_hi)
        };

        self.op_remember(key, result)
    }

    /// Cross-difference: `{S ∖ T | S ∈ F, T ∈ G}`.
    pub fn cross_difference(&self, f: ZddId, g: ZddId) -> ZddId {
        debug!("cross_difference({}, {})", f, g);

        if f.is_zero() || g.is_zero() {
            // No pairs without both sides.
            return ZddId::ZERO;
        }
        if g.is_one() {
            return f; // S ∖ ∅ = S
        }
        if f.is_one() {
            return ZddId::ONE; // ∅ ∖ T = ∅
        }

        let key = CacheKey::non_commutative(OpType::CrossDifference, f, g);
        if let Some(result) = self.op_cached(&key) {
            return result;
        }

        let f_node = self.node(f);
        let g_node = self.node(g);

        let result = if f_node.var < g_node.var {
            // g never subtracts this variable.
            let lo = self.cross_difference(f_node.lo, g);
            let hi = self.cross_difference(f_node.hi, g);
            self.get_node(f_node.var, lo, hi)
        } else if f_node.var > g_node.var {
            // f-side sets lack the variable; subtracting it is a no-op.
            let lo = self.cross_difference(f, g_node.lo);
            let hi = self.cross_difference(f, g_node.hi);
            self.union(lo, hi)
        } else {
            // The variable survives only in hi-lo pairs.
            let lo_lo = self.cross_difference(f_node.lo, g_node.lo);
            let lo_hi = self.cross_difference(f_node.lo, g_node.hi);
            let hi_hi = self.cross_difference(f_node.hi, g_node.hi);
            let hi_lo = self.cross_difference(f_node.hi, g_node.lo);

            let lo = self.union(lo_lo, self.union(lo_hi, hi_hi));
            self.get_node(f_node.var, lo, hi_lo)
        };

        self.op_remember(key, result)
    }

    // ========================================================================
    // N-ary folds
    // ========================================================================

    /// Union of any number of families; empty input yields ⊥.
    pub fn union_all(&self, fs: impl IntoIterator<Item = ZddId>) -> ZddId {
        fs.into_iter().fold(ZddId::ZERO, |acc, f| self.union(acc, f))
    }

    /// Cross-union of any number of families; empty input yields ⊤.
    pub fn cross_union_all(&self, fs: impl IntoIterator<Item = ZddId>) -> ZddId {
        fs.into_iter().fold(ZddId::ONE, |acc, f| self.cross_union(acc, f))
    }

    // ========================================================================
    // Predicates and queries
    // ========================================================================

    /// Inclusion: true iff every set of `f` is a set of `g`.
    ///
    /// Equality needs no predicate: handles are canonical, so `f == g`
    /// decides it.
    pub fn subset(&self, f: ZddId, g: ZddId) -> bool {
        if f.is_zero() || f == g {
            return true;
        }
        if g.is_zero() {
            return false;
        }
        if f.is_one() {
            return self.contains_empty(g);
        }
        if g.is_one() {
            // f is internal, so it holds some non-empty set.
            return false;
        }

        let key = (f, g);
        if let Some(&result) = self
            .subset_cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
        {
            return result;
        }

        let f_node = self.node(f);
        let g_node = self.node(g);

        let result = if f_node.var < g_node.var {
            // g has no set containing f's top variable, and f always has
            // one (hi is never ⊥).
            false
        } else if f_node.var > g_node.var {
            self.subset(f, g_node.lo)
        } else {
            self.subset(f_node.lo, g_node.lo) && self.subset(f_node.hi, g_node.hi)
        };

        self.subset_cache
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, result);
        result
    }

    /// Returns true if the family contains the empty set.
    pub fn contains_empty(&self, f: ZddId) -> bool {
        let mut current = f;
        loop {
            if current.is_zero() {
                return false;
            }
            if current.is_one() {
                return true;
            }
            current = self.node(current).lo;
        }
    }

    /// Returns true if the family contains exactly the given set.
    pub fn contains(&self, f: ZddId, set: &[Var]) -> bool {
        let mut sorted: Vec<Var> = set.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut current = f;
        let mut idx = 0;
        loop {
            if current.is_zero() {
                return false;
            }
            if current.is_one() {
                return idx == sorted.len();
            }
            let node = self.node(current);
            if idx < sorted.len() && node.var == sorted[idx] {
                current = node.hi;
                idx += 1;
            } else if idx < sorted.len() && node.var > sorted[idx] {
                // The next required variable cannot appear below here.
                return false;
            } else {
                current = node.lo;
            }
        }
    }

    /// Counts the number of sets in the family.
    pub fn count(&self, f: ZddId) -> u64 {
        if f.is_zero() {
            return 0;
        }
        if f.is_one() {
            return 1;
        }

        if let Some(&cached) = self
            .count_cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&f)
        {
            return cached;
        }

        let node = self.node(f);
        let count = self.count(node.lo) + self.count(node.hi);

        self.count_cache
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(f, count);
        count
    }

    /// Number of nodes reachable from `root` (terminals excluded).
    pub fn node_count(&self, root: ZddId) -> usize {
        let mut visited = std::collections::HashSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if id.is_terminal() || !visited.insert(id) {
                continue;
            }
            let node = self.node(id);
            stack.push(node.lo);
            stack.push(node.hi);
        }
        visited.len()
    }

    /// Snapshot of all decision nodes, taken under one read guard.
    pub(crate) fn snapshot(&self) -> Vec<(ZddId, ZddNode)> {
        let table = self.table_read();
        table.iter_nodes().map(|(id, node)| (id, *node)).collect()
    }

    /// Store statistics.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            nodes: self.table_read().len(),
            op_cache_entries: self.op_cache.read().unwrap_or_else(|e| e.into_inner()).len(),
            subset_cache_entries: self.subset_cache.read().unwrap_or_else(|e| e.into_inner()).len(),
            count_cache_entries: self.count_cache.read().unwrap_or_else(|e| e.into_inner()).len(),
        }
    }
}

/// Sizes of the store's table and memo caches.
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub nodes: usize,
    pub op_cache_entries: usize,
    pub subset_cache_entries: usize,
    pub count_cache_entries: usize,
}
