//! Debug utilities: structural inspection and invariant checking.
//!
//! These helpers are primarily useful in tests and during development.

use std::collections::HashMap;
use std::fmt::Write;

use crate::reference::ZddId;
use crate::store::ZddStore;
use crate::types::Var;

/// Detailed information about a single node.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    /// The handle of this node.
    pub id: ZddId,
    /// Variable at this node (None for terminals).
    pub var: Option<Var>,
    /// Low child (None for terminals).
    pub lo: Option<ZddId>,
    /// High child (None for terminals).
    pub hi: Option<ZddId>,
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.var, self.lo, self.hi) {
            (Some(var), Some(lo), Some(hi)) => {
                write!(f, "{}(var={}, lo={}, hi={})", self.id, var, lo, hi)
            }
            _ => write!(f, "{}", self.id),
        }
    }
}

impl ZddStore {
    /// Gets detailed information about a single node.
    pub fn node_info(&self, id: ZddId) -> NodeInfo {
        if id.is_terminal() {
            return NodeInfo { id, var: None, lo: None, hi: None };
        }
        let node = self.node(id);
        NodeInfo {
            id,
            var: Some(node.var),
            lo: Some(node.lo),
            hi: Some(node.hi),
        }
    }

    /// Prints a compact representation of the diagram rooted at `root`.
    pub fn debug_string(&self, root: ZddId) -> String {
        let mut infos = Vec::new();
        let mut visited = std::collections::HashSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let info = self.node_info(id);
            if let (Some(lo), Some(hi)) = (info.lo, info.hi) {
                stack.push(lo);
                stack.push(hi);
            }
            infos.push(info);
        }
        infos.sort_by_key(|info| info.var.unwrap_or(Var::ZERO));

        let mut result = String::new();
        writeln!(&mut result, "ZDD {} (size={}):", root, infos.len()).unwrap();
        for info in &infos {
            writeln!(&mut result, "  {}", info).unwrap();
        }
        result
    }

    /// Checks the structural invariants of every live node.
    ///
    /// Verified per node: zero-suppression (`hi` ≠ ⊥), reserved variable 0
    /// absent, children precede the node in the table (the diagrams are
    /// acyclic by construction), ordering (`var` below both internal
    /// children), and uniqueness (no duplicate `(var, lo, hi)` triple).
    ///
    /// Returns the list of violations; empty means the store is sound.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let nodes = self.snapshot();
        let mut errors = Vec::new();
        let mut seen: HashMap<(Var, ZddId, ZddId), ZddId> = HashMap::new();

        for &(id, node) in &nodes {
            if node.hi.is_zero() {
                errors.push(format!("{}: hi child is ⊥ (zero-suppression violated)", id));
            }
            if node.var.is_zero() {
                errors.push(format!("{}: reserved variable 0", id));
            }
            for (child, which) in [(node.lo, "lo"), (node.hi, "hi")] {
                if !child.is_terminal() {
                    if child.raw() >= id.raw() {
                        errors.push(format!("{}: {} child {} does not precede it", id, which, child));
                    } else if self.node(child).var <= node.var {
                        errors.push(format!(
                            "{}: ordering violated on {} child {} ({} !< {})",
                            id,
                            which,
                            child,
                            node.var,
                            self.node(child).var
                        ));
                    }
                }
            }
            if let Some(prev) = seen.insert((node.var, node.lo, node.hi), id) {
                errors.push(format!("{}: duplicate of {} (hash consing violated)", id, prev));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
