//! Graphviz DOT export for diagram visualization.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;

use crate::reference::ZddId;
use crate::store::ZddStore;

impl ZddStore {
    /// Generates a DOT representation of the diagram rooted at `root`.
    ///
    /// Lo edges are dashed, hi edges solid; nodes of one variable share a
    /// rank.
    pub fn to_dot(&self, root: ZddId) -> String {
        let mut dot = String::new();
        writeln!(dot, "digraph ZDD {{").unwrap();
        writeln!(dot, "  rankdir=TB;").unwrap();
        writeln!(dot, "  node [shape=circle];").unwrap();
        writeln!(dot).unwrap();

        writeln!(dot, "  // Terminals").unwrap();
        writeln!(dot, "  zero [label=\"⊥\", shape=square];").unwrap();
        writeln!(dot, "  one [label=\"⊤\", shape=square];").unwrap();
        writeln!(dot).unwrap();

        let mut visited = HashSet::new();
        let mut by_var: BTreeMap<u64, Vec<ZddId>> = BTreeMap::new();
        self.collect_nodes(root, &mut visited, &mut by_var);

        for (var, ids) in &by_var {
            writeln!(dot, "  // x{:016x}", var).unwrap();
            writeln!(dot, "  {{ rank=same;").unwrap();
            for id in ids {
                let node = self.node(*id);
                writeln!(dot, "    n{} [label=\"{}\"];", id.raw(), node.var).unwrap();
            }
            writeln!(dot, "  }}").unwrap();
        }

        writeln!(dot).unwrap();
        writeln!(dot, "  // Edges").unwrap();
        for id in &visited {
            if id.is_terminal() {
                continue;
            }
            let node = self.node(*id);
            writeln!(dot, "  n{} -> {} [style=dashed];", id.raw(), target(node.lo)).unwrap();
            writeln!(dot, "  n{} -> {};", id.raw(), target(node.hi)).unwrap();
        }

        writeln!(dot, "}}").unwrap();
        dot
    }

    fn collect_nodes(
        &self,
        id: ZddId,
        visited: &mut HashSet<ZddId>,
        by_var: &mut BTreeMap<u64, Vec<ZddId>>,
    ) {
        if id.is_terminal() || !visited.insert(id) {
            return;
        }
        let node = self.node(id);
        by_var.entry(node.var.id()).or_default().push(id);
        self.collect_nodes(node.lo, visited, by_var);
        self.collect_nodes(node.hi, visited, by_var);
    }
}

fn target(id: ZddId) -> String {
    if id.is_zero() {
        "zero".to_string()
    } else if id.is_one() {
        "one".to_string()
    } else {
        format!("n{}", id.raw())
    }
}
