//! Hierarchical digraphs for CIP ranking.
//!
//! A [`LigandTree`] unrolls one branch of a stereocenter into an owned
//! arena. Every node points back to its parent, so the path to the root is
//! each node's private visited set and sibling branches never share one.

use std::cmp::Ordering;

use petgraph::graph::NodeIndex;

use crate::MoleculeGraph;

/// The stereocenter (or double bond atom) the ligand hangs off.
const ANCHOR: usize = 0;
/// The ligand atom itself.
const ROOT: usize = 1;

#[derive(Debug, Clone)]
struct LigandNode {
    z: u8,
    /// `None` for duplicated atoms and implicit hydrogens, which never expand.
    atom: Option<NodeIndex>,
    parent: Option<usize>,
    children: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct LigandTree {
    nodes: Vec<LigandNode>,
}

fn bond_order(graph: &MoleculeGraph, a: NodeIndex, b: NodeIndex) -> u8 {
    graph
        .find_edge(a, b)
        .map(|e| graph[e].order.numeric())
        .unwrap_or(1)
        .max(1)
}

impl LigandTree {
    /// Unrolls `ligand` (or an implicit hydrogen, for `None`) as seen from
    /// `central`, `max_depth` spheres deep.
    pub fn build(graph: &MoleculeGraph, central: NodeIndex, ligand: Option<NodeIndex>, max_depth: usize) -> Self {
        let mut tree = Self {
            nodes: vec![LigandNode {
                z: graph[central].element.atomic_number(),
                atom: Some(central),
                parent: None,
                children: Vec::new(),
            }],
        };
        match ligand {
            Some(atom) => {
                tree.push(ANCHOR, Some(atom), graph[atom].element.atomic_number());
                tree.expand(graph, max_depth);
            }
            None => {
                tree.push(ANCHOR, None, 1);
            }
        }
        tree.sort_children();
        tree
    }

    fn push(&mut self, parent: usize, atom: Option<NodeIndex>, z: u8) -> usize {
        let index = self.nodes.len();
        self.nodes.push(LigandNode {
            z,
            atom,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(index);
        index
    }

    fn duplicate(&mut self, parent: usize, graph: &MoleculeGraph, atom: NodeIndex) {
        self.push(parent, None, graph[atom].element.atomic_number());
    }

    fn has_ancestor(&self, node: usize, atom: NodeIndex) -> bool {
        let mut current = self.nodes[node].parent;
        while let Some(i) = current {
            if self.nodes[i].atom == Some(atom) {
                return true;
            }
            current = self.nodes[i].parent;
        }
        false
    }

    fn expand(&mut self, graph: &MoleculeGraph, max_depth: usize) {
        let mut stack = vec![(ROOT, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            if depth >= max_depth {
                continue;
            }
            let Some(atom) = self.nodes[node].atom else {
                continue;
            };
            let from = self.nodes[node].parent.and_then(|p| self.nodes[p].atom);

            for nbr in graph.neighbors(atom) {
                let order = bond_order(graph, atom, nbr);
                if Some(nbr) == from {
                    for _ in 1..order {
                        self.duplicate(node, graph, nbr);
                    }
                } else if self.has_ancestor(node, nbr) {
                    // ring closure
                    for _ in 0..order {
                        self.duplicate(node, graph, nbr);
                    }
                } else {
                    let child = self.push(node, Some(nbr), graph[nbr].element.atomic_number());
                    stack.push((child, depth + 1));
                    for _ in 1..order {
                        self.duplicate(node, graph, nbr);
                    }
                }
            }
            for _ in 0..graph[atom].implicit_hydrogens {
                self.push(node, None, 1);
            }
        }
    }

    /// Orders every node's children by descending priority, deepest nodes
    /// first so each comparison sees already sorted subtrees.
    fn sort_children(&mut self) {
        for node in (0..self.nodes.len()).rev() {
            let mut children = std::mem::take(&mut self.nodes[node].children);
            children.sort_by(|&a, &b| compare_nodes(self, b, self, a));
            self.nodes[node].children = children;
        }
    }

    fn children(&self, node: Option<&usize>) -> &[usize] {
        node.map_or(&[][..], |&n| self.nodes[n].children.as_slice())
    }

    /// Number of nodes, anchor included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Explores two subtrees sphere by sphere; the first differing atomic number
/// decides. Missing branches count as phantom atoms (atomic number 0).
fn compare_nodes(ta: &LigandTree, a: usize, tb: &LigandTree, b: usize) -> Ordering {
    let first = ta.nodes[a].z.cmp(&tb.nodes[b].z);
    if first != Ordering::Equal {
        return first;
    }

    let (mut frontier_a, mut frontier_b) = (vec![a], vec![b]);
    loop {
        let (mut next_a, mut next_b) = (Vec::new(), Vec::new());
        for i in 0..frontier_a.len().max(frontier_b.len()) {
            let kids_a = ta.children(frontier_a.get(i));
            let kids_b = tb.children(frontier_b.get(i));
            for j in 0..kids_a.len().max(kids_b.len()) {
                let za = kids_a.get(j).map_or(0, |&n| ta.nodes[n].z);
                let zb = kids_b.get(j).map_or(0, |&n| tb.nodes[n].z);
                match za.cmp(&zb) {
                    Ordering::Equal => {}
                    other => return other,
                }
            }
            next_a.extend_from_slice(kids_a);
            next_b.extend_from_slice(kids_b);
        }
        if next_a.is_empty() && next_b.is_empty() {
            return Ordering::Equal;
        }
        frontier_a = next_a;
        frontier_b = next_b;
    }
}

/// CIP priority of two ligands; `Greater` means `a` ranks higher.
pub fn compare(a: &LigandTree, b: &LigandTree) -> Ordering {
    compare_nodes(a, ROOT, b, ROOT)
}

/// Parity of the permutation that sorts `items` into descending order:
/// 1 for even, -1 for odd, 0 if two items compare equal.
pub fn permutation_parity<T: Clone>(items: &[T], mut cmp: impl FnMut(&T, &T) -> Ordering) -> i32 {
    let mut work = items.to_vec();
    let mut swaps = 0;
    for i in 1..work.len() {
        let mut j = i;
        while j > 0 {
            match cmp(&work[j - 1], &work[j]) {
                Ordering::Equal => return 0,
                Ordering::Less => {
                    work.swap(j - 1, j);
                    swaps += 1;
                    j -= 1;
                }
                Ordering::Greater => break,
            }
        }
    }
    if work.windows(2).any(|w| cmp(&w[0], &w[1]) == Ordering::Equal) {
        return 0;
    }
    if swaps % 2 == 0 {
        1
    } else {
        -1
    }
}
