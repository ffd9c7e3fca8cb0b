use std::collections::{BTreeSet, HashMap};

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::*;

use crate::{Element, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Hybridization {
    Sp,
    Sp2,
    Sp3,
    Planar3,
    #[default]
    Unset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Unset,
}

impl BondOrder {
    /// 1, 2 or 3; an unset order counts as 0.
    pub fn numeric(self) -> u8 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Unset => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondStereo {
    #[default]
    None,
    Up,
    Down,
    Either,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub formal_charge: Option<i32>,
    pub exact_mass: Option<f64>,
    pub hybridization: Hybridization,
    pub implicit_hydrogens: u32,
    /// Symbolic MMFF type, written by atom typing.
    pub atom_type: Option<Symbol>,
    /// MMFF charge, written by the charge model.
    pub charge: Option<f64>,
    /// Caller-owned aromaticity; MMFF perception neither reads nor writes it.
    pub aromatic: bool,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            formal_charge: None,
            exact_mass: None,
            hybridization: Hybridization::Unset,
            implicit_hydrogens: 0,
            atom_type: None,
            charge: None,
            aromatic: false,
        }
    }

    pub fn with_formal_charge(mut self, charge: i32) -> Self {
        self.formal_charge = Some(charge);
        self
    }

    pub fn with_implicit_hydrogens(mut self, count: u32) -> Self {
        self.implicit_hydrogens = count;
        self
    }

    pub fn with_hybridization(mut self, hybridization: Hybridization) -> Self {
        self.hybridization = hybridization;
        self
    }

    /// Formal charge with `None` read as neutral.
    pub fn charge_or_zero(&self) -> i32 {
        self.formal_charge.unwrap_or(0)
    }
}

impl From<Element> for Atom {
    fn from(element: Element) -> Self {
        Atom::new(element)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bond {
    pub order: BondOrder,
    pub stereo: BondStereo,
    /// Caller-owned aromaticity; MMFF aromatic bonds are reported separately.
    pub aromatic: bool,
}

impl From<BondOrder> for Bond {
    fn from(order: BondOrder) -> Self {
        Bond {
            order,
            ..Bond::default()
        }
    }
}

pub type MoleculeGraph = UnGraph<Atom, Bond>;

/// Neighbour lists indexed by atom, plus an edge-to-bond map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjacencyList {
    neighbors: Vec<Vec<usize>>,
    bonds: HashMap<(usize, usize), EdgeIndex>,
}

impl AdjacencyList {
    pub fn from_graph(graph: &MoleculeGraph) -> Self {
        let mut neighbors = vec![Vec::new(); graph.node_count()];
        let mut bonds = HashMap::with_capacity(graph.edge_count() * 2);
        for edge in graph.edge_references() {
            let (u, v) = (edge.source().index(), edge.target().index());
            if u == v {
                continue;
            }
            neighbors[u].push(v);
            neighbors[v].push(u);
            bonds.insert((u, v), edge.id());
            bonds.insert((v, u), edge.id());
        }
        Self { neighbors, bonds }
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn neighbors(&self, atom: usize) -> &[usize] {
        &self.neighbors[atom]
    }

    pub fn degree(&self, atom: usize) -> usize {
        self.neighbors[atom].len()
    }

    pub fn bond(&self, u: usize, v: usize) -> Option<EdgeIndex> {
        self.bonds.get(&(u, v)).copied()
    }
}

/// Scratch state left behind by atom typing and read by the charge model.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Perception {
    pub adjacency: AdjacencyList,
    pub int_types: Vec<Option<u32>>,
    pub aromatic_bonds: BTreeSet<EdgeIndex>,
    pub aromatic_rings: Vec<Vec<usize>>,
}

/// A molecular graph plus whatever MMFF perception has cached for it.
///
/// Atoms are never removed, so atom ids (`NodeIndex`) stay valid for the
/// lifetime of the molecule.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    graph: MoleculeGraph,
    perception: Option<Perception>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_atom(&mut self, atom: impl Into<Atom>) -> NodeIndex {
        self.perception = None;
        self.graph.add_node(atom.into())
    }

    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: impl Into<Bond>) -> EdgeIndex {
        self.perception = None;
        self.graph.add_edge(a, b, bond.into())
    }

    pub fn atom(&self, id: NodeIndex) -> &Atom {
        &self.graph[id]
    }

    pub fn atom_mut(&mut self, id: NodeIndex) -> &mut Atom {
        &mut self.graph[id]
    }

    pub fn bond(&self, id: EdgeIndex) -> &Bond {
        &self.graph[id]
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    /// The endpoint of `bond` that is not `atom`.
    pub fn other_atom(&self, bond: EdgeIndex, atom: NodeIndex) -> Option<NodeIndex> {
        let (u, v) = self.graph.edge_endpoints(bond)?;
        if u == atom {
            Some(v)
        } else if v == atom {
            Some(u)
        } else {
            None
        }
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }

    pub fn graph(&self) -> &MoleculeGraph {
        &self.graph
    }

    /// Symbolic types currently written on the atoms, in atom order.
    pub fn atom_types(&self) -> Vec<Option<Symbol>> {
        self.graph
            .node_weights()
            .map(|atom| atom.atom_type.clone())
            .collect()
    }

    /// Bonds the last MMFF typing run found in aromatic rings.
    pub fn mmff_aromatic_bonds(&self) -> Option<&BTreeSet<EdgeIndex>> {
        self.perception.as_ref().map(|p| &p.aromatic_bonds)
    }

    /// Integer MMFF types from the last typing run.
    pub fn mmff_types(&self) -> Option<&[Option<u32>]> {
        self.perception.as_ref().map(|p| p.int_types.as_slice())
    }

    /// Aromatic ring walks (closed, first == last) from the last typing run.
    pub fn mmff_aromatic_rings(&self) -> Option<&[Vec<usize>]> {
        self.perception.as_ref().map(|p| p.aromatic_rings.as_slice())
    }

    pub(crate) fn perception(&self) -> Option<&Perception> {
        self.perception.as_ref()
    }

    pub(crate) fn set_perception(&mut self, perception: Perception) {
        self.perception = Some(perception);
    }

    /// Drop cached adjacency, ring and aromatic-bond data. Types and charges
    /// already written to the atoms stay. Safe to call repeatedly.
    pub fn clear_perception(&mut self) {
        if self.perception.take().is_some() {
            debug!("cleared cached perception data");
        }
    }

    /// Replace every implicit hydrogen count with explicit hydrogen atoms.
    pub fn make_hydrogens_explicit(&mut self) {
        let heavy: Vec<NodeIndex> = self.graph.node_indices().collect();
        let mut added = 0;
        for atom in heavy {
            let count = std::mem::take(&mut self.graph[atom].implicit_hydrogens);
            for _ in 0..count {
                let h = self.graph.add_node(Atom::new(Element::H));
                self.graph.add_edge(atom, h, Bond::from(BondOrder::Single));
                added += 1;
            }
        }
        if added > 0 {
            self.perception = None;
            debug!("added {} explicit hydrogens", added);
        }
    }
}

impl From<MoleculeGraph> for Molecule {
    fn from(graph: MoleculeGraph) -> Self {
        Self {
            graph,
            perception: None,
        }
    }
}
