//! Per-atom bonding environments.
//!
//! An [`Environment`] is rebuilt for every atom in a single pass over its
//! incident bonds before any typing rule reads it. Functional groups seen on
//! one atom and published to its neighbours are tracked separately in
//! [`GroupCounts`], since they depend on the order atoms are classified in.

use std::fmt::{Display, Formatter, Result as FmtResult};

use petgraph::graph::NodeIndex;

use crate::{AdjacencyList, BondOrder, Element, MoleculeGraph};

/// Neighbour counts broken out by element class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementCounts {
    pub h: u8,
    pub c: u8,
    pub n: u8,
    pub o: u8,
    pub s: u8,
    pub p: u8,
    pub si: u8,
    pub halogen: u8,
    pub other: u8,
}

impl ElementCounts {
    fn add(&mut self, element: Element) {
        let slot = match element {
            Element::H => &mut self.h,
            Element::C => &mut self.c,
            Element::N => &mut self.n,
            Element::O => &mut self.o,
            Element::S => &mut self.s,
            Element::P => &mut self.p,
            Element::Si => &mut self.si,
            e if e.is_halogen() => &mut self.halogen,
            _ => &mut self.other,
        };
        *slot += 1;
    }

    pub fn get(&self, element: Element) -> u8 {
        match element {
            Element::H => self.h,
            Element::C => self.c,
            Element::N => self.n,
            Element::O => self.o,
            Element::S => self.s,
            Element::P => self.p,
            Element::Si => self.si,
            e if e.is_halogen() => self.halogen,
            _ => self.other,
        }
    }

    pub fn total(&self) -> u8 {
        self.h + self.c + self.n + self.o + self.s + self.p + self.si + self.halogen + self.other
    }

    pub fn heavy(&self) -> u8 {
        self.total() - self.h
    }

    /// N, O, S or P neighbours.
    pub fn hetero(&self) -> u8 {
        self.n + self.o + self.s + self.p
    }
}

/// What one atom sees across its incident bonds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Environment {
    pub element: Option<Element>,
    pub degree: u8,
    /// Sum of bond orders.
    pub valence: u8,
    pub neighbors: ElementCounts,
    pub single: ElementCounts,
    pub double: ElementCounts,
    pub triple: ElementCounts,
    /// Oxygen neighbours with no other bonds.
    pub terminal_oxygens: u8,
    /// Sulfur neighbours with no other bonds.
    pub terminal_sulfurs: u8,
}

impl Environment {
    pub fn double_bonds(&self) -> u8 {
        self.double.total()
    }

    pub fn triple_bonds(&self) -> u8 {
        self.triple.total()
    }
}

/// Builds the environment of every atom in `graph`.
pub fn environments(graph: &MoleculeGraph, adjacency: &AdjacencyList) -> Vec<Environment> {
    (0..adjacency.len())
        .map(|atom| environment(graph, adjacency, atom))
        .collect()
}

pub fn environment(graph: &MoleculeGraph, adjacency: &AdjacencyList, atom: usize) -> Environment {
    let mut env = Environment {
        element: Some(graph[NodeIndex::new(atom)].element),
        ..Environment::default()
    };

    for &nbr in adjacency.neighbors(atom) {
        let element = graph[NodeIndex::new(nbr)].element;
        let order = adjacency
            .bond(atom, nbr)
            .map(|e| graph[e].order)
            .unwrap_or(BondOrder::Unset);

        env.degree += 1;
        env.valence += order.numeric();
        env.neighbors.add(element);
        match order {
            BondOrder::Single => env.single.add(element),
            BondOrder::Double => env.double.add(element),
            BondOrder::Triple => env.triple.add(element),
            BondOrder::Unset => {}
        }

        if adjacency.degree(nbr) == 1 {
            match element {
                Element::O => env.terminal_oxygens += 1,
                Element::S => env.terminal_sulfurs += 1,
                _ => {}
            }
        }
    }
    env
}

/// Functional groups an atom can learn about from a neighbour.
///
/// Carbon rules read the oxygen groups. `PrimaryAmine`, `Thiol` and
/// `HydroxyAmine` are descriptors only: they are published for callers
/// inspecting a [`crate::typing::TypingContext`] and no rule depends on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    Hydroxy,
    Ether,
    HeteroEther,
    PrimaryAmine,
    Thiol,
    HydroxyAmine,
}

impl Group {
    pub const ALL: [Group; 6] = [
        Group::Hydroxy,
        Group::Ether,
        Group::HeteroEther,
        Group::PrimaryAmine,
        Group::Thiol,
        Group::HydroxyAmine,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl Display for Group {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let name = match self {
            Group::Hydroxy => "hydroxy",
            Group::Ether => "ether",
            Group::HeteroEther => "hetero-ether",
            Group::PrimaryAmine => "primary amine",
            Group::Thiol => "thiol",
            Group::HydroxyAmine => "hydroxy amine",
        };
        write!(f, "{}", name)
    }
}

/// How many times each [`Group`] has been published to an atom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GroupCounts([u8; 6]);

impl GroupCounts {
    pub fn add(&mut self, group: Group) {
        self.0[group.index()] = self.0[group.index()].saturating_add(1);
    }

    pub fn count(&self, group: Group) -> u8 {
        self.0[group.index()]
    }

    pub fn has(&self, group: Group) -> bool {
        self.count(group) > 0
    }

    /// The groups with a non-zero count, in declaration order.
    pub fn present(&self) -> impl Iterator<Item = Group> + '_ {
        Group::ALL.into_iter().filter(move |g| self.has(*g))
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }
}
