//! Provisional MMFF symbols from local bonding.
//!
//! Typing runs in a fixed order because some atoms publish functional groups
//! to their neighbours: oxygens are classified first, then every atom's
//! environment is built, then nitrogen, sulfur and phosphorus publish their
//! groups and everything except carbon is named. Carbon goes last, reading
//! the groups the others left behind.

use petgraph::graph::NodeIndex;
use tracing::*;

use crate::environment::{environments, Environment, Group, GroupCounts};
use crate::{AdjacencyList, Atom, Element, MoleculeGraph, Symbol};

pub mod rules;
pub use rules::{first_match, generic_carbon, hydrogen_symbol, rules_for, simple_symbol, Rule, Site};

/// Coarse oxygen classes assigned before any environment is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OxygenClass {
    /// Three connections, or a single one, with a positive charge.
    Oxonium,
    /// Two connections, one of them a double bond.
    Oxenium,
    Hydroxy,
    Ether,
    Peroxide,
    HeteroEther,
    /// One connection through a double bond.
    Carbonyl,
}

/// Per-molecule scratch state read by the typing rules.
pub struct TypingContext<'m> {
    graph: &'m MoleculeGraph,
    adjacency: &'m AdjacencyList,
    cycles: &'m [Vec<usize>],
    environments: Vec<Environment>,
    groups: Vec<GroupCounts>,
    oxygen: Vec<Option<OxygenClass>>,
}

impl<'m> TypingContext<'m> {
    pub fn new(graph: &'m MoleculeGraph, adjacency: &'m AdjacencyList, cycles: &'m [Vec<usize>]) -> Self {
        let n = adjacency.len();
        Self {
            graph,
            adjacency,
            cycles,
            environments: vec![Environment::default(); n],
            groups: vec![GroupCounts::default(); n],
            oxygen: vec![None; n],
        }
    }

    pub fn site(&self, atom: usize) -> Site<'_> {
        Site::new(self, atom)
    }

    fn atom(&self, atom: usize) -> &'m Atom {
        &self.graph[NodeIndex::new(atom)]
    }

    fn element(&self, atom: usize) -> Element {
        self.atom(atom).element
    }

    fn bond_order(&self, u: usize, v: usize) -> u8 {
        self.adjacency
            .bond(u, v)
            .map(|e| self.graph[e].order.numeric())
            .unwrap_or(0)
    }

    fn rings_of_size(&self, size: usize) -> impl Iterator<Item = &'m Vec<usize>> + '_ {
        self.cycles.iter().filter(move |walk| walk.len() == size + 1)
    }

    fn in_ring(&self, atom: usize, size: usize) -> bool {
        self.rings_of_size(size).any(|walk| walk.contains(&atom))
    }

    pub fn groups(&self, atom: usize) -> &GroupCounts {
        &self.groups[atom]
    }

    pub fn oxygen_class(&self, atom: usize) -> Option<OxygenClass> {
        self.oxygen[atom]
    }

    fn publish(&mut self, atom: usize, group: Group) {
        trace!("atom {} gains a {} neighbour", atom, group);
        self.groups[atom].add(group);
    }

    fn classify_oxygen(&self, atom: usize) -> Option<OxygenClass> {
        let nbrs = self.adjacency.neighbors(atom);
        let is = |element| nbrs.iter().any(|&n| self.element(n) == element);
        let charge = self.atom(atom).charge_or_zero();
        match nbrs.len() {
            3 if charge > 0 => Some(OxygenClass::Oxonium),
            2 if nbrs.iter().any(|&n| self.bond_order(atom, n) == 2) => Some(OxygenClass::Oxenium),
            2 if is(Element::H) => Some(OxygenClass::Hydroxy),
            2 if nbrs.iter().all(|&n| self.element(n) == Element::C) => Some(OxygenClass::Ether),
            2 if is(Element::O) => Some(OxygenClass::Peroxide),
            2 => Some(OxygenClass::HeteroEther),
            1 if charge > 0 => Some(OxygenClass::Oxonium),
            1 if charge < 0 => Some(OxygenClass::Hydroxy),
            1 if self.bond_order(atom, nbrs[0]) == 2 => Some(OxygenClass::Carbonyl),
            _ => None,
        }
    }

    /// Classifies every oxygen and publishes hydroxy, ether and hetero-ether
    /// groups to its neighbours.
    pub fn classify_oxygens(&mut self) {
        for atom in 0..self.adjacency.len() {
            if self.element(atom) != Element::O {
                continue;
            }
            let class = self.classify_oxygen(atom);
            self.oxygen[atom] = class;

            let adjacency = self.adjacency;
            let nbrs = adjacency.neighbors(atom);
            match class {
                Some(OxygenClass::Hydroxy) => {
                    for &n in nbrs {
                        if self.element(n) != Element::H {
                            self.publish(n, Group::Hydroxy);
                        }
                    }
                }
                Some(OxygenClass::Ether) => {
                    for &n in nbrs {
                        self.publish(n, Group::Ether);
                    }
                }
                Some(OxygenClass::Peroxide | OxygenClass::HeteroEther) => {
                    for &n in nbrs {
                        if self.element(n) != Element::O {
                            self.publish(n, Group::HeteroEther);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Rebuilds every atom's environment in one pass over the bonds.
    pub fn build_environments(&mut self) {
        self.environments = environments(self.graph, self.adjacency);
    }

    /// Primary amines, hydroxy amines and thiols tell their neighbours.
    pub fn publish_heteroatom_groups(&mut self) {
        for atom in 0..self.adjacency.len() {
            let env = self.environments[atom];
            let adjacency = self.adjacency;
            let nbrs = adjacency.neighbors(atom);
            let heavy: Vec<usize> = nbrs
                .iter()
                .copied()
                .filter(|&n| self.element(n) != Element::H)
                .collect();
            match self.element(atom) {
                Element::N => {
                    if env.degree == 3 && env.neighbors.h == 2 {
                        for &n in &heavy {
                            self.publish(n, Group::PrimaryAmine);
                        }
                    }
                    let hydroxy_oxygen = nbrs
                        .iter()
                        .any(|&n| self.oxygen[n] == Some(OxygenClass::Hydroxy));
                    if hydroxy_oxygen {
                        for &n in &heavy {
                            if self.element(n) != Element::O {
                                self.publish(n, Group::HydroxyAmine);
                            }
                        }
                    }
                }
                Element::S if env.neighbors.h > 0 => {
                    for &n in &heavy {
                        self.publish(n, Group::Thiol);
                    }
                }
                _ => {}
            }
        }
    }

    fn name(&self, atom: usize) -> Option<&'static str> {
        let site = self.site(atom);
        match rules_for(site.element()) {
            Some(rules) => first_match(rules, &site),
            None => simple_symbol(&site),
        }
    }
}

/// Typing order for the non-carbon passes.
const PASSES: [&[Element]; 3] = [
    &[Element::O],
    &[Element::N, Element::S, Element::P],
    &[Element::H, Element::Si, Element::F, Element::Cl, Element::Br, Element::I],
];

/// Provisional symbols for every atom. Atoms no rule describes are `UNK`,
/// except carbon, which falls back to a generic carbon symbol.
pub fn provisional_types(graph: &MoleculeGraph, adjacency: &AdjacencyList, cycles: &[Vec<usize>]) -> Vec<Symbol> {
    let mut ctx = TypingContext::new(graph, adjacency, cycles);
    ctx.classify_oxygens();
    ctx.build_environments();
    ctx.publish_heteroatom_groups();

    let mut symbols = vec![Symbol::unknown(); adjacency.len()];
    for pass in PASSES {
        for atom in 0..adjacency.len() {
            if pass.contains(&ctx.element(atom)) {
                if let Some(name) = ctx.name(atom) {
                    symbols[atom] = Symbol::new(name);
                }
            }
        }
    }

    for atom in 0..adjacency.len() {
        if ctx.element(atom) == Element::C {
            let site = ctx.site(atom);
            let name = ctx.name(atom).unwrap_or_else(|| generic_carbon(&site));
            symbols[atom] = Symbol::new(name);
        }
    }

    for (atom, symbol) in symbols.iter().enumerate() {
        trace!("atom {} ({}) provisionally typed {}", atom, ctx.element(atom), symbol);
    }
    symbols
}

/// Gives hydrogens on heteroatoms a symbol specific to their parent's final
/// type. Hydrogens whose parent has no entry keep their provisional symbol.
pub fn refine_hydrogens(graph: &MoleculeGraph, adjacency: &AdjacencyList, symbols: &mut [Symbol]) {
    for atom in 0..adjacency.len() {
        if graph[NodeIndex::new(atom)].element != Element::H || adjacency.degree(atom) != 1 {
            continue;
        }
        let parent = adjacency.neighbors(atom)[0];
        let parent_element = graph[NodeIndex::new(parent)].element;
        if let Some(refined) = hydrogen_symbol(parent_element, symbols[parent].as_str()) {
            if symbols[atom] != refined {
                trace!("hydrogen {} on {} refined to {}", atom, symbols[parent], refined);
                symbols[atom] = Symbol::new(refined);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fixtures, init_logging, BondOrder, RingSearch};

    fn typed(mol: &crate::Molecule) -> Vec<String> {
        let adjacency = AdjacencyList::from_graph(mol.graph());
        let cycles = RingSearch::default().find_cycles_or_empty(&adjacency);
        let mut symbols = provisional_types(mol.graph(), &adjacency, &cycles);
        refine_hydrogens(mol.graph(), &adjacency, &mut symbols);
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn acetic_acid() {
        init_logging("trace");
        let types = typed(&fixtures::acetic_acid());
        assert_eq!(&types[..4], &["CR", "COO", "O=CO", "OC=O"]);
        assert_eq!(&types[4..7], &["HC", "HC", "HC"]);
        assert_eq!(types[7], "HOCO");
    }

    #[test]
    fn acetate_shares_its_oxygens() {
        let types = typed(&fixtures::acetate());
        assert_eq!(&types[..4], &["CR", "CO2M", "O2CM", "O2CM"]);
    }

    #[test]
    fn ethanol_and_methylamine() {
        let types = typed(&fixtures::ethanol());
        assert_eq!(&types[..3], &["CR", "CR", "OR"]);
        assert_eq!(types.last().map(String::as_str), Some("HOR"));

        let types = typed(&fixtures::methylamine());
        assert_eq!(&types[..2], &["CR", "NR"]);
        assert_eq!(types.iter().filter(|t| *t == "HNR").count(), 2);
    }

    #[test]
    fn sulfonate_oxygens() {
        let types = typed(&fixtures::methanesulfonate());
        assert_eq!(&types[..5], &["CR", "SO3", "O3S", "O3S", "O3S"]);
    }

    #[test]
    fn small_ring_carbons() {
        let types = typed(&fixtures::cyclopropane());
        assert!(types[..3].iter().all(|t| t == "CR3R"));
        let types = typed(&fixtures::cyclobutene());
        assert_eq!(&types[..4], &["CE4R", "CE4R", "CR4R", "CR4R"]);
    }

    #[test]
    fn amide_and_nitrile() {
        let types = typed(&fixtures::acetamide());
        assert_eq!(&types[..4], &["CR", "C=ON", "O=CN", "NC=O"]);
        assert_eq!(types.iter().filter(|t| *t == "HNCO").count(), 2);

        let types = typed(&fixtures::acetonitrile());
        assert_eq!(&types[..3], &["CR", "CSP", "NSP"]);
    }

    #[test]
    fn groups_reach_carbon() {
        let mol = fixtures::ethanol();
        let adjacency = AdjacencyList::from_graph(mol.graph());
        let mut ctx = TypingContext::new(mol.graph(), &adjacency, &[]);
        ctx.classify_oxygens();
        ctx.build_environments();
        ctx.publish_heteroatom_groups();
        assert_eq!(ctx.oxygen_class(2), Some(OxygenClass::Hydroxy));
        assert!(ctx.groups(1).has(Group::Hydroxy));
        assert!(ctx.groups(0).is_empty());

        let mol = fixtures::methylamine();
        let adjacency = AdjacencyList::from_graph(mol.graph());
        let mut ctx = TypingContext::new(mol.graph(), &adjacency, &[]);
        ctx.build_environments();
        ctx.publish_heteroatom_groups();
        assert!(ctx.groups(0).has(Group::PrimaryAmine));
        assert_eq!(generic_carbon(&ctx.site(0)), "CGENH");

        let mol = fixtures::build(&[(Element::C, 0, 3), (Element::C, 0, 3)], &[(0, 1, BondOrder::Single)]);
        let adjacency = AdjacencyList::from_graph(mol.graph());
        let mut ctx = TypingContext::new(mol.graph(), &adjacency, &[]);
        ctx.build_environments();
        ctx.publish_heteroatom_groups();
        assert_eq!(generic_carbon(&ctx.site(0)), "CGEN");
    }

    #[test]
    fn oxonium_needs_a_positive_charge() {
        let methyls = |charge: i32| {
            fixtures::build(
                &[(Element::C, 0, 3), (Element::O, charge, 0), (Element::C, 0, 3), (Element::C, 0, 3)],
                &[(0, 1, BondOrder::Single), (1, 2, BondOrder::Single), (1, 3, BondOrder::Single)],
            )
        };
        assert_eq!(typed(&methyls(1))[1], "O+");
        assert_eq!(typed(&methyls(0))[1], "UNK");

        // a lone oxygen triple bonded to carbon is only O=+ when charged
        let monoxide = |charge: i32| {
            fixtures::build(&[(Element::C, -charge, 0), (Element::O, charge, 0)], &[(0, 1, BondOrder::Triple)])
        };
        assert_eq!(typed(&monoxide(1))[1], "O=+");
        assert_eq!(typed(&monoxide(0))[1], "UNK");
    }

    #[test]
    fn unsupported_elements_are_unknown() {
        let types = typed(&fixtures::borane());
        assert_eq!(types[0], "UNK");
        assert!(types[1..].iter().all(|t| t == "HC"));
    }
}
