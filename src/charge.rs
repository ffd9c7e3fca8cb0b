//! MMFF charges.
//!
//! Charges are built in three passes over the final atom types: primary
//! (formal) charges, effective charges that spread formal charge onto
//! neighbours, and partial charges from bond charge increments.

use std::collections::{BTreeSet, VecDeque};

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::*;

use crate::{AdjacencyList, Element, MoleculeGraph, ParameterSet, Symbol};

/// Terminal oxygens that share charge with their siblings on one S or P.
const SHARED_OXYGENS: [&str; 5] = ["O2S", "O3S", "O2P", "O3P", "O4P"];

fn formal_charge(graph: &MoleculeGraph, atom: usize) -> f64 {
    graph[NodeIndex::new(atom)].charge_or_zero() as f64
}

fn element(graph: &MoleculeGraph, atom: usize) -> Element {
    graph[NodeIndex::new(atom)].element
}

/// The single S or P an oxygen hangs off.
fn resonance_focus(graph: &MoleculeGraph, adjacency: &AdjacencyList, oxygen: usize) -> Option<usize> {
    let mut foci = adjacency
        .neighbors(oxygen)
        .iter()
        .copied()
        .filter(|&n| matches!(element(graph, n), Element::S | Element::P));
    match (foci.next(), foci.next()) {
        (Some(focus), None) => Some(focus),
        _ => None,
    }
}

/// Atoms of type `N5M` reachable from `start` over aromatic bonds.
fn delocalized_anion(
    adjacency: &AdjacencyList,
    symbols: &[Symbol],
    aromatic_bonds: &BTreeSet<EdgeIndex>,
    start: usize,
) -> Vec<usize> {
    let mut seen = vec![false; adjacency.len()];
    let mut queue = VecDeque::from([start]);
    let mut members = Vec::new();
    seen[start] = true;

    while let Some(atom) = queue.pop_front() {
        if symbols[atom] == "N5M" {
            members.push(atom);
        }
        for &nbr in adjacency.neighbors(atom) {
            let aromatic = adjacency
                .bond(atom, nbr)
                .is_some_and(|bond| aromatic_bonds.contains(&bond));
            if aromatic && !seen[nbr] {
                seen[nbr] = true;
                queue.push_back(nbr);
            }
        }
    }
    members
}

/// Formal charges by type, with resonance-equivalent atoms sharing the
/// formal charge of their group equally.
pub fn primary_charges(
    graph: &MoleculeGraph,
    adjacency: &AdjacencyList,
    symbols: &[Symbol],
    aromatic_bonds: &BTreeSet<EdgeIndex>,
    params: &ParameterSet,
) -> Vec<f64> {
    let mut charges: Vec<f64> = symbols
        .iter()
        .map(|symbol| params.formal_charge(symbol).unwrap_or(0.0))
        .collect();

    for (atom, symbol) in symbols.iter().enumerate() {
        if SHARED_OXYGENS.contains(&symbol.as_str()) {
            let Some(focus) = resonance_focus(graph, adjacency, atom) else {
                warn!("{} oxygen {} has no unique S/P neighbour, charge not shared", symbol, atom);
                continue;
            };
            let siblings: Vec<usize> = adjacency
                .neighbors(focus)
                .iter()
                .copied()
                .filter(|&n| symbols[n] == *symbol && adjacency.degree(n) == 1)
                .collect();
            let total: f64 = siblings.iter().map(|&n| formal_charge(graph, n)).sum();
            charges[atom] = total / siblings.len() as f64;
        } else if *symbol == "N5M" {
            let members = delocalized_anion(adjacency, symbols, aromatic_bonds, atom);
            let total: f64 = members.iter().map(|&n| formal_charge(graph, n)).sum();
            charges[atom] = total / members.len() as f64;
        }
    }
    charges
}

/// Spreads primary charges onto neighbours. Every value is computed from
/// the untouched `primary` charges, so atoms never see each other's
/// updates.
pub fn effective_charges(
    adjacency: &AdjacencyList,
    int_types: &[Option<u32>],
    primary: &[f64],
    params: &ParameterSet,
) -> Vec<f64> {
    let nm = params.int_type(&Symbol::new("NM"));
    let mut scratch = primary.to_vec();

    for atom in 0..adjacency.len() {
        let Some(int_type) = int_types[atom] else {
            continue;
        };
        let Some(props) = params.properties(int_type) else {
            continue;
        };
        let nbrs = adjacency.neighbors(atom);

        if props.fcadj == 0.0 {
            for &nbr in nbrs {
                if primary[nbr] < 0.0 {
                    scratch[atom] += primary[nbr] / (2.0 * adjacency.degree(nbr) as f64);
                }
            }
        }
        if Some(int_type) == nm {
            for &nbr in nbrs {
                if primary[nbr] > 0.0 {
                    scratch[atom] -= primary[nbr] / 2.0;
                }
            }
        }
        if props.fcadj != 0.0 {
            let shared: f64 = nbrs.iter().map(|&nbr| primary[nbr]).sum();
            scratch[atom] = (1.0 - props.crd as f64 * props.fcadj) * scratch[atom] + props.fcadj * shared;
        }
    }
    scratch
}

/// Effective charges plus the bond charge increments of every bond between
/// two typed atoms.
pub fn partial_charges(
    graph: &MoleculeGraph,
    int_types: &[Option<u32>],
    effective: &[f64],
    aromatic_bonds: &BTreeSet<EdgeIndex>,
    params: &ParameterSet,
) -> Vec<f64> {
    let mut charges = effective.to_vec();

    for edge in graph.edge_references() {
        let (a, b) = (edge.source().index(), edge.target().index());
        let (Some(ta), Some(tb)) = (int_types[a], int_types[b]) else {
            continue;
        };
        let class = params.bond_class(ta, tb, edge.weight().order, aromatic_bonds.contains(&edge.id()));
        let increment = params.bond_charge_increment(class, ta, tb).or_else(|| {
            trace!("no tabulated increment for {}-{} (class {}), using pbci", ta, tb, class);
            params.empirical_bond_charge_increment(ta, tb)
        });
        if let Some(increment) = increment {
            charges[a] += increment;
            charges[b] -= increment;
        }
    }
    charges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fixtures, init_logging, Atom, BondOrder, Mmff, Molecule};

    /// Types `mol` and returns its primary charges.
    fn primary(mol: &mut Molecule) -> anyhow::Result<Vec<f64>> {
        Mmff::new().assign_atom_types(mol)?;
        let perception = mol.perception().ok_or_else(|| anyhow::anyhow!("untyped"))?;
        let symbols: Vec<Symbol> = mol
            .atom_types()
            .into_iter()
            .map(|t| t.unwrap_or_else(Symbol::unknown))
            .collect();
        Ok(primary_charges(
            mol.graph(),
            &perception.adjacency,
            &symbols,
            &perception.aromatic_bonds,
            ParameterSet::mmff94(),
        ))
    }

    #[test]
    fn sulfonate_oxygens_share_equally() -> anyhow::Result<()> {
        init_logging("debug");
        let mut mol = fixtures::methanesulfonate();
        let charges = primary(&mut mol)?;
        for &o in &[2, 3, 4] {
            assert!((charges[o] + 1.0 / 3.0).abs() < 1e-12);
        }
        assert_eq!(charges[2], charges[3]);
        assert_eq!(charges[3], charges[4]);
        assert_eq!(charges[1], 0.0);
        Ok(())
    }

    #[test]
    fn tetrazolide_nitrogens_share_the_anion() -> anyhow::Result<()> {
        let mut mol = fixtures::tetrazolide();
        let charges = primary(&mut mol)?;
        for n in 0..4 {
            assert!((charges[n] + 0.25).abs() < 1e-12);
        }
        assert_eq!(charges[4], 0.0);
        Ok(())
    }

    #[test]
    fn carboxylate_charge_is_conserved() -> anyhow::Result<()> {
        let mut mol = fixtures::acetate();
        let charges = primary(&mut mol)?;
        assert_eq!(charges[2], -0.5);
        assert_eq!(charges[3], -0.5);

        let perception = mol.perception().ok_or_else(|| anyhow::anyhow!("untyped"))?;
        let params = ParameterSet::mmff94();
        let effective = effective_charges(&perception.adjacency, &perception.int_types, &charges, params);
        assert!((effective[2] + 0.25).abs() < 1e-12);
        assert!((effective[1] + 0.5).abs() < 1e-12);
        assert!((effective.iter().sum::<f64>() + 1.0).abs() < 1e-9);

        let partial = partial_charges(mol.graph(), &perception.int_types, &effective, &perception.aromatic_bonds, params);
        assert!((partial.iter().sum::<f64>() + 1.0).abs() < 1e-9);
        assert!(partial[2] < effective[2]);
        Ok(())
    }

    #[test]
    fn nm_subtraction_adds_to_negative_sharing() -> anyhow::Result<()> {
        // NM with no formal charge adjustment, so both rules fire
        let params = ParameterSet::from_csv(
            "symbol,type\nNM,62\n",
            "symbol,charge\n",
            "type,crd,sbmb,pbci,fcadj\n62,2,0,0.0,0.0\n",
            "class,type_i,type_j,bci\n",
        )?;
        let mut mol = Molecule::new();
        let n = mol.add_atom(Atom::new(Element::N));
        let cation = mol.add_atom(Atom::new(Element::Other(11)));
        let anion = mol.add_atom(Atom::new(Element::Cl));
        mol.add_bond(n, cation, BondOrder::Single);
        mol.add_bond(n, anion, BondOrder::Single);
        let adjacency = AdjacencyList::from_graph(mol.graph());

        let effective = effective_charges(&adjacency, &[Some(62), None, None], &[0.0, 1.0, -1.0], &params);
        assert!((effective[0] + 1.0).abs() < 1e-12);
        assert_eq!(&effective[1..], &[1.0, -1.0]);
        Ok(())
    }

    #[test]
    fn untyped_atoms_keep_primary_charge() {
        let mut mol = Molecule::new();
        let a = mol.add_atom(Atom::new(Element::B));
        let b = mol.add_atom(Atom::new(Element::C));
        mol.add_bond(a, b, BondOrder::Single);
        let adjacency = AdjacencyList::from_graph(mol.graph());
        let params = ParameterSet::mmff94();

        let effective = effective_charges(&adjacency, &[None, Some(1)], &[0.5, -0.5], params);
        assert_eq!(effective[0], 0.5);
        let partial = partial_charges(mol.graph(), &[None, Some(1)], &effective, &BTreeSet::new(), params);
        assert_eq!(partial, effective);
    }

    #[test]
    fn untabulated_bonds_use_pbci() -> anyhow::Result<()> {
        let mut mol = Molecule::new();
        let a = mol.add_atom(Atom::new(Element::C));
        let b = mol.add_atom(Atom::new(Element::I));
        mol.add_bond(a, b, BondOrder::Single);
        let params = ParameterSet::mmff94();
        let partial = partial_charges(mol.graph(), &[Some(77), Some(14)], &[0.0, 0.0], &BTreeSet::new(), params);
        let expected = params.empirical_bond_charge_increment(77, 14).unwrap_or_default();
        assert!((partial[0] - expected).abs() < 1e-12);
        assert!((partial[1] + expected).abs() < 1e-12);
        Ok(())
    }
}
