use petgraph::graph::NodeIndex;
use tracing::*;

use crate::aromaticity::classify_aromaticity;
use crate::charge::{effective_charges, partial_charges, primary_charges};
use crate::molecule::Perception;
use crate::typing::{provisional_types, refine_hydrogens};
use crate::{AdjacencyList, Molecule, ParameterSet, PerceptionError, RingSearch, Symbol};

/// MMFF perception over one parameter set.
///
/// Typing runs first and caches its scratch state on the molecule; both
/// charge passes read that cache and fail with [`PerceptionError::NotTyped`]
/// without it. Nothing here holds per-molecule state, so one `Mmff` can be
/// shared across threads typing different molecules.
#[derive(Debug, Clone)]
pub struct Mmff<'p> {
    params: &'p ParameterSet,
    ring_search: RingSearch,
}

impl Default for Mmff<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Mmff<'static> {
    pub fn new() -> Self {
        Self::with_params(ParameterSet::mmff94())
    }
}

impl<'p> Mmff<'p> {
    pub fn with_params(params: &'p ParameterSet) -> Self {
        Self {
            params,
            ring_search: RingSearch::default(),
        }
    }

    pub fn with_ring_search(mut self, ring_search: RingSearch) -> Self {
        self.ring_search = ring_search;
        self
    }

    pub fn params(&self) -> &'p ParameterSet {
        self.params
    }

    /// Write an MMFF symbolic type onto every atom.
    ///
    /// Every hydrogen must be explicit; otherwise the molecule is left
    /// untouched and an error returned. Returns `false` when some atom could
    /// only be typed `UNK`.
    pub fn assign_atom_types(&self, mol: &mut Molecule) -> Result<bool, PerceptionError> {
        if let Some(atom) = mol.atoms().find(|&a| mol.atom(a).implicit_hydrogens > 0) {
            return Err(PerceptionError::InvalidInput {
                atom: atom.index(),
                implicit_hydrogens: mol.atom(atom).implicit_hydrogens,
            });
        }

        let graph = mol.graph();
        let adjacency = AdjacencyList::from_graph(graph);
        let cycles = self.ring_search.find_cycles_or_empty(&adjacency);
        debug!("{} atoms, {} ring walks", adjacency.len(), cycles.len());

        let provisional = provisional_types(graph, &adjacency, &cycles);
        let aromatic = classify_aromaticity(graph, &adjacency, &cycles, &provisional);
        let mut symbols = aromatic.symbols;
        refine_hydrogens(graph, &adjacency, &mut symbols);

        let int_types: Vec<Option<u32>> = symbols.iter().map(|s| self.params.int_type(s)).collect();
        let unknown: Vec<usize> = (0..symbols.len()).filter(|&i| symbols[i].is_unknown()).collect();

        for (i, symbol) in symbols.into_iter().enumerate() {
            trace!("atom {} typed {}", i, symbol);
            mol.atom_mut(NodeIndex::new(i)).atom_type = Some(symbol);
        }
        mol.set_perception(Perception {
            adjacency,
            int_types,
            aromatic_bonds: aromatic.aromatic_bonds,
            aromatic_rings: aromatic.rings,
        });

        if !unknown.is_empty() {
            warn!("no MMFF type for atoms {:?}", unknown);
        }
        Ok(unknown.is_empty())
    }

    fn primary(&self, mol: &Molecule, perception: &Perception) -> Vec<f64> {
        let symbols: Vec<Symbol> = mol
            .graph()
            .node_weights()
            .map(|atom| atom.atom_type.clone().unwrap_or_else(Symbol::unknown))
            .collect();
        primary_charges(
            mol.graph(),
            &perception.adjacency,
            &symbols,
            &perception.aromatic_bonds,
            self.params,
        )
    }

    fn write_charges(mol: &mut Molecule, charges: Vec<f64>) {
        for (i, charge) in charges.into_iter().enumerate() {
            mol.atom_mut(NodeIndex::new(i)).charge = Some(charge);
        }
    }

    /// Write formal charges spread over resonance partners and neighbours
    /// onto every atom.
    pub fn effective_charges(&self, mol: &mut Molecule) -> Result<(), PerceptionError> {
        let perception = mol.perception().ok_or(PerceptionError::NotTyped)?;
        let primary = self.primary(mol, perception);
        let charges = effective_charges(&perception.adjacency, &perception.int_types, &primary, self.params);
        Self::write_charges(mol, charges);
        Ok(())
    }

    /// Write full MMFF partial charges (effective charges plus bond charge
    /// increments) onto every atom.
    pub fn partial_charges(&self, mol: &mut Molecule) -> Result<(), PerceptionError> {
        let perception = mol.perception().ok_or(PerceptionError::NotTyped)?;
        let primary = self.primary(mol, perception);
        let effective = effective_charges(&perception.adjacency, &perception.int_types, &primary, self.params);
        let charges = partial_charges(
            mol.graph(),
            &perception.int_types,
            &effective,
            &perception.aromatic_bonds,
            self.params,
        );
        let total: f64 = charges.iter().sum();
        debug!("partial charges sum to {:.4}", total);
        Self::write_charges(mol, charges);
        Ok(())
    }

    /// Drop cached perception state; types and charges on the atoms stay.
    pub fn clear_props(&self, mol: &mut Molecule) {
        mol.clear_perception();
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::{fixtures, init_logging, Atom, BondOrder, Element};

    #[test]
    fn typing_is_idempotent() -> anyhow::Result<()> {
        init_logging("debug");
        let mmff = Mmff::new();
        let mut mol = fixtures::pyridine();
        assert!(mmff.assign_atom_types(&mut mol)?);
        let first = mol.atom_types();
        let first_bonds = mol.mmff_aromatic_bonds().cloned();

        assert!(mmff.assign_atom_types(&mut mol)?);
        assert_eq!(mol.atom_types(), first);
        assert_eq!(mol.mmff_aromatic_bonds().cloned(), first_bonds);
        Ok(())
    }

    #[test]
    fn implicit_hydrogens_are_rejected() {
        let mut mol = Molecule::new();
        let c = mol.add_atom(Atom::new(Element::C).with_implicit_hydrogens(3));
        let o = mol.add_atom(Atom::new(Element::O).with_implicit_hydrogens(1));
        mol.add_bond(c, o, BondOrder::Single);

        let err = Mmff::new().assign_atom_types(&mut mol);
        assert_eq!(
            err,
            Err(PerceptionError::InvalidInput {
                atom: 0,
                implicit_hydrogens: 3
            })
        );
        assert!(mol.atom_types().iter().all(Option::is_none));
        assert!(mol.mmff_types().is_none());
    }

    #[test]
    fn unknown_atoms_report_false() -> anyhow::Result<()> {
        let mut mol = fixtures::borane();
        assert!(!Mmff::new().assign_atom_types(&mut mol)?);
        assert_eq!(mol.atom(NodeIndex::new(0)).atom_type, Some(Symbol::unknown()));
        Ok(())
    }

    #[test]
    fn neutral_three_connected_oxygen_is_unknown() -> anyhow::Result<()> {
        let mut mol = fixtures::build(
            &[(Element::C, 0, 3), (Element::O, 0, 0), (Element::C, 0, 3), (Element::C, 0, 3)],
            &[(0, 1, BondOrder::Single), (1, 2, BondOrder::Single), (1, 3, BondOrder::Single)],
        );
        assert!(!Mmff::new().assign_atom_types(&mut mol)?);
        assert_eq!(mol.atom(NodeIndex::new(1)).atom_type, Some(Symbol::unknown()));

        mol.atom_mut(NodeIndex::new(1)).formal_charge = Some(1);
        Mmff::new().assign_atom_types(&mut mol)?;
        assert_eq!(mol.atom(NodeIndex::new(1)).atom_type, Some(Symbol::new("O+")));
        Ok(())
    }

    #[test]
    fn charges_need_types() -> anyhow::Result<()> {
        let mmff = Mmff::new();
        let mut mol = fixtures::acetate();
        assert_eq!(mmff.partial_charges(&mut mol), Err(PerceptionError::NotTyped));

        mmff.assign_atom_types(&mut mol)?;
        mmff.partial_charges(&mut mol)?;
        let total: f64 = mol.graph().node_weights().filter_map(|a| a.charge).sum();
        assert!((total + 1.0).abs() < 1e-9);

        mmff.clear_props(&mut mol);
        mmff.clear_props(&mut mol);
        assert_eq!(mmff.effective_charges(&mut mol), Err(PerceptionError::NotTyped));
        // results written to the atoms survive the clear
        assert!(mol.atom_types().iter().all(Option::is_some));
        assert!(mol.graph().node_weights().all(|a| a.charge.is_some()));
        Ok(())
    }

    #[test]
    fn effective_charges_leave_neutral_molecules_neutral() -> anyhow::Result<()> {
        let mmff = Mmff::new();
        let mut mol = fixtures::ethanol();
        mmff.assign_atom_types(&mut mol)?;
        mmff.effective_charges(&mut mol)?;
        assert!(mol.graph().node_weights().all(|a| a.charge == Some(0.0)));
        Ok(())
    }

    #[test]
    fn caller_aromatic_flags_are_untouched() -> anyhow::Result<()> {
        let mut mol = fixtures::benzene();
        for atom in mol.atoms().collect::<Vec<_>>() {
            mol.atom_mut(atom).aromatic = atom.index() == 0;
        }
        Mmff::new().assign_atom_types(&mut mol)?;

        assert!(mol.atom(NodeIndex::new(0)).aromatic);
        assert!(mol.atoms().skip(1).all(|a| !mol.atom(a).aromatic));
        assert!(mol.graph().edge_weights().all(|b| !b.aromatic));
        assert_eq!(mol.mmff_aromatic_bonds().map(|b| b.len()), Some(6));
        Ok(())
    }

    #[test]
    fn molecules_type_in_parallel() -> anyhow::Result<()> {
        let mmff = Mmff::new();
        let molecules = vec![fixtures::pyridine(), fixtures::acetic_acid(), fixtures::indole()];
        let expected: Vec<_> = molecules
            .iter()
            .cloned()
            .map(|mut mol| mmff.assign_atom_types(&mut mol).map(|_| mol.atom_types()))
            .collect::<Result<_, _>>()?;

        let typed = thread::scope(|scope| {
            let handles: Vec<_> = molecules
                .into_iter()
                .map(|mut mol| {
                    let mmff = &mmff;
                    scope.spawn(move || mmff.assign_atom_types(&mut mol).map(|_| mol.atom_types()))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().map_err(|_| anyhow::anyhow!("typing thread panicked"))?.map_err(anyhow::Error::from))
                .collect::<anyhow::Result<Vec<_>>>()
        })?;
        assert_eq!(typed, expected);
        Ok(())
    }

    #[test]
    fn ring_search_limits_apply() -> anyhow::Result<()> {
        use std::time::Duration;

        // without rings benzene is typed as a plain alkene
        let mmff = Mmff::new().with_ring_search(RingSearch::new(6, Duration::ZERO));
        let mut mol = fixtures::benzene();
        mmff.assign_atom_types(&mut mol)?;
        assert_eq!(mol.atom(NodeIndex::new(0)).atom_type, Some(Symbol::new("C=C")));
        assert_eq!(mol.mmff_aromatic_bonds().map(|b| b.len()), Some(0));
        Ok(())
    }
}
