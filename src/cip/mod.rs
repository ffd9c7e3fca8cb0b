//! Cahn-Ingold-Prelog descriptors.
//!
//! Callers describe a stereocenter by listing its ligands together with the
//! observed arrangement; [`CipAssigner`] ranks the ligands and turns that
//! arrangement into R/S or E/Z.

use std::fmt::{Display, Formatter, Result as FmtResult};

use petgraph::graph::NodeIndex;
use tracing::*;

use crate::MoleculeGraph;

mod ligand;
pub use ligand::{compare, permutation_parity, LigandTree};

/// Looking from the first ligand, the direction the remaining three run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winding {
    Clockwise,
    Anticlockwise,
}

impl Winding {
    pub fn invert(self) -> Self {
        match self {
            Winding::Clockwise => Winding::Anticlockwise,
            Winding::Anticlockwise => Winding::Clockwise,
        }
    }
}

/// Whether the two reference atoms of a double bond sit on the same side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conformation {
    Together,
    Opposite,
}

impl Conformation {
    pub fn invert(self) -> Self {
        match self {
            Conformation::Together => Conformation::Opposite,
            Conformation::Opposite => Conformation::Together,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipLabel {
    R,
    S,
    E,
    Z,
}

impl Display for CipLabel {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let label = match self {
            CipLabel::R => "R",
            CipLabel::S => "S",
            CipLabel::E => "E",
            CipLabel::Z => "Z",
        };
        write!(f, "{}", label)
    }
}

/// A tetrahedral center. `None` ligands stand for implicit hydrogens on the
/// focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TetrahedralCenter {
    pub focus: NodeIndex,
    pub ligands: [Option<NodeIndex>; 4],
    pub winding: Winding,
}

/// A stereogenic double bond `begin=end`. `references[0]` is bonded to
/// `begin`, `references[1]` to `end`, and `conformation` relates the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoubleBondCenter {
    pub begin: NodeIndex,
    pub end: NodeIndex,
    pub references: [NodeIndex; 2],
    pub conformation: Conformation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stereocenter {
    Tetrahedral(TetrahedralCenter),
    DoubleBond(DoubleBondCenter),
}

impl From<TetrahedralCenter> for Stereocenter {
    fn from(center: TetrahedralCenter) -> Self {
        Stereocenter::Tetrahedral(center)
    }
}

impl From<DoubleBondCenter> for Stereocenter {
    fn from(center: DoubleBondCenter) -> Self {
        Stereocenter::DoubleBond(center)
    }
}

/// Ranks ligands over a borrowed molecular graph. The graph is never
/// mutated, so one assigner can label any number of centers.
#[derive(Debug, Clone, Copy)]
pub struct CipAssigner<'g> {
    graph: &'g MoleculeGraph,
    max_depth: usize,
}

impl<'g> CipAssigner<'g> {
    pub const DEFAULT_MAX_DEPTH: usize = 8;

    pub fn new(graph: &'g MoleculeGraph) -> Self {
        Self {
            graph,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit how many spheres out from a stereocenter ligands are explored.
    /// Ligands still tied at the limit leave the center unlabelled.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The CIP label of `center`, or `None` if two ligands tie or the center
    /// does not fit the graph.
    pub fn assign(&self, center: &Stereocenter) -> Option<CipLabel> {
        match center {
            Stereocenter::Tetrahedral(center) => self.assign_tetrahedral(center),
            Stereocenter::DoubleBond(center) => self.assign_double_bond(center),
        }
    }

    fn contains(&self, atom: NodeIndex) -> bool {
        atom.index() < self.graph.node_count()
    }

    fn trees(&self, center: NodeIndex, ligands: &[Option<NodeIndex>]) -> Vec<LigandTree> {
        ligands
            .iter()
            .map(|&ligand| LigandTree::build(self.graph, center, ligand, self.max_depth))
            .collect()
    }

    /// Parity of sorting `ligands` of `center` by descending priority.
    fn parity(&self, center: NodeIndex, ligands: &[Option<NodeIndex>]) -> i32 {
        let trees = self.trees(center, ligands);
        let order: Vec<usize> = (0..trees.len()).collect();
        permutation_parity(&order, |&a, &b| compare(&trees[a], &trees[b]))
    }

    pub fn assign_tetrahedral(&self, center: &TetrahedralCenter) -> Option<CipLabel> {
        if !self.contains(center.focus) {
            return None;
        }
        let explicit = center.ligands.iter().flatten();
        for &ligand in explicit {
            if !self.contains(ligand) || self.graph.find_edge(center.focus, ligand).is_none() {
                debug!("ligand {} is not bonded to {}", ligand.index(), center.focus.index());
                return None;
            }
        }

        let winding = match self.parity(center.focus, &center.ligands) {
            0 => {
                trace!("tied ligands on {}", center.focus.index());
                return None;
            }
            parity if parity < 0 => center.winding.invert(),
            _ => center.winding,
        };
        Some(match winding {
            Winding::Clockwise => CipLabel::R,
            Winding::Anticlockwise => CipLabel::S,
        })
    }

    /// Substituents of one double bond end, excluding the other end, with
    /// implicit hydrogens listed last.
    fn side(&self, atom: NodeIndex, other: NodeIndex) -> Vec<Option<NodeIndex>> {
        let mut ligands: Vec<Option<NodeIndex>> = self
            .graph
            .neighbors(atom)
            .filter(|&n| n != other)
            .map(Some)
            .collect();
        ligands.extend((0..self.graph[atom].implicit_hydrogens).map(|_| None));
        ligands
    }

    pub fn assign_double_bond(&self, center: &DoubleBondCenter) -> Option<CipLabel> {
        if ![center.begin, center.end].into_iter().all(|a| self.contains(a)) {
            return None;
        }
        self.graph.find_edge(center.begin, center.end)?;

        let mut conformation = center.conformation;
        let ends = [(center.begin, center.end), (center.end, center.begin)];
        for ((atom, other), reference) in ends.into_iter().zip(center.references) {
            let ligands = self.side(atom, other);
            if ligands.is_empty() || ligands.len() > 2 || !ligands.contains(&Some(reference)) {
                debug!("reference {} does not fit double bond end {}", reference.index(), atom.index());
                return None;
            }
            // make the conformation relative to the first listed ligand
            if ligands[0] != Some(reference) {
                conformation = conformation.invert();
            }
            match self.parity(atom, &ligands) {
                0 => return None,
                parity if parity < 0 => conformation = conformation.invert(),
                _ => {}
            }
        }

        Some(match conformation {
            Conformation::Together => CipLabel::Z,
            Conformation::Opposite => CipLabel::E,
        })
    }
}
