//! MMFF aromaticity.
//!
//! Five- and six-membered rings are accepted as aromatic when their pi
//! electron count satisfies Huckel's rule, repeating until no new ring is
//! found so that aromaticity can spread through fused systems. Atoms of
//! accepted rings then trade their provisional symbols for aromatic ones.

use std::collections::BTreeSet;

use petgraph::graph::{EdgeIndex, NodeIndex};
use tracing::*;

use crate::rings::walk_edges;
use crate::{AdjacencyList, Element, MoleculeGraph, Symbol};

/// The atom across an atom's double bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoubleBondPartner {
    None,
    /// More than one double bond.
    Ambiguous,
    Atom(usize),
}

/// Pi electrons an atom can donate to a ring, from its element, its number
/// of connections `x` and the sum of its bond orders `v`.
pub fn contribution(element: Element, x: u8, v: u8) -> Option<u8> {
    match (element, x, v) {
        (Element::C, 3, 4) => Some(1),
        (Element::N, 2, 3) | (Element::N, 3, 4) => Some(1),
        (Element::N, 3, 3) | (Element::N, 2, 2) => Some(2),
        (Element::O, 2, 2) | (Element::S, 2, 2) => Some(2),
        _ => None,
    }
}

/// Per-atom contributions and double bond partners. Atoms with more than one
/// double bond never contribute.
pub fn pi_electrons(graph: &MoleculeGraph, adjacency: &AdjacencyList) -> (Vec<Option<u8>>, Vec<DoubleBondPartner>) {
    let n = adjacency.len();
    let mut contributions = Vec::with_capacity(n);
    let mut partners = Vec::with_capacity(n);

    for atom in 0..n {
        let mut valence = 0u8;
        let mut partner = DoubleBondPartner::None;
        for &nbr in adjacency.neighbors(atom) {
            let order = adjacency
                .bond(atom, nbr)
                .map(|e| graph[e].order.numeric())
                .unwrap_or(0);
            valence += order;
            if order == 2 {
                partner = match partner {
                    DoubleBondPartner::None => DoubleBondPartner::Atom(nbr),
                    _ => DoubleBondPartner::Ambiguous,
                };
            }
        }
        let element = graph[NodeIndex::new(atom)].element;
        let x = adjacency.degree(atom) as u8;
        contributions.push(match partner {
            DoubleBondPartner::Ambiguous => None,
            _ => contribution(element, x, valence),
        });
        partners.push(partner);
    }
    (contributions, partners)
}

/// Huckel test for one closed walk, given the atoms already known to be
/// aromatic.
pub fn is_aromatic_ring(
    walk: &[usize],
    contributions: &[Option<u8>],
    partners: &[DoubleBondPartner],
    aromatic: &[bool],
) -> bool {
    let len = walk.len() - 1;
    let mut sum = 0u32;
    for i in 0..len {
        let atom = walk[i];
        let Some(electrons) = contributions[atom] else {
            return false;
        };
        if electrons == 1 {
            let prev = walk[(i + len - 1) % len];
            let next = walk[i + 1];
            match partners[atom] {
                DoubleBondPartner::Atom(p) if p == prev || p == next || aromatic[p] => {}
                _ => return false,
            }
        }
        sum += electrons as u32;
    }
    sum >= 2 && (sum - 2) % 4 == 0
}

/// Rotates an open 5-ring so its only two-electron donor comes first.
pub fn normalise_five_ring(walk: &[usize], contributions: &[Option<u8>]) -> Option<[usize; 5]> {
    let ring = &walk[..5];
    let mut donors = (0..5).filter(|&i| contributions[ring[i]] == Some(2));
    let start = match (donors.next(), donors.next()) {
        (Some(i), None) => i,
        _ => return None,
    };
    let mut rotated = [0; 5];
    for (k, slot) in rotated.iter_mut().enumerate() {
        *slot = ring[(start + k) % 5];
    }
    Some(rotated)
}

pub fn remap_six(symbol: &str) -> Option<&'static str> {
    match symbol {
        "NCN+" | "N+=C" | "N+=N" => Some("NPD+"),
        "N2OX" => Some("NPOX"),
        "N=C" | "N=N" => Some("NPYD"),
        s if s.starts_with('C') => Some("CB"),
        _ => None,
    }
}

pub fn remap_hetero(symbol: &str) -> Option<&'static str> {
    match symbol {
        "S" => Some("STHI"),
        "-O-" | "OC=C" | "OC=N" => Some("OFUR"),
        "NCN+" | "NGD+" => Some("NIM+"),
        "NM" => Some("N5M"),
        "NC=C" | "NC=N" | "NN=C" | "NN=N" | "NC=O" | "NC=S" | "NR" | "NSO2" | "NC%N" => Some("NPYL"),
        _ => None,
    }
}

pub fn remap_alpha(symbol: &str) -> Option<&'static str> {
    match symbol {
        "C=C" | "C=N" | "CSP2" | "CGD" | "CB" => Some("C5A"),
        "CNN+" | "CGD+" => Some("CIM+"),
        "N=C" | "N=N" => Some("N5A"),
        "NCN+" | "N+=C" | "N+=N" | "NGD+" => Some("N5A+"),
        "N2OX" => Some("N5AX"),
        _ => None,
    }
}

pub fn remap_beta(symbol: &str) -> Option<&'static str> {
    match symbol {
        "C=C" | "C=N" | "CSP2" | "CGD" | "CB" => Some("C5B"),
        "CNN+" | "CGD+" => Some("CIM+"),
        "N=C" | "N=N" => Some("N5B"),
        "NCN+" | "N+=C" | "N+=N" | "NGD+" => Some("N5B+"),
        "N2OX" => Some("N5BX"),
        _ => None,
    }
}

/// Drops the alpha/beta marker of `C5A`, `N5B+` and friends.
fn collapse_position(symbol: &str) -> String {
    for marker in ["5A", "5B"] {
        if let Some(stem) = symbol.strip_suffix(marker) {
            return format!("{}5", stem);
        }
        if let Some(stem) = symbol.strip_suffix(&format!("{}+", marker)) {
            return format!("{}5+", stem);
        }
    }
    symbol.to_owned()
}

fn remap_neighbor(symbol: &Symbol, table: fn(&str) -> Option<&'static str>, imidazolium: bool, anion: bool) -> Symbol {
    let key = if anion && symbol.starts_with('N') { "N5M" } else { symbol.as_str() };
    let mapped = table(key).unwrap_or(key);
    if imidazolium || anion {
        Symbol::from(collapse_position(mapped))
    } else {
        Symbol::new(mapped)
    }
}

/// Outcome of [`classify_aromaticity`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AromaticClassification {
    pub symbols: Vec<Symbol>,
    pub aromatic_bonds: BTreeSet<EdgeIndex>,
    /// Accepted rings as closed walks, six-membered first.
    pub rings: Vec<Vec<usize>>,
}

pub fn classify_aromaticity(
    graph: &MoleculeGraph,
    adjacency: &AdjacencyList,
    cycles: &[Vec<usize>],
    provisional: &[Symbol],
) -> AromaticClassification {
    let (contributions, partners) = pi_electrons(graph, adjacency);
    let mut aromatic = vec![false; adjacency.len()];
    let mut candidates: Vec<&Vec<usize>> = cycles
        .iter()
        .filter(|walk| walk.len() == 6 || walk.len() == 7)
        .collect();
    let (mut sixes, mut fives) = (Vec::new(), Vec::new());

    loop {
        let before = candidates.len();
        candidates.retain(|walk| {
            if !is_aromatic_ring(walk, &contributions, &partners, &aromatic) {
                return true;
            }
            for &atom in walk.iter() {
                aromatic[atom] = true;
            }
            if walk.len() == 7 {
                sixes.push(walk.to_vec());
            } else {
                fives.push(walk.to_vec());
            }
            false
        });
        if candidates.len() == before {
            break;
        }
    }
    debug!("{} six- and {} five-membered aromatic ring(s)", sixes.len(), fives.len());

    let mut symbols = provisional.to_vec();
    for walk in &sixes {
        for &atom in &walk[..6] {
            if let Some(mapped) = remap_six(symbols[atom].as_str()) {
                symbols[atom] = Symbol::new(mapped);
            }
        }
    }

    for walk in &fives {
        let Some(ring) = normalise_five_ring(walk, &contributions) else {
            debug!("five-membered ring {:?} has no unique donor, symbols kept", walk);
            continue;
        };
        let hetero = &provisional[ring[0]];
        let imidazolium = *hetero == "NCN+" || *hetero == "NGD+";
        let anion = *hetero == "NM";

        if let Some(mapped) = remap_hetero(symbols[ring[0]].as_str()) {
            symbols[ring[0]] = Symbol::new(mapped);
        }
        for i in [1, 4] {
            symbols[ring[i]] = remap_neighbor(&symbols[ring[i]], remap_alpha, imidazolium, anion);
        }
        for i in [2, 3] {
            symbols[ring[i]] = remap_neighbor(&symbols[ring[i]], remap_beta, imidazolium, anion);
        }
    }

    let mut aromatic_bonds = BTreeSet::new();
    for walk in sixes.iter().chain(fives.iter()) {
        for (u, v) in walk_edges(walk) {
            if let Some(bond) = adjacency.bond(u, v) {
                aromatic_bonds.insert(bond);
            }
        }
    }

    let mut rings = sixes;
    rings.extend(fives);
    AromaticClassification {
        symbols,
        aromatic_bonds,
        rings,
    }
}
