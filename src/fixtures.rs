//! Small molecules shared by the unit tests.
//!
//! Heavy atoms come first, in the order listed; `make_hydrogens_explicit`
//! then appends hydrogens in heavy-atom order.

use petgraph::graph::NodeIndex;

use crate::{Atom, BondOrder, Element, Molecule};

use BondOrder::{Double, Single, Triple};
use Element::{Br, Cl, B, C, F, H, N, O, S};

/// `(element, formal charge, implicit hydrogens)` per atom, bonds by atom
/// position. Hydrogens stay implicit.
pub fn skeleton(atoms: &[(Element, i32, u32)], bonds: &[(usize, usize, BondOrder)]) -> Molecule {
    let mut mol = Molecule::new();
    for &(element, charge, hydrogens) in atoms {
        let mut atom = Atom::new(element).with_implicit_hydrogens(hydrogens);
        if charge != 0 {
            atom = atom.with_formal_charge(charge);
        }
        mol.add_atom(atom);
    }
    for &(a, b, order) in bonds {
        mol.add_bond(NodeIndex::new(a), NodeIndex::new(b), order);
    }
    mol
}

/// Like [`skeleton`], with every hydrogen made explicit.
pub fn build(atoms: &[(Element, i32, u32)], bonds: &[(usize, usize, BondOrder)]) -> Molecule {
    let mut mol = skeleton(atoms, bonds);
    mol.make_hydrogens_explicit();
    mol
}

pub fn acetic_acid() -> Molecule {
    build(
        &[(C, 0, 3), (C, 0, 0), (O, 0, 0), (O, 0, 1)],
        &[(0, 1, Single), (1, 2, Double), (1, 3, Single)],
    )
}

pub fn acetate() -> Molecule {
    build(
        &[(C, 0, 3), (C, 0, 0), (O, 0, 0), (O, -1, 0)],
        &[(0, 1, Single), (1, 2, Double), (1, 3, Single)],
    )
}

pub fn ethanol() -> Molecule {
    build(&[(C, 0, 3), (C, 0, 2), (O, 0, 1)], &[(0, 1, Single), (1, 2, Single)])
}

pub fn methylamine() -> Molecule {
    build(&[(C, 0, 3), (N, 0, 2)], &[(0, 1, Single)])
}

pub fn methanesulfonate() -> Molecule {
    build(
        &[(C, 0, 3), (S, 0, 0), (O, 0, 0), (O, 0, 0), (O, -1, 0)],
        &[(0, 1, Single), (1, 2, Double), (1, 3, Double), (1, 4, Single)],
    )
}

pub fn cyclopropane() -> Molecule {
    build(&[(C, 0, 2), (C, 0, 2), (C, 0, 2)], &[(0, 1, Single), (1, 2, Single), (2, 0, Single)])
}

pub fn cyclobutene() -> Molecule {
    build(
        &[(C, 0, 1), (C, 0, 1), (C, 0, 2), (C, 0, 2)],
        &[(0, 1, Double), (1, 2, Single), (2, 3, Single), (3, 0, Single)],
    )
}

pub fn acetamide() -> Molecule {
    build(
        &[(C, 0, 3), (C, 0, 0), (O, 0, 0), (N, 0, 2)],
        &[(0, 1, Single), (1, 2, Double), (1, 3, Single)],
    )
}

pub fn acetonitrile() -> Molecule {
    build(&[(C, 0, 3), (C, 0, 0), (N, 0, 0)], &[(0, 1, Single), (1, 2, Triple)])
}

pub fn borane() -> Molecule {
    build(&[(B, 0, 3)], &[])
}

pub fn benzene() -> Molecule {
    build(
        &[(C, 0, 1); 6],
        &[
            (0, 1, Double),
            (1, 2, Single),
            (2, 3, Double),
            (3, 4, Single),
            (4, 5, Double),
            (5, 0, Single),
        ],
    )
}

/// C1..C4, C4a, C5..C8, C8a with the C4a=C8a Kekulé structure.
pub fn naphthalene() -> Molecule {
    build(
        &[
            (C, 0, 1),
            (C, 0, 1),
            (C, 0, 1),
            (C, 0, 1),
            (C, 0, 0),
            (C, 0, 1),
            (C, 0, 1),
            (C, 0, 1),
            (C, 0, 1),
            (C, 0, 0),
        ],
        &[
            (0, 1, Double),
            (1, 2, Single),
            (2, 3, Double),
            (3, 4, Single),
            (4, 9, Double),
            (9, 0, Single),
            (4, 5, Single),
            (5, 6, Double),
            (6, 7, Single),
            (7, 8, Double),
            (8, 9, Single),
        ],
    )
}

pub fn pyridine() -> Molecule {
    build(
        &[(N, 0, 0), (C, 0, 1), (C, 0, 1), (C, 0, 1), (C, 0, 1), (C, 0, 1)],
        &[
            (0, 1, Double),
            (1, 2, Single),
            (2, 3, Double),
            (3, 4, Single),
            (4, 5, Double),
            (5, 0, Single),
        ],
    )
}

/// X0-C1=C2-C3=C4-X0
fn five_ring(hetero: (Element, i32, u32)) -> Molecule {
    build(
        &[hetero, (C, 0, 1), (C, 0, 1), (C, 0, 1), (C, 0, 1)],
        &[(0, 1, Single), (1, 2, Double), (2, 3, Single), (3, 4, Double), (4, 0, Single)],
    )
}

pub fn furan() -> Molecule {
    five_ring((O, 0, 0))
}

pub fn thiophene() -> Molecule {
    five_ring((S, 0, 0))
}

pub fn pyrrole() -> Molecule {
    five_ring((N, 0, 1))
}

/// N1(H), C2, N3, C4, C5
pub fn imidazole() -> Molecule {
    build(
        &[(N, 0, 1), (C, 0, 1), (N, 0, 0), (C, 0, 1), (C, 0, 1)],
        &[(0, 1, Single), (1, 2, Double), (2, 3, Single), (3, 4, Double), (4, 0, Single)],
    )
}

/// Imidazole protonated on N3.
pub fn imidazolium() -> Molecule {
    build(
        &[(N, 0, 1), (C, 0, 1), (N, 1, 1), (C, 0, 1), (C, 0, 1)],
        &[(0, 1, Single), (1, 2, Double), (2, 3, Single), (3, 4, Double), (4, 0, Single)],
    )
}

pub fn tetrazolide() -> Molecule {
    build(
        &[(N, -1, 0), (N, 0, 0), (N, 0, 0), (N, 0, 0), (C, 0, 1)],
        &[(0, 1, Single), (1, 2, Double), (2, 3, Single), (3, 4, Double), (4, 0, Single)],
    )
}

/// N1, C2, C3, C3a, C4..C7, C7a
pub fn indole() -> Molecule {
    build(
        &[
            (N, 0, 1),
            (C, 0, 1),
            (C, 0, 1),
            (C, 0, 0),
            (C, 0, 1),
            (C, 0, 1),
            (C, 0, 1),
            (C, 0, 1),
            (C, 0, 0),
        ],
        &[
            (0, 1, Single),
            (1, 2, Double),
            (2, 3, Single),
            (3, 4, Double),
            (4, 5, Single),
            (5, 6, Double),
            (6, 7, Single),
            (7, 8, Double),
            (8, 0, Single),
            (3, 8, Single),
        ],
    )
}

pub fn cyclopentadiene() -> Molecule {
    build(
        &[(C, 0, 2), (C, 0, 1), (C, 0, 1), (C, 0, 1), (C, 0, 1)],
        &[(0, 1, Single), (1, 2, Double), (2, 3, Single), (3, 4, Double), (4, 0, Single)],
    )
}

/// C, Br, Cl, F, H with every hydrogen explicit.
pub fn bromochlorofluoromethane() -> Molecule {
    build(
        &[(C, 0, 0), (Br, 0, 0), (Cl, 0, 0), (F, 0, 0), (H, 0, 0)],
        &[(0, 1, Single), (0, 2, Single), (0, 3, Single), (0, 4, Single)],
    )
}

/// C1, C2, C3, C4, O with hydrogens left implicit.
pub fn butan_2_ol() -> Molecule {
    skeleton(
        &[(C, 0, 3), (C, 0, 1), (C, 0, 2), (C, 0, 3), (O, 0, 1)],
        &[(0, 1, Single), (1, 2, Single), (2, 3, Single), (1, 4, Single)],
    )
}

/// C1, C2=C3, C4 with hydrogens left implicit.
pub fn but_2_ene() -> Molecule {
    skeleton(
        &[(C, 0, 3), (C, 0, 1), (C, 0, 1), (C, 0, 3)],
        &[(0, 1, Single), (1, 2, Double), (2, 3, Single)],
    )
}

/// A carbinol carbon carrying OH, vinyl and isopropyl, hydrogens implicit:
/// 0 focus, 1 O, 2 =CH-, 3 =CH2, 4 isopropyl CH, 5 and 6 its methyls.
pub fn vinyl_isopropyl_carbinol() -> (Molecule, NodeIndex) {
    let mol = skeleton(
        &[(C, 0, 1), (O, 0, 1), (C, 0, 1), (C, 0, 2), (C, 0, 1), (C, 0, 3), (C, 0, 3)],
        &[
            (0, 1, Single),
            (0, 2, Single),
            (2, 3, Double),
            (0, 4, Single),
            (4, 5, Single),
            (4, 6, Single),
        ],
    );
    (mol, NodeIndex::new(0))
}

/// Cl0, C1=C2, C3 with hydrogens left implicit.
pub fn chloropropene() -> Molecule {
    skeleton(
        &[(Cl, 0, 0), (C, 0, 1), (C, 0, 1), (C, 0, 3)],
        &[(0, 1, Single), (1, 2, Double), (2, 3, Single)],
    )
}
