use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::PerceptionError;

/// Symbols of the first five periods, indexed by atomic number.
const SYMBOLS: [&str; 55] = [
    "*", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
    "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge",
    "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe",
];

/// A chemical element.
///
/// The elements MMFF typing has rules for are named; everything else is
/// carried by atomic number and always ends up untyped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    H,
    B,
    C,
    N,
    O,
    F,
    Si,
    P,
    S,
    Cl,
    Br,
    I,
    Other(u8),
}

impl Element {
    pub fn from_atomic_number(z: u8) -> Self {
        match z {
            1 => Element::H,
            5 => Element::B,
            6 => Element::C,
            7 => Element::N,
            8 => Element::O,
            9 => Element::F,
            14 => Element::Si,
            15 => Element::P,
            16 => Element::S,
            17 => Element::Cl,
            35 => Element::Br,
            53 => Element::I,
            other => Element::Other(other),
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        SYMBOLS
            .iter()
            .skip(1)
            .position(|s| s.eq_ignore_ascii_case(symbol))
            .map(|i| Element::from_atomic_number(i as u8 + 1))
    }

    pub fn atomic_number(self) -> u8 {
        match self {
            Element::H => 1,
            Element::B => 5,
            Element::C => 6,
            Element::N => 7,
            Element::O => 8,
            Element::F => 9,
            Element::Si => 14,
            Element::P => 15,
            Element::S => 16,
            Element::Cl => 17,
            Element::Br => 35,
            Element::I => 53,
            Element::Other(z) => z,
        }
    }

    pub fn symbol(self) -> &'static str {
        SYMBOLS
            .get(self.atomic_number() as usize)
            .copied()
            .unwrap_or("*")
    }

    pub fn is_halogen(self) -> bool {
        matches!(self, Element::F | Element::Cl | Element::Br | Element::I)
    }

    /// Nitrogen, oxygen, sulfur or phosphorus.
    pub fn is_hetero(self) -> bool {
        matches!(self, Element::N | Element::O | Element::S | Element::P)
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Element {
    type Err = PerceptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Element::from_symbol(s.trim()).ok_or_else(|| PerceptionError::UnknownElement(s.to_owned()))
    }
}
