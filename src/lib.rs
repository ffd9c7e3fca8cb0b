//! Molecular perception for the MMFF94 force field.
//!
//! Given an explicit-hydrogen molecular graph this crate assigns MMFF symbolic
//! atom types (including the aromatic ring remapping), derives MMFF charges,
//! and labels stereocenters with CIP descriptors.

use std::str::FromStr;

use tracing::Level;

mod intern;
pub use intern::*;

mod element;
pub use element::*;

mod error;
pub use error::*;

mod molecule;
pub use molecule::*;

pub mod params;
pub use params::{AtomProperties, ParameterSet};

pub mod environment;
pub mod rings;
pub use rings::{RingSearch, RingSearchError};

pub mod typing;
pub mod aromaticity;
pub mod charge;

pub mod cip;
pub use cip::{CipAssigner, CipLabel, Conformation, DoubleBondCenter, Stereocenter, TetrahedralCenter, Winding};

mod mmff;
pub use mmff::*;

#[cfg(test)]
pub(crate) mod fixtures;

/// Install a `tracing` subscriber printing events at `level` and above.
///
/// Unknown level names fall back to `info`. Only the first call installs a
/// subscriber, so tests can call this freely.
pub fn init_logging(level: &str) {
    let level = Level::from_str(level).unwrap_or(Level::INFO);
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}
