//! MMFF94 parameter tables.
//!
//! The default set is compiled into the crate as CSV and parsed once. Every
//! component takes a `&ParameterSet`, so tests can hand in reduced tables.

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use lazy_static::lazy_static;
use tracing::*;

use crate::{BondOrder, Symbol};

lazy_static! {
    static ref MMFF94: ParameterSet = ParameterSet::from_csv(
        include_str!("symbols.csv"),
        include_str!("formal_charges.csv"),
        include_str!("properties.csv"),
        include_str!("bci.csv"),
    )
    .expect("bundled MMFF94 tables are well formed");
}

/// Per-integer-type constants read by the charge model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomProperties {
    /// Coordination number.
    pub crd: u8,
    /// Single bonds between two `sbmb` atoms belong to bond class 1.
    pub sbmb: bool,
    /// Partial bond charge increment, used when no tabulated BCI exists.
    pub pbci: f64,
    /// Formal charge adjustment factor.
    pub fcadj: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    int_types: HashMap<Symbol, u32>,
    formal_charges: HashMap<Symbol, f64>,
    properties: HashMap<u32, AtomProperties>,
    bond_charge_increments: HashMap<(u8, u32, u32), f64>,
}

fn records(csv_data: &str) -> impl Iterator<Item = Result<StringRecord>> + '_ {
    ReaderBuilder::new()
        .has_headers(true)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_reader(csv_data.as_bytes())
        .into_records()
        .map(|record| record.context("malformed CSV record"))
}

fn field<T>(record: &StringRecord, column: usize) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = record
        .get(column)
        .ok_or_else(|| anyhow!("missing column {} in {:?}", column, record))?;
    raw.parse::<T>()
        .with_context(|| format!("bad value '{}' in column {} of {:?}", raw, column, record))
}

impl ParameterSet {
    /// The bundled MMFF94 tables.
    pub fn mmff94() -> &'static ParameterSet {
        &MMFF94
    }

    /// Build a parameter set from CSV text: symbol types (`symbol,type`),
    /// formal charges (`symbol,charge`), properties
    /// (`type,crd,sbmb,pbci,fcadj`) and bond charge increments
    /// (`class,type_i,type_j,bci`). Lines starting with `#` are comments.
    pub fn from_csv(symbols: &str, formal_charges: &str, properties: &str, bci: &str) -> Result<Self> {
        let mut params = ParameterSet::default();

        for record in records(symbols) {
            let record = record.context("reading symbol table")?;
            let symbol = Symbol::new(record.get(0).unwrap_or(""));
            params.int_types.insert(symbol, field(&record, 1)?);
        }

        for record in records(formal_charges) {
            let record = record.context("reading formal charge table")?;
            let symbol = Symbol::new(record.get(0).unwrap_or(""));
            params.formal_charges.insert(symbol, field(&record, 1)?);
        }

        for record in records(properties) {
            let record = record.context("reading property table")?;
            let int_type: u32 = field(&record, 0)?;
            let sbmb: u8 = field(&record, 2)?;
            params.properties.insert(
                int_type,
                AtomProperties {
                    crd: field(&record, 1)?,
                    sbmb: sbmb != 0,
                    pbci: field(&record, 3)?,
                    fcadj: field(&record, 4)?,
                },
            );
        }

        for record in records(bci) {
            let record = record.context("reading bond charge increment table")?;
            let class: u8 = field(&record, 0)?;
            let (i, j): (u32, u32) = (field(&record, 1)?, field(&record, 2)?);
            let value: f64 = field(&record, 3)?;
            // stored with the smaller type first
            if i <= j {
                params.bond_charge_increments.insert((class, i, j), value);
            } else {
                params.bond_charge_increments.insert((class, j, i), -value);
            }
        }

        debug!(
            "loaded {} symbols, {} formal charges, {} type properties, {} bond charge increments",
            params.int_types.len(),
            params.formal_charges.len(),
            params.properties.len(),
            params.bond_charge_increments.len()
        );
        Ok(params)
    }

    pub fn int_type(&self, symbol: &Symbol) -> Option<u32> {
        self.int_types.get(symbol).copied()
    }

    pub fn formal_charge(&self, symbol: &Symbol) -> Option<f64> {
        self.formal_charges.get(symbol).copied()
    }

    pub fn properties(&self, int_type: u32) -> Option<&AtomProperties> {
        self.properties.get(&int_type)
    }

    pub fn crd(&self, int_type: u32) -> Option<u8> {
        self.properties(int_type).map(|p| p.crd)
    }

    pub fn fcadj(&self, int_type: u32) -> Option<f64> {
        self.properties(int_type).map(|p| p.fcadj)
    }

    pub fn pbci(&self, int_type: u32) -> Option<f64> {
        self.properties(int_type).map(|p| p.pbci)
    }

    /// MMFF bond class: 1 for a non-aromatic single bond joining two `sbmb`
    /// types, 0 otherwise.
    pub fn bond_class(&self, a: u32, b: u32, order: BondOrder, aromatic: bool) -> u8 {
        let sbmb = |t| self.properties(t).map(|p| p.sbmb).unwrap_or(false);
        if order == BondOrder::Single && !aromatic && sbmb(a) && sbmb(b) {
            1
        } else {
            0
        }
    }

    /// Tabulated charge received by the type-`a` atom across a bond to a
    /// type-`b` atom.
    pub fn bond_charge_increment(&self, class: u8, a: u32, b: u32) -> Option<f64> {
        if a <= b {
            self.bond_charge_increments.get(&(class, a, b)).copied()
        } else {
            self.bond_charge_increments.get(&(class, b, a)).map(|v| -v)
        }
    }

    /// Charge received by the type-`a` atom estimated from the partial bond
    /// charge increments of both types.
    pub fn empirical_bond_charge_increment(&self, a: u32, b: u32) -> Option<f64> {
        Some(self.pbci(a)? - self.pbci(b)?)
    }
}
