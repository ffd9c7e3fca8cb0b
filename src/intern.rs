use std::{
    collections::HashMap,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    sync::{Arc, RwLock},
};

use lazy_static::lazy_static;

lazy_static! {
    static ref INTERNED_SYMBOLS: RwLock<HashMap<String, Symbol>> = RwLock::new(HashMap::new());
}

/// The symbol given to atoms no typing rule matched.
pub const UNKNOWN_SYMBOL: &str = "UNK";

/// An interned MMFF symbolic atom type such as `CR`, `NPYD` or `O2CM`.
///
/// Every molecule reuses the same few dozen type names, so symbols are
/// interned and cloning one is a reference count bump.
#[allow(clippy::derived_hash_with_manual_eq, clippy::derive_ord_xor_partial_ord)]
#[derive(Clone, Hash, Eq, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: &str) -> Self {
        if let Some(symbol) = INTERNED_SYMBOLS
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
        {
            return symbol.clone();
        }

        let mut symbols = INTERNED_SYMBOLS
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        symbols
            .entry(name.to_owned())
            .or_insert_with(|| Symbol(Arc::from(name)))
            .clone()
    }

    /// The `UNK` sentinel.
    pub fn unknown() -> Self {
        Symbol::new(UNKNOWN_SYMBOL)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.as_str() == UNKNOWN_SYMBOL
    }

    pub fn starts_with(&self, prefix: char) -> bool {
        self.0.starts_with(prefix)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Symbol::new(&s)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[allow(clippy::non_canonical_partial_ord_impl)]
impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        if Arc::ptr_eq(&self.0, &other.0) {
            return Some(std::cmp::Ordering::Equal);
        }
        self.0.partial_cmp(&other.0)
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
