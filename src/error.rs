use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PerceptionError {
    #[error("invalid input: atom {atom} has {implicit_hydrogens} implicit hydrogen(s), MMFF typing needs explicit hydrogens")]
    InvalidInput { atom: usize, implicit_hydrogens: u32 },
    #[error("atom types have not been assigned (or were cleared) for this molecule")]
    NotTyped,
    #[error("unknown element symbol '{0}'")]
    UnknownElement(String),
}
