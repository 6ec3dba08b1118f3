//! Pattern-elimination error kinds.
//!
//! Elimination has no failure modes beyond the precondition that its
//! input comes from a well-typed source; the one case this core still
//! rejects is a construct it does not implement.

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum PelimError {
    NotImplemented(String),
}

impl fmt::Display for PelimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PelimError::NotImplemented(what) => write!(f, "not implemented: {what}"),
        }
    }
}

impl std::error::Error for PelimError {}
