//! Type error kinds.
//!
//! Every failure short-circuits the pass that produced it -- there is no
//! partial environment on error, unlike the teacher's diagnostics-first
//! `InferCtx::errors` accumulation.

use std::fmt;

use crate::ty::Ty;

/// A type-inference error.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeError {
    /// Attempted to bind `var := ty` where `var` occurs free in `ty`.
    OccursCheck { var: u32, ty: Ty },
    /// Reference to an identifier with no scheme in the current environment.
    NoVariable(String),
    /// Two types could not be made equal (includes tuple-arity mismatch).
    UnificationFailed(Ty, Ty),
    /// Reserved for dynamic pattern-match mismatches; unused by this
    /// inferencer, carried for completeness alongside the other variants.
    PatternMatchingError,
    /// A construct this core does not support, e.g. a recursive binding
    /// whose pattern is not a plain variable.
    NotImplemented(String),
    /// `let` with zero bindings.
    EmptyLet,
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::OccursCheck { var, ty } => {
                write!(f, "occurs check failed: '{var} occurs in {ty}")
            }
            TypeError::NoVariable(name) => write!(f, "unbound variable {name}"),
            TypeError::UnificationFailed(a, b) => {
                write!(f, "cannot unify {a} with {b}")
            }
            TypeError::PatternMatchingError => write!(f, "pattern matching error"),
            TypeError::NotImplemented(what) => write!(f, "not implemented: {what}"),
            TypeError::EmptyLet => write!(f, "let with no bindings"),
        }
    }
}

impl std::error::Error for TypeError {}
