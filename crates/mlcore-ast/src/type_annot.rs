//! Surface type annotations, as written by the programmer.
//!
//! These are distinct from `mlcore_infer::ty::Ty`: `TypeAnnot` is what the
//! parser hands us inside a `PConstraint`/`EConstraint`, written in terms
//! of surface names. `mlcore-infer`'s `annot_to_ty` turns one of these into
//! an actual `Ty`, hashing annotation variable names to a stable `TyVar`
//! id so two occurrences of the same name (e.g. `'a`) refer to the same
//! variable.

use std::fmt;

/// A type as written in a surface annotation.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeAnnot {
    Int,
    Bool,
    String,
    Unit,
    /// A named type variable, e.g. `'a`.
    Var(String),
    List(Box<TypeAnnot>),
    Tuple(Vec<TypeAnnot>),
    Arrow(Box<TypeAnnot>, Box<TypeAnnot>),
}

impl fmt::Display for TypeAnnot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeAnnot::Int => write!(f, "int"),
            TypeAnnot::Bool => write!(f, "bool"),
            TypeAnnot::String => write!(f, "string"),
            TypeAnnot::Unit => write!(f, "unit"),
            TypeAnnot::Var(name) => write!(f, "'{name}"),
            TypeAnnot::List(inner) => write!(f, "{inner} list"),
            TypeAnnot::Tuple(elems) => {
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, " * ")?;
                    }
                    write!(f, "{e}")?;
                }
                Ok(())
            }
            TypeAnnot::Arrow(a, b) => write!(f, "{a} -> {b}"),
        }
    }
}
