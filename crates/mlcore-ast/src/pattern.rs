//! Surface patterns, as they appear in `let`, `fun`, and `match`.
//!
//! Patterns may nest arbitrarily here; flattening them into plain names
//! and projection expressions is the job of `mlcore-pelim`, not this
//! crate.

use crate::type_annot::TypeAnnot;

/// A surface pattern.
///
/// `Tuple` patterns are expected to have at least two sub-patterns -- a
/// one-element "tuple" has no surface syntax and never appears in a
/// well-formed tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    Any,
    Const(crate::Constant),
    Var(String),
    Cons(Box<Pattern>, Box<Pattern>),
    Tuple(Vec<Pattern>),
    Constraint(Box<Pattern>, TypeAnnot),
}

impl Pattern {
    /// All identifiers bound by this pattern, in left-to-right order of
    /// first appearance (duplicates are not expected in well-formed
    /// patterns, but are not deduplicated here -- that is a parser/elaborator
    /// concern outside this core).
    pub fn bound_vars(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_bound_vars(&mut out);
        out
    }

    fn collect_bound_vars<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Pattern::Any | Pattern::Const(_) => {}
            Pattern::Var(name) => out.push(name),
            Pattern::Cons(head, tail) => {
                head.collect_bound_vars(out);
                tail.collect_bound_vars(out);
            }
            Pattern::Tuple(pats) => {
                for p in pats {
                    p.collect_bound_vars(out);
                }
            }
            Pattern::Constraint(inner, _) => inner.collect_bound_vars(out),
        }
    }
}
