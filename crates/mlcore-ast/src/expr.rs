//! Surface expressions.

use crate::{Constant, Pattern, Rec, TypeAnnot};

/// A surface expression.
///
/// `Let` carries exactly one `(pattern, expression)` binding; a
/// structure-level `let ... and ...` group of simultaneous bindings is
/// represented separately by `StructureItem::SValue`.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Const(Constant),
    Var(String),
    Apply(Box<Expr>, Box<Expr>),
    If(Box<Expr>, Box<Expr>, Box<Expr>),
    Fun(Pattern, Box<Expr>),
    Let(Rec, Box<Pattern>, Box<Expr>, Box<Expr>),
    Match(Box<Expr>, Vec<(Pattern, Expr)>),
    Tuple(Vec<Expr>),
    Cons(Box<Expr>, Box<Expr>),
    Constraint(Box<Expr>, TypeAnnot),
}

impl Expr {
    /// Convenience constructor for the common non-recursive `let`.
    pub fn let_nonrec(pat: Pattern, bound: Expr, body: Expr) -> Expr {
        Expr::Let(Rec::NonRec, Box::new(pat), Box::new(bound), Box::new(body))
    }

    /// Convenience constructor for a recursive `let`.
    pub fn let_rec(pat: Pattern, bound: Expr, body: Expr) -> Expr {
        Expr::Let(Rec::Rec, Box::new(pat), Box::new(bound), Box::new(body))
    }
}
