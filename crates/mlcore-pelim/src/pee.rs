//! Post-elimination expressions (PEE): the output form of pattern
//! elimination.
//!
//! Patterns do not appear here: every binder is a plain name, the literal
//! `"()"` for a unit-valued parameter slot, or (for a dropped recursive
//! destructure, see `DESIGN.md`) the empty string.

use std::fmt;

use mlcore_ast::Constant;

/// A post-elimination expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Pee {
    Const(Constant),
    Var(String),
    Apply(Box<Pee>, Box<Pee>),
    If(Box<Pee>, Box<Pee>, Box<Pee>),
    Tuple(Vec<Pee>),
    Cons(Box<Pee>, Box<Pee>),
    /// A function taking a list of parameter names (each a plain
    /// identifier or `"()"`), plus its body.
    Fun(Vec<String>, Box<Pee>),
    /// `let <binding> in <body>`.
    Let(PeBinding, Box<Pee>),
}

/// A post-elimination binding.
#[derive(Clone, Debug, PartialEq)]
pub enum PeBinding {
    /// `name` may be empty, representing a dropped recursive destructure
    /// (see the rec-pattern limitation noted on `pe_decl`).
    NonRec(String, Box<Pee>),
    Rec(Vec<(String, Pee)>),
}

impl Pee {
    pub fn apply2(f: Pee, a: Pee, b: Pee) -> Pee {
        Pee::Apply(Box::new(Pee::Apply(Box::new(f), Box::new(a))), Box::new(b))
    }

    pub fn var(name: impl Into<String>) -> Pee {
        Pee::Var(name.into())
    }

    pub fn let_nonrec(name: impl Into<String>, bound: Pee, body: Pee) -> Pee {
        Pee::Let(PeBinding::NonRec(name.into(), Box::new(bound)), Box::new(body))
    }
}

/// Render a sub-expression, parenthesizing it unless it is already atomic
/// (a constant, a variable, or a tuple, which parenthesizes itself).
fn render_atomic(pee: &Pee) -> String {
    match pee {
        Pee::Const(_) | Pee::Var(_) | Pee::Tuple(_) => render(pee),
        _ => format!("({})", render(pee)),
    }
}

fn render(pee: &Pee) -> String {
    match pee {
        Pee::Const(c) => c.to_string(),
        Pee::Var(name) => name.clone(),
        Pee::Apply(f, x) => {
            let callee = match f.as_ref() {
                Pee::Apply(..) | Pee::Var(_) | Pee::Const(_) => render(f),
                _ => render_atomic(f),
            };
            format!("{callee} {}", render_atomic(x))
        }
        Pee::If(cond, then_e, else_e) => {
            format!("if {} then {} else {}", render(cond), render(then_e), render(else_e))
        }
        Pee::Tuple(elems) => {
            format!("({})", elems.iter().map(render).collect::<Vec<_>>().join(", "))
        }
        Pee::Cons(head, tail) => format!("{} :: {}", render_atomic(head), render(tail)),
        Pee::Fun(names, body) => format!("fun {} -> {}", names.join(" "), render(body)),
        Pee::Let(binding, body) => {
            let binder = match binding {
                PeBinding::NonRec(name, bound) => format!("let {name} = {} in", render(bound)),
                PeBinding::Rec(decls) => {
                    let joined = decls
                        .iter()
                        .map(|(name, e)| format!("{name} = {}", render(e)))
                        .collect::<Vec<_>>()
                        .join(" and ");
                    format!("let rec {joined} in")
                }
            };
            format!("{binder} {}", render(body))
        }
    }
}

impl fmt::Display for Pee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", render(self))
    }
}

impl fmt::Display for PeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeBinding::NonRec(name, bound) => write!(f, "{name} = {bound}"),
            PeBinding::Rec(decls) => {
                let joined = decls
                    .iter()
                    .map(|(name, e)| format!("{name} = {e}"))
                    .collect::<Vec<_>>()
                    .join(" and ");
                write!(f, "rec {joined}")
            }
        }
    }
}
