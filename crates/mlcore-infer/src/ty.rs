//! Type representation for the Hindley-Milner inference engine.
//!
//! Defines `Ty` (the five-way type sum), `TyVar`, and polymorphic
//! `Scheme`s. Display formatting renders arrows right-associative, tuples
//! joined by ` * `, lists suffixed with ` list`, and free variables
//! lettered deterministically.

use std::collections::BTreeSet;
use std::fmt;

/// A type variable, identified by an integer id minted by the inference
/// pass's own `Counter`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TyVar(pub u32);

/// The built-in primitive type names.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Prim {
    Int,
    Bool,
    String,
    Unit,
}

impl fmt::Display for Prim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prim::Int => write!(f, "int"),
            Prim::Bool => write!(f, "bool"),
            Prim::String => write!(f, "string"),
            Prim::Unit => write!(f, "unit"),
        }
    }
}

/// A type.
#[derive(Clone, Debug, PartialEq)]
pub enum Ty {
    Var(TyVar),
    Arrow(Box<Ty>, Box<Ty>),
    List(Box<Ty>),
    Tuple(Vec<Ty>),
    Prim(Prim),
}

impl Ty {
    pub fn var(id: u32) -> Ty {
        Ty::Var(TyVar(id))
    }

    pub fn int() -> Ty {
        Ty::Prim(Prim::Int)
    }

    pub fn bool() -> Ty {
        Ty::Prim(Prim::Bool)
    }

    pub fn string() -> Ty {
        Ty::Prim(Prim::String)
    }

    pub fn unit() -> Ty {
        Ty::Prim(Prim::Unit)
    }

    pub fn arrow(from: Ty, to: Ty) -> Ty {
        Ty::Arrow(Box::new(from), Box::new(to))
    }

    pub fn list(elem: Ty) -> Ty {
        Ty::List(Box::new(elem))
    }

    /// All `TyVar`s occurring in this type, in order of first appearance
    /// (duplicates removed).
    pub fn free_vars(&self) -> Vec<TyVar> {
        let mut out = Vec::new();
        self.collect_vars(&mut out);
        out
    }

    fn collect_vars(&self, out: &mut Vec<TyVar>) {
        match self {
            Ty::Var(v) => {
                if !out.contains(v) {
                    out.push(*v);
                }
            }
            Ty::Arrow(a, b) => {
                a.collect_vars(out);
                b.collect_vars(out);
            }
            Ty::List(t) => t.collect_vars(out),
            Ty::Tuple(ts) => {
                for t in ts {
                    t.collect_vars(out);
                }
            }
            Ty::Prim(_) => {}
        }
    }
}

/// Letter a type variable id as `'a`, `'b`, ..., `'z`, `'a1`, `'b1`, ... --
/// deterministic given a fixed numbering.
fn letter_for(index: usize) -> String {
    let letter = (b'a' + (index % 26) as u8) as char;
    let cycle = index / 26;
    if cycle == 0 {
        format!("'{letter}")
    } else {
        format!("'{letter}{cycle}")
    }
}

/// Render a type, numbering its free variables deterministically in order
/// of first appearance (left to right).
pub fn display_ty(ty: &Ty) -> String {
    let vars = ty.free_vars();
    let mut names = std::collections::HashMap::new();
    for (i, v) in vars.iter().enumerate() {
        names.insert(*v, letter_for(i));
    }
    render(ty, &names)
}

fn render(ty: &Ty, names: &std::collections::HashMap<TyVar, String>) -> String {
    match ty {
        Ty::Var(v) => names
            .get(v)
            .cloned()
            .unwrap_or_else(|| format!("'_{}", v.0)),
        Ty::Prim(p) => p.to_string(),
        Ty::List(inner) => format!("{} list", render_atomic(inner, names)),
        Ty::Tuple(elems) => elems
            .iter()
            .map(|e| render_atomic(e, names))
            .collect::<Vec<_>>()
            .join(" * "),
        Ty::Arrow(from, to) => {
            format!("{} -> {}", render_atomic(from, names), render(to, names))
        }
    }
}

/// Render a sub-type, parenthesizing it if it would otherwise be ambiguous
/// as an operand of `->`, ` * `, or ` list`.
fn render_atomic(ty: &Ty, names: &std::collections::HashMap<TyVar, String>) -> String {
    match ty {
        Ty::Arrow(..) | Ty::Tuple(..) => format!("({})", render(ty, names)),
        _ => render(ty, names),
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", display_ty(self))
    }
}

/// A polymorphic type scheme `forall vars. ty`.
#[derive(Clone, Debug, PartialEq)]
pub struct Scheme {
    pub vars: BTreeSet<TyVar>,
    pub ty: Ty,
}

impl Scheme {
    /// A monomorphic scheme -- no quantified variables.
    pub fn mono(ty: Ty) -> Scheme {
        Scheme {
            vars: BTreeSet::new(),
            ty,
        }
    }

    pub fn poly(vars: impl IntoIterator<Item = TyVar>, ty: Ty) -> Scheme {
        Scheme {
            vars: vars.into_iter().collect(),
            ty,
        }
    }

    /// The type's free variables that are not already quantified by this
    /// scheme -- the ones generalization must still close over.
    pub fn free_vars(&self) -> Vec<TyVar> {
        self.ty
            .free_vars()
            .into_iter()
            .filter(|v| !self.vars.contains(v))
            .collect()
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", display_ty(&self.ty))
    }
}
