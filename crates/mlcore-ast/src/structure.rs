//! Top-level structure items.

use crate::{Expr, Pattern, Rec};

/// A single top-level item.
///
/// `SValue` carries a *list* of `(pattern, expr)` bindings -- a
/// `let ... and ...` group, all bound simultaneously (for `NonRec`) or
/// mutually recursively (for `Rec`). A singleton list is the common case.
#[derive(Clone, Debug, PartialEq)]
pub enum StructureItem {
    SValue(Rec, Vec<(Pattern, Expr)>),
    SEval(Expr),
}

/// An ordered sequence of top-level items -- a whole parsed module.
pub type Structure = Vec<StructureItem>;
