//! Pattern elimination over the `mlcore-ast` surface language.
//!
//! Lowers every `Pattern` use (`fun`, `let`, `match`) into `Pee`: plain
//! binders plus explicit projection applications (`Cons_head`, `Cons_tail`,
//! `Tuple i`) and boolean guards built from `list_len` and `=`. `pe_expr`/
//! `pe_match`/`pe_decl`/`pe_str_item`/`pe_structure` are the public entry
//! points; `ElimCtx` carries the pass's own fresh-name counter, independent
//! of the one `mlcore-infer` uses for type variables.

pub mod elim;
pub mod error;
pub mod pee;
pub mod proj;

pub use crate::elim::{
    check_pat, create_case, pat_decls, pe_expr, pe_match, pe_str_item, pe_structure, ElimCtx,
};
pub use crate::error::PelimError;
pub use crate::pee::{PeBinding, Pee};
pub use crate::proj::{get_element, list_len, ProjKind};

use mlcore_ast::Structure;

/// Run elimination over a whole structure and render each resulting
/// top-level binding on its own line, in source order.
pub fn report(structure: &Structure) -> Result<String, PelimError> {
    let bindings = pe_structure(structure)?;
    Ok(bindings.iter().map(PeBinding::to_string).collect::<Vec<_>>().join("\n"))
}
