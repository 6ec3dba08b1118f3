//! Hindley-Milner type inference over the `mlcore-ast` surface language.
//!
//! `Ty`/`Scheme`, `Subst`, `TypeEnv`, `InferCtx` and the `infer_*` family,
//! the initial builtin environment, and the human-readable
//! `val <name> : <type>` report format.

pub mod annot;
pub mod builtins;
pub mod env;
pub mod error;
pub mod infer;
pub mod subst;
pub mod ty;

pub use crate::env::TypeEnv;
pub use crate::error::TypeError;
pub use crate::infer::{infer_exp, infer_pat, infer_str_item, infer_structure, InferCtx};
pub use crate::subst::Subst;
pub use crate::ty::{Scheme, Ty, TyVar};

use mlcore_ast::Structure;

/// Run inference over a whole structure and render the resulting
/// environment's new top-level bindings as `val <name> : <type>` lines,
/// one per binding introduced by `structure`, in source order.
///
/// Builtins are excluded: the report only ever describes bindings the
/// program itself introduced.
pub fn report(structure: &Structure) -> Result<String, TypeError> {
    let mut ctx = InferCtx::new();
    let mut env = builtins::initial_env();
    let mut lines = Vec::new();

    for item in structure {
        env = infer::infer_str_item(&mut ctx, &env, item)?;
        for name in newly_bound_names(item) {
            if let Some(scheme) = env.lookup(&name) {
                lines.push(format!("val {name} : {scheme}"));
            }
        }
    }

    Ok(lines.join("\n"))
}

fn newly_bound_names(item: &mlcore_ast::StructureItem) -> Vec<String> {
    match item {
        mlcore_ast::StructureItem::SEval(_) => Vec::new(),
        mlcore_ast::StructureItem::SValue(_, bindings) => bindings
            .iter()
            .flat_map(|(pat, _)| pat.bound_vars().into_iter().map(str::to_string))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlcore_ast::{Expr, Pattern, Rec, StructureItem};

    #[test]
    fn report_renders_val_lines_in_source_order() {
        let structure = vec![
            StructureItem::SValue(
                Rec::NonRec,
                vec![(Pattern::Var("x".into()), Expr::Const(mlcore_ast::Constant::Int(1)))],
            ),
            StructureItem::SValue(
                Rec::NonRec,
                vec![(
                    Pattern::Var("id".into()),
                    Expr::Fun(
                        Pattern::Var("a".into()),
                        Box::new(Expr::Var("a".into())),
                    ),
                )],
            ),
        ];
        let report = report(&structure).unwrap();
        assert_eq!(report, "val x : int\nval id : 'a -> 'a");
    }

    #[test]
    fn report_propagates_inference_errors() {
        let structure = vec![StructureItem::SValue(
            Rec::NonRec,
            vec![(Pattern::Var("x".into()), Expr::Var("unbound".into()))],
        )];
        assert!(matches!(report(&structure), Err(TypeError::NoVariable(_))));
    }
}
