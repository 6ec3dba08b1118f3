//! Converting surface `TypeAnnot` trees into `Ty`.
//!
//! Annotation variables are identified by name (`'a`, `'b`, ...); the same
//! name must resolve to the same `TyVar` everywhere it appears within one
//! inference run. We get that by caching `name -> TyVar` on `InferCtx`
//! rather than literally hashing the string, which is functionally the
//! same "stable integer identifier" the source describes.

use mlcore_ast::TypeAnnot;

use crate::infer::InferCtx;
use crate::ty::Ty;

pub fn annot_to_ty(ctx: &mut InferCtx, annot: &TypeAnnot) -> Ty {
    match annot {
        TypeAnnot::Int => Ty::int(),
        TypeAnnot::Bool => Ty::bool(),
        TypeAnnot::String => Ty::string(),
        TypeAnnot::Unit => Ty::unit(),
        TypeAnnot::Var(name) => Ty::Var(ctx.annot_var(name)),
        TypeAnnot::List(inner) => Ty::list(annot_to_ty(ctx, inner)),
        TypeAnnot::Tuple(elems) => {
            Ty::Tuple(elems.iter().map(|e| annot_to_ty(ctx, e)).collect())
        }
        TypeAnnot::Arrow(from, to) => {
            Ty::arrow(annot_to_ty(ctx, from), annot_to_ty(ctx, to))
        }
    }
}
