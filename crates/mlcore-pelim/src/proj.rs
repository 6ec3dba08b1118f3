//! Projection expressions: applications of the runtime's distinguished
//! extraction primitives.

use crate::pee::Pee;
use mlcore_ast::Constant;

/// Which sub-value a projection extracts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjKind {
    ConsHead,
    ConsTail,
    Tuple(usize),
}

/// `get_element(expr, kind)`: build the application of the matching
/// runtime primitive to `expr`. `Tuple(i)` additionally carries the
/// zero-based index as its first argument.
pub fn get_element(expr: Pee, kind: ProjKind) -> Pee {
    match kind {
        ProjKind::ConsHead => Pee::Apply(Box::new(Pee::var("Cons_head")), Box::new(expr)),
        ProjKind::ConsTail => Pee::Apply(Box::new(Pee::var("Cons_tail")), Box::new(expr)),
        ProjKind::Tuple(i) => Pee::apply2(
            Pee::var("Tuple"),
            Pee::Const(Constant::Int(i as i64)),
            expr,
        ),
    }
}

/// `list_len(expr)`.
pub fn list_len(expr: Pee) -> Pee {
    Pee::Apply(Box::new(Pee::var("list_len")), Box::new(expr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cons_head_wraps_scrutinee() {
        let e = get_element(Pee::var("xs"), ProjKind::ConsHead);
        assert_eq!(
            e,
            Pee::Apply(Box::new(Pee::var("Cons_head")), Box::new(Pee::var("xs")))
        );
    }

    #[test]
    fn tuple_projection_carries_index() {
        let e = get_element(Pee::var("a0"), ProjKind::Tuple(1));
        assert_eq!(
            e,
            Pee::apply2(Pee::var("Tuple"), Pee::Const(Constant::Int(1)), Pee::var("a0"))
        );
    }
}
