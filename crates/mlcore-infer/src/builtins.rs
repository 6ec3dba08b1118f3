//! The initial type environment: each comparison operator is bound
//! polymorphically at `∀α. α -> α -> bool`, each arithmetic operator at
//! `int -> int -> int`. `list_len` and the projection primitives are not
//! bound here -- they only ever appear in elimination's generated output,
//! never in a surface `Expr` that inference sees.

use crate::env::TypeEnv;
use crate::ty::{Scheme, Ty, TyVar};

const ARITHMETIC: &[&str] = &["+", "-", "*", "/"];
const COMPARISONS: &[&str] = &["=", "<>", "<", ">", "<=", ">="];

pub fn initial_env() -> TypeEnv {
    let mut env = TypeEnv::new();

    for op in ARITHMETIC {
        let ty = Ty::arrow(Ty::int(), Ty::arrow(Ty::int(), Ty::int()));
        env.extend_mut(*op, Scheme::mono(ty));
    }

    // Each comparison gets its own quantified scheme; the stored id only
    // has to be distinct from its sibling comparisons' ids, since
    // instantiation always mints a brand-new `TyVar` and never reuses the
    // one recorded here.
    for (i, op) in COMPARISONS.iter().enumerate() {
        let a = TyVar(i as u32);
        let ty = Ty::arrow(Ty::Var(a), Ty::arrow(Ty::Var(a), Ty::bool()));
        env.extend_mut(*op, Scheme::poly([a], ty));
    }

    let and_ty = Ty::arrow(Ty::bool(), Ty::arrow(Ty::bool(), Ty::bool()));
    env.extend_mut("&&", Scheme::mono(and_ty));

    let print_int_ty = Ty::arrow(Ty::int(), Ty::unit());
    env.extend_mut("print_int", Scheme::mono(print_int_ty));

    env
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_is_monomorphic_int_arrow_int_arrow_int() {
        let env = initial_env();
        let scheme = env.lookup("+").unwrap();
        assert!(scheme.vars.is_empty());
        assert_eq!(scheme.ty.to_string(), "int -> int -> int");
    }

    #[test]
    fn comparison_is_polymorphic() {
        let env = initial_env();
        let scheme = env.lookup("=").unwrap();
        assert_eq!(scheme.vars.len(), 1);
        assert_eq!(scheme.ty.to_string(), "'a -> 'a -> bool");
    }

    #[test]
    fn all_comparisons_and_arithmetic_are_bound() {
        let env = initial_env();
        for op in ARITHMETIC.iter().chain(COMPARISONS.iter()) {
            assert!(env.lookup(op).is_some(), "missing builtin {op}");
        }
        assert!(env.lookup("&&").is_some());
        assert!(env.lookup("print_int").is_some());
    }
}
