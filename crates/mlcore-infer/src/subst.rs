//! Substitutions: finite maps from type-variable id to type.
//!
//! This is explicit, composable substitution machinery --
//! `empty`/`singleton`/`find`/`remove`/`apply`/`unify`/`compose`/
//! `compose_all`. The teacher's own `mesh-typeck` instead keeps a mutable
//! `ena` union-find table and never materializes a substitution as a
//! value; that is a different (also sound) algorithm, but this engine
//! unifies via explicit substitutions, so `ena` is not used here (see
//! DESIGN.md).

use rustc_hash::FxHashMap;

use crate::error::TypeError;
use crate::ty::{Ty, TyVar};

/// A substitution: `TyVar id -> Ty`.
///
/// Invariant: no key ever appears free in its own value (enforced by
/// `singleton`'s occurs-check, the only place new bindings are minted).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Subst {
    map: FxHashMap<u32, Ty>,
}

impl Subst {
    /// The substitution with no mappings.
    pub fn empty() -> Subst {
        Subst {
            map: FxHashMap::default(),
        }
    }

    /// A single binding `k := t`, after checking `k` does not occur
    /// (structurally) in `t`.
    pub fn singleton(k: TyVar, t: Ty) -> Result<Subst, TypeError> {
        if occurs(k, &t) {
            return Err(TypeError::OccursCheck { var: k.0, ty: t });
        }
        let mut map = FxHashMap::default();
        map.insert(k.0, t);
        Ok(Subst { map })
    }

    /// Build a substitution directly from fresh, pairwise-distinct
    /// bindings, skipping the occurs-check `singleton` performs. Used only
    /// by scheme instantiation, where every value is a brand new type
    /// variable that cannot possibly occur in itself.
    pub fn from_fresh_pairs(pairs: Vec<(TyVar, Ty)>) -> Subst {
        let map = pairs.into_iter().map(|(k, v)| (k.0, v)).collect();
        Subst { map }
    }

    pub fn find(&self, k: TyVar) -> Option<&Ty> {
        self.map.get(&k.0)
    }

    /// This substitution with `k`'s binding (if any) dropped.
    pub fn remove(&self, k: TyVar) -> Subst {
        let mut map = self.map.clone();
        map.remove(&k.0);
        Subst { map }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Apply this substitution through `t`, structurally. `TVar(n)` is
    /// replaced by `s[n]` when present, and the replacement is itself
    /// walked through `s` again -- a binding chain like `a -> b, b -> int`
    /// must resolve `a` all the way to `int` in one call, since `compose`
    /// only guarantees each binding is normalized against the bindings
    /// that existed *when it was inserted*, not ones added afterwards.
    pub fn apply(&self, t: &Ty) -> Ty {
        match t {
            Ty::Var(v) => match self.find(*v) {
                Some(bound) => self.apply(bound),
                None => t.clone(),
            },
            Ty::Arrow(a, b) => Ty::Arrow(Box::new(self.apply(a)), Box::new(self.apply(b))),
            Ty::List(inner) => Ty::List(Box::new(self.apply(inner))),
            Ty::Tuple(elems) => Ty::Tuple(elems.iter().map(|e| self.apply(e)).collect()),
            Ty::Prim(_) => t.clone(),
        }
    }

    /// `extend(k, v, self)`: insert `(k, apply(self, v))`, or, if `k` is
    /// already bound to `v'`, unify `v` with `v'` and compose the result
    /// into `self`. This is what makes `compose` confluent.
    fn extend(&self, k: u32, v: Ty) -> Result<Subst, TypeError> {
        match self.map.get(&k) {
            Some(existing) => {
                let existing = existing.clone();
                let s = unify(v, existing)?;
                compose(self, &s)
            }
            None => {
                let mut map = self.map.clone();
                map.insert(k, self.apply(&v));
                Ok(Subst { map })
            }
        }
    }
}

/// Compose two substitutions: applying `compose(s1, s2)` to a type must
/// equal applying `s1` to the result of applying `s2`.
pub fn compose(s1: &Subst, s2: &Subst) -> Result<Subst, TypeError> {
    let mut acc = s1.clone();
    for (&k, v) in s2.map.iter() {
        acc = acc.extend(k, v.clone())?;
    }
    Ok(acc)
}

/// Fold `compose` over `empty`, taking `substs` in the chronological order
/// they were produced (earliest first). Each substitution is composed as
/// the outer (first) argument over the accumulator, so the final result
/// applies `substs[0]` first and `substs[last]` last -- matching the order
/// inference actually threads them through successively refined environments.
pub fn compose_all(substs: &[Subst]) -> Result<Subst, TypeError> {
    let mut acc = Subst::empty();
    for s in substs {
        acc = compose(s, &acc)?;
    }
    Ok(acc)
}

/// Structural occurs-check: does `k` appear anywhere in `t`?
fn occurs(k: TyVar, t: &Ty) -> bool {
    match t {
        Ty::Var(v) => *v == k,
        Ty::Arrow(a, b) => occurs(k, a) || occurs(k, b),
        Ty::List(inner) => occurs(k, inner),
        Ty::Tuple(elems) => elems.iter().any(|e| occurs(k, e)),
        Ty::Prim(_) => false,
    }
}

/// Unify two types, producing the most general substitution that makes
/// them equal.
pub fn unify(l: Ty, r: Ty) -> Result<Subst, TypeError> {
    match (l, r) {
        (Ty::Prim(p1), Ty::Prim(p2)) if p1 == p2 => Ok(Subst::empty()),
        (Ty::Var(a), Ty::Var(b)) if a == b => Ok(Subst::empty()),
        (Ty::Var(v), other) | (other, Ty::Var(v)) => Subst::singleton(v, other),
        (Ty::Arrow(a1, r1), Ty::Arrow(a2, r2)) => {
            let s1 = unify(*a1, *a2)?;
            let s2 = unify(s1.apply(&r1), s1.apply(&r2))?;
            compose(&s1, &s2)
        }
        (Ty::List(a), Ty::List(b)) => unify(*a, *b),
        (Ty::Tuple(t1), Ty::Tuple(t2)) => {
            if t1.len() != t2.len() {
                return Err(TypeError::UnificationFailed(
                    Ty::Tuple(t1),
                    Ty::Tuple(t2),
                ));
            }
            let mut acc = Subst::empty();
            for (a, b) in t1.into_iter().zip(t2.into_iter()) {
                let s = unify(acc.apply(&a), acc.apply(&b))?;
                acc = compose(&acc, &s)?;
            }
            Ok(acc)
        }
        (l, r) => Err(TypeError::UnificationFailed(l, r)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_occurs_check_fails() {
        let v = TyVar(0);
        let ty = Ty::arrow(Ty::Var(v), Ty::int());
        assert!(matches!(
            Subst::singleton(v, ty),
            Err(TypeError::OccursCheck { .. })
        ));
    }

    #[test]
    fn apply_substitutes_bound_var() {
        let mut s = Subst::empty();
        s = s.extend(0, Ty::int()).unwrap();
        assert_eq!(s.apply(&Ty::var(0)), Ty::int());
    }

    #[test]
    fn apply_leaves_unbound_var_alone() {
        let s = Subst::empty();
        assert_eq!(s.apply(&Ty::var(7)), Ty::var(7));
    }

    #[test]
    fn unify_two_primitives() {
        assert_eq!(unify(Ty::int(), Ty::int()), Ok(Subst::empty()));
    }

    #[test]
    fn unify_primitive_mismatch_fails() {
        assert!(unify(Ty::int(), Ty::bool()).is_err());
    }

    #[test]
    fn unify_var_binds_to_concrete() {
        let s = unify(Ty::var(0), Ty::int()).unwrap();
        assert_eq!(s.apply(&Ty::var(0)), Ty::int());
    }

    #[test]
    fn unify_arrows_composes_param_and_return() {
        let f1 = Ty::arrow(Ty::var(0), Ty::var(1));
        let f2 = Ty::arrow(Ty::int(), Ty::bool());
        let s = unify(f1, f2).unwrap();
        assert_eq!(s.apply(&Ty::var(0)), Ty::int());
        assert_eq!(s.apply(&Ty::var(1)), Ty::bool());
    }

    #[test]
    fn unify_tuple_arity_mismatch_fails() {
        let t1 = Ty::Tuple(vec![Ty::int()]);
        let t2 = Ty::Tuple(vec![Ty::int(), Ty::bool()]);
        assert!(matches!(
            unify(t1, t2),
            Err(TypeError::UnificationFailed(..))
        ));
    }

    #[test]
    fn unify_lists_unifies_element_type() {
        let s = unify(Ty::list(Ty::var(0)), Ty::list(Ty::int())).unwrap();
        assert_eq!(s.apply(&Ty::var(0)), Ty::int());
    }

    #[test]
    fn compose_soundness_matches_sequential_apply() {
        // apply(compose(s1, s2), t) == apply(s1, apply(s2, t))
        let s2 = unify(Ty::var(0), Ty::var(1)).unwrap();
        let s1 = unify(Ty::var(1), Ty::int()).unwrap();
        let composed = compose(&s1, &s2).unwrap();
        let t = Ty::var(0);
        assert_eq!(composed.apply(&t), s1.apply(&s2.apply(&t)));
    }

    #[test]
    fn compose_all_of_empty_list_is_empty() {
        assert_eq!(compose_all(&[]).unwrap(), Subst::empty());
    }

    #[test]
    fn apply_resolves_multi_hop_binding_chains() {
        let mut s = Subst::singleton(TyVar(0), Ty::var(1)).unwrap();
        s = compose(&s, &Subst::singleton(TyVar(1), Ty::int()).unwrap()).unwrap();
        assert_eq!(s.apply(&Ty::var(0)), Ty::int());
    }

    #[test]
    fn compose_all_applies_in_chronological_order() {
        // s1 binds 0 := var(1); s2 binds 1 := int. A caller that inferred
        // s1 first and then s2 (e.g. from a later sub-expression) expects
        // compose_all([s1, s2]) to fully resolve var(0) to int.
        let s1 = unify(Ty::var(0), Ty::var(1)).unwrap();
        let s2 = unify(Ty::var(1), Ty::int()).unwrap();
        let s = compose_all(&[s1, s2]).unwrap();
        assert_eq!(s.apply(&Ty::var(0)), Ty::int());
    }

    #[test]
    fn extend_conflicting_binding_unifies_instead_of_overwriting() {
        let s1 = Subst::singleton(TyVar(0), Ty::int()).unwrap();
        let s2 = Subst::singleton(TyVar(0), Ty::var(1)).unwrap();
        // composing should unify var(1) with int rather than just overwrite.
        let composed = compose(&s1, &s2).unwrap();
        assert_eq!(composed.apply(&Ty::var(1)), Ty::int());
    }
}
