//! Type environment: identifier -> scheme.
//!
//! Unlike the teacher's `snow-typeck::env::TypeEnv`, which is a scope
//! stack (`Vec<FxHashMap<..>>`) for block-structured lexical scoping, this
//! core's surface language only ever extends an environment functionally
//! (`extend` returns -- conceptually -- an updated environment, and
//! nothing here ever pops a scope), so a single flat map is enough.

use rustc_hash::FxHashMap;

use crate::subst::Subst;
use crate::ty::{Scheme, TyVar};
use mlcore_ast::Pattern;

/// A type environment: `identifier -> scheme`.
#[derive(Clone, Debug, Default)]
pub struct TypeEnv {
    bindings: FxHashMap<String, Scheme>,
}

impl TypeEnv {
    pub fn new() -> TypeEnv {
        TypeEnv {
            bindings: FxHashMap::default(),
        }
    }

    /// Insert or overwrite the scheme bound to `id`.
    pub fn extend(&self, id: impl Into<String>, scheme: Scheme) -> TypeEnv {
        let mut bindings = self.bindings.clone();
        bindings.insert(id.into(), scheme);
        TypeEnv { bindings }
    }

    /// Mutating variant of `extend`, used by the top-level driver where
    /// cloning the whole environment per binding would be wasteful.
    pub fn extend_mut(&mut self, id: impl Into<String>, scheme: Scheme) {
        self.bindings.insert(id.into(), scheme);
    }

    pub fn lookup(&self, id: &str) -> Option<&Scheme> {
        self.bindings.get(id)
    }

    /// Substitute through every scheme in the environment.
    pub fn apply(&self, s: &Subst) -> TypeEnv {
        let bindings = self
            .bindings
            .iter()
            .map(|(k, scheme)| {
                let ty = s.apply(&scheme.ty);
                (k.clone(), Scheme { vars: scheme.vars.clone(), ty })
            })
            .collect();
        TypeEnv { bindings }
    }

    /// The union of `free_vars` over every scheme in the environment --
    /// the variables generalization must NOT quantify over, since they
    /// are still "in play" in an enclosing binding.
    pub fn free_vars(&self) -> Vec<TyVar> {
        let mut out = Vec::new();
        for scheme in self.bindings.values() {
            for v in scheme.free_vars() {
                if !out.contains(&v) {
                    out.push(v);
                }
            }
        }
        out
    }

    /// Extend the environment for every name bound by `pat`, assigning
    /// each name a scheme with the same quantifiers as `scheme` and the
    /// sub-type of `scheme.ty` that the pattern's structure projects out.
    ///
    /// A shape mismatch (tuple-length mismatch, or a pattern whose shape
    /// disagrees with `scheme.ty`) is not an error here -- inference has
    /// already unified the shapes by the time this runs, so a mismatch can
    /// only mean "this branch of the env update contributes nothing," and
    /// the environment is returned unchanged.
    pub fn ext_by_pat(&self, scheme: &Scheme, pat: &Pattern) -> TypeEnv {
        ext_by_pat_rec(self, scheme, pat)
    }
}

fn ext_by_pat_rec(env: &TypeEnv, scheme: &Scheme, pat: &Pattern) -> TypeEnv {
    use crate::ty::Ty;

    match pat {
        Pattern::Var(name) => env.extend(name.clone(), scheme.clone()),
        Pattern::Cons(head, tail) => {
            if let Ty::List(elem) = &scheme.ty {
                let head_scheme = Scheme {
                    vars: scheme.vars.clone(),
                    ty: (**elem).clone(),
                };
                let env1 = ext_by_pat_rec(env, &head_scheme, head);
                let tail_scheme = Scheme {
                    vars: scheme.vars.clone(),
                    ty: scheme.ty.clone(),
                };
                ext_by_pat_rec(&env1, &tail_scheme, tail)
            } else {
                env.clone()
            }
        }
        Pattern::Tuple(pats) => {
            if let Ty::Tuple(tys) = &scheme.ty {
                if tys.len() != pats.len() {
                    return env.clone();
                }
                let mut acc = env.clone();
                for (p, t) in pats.iter().zip(tys.iter()) {
                    let sub_scheme = Scheme {
                        vars: scheme.vars.clone(),
                        ty: t.clone(),
                    };
                    acc = ext_by_pat_rec(&acc, &sub_scheme, p);
                }
                acc
            } else {
                env.clone()
            }
        }
        Pattern::Constraint(inner, _) => ext_by_pat_rec(env, scheme, inner),
        Pattern::Any | Pattern::Const(_) => env.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::Ty;
    use mlcore_ast::Constant;

    #[test]
    fn extend_then_lookup() {
        let env = TypeEnv::new().extend("x", Scheme::mono(Ty::int()));
        assert_eq!(env.lookup("x").unwrap().ty, Ty::int());
    }

    #[test]
    fn extend_overwrites() {
        let env = TypeEnv::new()
            .extend("x", Scheme::mono(Ty::int()))
            .extend("x", Scheme::mono(Ty::bool()));
        assert_eq!(env.lookup("x").unwrap().ty, Ty::bool());
    }

    #[test]
    fn apply_substitutes_through_schemes() {
        let env = TypeEnv::new().extend("x", Scheme::mono(Ty::var(0)));
        let s = crate::subst::unify(Ty::var(0), Ty::int()).unwrap();
        let env2 = env.apply(&s);
        assert_eq!(env2.lookup("x").unwrap().ty, Ty::int());
    }

    #[test]
    fn free_vars_is_union_over_schemes() {
        let env = TypeEnv::new()
            .extend("x", Scheme::mono(Ty::var(0)))
            .extend("y", Scheme::mono(Ty::var(1)));
        let mut vars = env.free_vars();
        vars.sort();
        assert_eq!(vars, vec![TyVar(0), TyVar(1)]);
    }

    #[test]
    fn free_vars_excludes_quantified_vars() {
        let env = TypeEnv::new().extend("id", Scheme::poly([TyVar(0)], Ty::var(0)));
        assert!(env.free_vars().is_empty());
    }

    #[test]
    fn ext_by_pat_tuple_destructures_type() {
        let scheme = Scheme::mono(Ty::Tuple(vec![Ty::int(), Ty::bool()]));
        let pat = Pattern::Tuple(vec![Pattern::Var("a".into()), Pattern::Var("b".into())]);
        let env = TypeEnv::new().ext_by_pat(&scheme, &pat);
        assert_eq!(env.lookup("a").unwrap().ty, Ty::int());
        assert_eq!(env.lookup("b").unwrap().ty, Ty::bool());
    }

    #[test]
    fn ext_by_pat_cons_destructures_list_type() {
        let scheme = Scheme::mono(Ty::list(Ty::int()));
        let pat = Pattern::Cons(
            Box::new(Pattern::Var("h".into())),
            Box::new(Pattern::Var("t".into())),
        );
        let env = TypeEnv::new().ext_by_pat(&scheme, &pat);
        assert_eq!(env.lookup("h").unwrap().ty, Ty::int());
        assert_eq!(env.lookup("t").unwrap().ty, Ty::list(Ty::int()));
    }

    #[test]
    fn ext_by_pat_shape_mismatch_leaves_env_unchanged() {
        let scheme = Scheme::mono(Ty::int());
        let pat = Pattern::Tuple(vec![Pattern::Var("a".into()), Pattern::Var("b".into())]);
        let env = TypeEnv::new().ext_by_pat(&scheme, &pat);
        assert!(env.lookup("a").is_none());
    }

    #[test]
    fn ext_by_pat_wildcard_and_const_contribute_nothing() {
        let scheme = Scheme::mono(Ty::int());
        let env = TypeEnv::new();
        assert!(env
            .ext_by_pat(&scheme, &Pattern::Any)
            .lookup("anything")
            .is_none());
        assert!(env
            .ext_by_pat(&scheme, &Pattern::Const(Constant::Int(1)))
            .lookup("anything")
            .is_none());
    }
}
