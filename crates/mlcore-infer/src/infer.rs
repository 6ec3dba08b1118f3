//! The inference engine: `infer_pat`, `infer_exp`, `infer_str_item`, and the
//! top-level driver that folds a whole structure into a `TypeEnv`.
//!
//! All three `infer_*` functions thread an explicit `Subst` (or, for
//! patterns, an explicit `TypeEnv`) rather than mutating shared state, so
//! `InferCtx` only ever hands out fresh variables and caches
//! annotation-variable identity. Compare the teacher's `snow-typeck::infer`,
//! whose `InferCtx` instead holds a mutable union-find table and a running
//! `Vec<TypeError>`.

use rustc_hash::FxHashMap;

use mlcore_ast::{Constant, Counter, Expr, Pattern, Rec, Structure, StructureItem};

use crate::annot::annot_to_ty;
use crate::builtins;
use crate::env::TypeEnv;
use crate::error::TypeError;
use crate::subst::{compose_all, unify, Subst};
use crate::ty::{Scheme, Ty, TyVar};

/// Per-pass state: a fresh-variable counter plus the annotation-variable
/// name cache `annot_to_ty` relies on for stable identity.
pub struct InferCtx {
    counter: Counter,
    annot_vars: FxHashMap<String, TyVar>,
}

impl InferCtx {
    pub fn new() -> InferCtx {
        InferCtx {
            counter: Counter::new(),
            annot_vars: FxHashMap::default(),
        }
    }

    /// Mint a fresh type variable.
    pub fn fresh(&mut self) -> Ty {
        Ty::Var(TyVar(self.counter.next()))
    }

    /// The `TyVar` bound to a surface annotation variable name, minting one
    /// on first sight and reusing it on every later occurrence of the
    /// same name.
    pub fn annot_var(&mut self, name: &str) -> TyVar {
        if let Some(v) = self.annot_vars.get(name) {
            return *v;
        }
        let v = TyVar(self.counter.next());
        self.annot_vars.insert(name.to_string(), v);
        v
    }
}

impl Default for InferCtx {
    fn default() -> Self {
        InferCtx::new()
    }
}

fn const_ty(ctx: &mut InferCtx, c: &Constant) -> Ty {
    match c {
        Constant::Int(_) => Ty::int(),
        Constant::Bool(_) => Ty::bool(),
        Constant::String(_) => Ty::string(),
        Constant::Unit => Ty::unit(),
        Constant::Nil => Ty::list(ctx.fresh()),
    }
}

/// Replace a scheme's quantified variables with fresh ones.
fn instantiate(ctx: &mut InferCtx, scheme: &Scheme) -> Ty {
    if scheme.vars.is_empty() {
        return scheme.ty.clone();
    }
    let pairs: Vec<(TyVar, Ty)> = scheme.vars.iter().map(|v| (*v, ctx.fresh())).collect();
    let s = Subst::from_fresh_pairs(pairs);
    s.apply(&scheme.ty)
}

/// `free(t) \ free(env)` -- the variables `let`-generalization is allowed
/// to quantify over, excluding whatever is still in play in the enclosing
/// environment.
fn generalize(env: &TypeEnv, ty: &Ty) -> Scheme {
    let env_free = env.free_vars();
    let vars = ty
        .free_vars()
        .into_iter()
        .filter(|v| !env_free.contains(v));
    Scheme::poly(vars, ty.clone())
}

/// Infer a pattern's type and the environment it extends with the
/// variables it binds.
pub fn infer_pat(
    ctx: &mut InferCtx,
    env: &TypeEnv,
    pat: &Pattern,
) -> Result<(TypeEnv, Ty), TypeError> {
    match pat {
        Pattern::Any => Ok((env.clone(), ctx.fresh())),
        Pattern::Const(c) => Ok((env.clone(), const_ty(ctx, c))),
        Pattern::Var(x) => {
            let alpha = ctx.fresh();
            let env1 = env.extend(x.clone(), Scheme::mono(alpha.clone()));
            Ok((env1, alpha))
        }
        Pattern::Cons(h, t) => {
            let (env1, th) = infer_pat(ctx, env, h)?;
            let (env2, tt) = infer_pat(ctx, &env1, t)?;
            let s = unify(Ty::list(th), tt.clone())?;
            Ok((env2.apply(&s), s.apply(&tt)))
        }
        Pattern::Tuple(pats) => {
            let mut acc_env = env.clone();
            let mut tys = Vec::with_capacity(pats.len());
            for p in pats {
                let (env_i, t_i) = infer_pat(ctx, &acc_env, p)?;
                acc_env = env_i;
                tys.push(t_i);
            }
            Ok((acc_env, Ty::Tuple(tys)))
        }
        Pattern::Constraint(inner, ann) => {
            let (env1, t1) = infer_pat(ctx, env, inner)?;
            let ann_ty = annot_to_ty(ctx, ann);
            let s = unify(t1.clone(), ann_ty)?;
            Ok((env1.apply(&s), s.apply(&t1)))
        }
    }
}

/// Infer an expression's type, returning the substitution accumulated
/// while doing so.
pub fn infer_exp(
    ctx: &mut InferCtx,
    env: &TypeEnv,
    expr: &Expr,
) -> Result<(Subst, Ty), TypeError> {
    match expr {
        Expr::Const(c) => Ok((Subst::empty(), const_ty(ctx, c))),
        Expr::Var(name) => match env.lookup(name) {
            Some(scheme) => Ok((Subst::empty(), instantiate(ctx, scheme))),
            None => Err(TypeError::NoVariable(name.clone())),
        },
        Expr::If(i, t, e) => {
            let (s1, ti) = infer_exp(ctx, env, i)?;
            let env1 = env.apply(&s1);
            let (s2, tt) = infer_exp(ctx, &env1, t)?;
            let env2 = env1.apply(&s2);
            let (s3, te) = infer_exp(ctx, &env2, e)?;
            let s_pre = compose_all(&[s1, s2, s3])?;
            let s_cond = unify(s_pre.apply(&ti), Ty::bool())?;
            let tt_final = s_cond.apply(&s_pre.apply(&tt));
            let te_final = s_cond.apply(&s_pre.apply(&te));
            let s_branches = unify(tt_final, te_final.clone())?;
            let s = compose_all(&[s_pre, s_cond, s_branches])?;
            Ok((s.clone(), s.apply(&te_final)))
        }
        Expr::Apply(f, x) => {
            let beta = ctx.fresh();
            let (s1, tf) = infer_exp(ctx, env, f)?;
            let env1 = env.apply(&s1);
            let (s2, tx) = infer_exp(ctx, &env1, x)?;
            let s3 = unify(Ty::arrow(tx, beta.clone()), s2.apply(&tf))?;
            let s = compose_all(&[s1, s2, s3])?;
            Ok((s.clone(), s.apply(&beta)))
        }
        Expr::Fun(p, body) => {
            let (env1, tp) = infer_pat(ctx, env, p)?;
            let (s, tb) = infer_exp(ctx, &env1, body)?;
            Ok((s.clone(), s.apply(&Ty::arrow(tp, tb))))
        }
        Expr::Tuple(exprs) => {
            let mut acc_env = env.clone();
            let mut substs = Vec::with_capacity(exprs.len());
            let mut tys = Vec::with_capacity(exprs.len());
            for e in exprs {
                let (s, t) = infer_exp(ctx, &acc_env, e)?;
                acc_env = acc_env.apply(&s);
                substs.push(s);
                tys.push(t);
            }
            let s = compose_all(&substs)?;
            let tys = tys.into_iter().map(|t| s.apply(&t)).collect();
            Ok((s, Ty::Tuple(tys)))
        }
        Expr::Cons(h, t) => {
            let (s1, th) = infer_exp(ctx, env, h)?;
            let (s2, tt) = infer_exp(ctx, env, t)?;
            let s3 = unify(Ty::list(th), tt.clone())?;
            let s = compose_all(&[s1, s2, s3])?;
            Ok((s.clone(), s.apply(&tt)))
        }
        Expr::Match(scrut, cases) => infer_match(ctx, env, scrut, cases),
        Expr::Let(Rec::NonRec, pat, bound, body) => infer_let_nonrec(ctx, env, pat, bound, body),
        Expr::Let(Rec::Rec, pat, bound, body) => infer_let_rec(ctx, env, pat, bound, body),
        Expr::Constraint(e, _) => infer_exp(ctx, env, e),
    }
}

fn infer_match(
    ctx: &mut InferCtx,
    env: &TypeEnv,
    scrut: &Expr,
    cases: &[(Pattern, Expr)],
) -> Result<(Subst, Ty), TypeError> {
    let (s0, t_scrut) = infer_exp(ctx, env, scrut)?;
    let mut env_acc = env.apply(&s0);
    let mut t_scrut_acc = t_scrut;
    let beta = ctx.fresh();
    let mut s_acc = s0;
    let mut t_answer = beta;

    for (pat, body) in cases {
        let (env_p, tp) = infer_pat(ctx, &env_acc, pat)?;
        let s_unify_scrut = unify(t_scrut_acc.clone(), tp)?;
        let env_p = env_p.apply(&s_unify_scrut);
        let (s_body, t_body) = infer_exp(ctx, &env_p, body)?;
        let s_answer = unify(s_body.apply(&t_answer), t_body)?;

        let s_round = compose_all(&[s_unify_scrut, s_body, s_answer])?;
        s_acc = compose_all(&[s_acc, s_round])?;
        env_acc = env_acc.apply(&s_acc);
        t_scrut_acc = s_acc.apply(&t_scrut_acc);
        t_answer = s_acc.apply(&t_answer);
    }

    Ok((s_acc, t_answer))
}

fn infer_let_nonrec(
    ctx: &mut InferCtx,
    env: &TypeEnv,
    pat: &Pattern,
    bound: &Expr,
    body: &Expr,
) -> Result<(Subst, Ty), TypeError> {
    let (s1, t1) = infer_exp(ctx, env, bound)?;
    let env_after_s1 = env.apply(&s1);
    let scheme = generalize(&env_after_s1, &t1);

    let (env1, t2) = infer_pat(ctx, &env_after_s1, pat)?;
    let env2 = env1.ext_by_pat(&scheme, pat);

    let s_unify = unify(t1, t2)?;
    let s_so_far = compose_all(&[s1, s_unify])?;
    let env3 = env2.apply(&s_so_far);

    let (s_body, t_body) = infer_exp(ctx, &env3, body)?;
    let s = compose_all(&[s_so_far, s_body])?;
    Ok((s, t_body))
}

fn infer_let_rec(
    ctx: &mut InferCtx,
    env: &TypeEnv,
    pat: &Pattern,
    bound: &Expr,
    body: &Expr,
) -> Result<(Subst, Ty), TypeError> {
    let name = match pat {
        Pattern::Var(name) => name.clone(),
        _ => return Err(TypeError::NotImplemented("recursive binding pattern must be a plain variable".into())),
    };

    let alpha = ctx.fresh();
    let env0 = env.extend(name.clone(), Scheme::mono(alpha.clone()));
    let (s1, t1) = infer_exp(ctx, &env0, bound)?;
    let s_unify = unify(s1.apply(&alpha), t1)?;
    let s2 = compose_all(&[s1, s_unify])?;

    let env_after_s2 = env.apply(&s2);
    let bound_ty = s2.apply(&alpha);
    let scheme = generalize(&env_after_s2, &bound_ty);
    let env3 = env_after_s2.extend(name, scheme);

    let (s_body, t_body) = infer_exp(ctx, &env3, body)?;
    let s = compose_all(&[s2, s_body])?;
    Ok((s, t_body))
}

/// `infer_str_item` folds one top-level item into an updated environment,
/// generalizing the same `let`-inference rules `infer_let_nonrec`/
/// `infer_let_rec` apply to a single binding to `SValue`'s `Vec` of
/// simultaneous bindings.
pub fn infer_str_item(
    ctx: &mut InferCtx,
    env: &TypeEnv,
    item: &StructureItem,
) -> Result<TypeEnv, TypeError> {
    match item {
        StructureItem::SEval(e) => {
            let (_, _) = infer_exp(ctx, env, e)?;
            Ok(env.clone())
        }
        StructureItem::SValue(Rec::NonRec, bindings) => {
            if bindings.is_empty() {
                return Err(TypeError::EmptyLet);
            }
            let mut env_acc = env.clone();
            for (pat, e) in bindings {
                let (s1, t1) = infer_exp(ctx, &env_acc, e)?;
                let env_after_s1 = env_acc.apply(&s1);
                let scheme = generalize(&env_after_s1, &t1);
                let (env1, t2) = infer_pat(ctx, &env_after_s1, pat)?;
                let env2 = env1.ext_by_pat(&scheme, pat);
                let s_unify = unify(t1, t2)?;
                let s = compose_all(&[s1, s_unify])?;
                env_acc = env2.apply(&s);
            }
            Ok(env_acc)
        }
        StructureItem::SValue(Rec::Rec, bindings) => {
            if bindings.is_empty() {
                return Err(TypeError::EmptyLet);
            }
            // All names in a mutually-recursive group are bound, at fresh
            // provisional types, before any binding's right-hand side is
            // inferred -- otherwise earlier bindings could not call later
            // ones, breaking mutual recursion.
            let mut names = Vec::with_capacity(bindings.len());
            let mut alphas = Vec::with_capacity(bindings.len());
            let mut env0 = env.clone();
            for (pat, _) in bindings {
                let name = match pat {
                    Pattern::Var(name) => name.clone(),
                    _ => {
                        return Err(TypeError::NotImplemented(
                            "recursive binding pattern must be a plain variable".into(),
                        ))
                    }
                };
                let alpha = ctx.fresh();
                env0 = env0.extend(name.clone(), Scheme::mono(alpha.clone()));
                names.push(name);
                alphas.push(alpha);
            }

            let mut substs = Vec::with_capacity(bindings.len());
            let mut tys = Vec::with_capacity(bindings.len());
            for (_, e) in bindings {
                let (s, t) = infer_exp(ctx, &env0, e)?;
                substs.push(s);
                tys.push(t);
            }
            for (alpha, t) in alphas.iter().zip(tys.iter()) {
                let s_unify = unify(alpha.clone(), t.clone())?;
                substs.push(s_unify);
            }
            let s = compose_all(&substs)?;

            let mut env_acc = env.apply(&s);
            for (name, alpha) in names.into_iter().zip(alphas.into_iter()) {
                let bound_ty = s.apply(&alpha);
                let scheme = generalize(&env_acc, &bound_ty);
                env_acc = env_acc.extend(name, scheme);
            }
            Ok(env_acc)
        }
    }
}

/// Top-level driver: fold a whole structure into a final `TypeEnv`,
/// starting from `mlcore_infer::builtins::initial_env()`. Stops at the
/// first error.
pub fn infer_structure(structure: &Structure) -> Result<TypeEnv, TypeError> {
    let mut ctx = InferCtx::new();
    let mut env = builtins::initial_env();
    for item in structure {
        env = infer_str_item(&mut ctx, &env, item)?;
    }
    Ok(env)
}
