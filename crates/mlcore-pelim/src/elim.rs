//! The elimination algorithm itself: `check_pat`, `pat_decls`,
//! `create_case`, `pe_expr`, `pe_match`, `pe_decl`, `pe_str_item`,
//! `pe_structure`.

use mlcore_ast::{Constant, Counter, Expr, Pattern, Rec, Structure, StructureItem};

use crate::error::PelimError;
use crate::pee::{PeBinding, Pee};
use crate::proj::{get_element, list_len, ProjKind};

/// Per-pass state: the fresh-name counter. Names are minted as `a<n>` and
/// are not checked against user identifiers -- see the crate's top-level
/// docs for the collision caveat this leaves open.
pub struct ElimCtx {
    counter: Counter,
}

impl ElimCtx {
    pub fn new() -> ElimCtx {
        ElimCtx { counter: Counter::new() }
    }

    fn fresh_name(&mut self) -> String {
        format!("a{}", self.counter.next())
    }
}

impl Default for ElimCtx {
    fn default() -> Self {
        ElimCtx::new()
    }
}

fn fail_match() -> Pee {
    Pee::Apply(Box::new(Pee::var("fail_match")), Box::new(Pee::Const(Constant::Unit)))
}

fn and_all(checks: Vec<Pee>) -> Option<Pee> {
    checks.into_iter().reduce(|a, b| Pee::apply2(Pee::var("&&"), a, b))
}

/// How many cons cells a pattern's right-spine is guaranteed to have,
/// looking only at contiguous `PCons` nodes (through `PConstraint`).
fn cons_depth(pat: &Pattern) -> usize {
    match pat {
        Pattern::Cons(_, tail) => 1 + cons_depth(tail),
        Pattern::Constraint(inner, _) => cons_depth(inner),
        _ => 0,
    }
}

/// `check_pat`'s recursive worker, carrying the `add_list` flag: a `PCons`
/// node only emits its own `list_len` guard when `add_list` is set, which
/// is true everywhere except a cons pattern's own tail (whose length is
/// already implied by its parent's check).
fn check_pat_rec(scrut: &Pee, pat: &Pattern, add_list: bool) -> Vec<Pee> {
    match pat {
        Pattern::Constraint(inner, _) => check_pat_rec(scrut, inner, add_list),
        Pattern::Const(Constant::Unit) => Vec::new(),
        Pattern::Const(c) => vec![Pee::apply2(Pee::var("="), scrut.clone(), Pee::Const(c.clone()))],
        Pattern::Tuple(pats) => pats
            .iter()
            .enumerate()
            .flat_map(|(i, p)| {
                check_pat_rec(&get_element(scrut.clone(), ProjKind::Tuple(i)), p, true)
            })
            .collect(),
        Pattern::Cons(head, tail) => {
            let mut checks = Vec::new();
            if add_list {
                let threshold = cons_depth(tail);
                checks.push(Pee::apply2(
                    Pee::var(">"),
                    list_len(scrut.clone()),
                    Pee::Const(Constant::Int(threshold as i64)),
                ));
            }
            checks.extend(check_pat_rec(&get_element(scrut.clone(), ProjKind::ConsHead), head, true));
            checks.extend(check_pat_rec(&get_element(scrut.clone(), ProjKind::ConsTail), tail, false));
            checks
        }
        Pattern::Var(_) | Pattern::Any => Vec::new(),
    }
}

pub fn check_pat(scrut: &Pee, pat: &Pattern) -> Vec<Pee> {
    check_pat_rec(scrut, pat, true)
}

/// `pat_decls`: one `(name, projection)` pair per variable bound by `pat`.
pub fn pat_decls(scrut: &Pee, pat: &Pattern) -> Vec<(String, Pee)> {
    match pat {
        Pattern::Var(name) => vec![(name.clone(), scrut.clone())],
        Pattern::Constraint(inner, _) => pat_decls(scrut, inner),
        Pattern::Tuple(pats) => pats
            .iter()
            .enumerate()
            .flat_map(|(i, p)| pat_decls(&get_element(scrut.clone(), ProjKind::Tuple(i)), p))
            .collect(),
        Pattern::Cons(head, tail) => {
            let mut decls = pat_decls(&get_element(scrut.clone(), ProjKind::ConsHead), head);
            decls.extend(pat_decls(&get_element(scrut.clone(), ProjKind::ConsTail), tail));
            decls
        }
        Pattern::Any | Pattern::Const(_) => Vec::new(),
    }
}

/// `create_case`: the guarded expansion used by both function parameters
/// and `match` arms.
pub fn create_case(scrut: &Pee, pat: &Pattern, then_expr: Pee, else_expr: Pee) -> Pee {
    let wrapped = pat_decls(scrut, pat)
        .into_iter()
        .rev()
        .fold(then_expr, |body, (name, proj)| Pee::let_nonrec(name, proj, body));
    match and_all(check_pat(scrut, pat)) {
        None => wrapped,
        Some(test) => Pee::If(Box::new(test), Box::new(wrapped), Box::new(else_expr)),
    }
}

/// Split the contiguous prefix of nested `EFun` bindings off `expr`,
/// returning the flattened parameter patterns and the final body.
fn collect_fun_params(mut expr: &Expr) -> (Vec<&Pattern>, &Expr) {
    let mut pats = Vec::new();
    while let Expr::Fun(p, body) = expr {
        pats.push(p);
        expr = body;
    }
    (pats, expr)
}

enum Param<'a> {
    Trivial(String),
    NonTrivial(String, &'a Pattern),
}

fn classify_param<'a>(ctx: &mut ElimCtx, pat: &'a Pattern) -> Param<'a> {
    match pat {
        Pattern::Var(v) => Param::Trivial(v.clone()),
        Pattern::Const(Constant::Unit) => Param::Trivial("()".into()),
        other => Param::NonTrivial(ctx.fresh_name(), other),
    }
}

pub fn pe_expr(ctx: &mut ElimCtx, expr: &Expr) -> Result<Pee, PelimError> {
    match expr {
        Expr::Const(c) => Ok(Pee::Const(c.clone())),
        Expr::Var(name) => Ok(Pee::Var(name.clone())),
        Expr::Apply(f, x) => Ok(Pee::Apply(Box::new(pe_expr(ctx, f)?), Box::new(pe_expr(ctx, x)?))),
        Expr::If(i, t, e) => Ok(Pee::If(
            Box::new(pe_expr(ctx, i)?),
            Box::new(pe_expr(ctx, t)?),
            Box::new(pe_expr(ctx, e)?),
        )),
        Expr::Tuple(elems) => Ok(Pee::Tuple(
            elems.iter().map(|e| pe_expr(ctx, e)).collect::<Result<_, _>>()?,
        )),
        Expr::Cons(h, t) => Ok(Pee::Cons(Box::new(pe_expr(ctx, h)?), Box::new(pe_expr(ctx, t)?))),
        Expr::Constraint(e, _) => pe_expr(ctx, e),
        Expr::Fun(..) => pe_fun(ctx, expr),
        Expr::Match(scrut, cases) => {
            let scrut_pee = pe_expr(ctx, scrut)?;
            match &scrut_pee {
                Pee::Var(_) | Pee::Const(_) => pe_match(ctx, &scrut_pee, cases),
                _ => {
                    let name = ctx.fresh_name();
                    let body = pe_match(ctx, &Pee::var(name.clone()), cases)?;
                    Ok(Pee::let_nonrec(name, scrut_pee, body))
                }
            }
        }
        Expr::Let(Rec::NonRec, pat, bound, body) => {
            let bound_pee = pe_expr(ctx, bound)?;
            let body_pee = pe_expr(ctx, body)?;
            match pat.as_ref() {
                Pattern::Var(v) => Ok(Pee::let_nonrec(v.clone(), bound_pee, body_pee)),
                Pattern::Const(Constant::Unit) => Ok(Pee::let_nonrec("()", bound_pee, body_pee)),
                other => match bound_pee {
                    Pee::Var(_) => Ok(create_case(&bound_pee, other, body_pee, fail_match())),
                    _ => {
                        let fresh = ctx.fresh_name();
                        let scrut = Pee::var(fresh.clone());
                        let case = create_case(&scrut, other, body_pee, fail_match());
                        Ok(Pee::let_nonrec(fresh, bound_pee, case))
                    }
                },
            }
        }
        Expr::Let(Rec::Rec, pat, bound, body) => {
            let decl = pe_decl(ctx, pat, bound)?;
            let body_pee = pe_expr(ctx, body)?;
            Ok(Pee::Let(PeBinding::Rec(vec![decl]), Box::new(body_pee)))
        }
    }
}

fn pe_fun(ctx: &mut ElimCtx, expr: &Expr) -> Result<Pee, PelimError> {
    let (pats, final_body) = collect_fun_params(expr);
    let body_pee = pe_expr(ctx, final_body)?;

    let mut names = Vec::with_capacity(pats.len());
    let mut non_trivial: Vec<(String, &Pattern)> = Vec::new();
    for pat in pats {
        match classify_param(ctx, pat) {
            Param::Trivial(name) => names.push(name),
            Param::NonTrivial(name, pat) => {
                names.push(name.clone());
                non_trivial.push((name, pat));
            }
        }
    }

    match non_trivial.len() {
        0 => Ok(Pee::Fun(names, Box::new(body_pee))),
        1 => {
            let (name, pat) = non_trivial.into_iter().next().unwrap();
            let wrapped = create_case(&Pee::var(name), pat, body_pee, fail_match());
            Ok(Pee::Fun(names, Box::new(wrapped)))
        }
        _ => {
            let tuple_name = ctx.fresh_name();
            let tuple_val = Pee::Tuple(non_trivial.iter().map(|(n, _)| Pee::var(n.clone())).collect());
            let tuple_pat = Pattern::Tuple(non_trivial.iter().map(|(_, p)| (*p).clone()).collect());
            let case = create_case(&Pee::var(tuple_name.clone()), &tuple_pat, body_pee, fail_match());
            let wrapped = Pee::let_nonrec(tuple_name, tuple_val, case);
            Ok(Pee::Fun(names, Box::new(wrapped)))
        }
    }
}

/// `pe_match`: compile cases top-to-bottom over an already-bound
/// scrutinee variable or constant. A case whose pattern always matches
/// (an empty `check_pat`) makes every later case unreachable, so those
/// are dropped without being compiled -- not just discarded from the
/// output tree, which would still advance `ctx`'s fresh-name counter for
/// any `fun`/`match` nested inside them.
pub fn pe_match(ctx: &mut ElimCtx, scrut: &Pee, cases: &[(Pattern, Expr)]) -> Result<Pee, PelimError> {
    match cases {
        [] => Ok(fail_match()),
        [(pat, body), rest @ ..] => {
            let body_pee = pe_expr(ctx, body)?;
            if check_pat(scrut, pat).is_empty() {
                return Ok(create_case(scrut, pat, body_pee, fail_match()));
            }
            let else_branch = pe_match(ctx, scrut, rest)?;
            Ok(create_case(scrut, pat, body_pee, else_branch))
        }
    }
}

/// `pe_decl`: reduce a single `(pattern, expr)` binding to the
/// `(name, expr')` pair a `PERec` group carries. A recursive binding
/// whose pattern is not a plain variable gets the empty-string name -- a
/// known, documented limitation; its bound names are not separately
/// projected out (see DESIGN.md).
fn pe_decl(ctx: &mut ElimCtx, pat: &Pattern, e: &Expr) -> Result<(String, Pee), PelimError> {
    let name = match pat {
        Pattern::Var(v) => v.clone(),
        _ => String::new(),
    };
    Ok((name, pe_expr(ctx, e)?))
}

/// `pe_str_item`.
pub fn pe_str_item(ctx: &mut ElimCtx, item: &StructureItem) -> Result<Vec<PeBinding>, PelimError> {
    match item {
        StructureItem::SEval(e) => Ok(vec![PeBinding::NonRec(String::new(), Box::new(pe_expr(ctx, e)?))]),
        StructureItem::SValue(Rec::NonRec, bindings) => {
            let mut out = Vec::new();
            for (pat, e) in bindings {
                let e_pee = pe_expr(ctx, e)?;
                match pat {
                    Pattern::Var(v) => out.push(PeBinding::NonRec(v.clone(), Box::new(e_pee))),
                    Pattern::Const(Constant::Unit) => {
                        out.push(PeBinding::NonRec("()".into(), Box::new(e_pee)))
                    }
                    other => {
                        let fresh = ctx.fresh_name();
                        let fresh_var = Pee::var(fresh.clone());
                        let guard = match and_all(check_pat(&fresh_var, other)) {
                            None => Pee::Const(Constant::Unit),
                            Some(test) => Pee::If(
                                Box::new(test),
                                Box::new(Pee::Const(Constant::Unit)),
                                Box::new(fail_match()),
                            ),
                        };
                        out.push(PeBinding::NonRec(fresh.clone(), Box::new(e_pee)));
                        out.push(PeBinding::NonRec("()".into(), Box::new(guard)));
                        for (name, proj) in pat_decls(&fresh_var, other) {
                            out.push(PeBinding::NonRec(name, Box::new(proj)));
                        }
                    }
                }
            }
            Ok(out)
        }
        StructureItem::SValue(Rec::Rec, bindings) => {
            let mut decls = Vec::with_capacity(bindings.len());
            for (pat, e) in bindings {
                decls.push(pe_decl(ctx, pat, e)?);
            }
            Ok(vec![PeBinding::Rec(decls)])
        }
    }
}

/// `pe_structure`: fold `pe_str_item` over a whole structure, flattening.
pub fn pe_structure(structure: &Structure) -> Result<Vec<PeBinding>, PelimError> {
    let mut ctx = ElimCtx::new();
    let mut out = Vec::new();
    for item in structure {
        out.extend(pe_str_item(&mut ctx, item)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_pat_unit_and_wildcard_are_trivial() {
        let scrut = Pee::var("x");
        assert!(check_pat(&scrut, &Pattern::Const(Constant::Unit)).is_empty());
        assert!(check_pat(&scrut, &Pattern::Any).is_empty());
    }

    #[test]
    fn check_pat_cons_suppresses_tail_length_check() {
        // `h :: t :: rest` needs list_len > 1, with no separate check on
        // the tail's own top-level length (the `add_list` flag).
        let pat = Pattern::Cons(
            Box::new(Pattern::Var("h".into())),
            Box::new(Pattern::Cons(
                Box::new(Pattern::Var("t".into())),
                Box::new(Pattern::Var("rest".into())),
            )),
        );
        let checks = check_pat(&Pee::var("xs"), &pat);
        assert_eq!(
            checks,
            vec![Pee::apply2(
                Pee::var(">"),
                list_len(Pee::var("xs")),
                Pee::Const(Constant::Int(1)),
            )]
        );
    }

    #[test]
    fn pat_decls_skips_tuple_positions_with_no_variable() {
        let pat = Pattern::Tuple(vec![Pattern::Any, Pattern::Var("b".into())]);
        let decls = pat_decls(&Pee::var("p"), &pat);
        assert_eq!(
            decls,
            vec![(
                "b".to_string(),
                get_element(Pee::var("p"), ProjKind::Tuple(1))
            )]
        );
    }

    #[test]
    fn create_case_with_no_checks_drops_the_else_branch() {
        let case = create_case(
            &Pee::var("x"),
            &Pattern::Var("v".into()),
            Pee::var("v"),
            fail_match(),
        );
        assert_eq!(case, Pee::let_nonrec("v", Pee::var("x"), Pee::var("v")));
    }

    #[test]
    fn non_trivial_top_level_binding_emits_guard_then_projections() {
        let item = StructureItem::SValue(
            Rec::NonRec,
            vec![(
                Pattern::Tuple(vec![Pattern::Var("a".into()), Pattern::Var("b".into())]),
                Expr::Var("pair".into()),
            )],
        );
        let mut ctx = ElimCtx::new();
        let out = pe_str_item(&mut ctx, &item).unwrap();
        match out.as_slice() {
            [
                PeBinding::NonRec(fresh, bound),
                PeBinding::NonRec(guard_name, _guard),
                PeBinding::NonRec(a_name, a_proj),
                PeBinding::NonRec(b_name, b_proj),
            ] => {
                assert_eq!(fresh, "a0");
                assert_eq!(**bound, Pee::Var("pair".into()));
                assert_eq!(guard_name, "()");
                assert_eq!(a_name, "a");
                assert_eq!(**a_proj, get_element(Pee::var("a0"), ProjKind::Tuple(0)));
                assert_eq!(b_name, "b");
                assert_eq!(**b_proj, get_element(Pee::var("a0"), ProjKind::Tuple(1)));
            }
            other => panic!("unexpected bindings: {other:?}"),
        }
    }

    #[test]
    fn recursive_binding_with_non_variable_pattern_gets_empty_name() {
        let item = StructureItem::SValue(
            Rec::Rec,
            vec![(
                Pattern::Tuple(vec![Pattern::Var("a".into()), Pattern::Var("b".into())]),
                Expr::Var("pair".into()),
            )],
        );
        let mut ctx = ElimCtx::new();
        let out = pe_str_item(&mut ctx, &item).unwrap();
        match out.as_slice() {
            [PeBinding::Rec(decls)] => {
                assert_eq!(decls.len(), 1);
                assert_eq!(decls[0].0, "");
            }
            other => panic!("unexpected bindings: {other:?}"),
        }
    }
}
