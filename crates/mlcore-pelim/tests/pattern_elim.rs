use mlcore_ast::{Constant, Expr, Pattern};
use mlcore_pelim::{pe_expr, ElimCtx, PeBinding, Pee};

fn var(name: &str) -> Expr {
    Expr::Var(name.into())
}

fn apply2(op: &str, a: Expr, b: Expr) -> Expr {
    Expr::Apply(Box::new(Expr::Apply(Box::new(var(op)), Box::new(a))), Box::new(b))
}

/// `fun (a, b) -> a + b` collapses to one parameter `a0`, whose body binds
/// `a` to `Tuple 0 a0` and `b` to `Tuple 1 a0` before returning `a + b`.
#[test]
fn tuple_parameter_destructures_via_projections() {
    let expr = Expr::Fun(
        Pattern::Tuple(vec![Pattern::Var("a".into()), Pattern::Var("b".into())]),
        Box::new(apply2("+", var("a"), var("b"))),
    );
    let mut ctx = ElimCtx::new();
    let pee = pe_expr(&mut ctx, &expr).unwrap();

    let expected_body = Pee::let_nonrec(
        "a",
        Pee::apply2(Pee::var("Tuple"), Pee::Const(Constant::Int(0)), Pee::var("a0")),
        Pee::let_nonrec(
            "b",
            Pee::apply2(Pee::var("Tuple"), Pee::Const(Constant::Int(1)), Pee::var("a0")),
            Pee::apply2(Pee::var("+"), Pee::var("a"), Pee::var("b")),
        ),
    );
    assert_eq!(pee, Pee::Fun(vec!["a0".into()], Box::new(expected_body)));
}

/// `match xs with | [] -> 0 | h :: t -> 1`: the cons case's guard is
/// `list_len(xs) > 0`; the nil case carries its own equality check and
/// becomes the innermost fallback. Both branches return evaluation-preserving
/// results, matching the "if list_len(xs) > 0 then 1 else 0" semantics even
/// though the literal tree keeps the nil equality test rather than eliding it.
#[test]
fn list_match_compiles_to_nested_guards_in_source_order() {
    let expr = Expr::Match(
        Box::new(var("xs")),
        vec![
            (Pattern::Const(Constant::Nil), Expr::Const(Constant::Int(0))),
            (
                Pattern::Cons(Box::new(Pattern::Var("h".into())), Box::new(Pattern::Var("t".into()))),
                Expr::Const(Constant::Int(1)),
            ),
        ],
    );
    let mut ctx = ElimCtx::new();
    let pee = pe_expr(&mut ctx, &expr).unwrap();

    // xs is already a variable scrutinee, so no extra let wraps it. The
    // cons branch's `h`/`t` projections are bound unconditionally, even
    // though this particular body never uses them.
    let inner_fail = Pee::Apply(Box::new(Pee::var("fail_match")), Box::new(Pee::Const(Constant::Unit)));
    let cons_body = Pee::let_nonrec(
        "h",
        Pee::Apply(Box::new(Pee::var("Cons_head")), Box::new(Pee::var("xs"))),
        Pee::let_nonrec(
            "t",
            Pee::Apply(Box::new(Pee::var("Cons_tail")), Box::new(Pee::var("xs"))),
            Pee::Const(Constant::Int(1)),
        ),
    );
    let cons_case = Pee::If(
        Box::new(Pee::apply2(
            Pee::var(">"),
            Pee::Apply(Box::new(Pee::var("list_len")), Box::new(Pee::var("xs"))),
            Pee::Const(Constant::Int(0)),
        )),
        Box::new(cons_body),
        Box::new(inner_fail),
    );
    let expected = Pee::If(
        Box::new(Pee::apply2(Pee::var("="), Pee::var("xs"), Pee::Const(Constant::Nil))),
        Box::new(Pee::Const(Constant::Int(0))),
        Box::new(cons_case),
    );
    assert_eq!(pee, expected);
}

/// A match on a non-trivial scrutinee expression gets bound to a fresh name
/// first.
#[test]
fn match_on_compound_scrutinee_binds_a_fresh_name() {
    let expr = Expr::Match(
        Box::new(apply2("+", var("x"), var("y"))),
        vec![(Pattern::Any, Expr::Const(Constant::Int(0)))],
    );
    let mut ctx = ElimCtx::new();
    let pee = pe_expr(&mut ctx, &expr).unwrap();
    match pee {
        Pee::Let(PeBinding::NonRec(name, bound), body) => {
            assert_eq!(name, "a0");
            assert_eq!(*bound, Pee::apply2(Pee::var("+"), Pee::var("x"), Pee::var("y")));
            assert_eq!(*body, Pee::Const(Constant::Int(0)));
        }
        other => panic!("expected a let binding the scrutinee, got {other:?}"),
    }
}

/// No `Pee` ever carries a `Pattern` value; every binder is a plain name,
/// `"()"`, or the empty string.
#[test]
fn tuple_destructure_emits_no_pattern_values() {
    let expr = Expr::Fun(
        Pattern::Tuple(vec![Pattern::Var("a".into()), Pattern::Var("b".into())]),
        Box::new(var("a")),
    );
    let mut ctx = ElimCtx::new();
    let pee = pe_expr(&mut ctx, &expr).unwrap();
    match pee {
        Pee::Fun(names, _) => {
            for name in names {
                assert!(name.chars().all(|c| c.is_alphanumeric() || c == '_') || name == "()");
            }
        }
        other => panic!("expected a Fun node, got {other:?}"),
    }
}
