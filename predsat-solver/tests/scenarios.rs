//! End-to-end scenario battery.
//!
//! Every scenario runs against all three backends under both lifecycle
//! policies; the backends must agree with the expected verdict and with
//! each other.

use predsat_solver::{
    session, Backend, CheckError, CmpOp, Column, ColumnType, Expr, Lifecycle, QuillSession,
    SatChecker, TextOperand,
};

const BACKENDS: [Backend; 3] = [Backend::Quill, Backend::Boreal, Backend::Cirrus];
const LIFECYCLES: [Lifecycle; 2] = [Lifecycle::PerCall, Lifecycle::Resetting];

fn verdict_everywhere(expr: &Expr, expected: bool) {
    for backend in BACKENDS {
        for lifecycle in LIFECYCLES {
            let mut checker = session(backend, lifecycle);
            let verdict = checker
                .is_satisfiable(expr)
                .unwrap_or_else(|e| panic!("{backend:?}/{lifecycle:?} failed: {e}"));
            assert_eq!(
                verdict.is_satisfiable(),
                expected,
                "{backend:?}/{lifecycle:?} disagreed on {expr:?}"
            );
        }
    }
}

fn int_col(name: &str) -> Column {
    Column::new("t", name, 1, ColumnType::Integer)
}

fn real_col(name: &str) -> Column {
    Column::new("t", name, 1, ColumnType::Real)
}

fn bool_col(name: &str) -> Column {
    Column::new("t", name, 1, ColumnType::Boolean)
}

fn text_col(name: &str, len: u32) -> Column {
    Column::new("t", name, 1, ColumnType::Varchar { len })
}

fn col(c: &Column) -> Option<TextOperand> {
    Some(TextOperand::Column(c.clone()))
}

fn lit(s: &str) -> Option<TextOperand> {
    Some(TextOperand::Literal(s.to_string()))
}

#[test]
fn boolean_constants() {
    let and = Expr::and(vec![Expr::bool_lit(true), Expr::bool_lit(false)]).unwrap();
    verdict_everywhere(&and, false);

    let or = Expr::or(vec![Expr::bool_lit(true), Expr::bool_lit(false)]).unwrap();
    verdict_everywhere(&or, true);
}

#[test]
fn nested_boolean_structure() {
    let inner = Expr::or(vec![Expr::bool_lit(true), Expr::bool_lit(false)]).unwrap();
    let expr = Expr::and(vec![Expr::bool_lit(true), inner]).unwrap();
    verdict_everywhere(&expr, true);
}

#[test]
fn integer_offset_equalities() {
    let (x, y) = (int_col("ix"), int_col("iy"));
    let base = |last: Expr| {
        Expr::and(vec![
            Expr::int_cmp(CmpOp::Equal, Some(x.clone()), None, 21).unwrap(),
            Expr::int_cmp(CmpOp::Equal, Some(y.clone()), None, 21).unwrap(),
            last,
        ])
        .unwrap()
    };
    let same = base(Expr::int_cmp(CmpOp::Equal, Some(x.clone()), Some(y.clone()), 0).unwrap());
    verdict_everywhere(&same, true);

    let shifted = base(Expr::int_cmp(CmpOp::Equal, Some(x.clone()), Some(y.clone()), -1).unwrap());
    verdict_everywhere(&shifted, false);
}

#[test]
fn integer_strict_less_is_discrete() {
    // x < y and y < x + 1 has no integer solution; the real twin does.
    let (x, y) = (int_col("ix"), int_col("iy"));
    let expr = Expr::and(vec![
        Expr::int_cmp(CmpOp::Less, Some(x.clone()), Some(y.clone()), 0).unwrap(),
        Expr::int_cmp(CmpOp::Less, Some(y), Some(x), 1).unwrap(),
    ])
    .unwrap();
    verdict_everywhere(&expr, false);

    let (dx, dy) = (real_col("dx"), real_col("dy"));
    let dense = Expr::and(vec![
        Expr::real_cmp(CmpOp::Less, Some(dx.clone()), Some(dy.clone()), 0.0).unwrap(),
        Expr::real_cmp(CmpOp::Less, Some(dy), Some(dx), 1.0).unwrap(),
    ])
    .unwrap();
    verdict_everywhere(&dense, true);
}

#[test]
fn real_not_equal_needs_slack() {
    let (dx, dy) = (real_col("dx"), real_col("dy"));
    let pinned = Expr::and(vec![
        Expr::real_cmp(CmpOp::LessOrEqual, Some(dx.clone()), Some(dy.clone()), 0.0).unwrap(),
        Expr::real_cmp(CmpOp::LessOrEqual, Some(dy.clone()), Some(dx.clone()), 0.0).unwrap(),
        Expr::real_cmp(CmpOp::NotEqual, Some(dx.clone()), Some(dy.clone()), 0.0).unwrap(),
    ])
    .unwrap();
    verdict_everywhere(&pinned, false);

    let loose = Expr::and(vec![
        Expr::real_cmp(CmpOp::LessOrEqual, Some(dx.clone()), Some(dy.clone()), 0.0).unwrap(),
        Expr::real_cmp(CmpOp::NotEqual, Some(dx), Some(dy), 0.0).unwrap(),
    ])
    .unwrap();
    verdict_everywhere(&loose, true);
}

#[test]
fn text_zero_extension_ordering() {
    // sx3 = "aaa", sz3 = "aba", sx3 < sy2 < sz3; a two-character "ab"
    // sits between them once zero-extended.
    let sx3 = text_col("sx3", 3);
    let sy2 = text_col("sy2", 2);
    let sz3 = text_col("sz3", 3);
    let expr = Expr::and(vec![
        Expr::text_cmp(CmpOp::Equal, col(&sx3), lit("aaa")).unwrap(),
        Expr::text_cmp(CmpOp::Equal, col(&sz3), lit("aba")).unwrap(),
        Expr::text_cmp(CmpOp::Less, col(&sx3), col(&sy2)).unwrap(),
        Expr::text_cmp(CmpOp::Less, col(&sy2), col(&sz3)).unwrap(),
    ])
    .unwrap();
    verdict_everywhere(&expr, true);
}

#[test]
fn text_strict_order_is_irreflexive() {
    let sx = text_col("sx", 20);
    let expr = Expr::text_cmp(CmpOp::Less, col(&sx), col(&sx)).unwrap();
    verdict_everywhere(&expr, false);
}

#[test]
fn text_equal_literals_of_unequal_length() {
    // "ab" = "aba" is false: the padded two-character string ends in NUL.
    let expr = Expr::text_cmp(CmpOp::Equal, lit("ab"), lit("aba")).unwrap();
    verdict_everywhere(&expr, false);

    // But "ab" < "aba" holds.
    let less = Expr::text_cmp(CmpOp::Less, lit("ab"), lit("aba")).unwrap();
    verdict_everywhere(&less, true);
}

#[test]
fn implication_chain() {
    // (x => y) and (y => z) and x and not z: unsat; with z instead: sat.
    let (bx, by, bz) = (bool_col("bx"), bool_col("by"), bool_col("bz"));
    let imp = |from: &Column, to: &Column| {
        Expr::or(vec![
            Expr::not_bool_col(from.clone()).unwrap(),
            Expr::bool_col(to.clone()).unwrap(),
        ])
        .unwrap()
    };
    let contradiction = Expr::and(vec![
        imp(&bx, &by),
        imp(&by, &bz),
        Expr::bool_col(bx.clone()).unwrap(),
        Expr::not_bool_col(bz.clone()).unwrap(),
    ])
    .unwrap();
    verdict_everywhere(&contradiction, false);

    let consistent = Expr::and(vec![
        imp(&bx, &by),
        imp(&by, &bz),
        Expr::bool_col(bx).unwrap(),
        Expr::bool_col(bz).unwrap(),
    ])
    .unwrap();
    verdict_everywhere(&consistent, true);
}

#[test]
fn tautology_fold_for_every_comparison_kind() {
    for op in [CmpOp::Equal, CmpOp::NotEqual, CmpOp::Less, CmpOp::LessOrEqual] {
        let int_empty = Expr::int_cmp(op, None, None, 5).unwrap();
        verdict_everywhere(&int_empty, true);
        verdict_everywhere(&Expr::not(int_empty), false);

        let real_empty = Expr::real_cmp(op, None, None, -2.5).unwrap();
        verdict_everywhere(&real_empty, true);

        let text_empty = Expr::text_cmp(op, None, None).unwrap();
        verdict_everywhere(&text_empty, true);
    }
}

#[test]
fn resetting_sessions_have_no_state_bleed() {
    let x = int_col("ix");
    let sat = Expr::int_cmp(CmpOp::Equal, Some(x.clone()), None, 3).unwrap();
    let unsat = Expr::and(vec![
        Expr::int_cmp(CmpOp::Equal, Some(x.clone()), None, 3).unwrap(),
        Expr::int_cmp(CmpOp::Equal, Some(x.clone()), None, 4).unwrap(),
    ])
    .unwrap();
    for backend in BACKENDS {
        let mut checker = session(backend, Lifecycle::Resetting);
        for round in 0..4 {
            assert!(
                !checker.is_satisfiable(&unsat).unwrap().is_satisfiable(),
                "{backend:?} round {round}: stale state leaked into unsat check"
            );
            assert!(
                checker.is_satisfiable(&sat).unwrap().is_satisfiable(),
                "{backend:?} round {round}: stale state leaked into sat check"
            );
        }
    }
}

#[test]
fn resetting_session_rejects_retyped_column_names() {
    // The same qualified name reused at a different type within one
    // resetting session must surface as a translation failure.
    let as_int = Expr::int_cmp(CmpOp::Equal, Some(int_col("ix")), None, 1).unwrap();
    let as_text =
        Expr::text_cmp(CmpOp::Equal, col(&text_col("ix", 2)), lit("ab")).unwrap();
    for backend in BACKENDS {
        let mut checker = session(backend, Lifecycle::Resetting);
        checker.is_satisfiable(&as_int).unwrap();
        let err = checker.is_satisfiable(&as_text).unwrap_err();
        assert!(
            matches!(err, CheckError::Translation { .. }),
            "{backend:?}: expected a translation failure, got {err}"
        );
    }
}

#[test]
fn indeterminate_results_are_failures_not_verdicts() {
    let mut session = QuillSession::with_config(
        Lifecycle::PerCall,
        predsat_engines_config(1),
    );
    let p = bool_col("bp");
    let q = bool_col("bq");
    let or = Expr::or(vec![
        Expr::bool_col(p).unwrap(),
        Expr::bool_col(q).unwrap(),
    ])
    .unwrap();
    let err = session.is_satisfiable(&or).unwrap_err();
    assert!(matches!(err, CheckError::Indeterminate));
    // The per-call context was still torn down.
    assert!(!session.is_open());
}

fn predsat_engines_config(branch_budget: u64) -> predsat_engines::quill::Config {
    predsat_engines::quill::Config { branch_budget }
}
