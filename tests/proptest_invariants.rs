
use proptest::prelude::*;
use ruleval::{eval_bool, eval_float, parse, CompileError, Rule, Value};
use strategies::{
    arb_bool_expr, arb_numeric_expr, arb_numeric_expr_with_unspellable, arb_record, Sample,
};

/// Helper: a comparable rendering of an evaluation outcome (NaN included).
fn outcome(rule: &Rule, record: &Sample) -> String {
    format!("{:?}", rule.evaluate(record))
}

// ---------------------------------------------------------------------------
// Invariant 1: Determinism
//
// The same rule + record must always produce the same outcome.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn determinism_repeated(expr in arb_bool_expr(3), record in arb_record()) {
        let rule = Rule::from_expr(expr).unwrap();
        let first = outcome(&rule, &record);
        for _ in 0..5 {
            prop_assert_eq!(&first, &outcome(&rule, &record), "determinism violated on repeated evaluation");
        }
    }

    #[test]
    fn determinism_recompile(expr in arb_bool_expr(3), record in arb_record()) {
        let text = expr.to_string();
        let r1 = Rule::compile(&text).unwrap();
        let r2 = Rule::compile(&text).unwrap();
        prop_assert_eq!(outcome(&r1, &record), outcome(&r2, &record));
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Compile once, evaluate many
//
// A held rule agrees with the one-shot helpers on every record.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn compiled_matches_one_shot_bool(expr in arb_bool_expr(3), records in prop::collection::vec(arb_record(), 1..8)) {
        let text = expr.to_string();
        let rule = Rule::compile(&text).unwrap();
        for record in &records {
            let compiled = rule.as_bool(record).map_err(|e| e.to_string());
            let one_shot = eval_bool(record, &text).map_err(|e| e.to_string());
            prop_assert_eq!(compiled, one_shot);
        }
    }

    #[test]
    fn compiled_matches_one_shot_float(expr in arb_numeric_expr(4), records in prop::collection::vec(arb_record(), 1..8)) {
        let text = expr.to_string();
        let rule = Rule::compile(&text).unwrap();
        for record in &records {
            let compiled = rule.as_float(record).map(f64::to_bits).map_err(|e| e.to_string());
            let one_shot = eval_float(record, &text).map(f64::to_bits).map_err(|e| e.to_string());
            prop_assert_eq!(compiled, one_shot);
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Arithmetic is floating point
//
// Any successful arithmetic node yields a float, even on integer operands.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn arithmetic_yields_float(l in arb_numeric_expr(2), r in arb_numeric_expr(2), op in 0_u8..4, record in arb_record()) {
        let expr = match op {
            0 => l.add(r),
            1 => l.sub(r),
            2 => l.mul(r),
            _ => l.div(r),
        };
        let rule = Rule::from_expr(expr).unwrap();
        if let Ok(value) = rule.evaluate(&record) {
            prop_assert!(matches!(value, Value::Float(_)), "got {:?}", value);
        }
    }

    #[test]
    fn comparisons_yield_bool(expr in arb_bool_expr(2), record in arb_record()) {
        let rule = Rule::from_expr(expr).unwrap();
        if let Ok(value) = rule.evaluate(&record) {
            prop_assert!(matches!(value, Value::Bool(_)), "got {:?}", value);
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: Rendering round-trips
//
// Rendered rule text re-parses to a tree with the same meaning, and
// rendering that tree again reproduces the same text.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn display_reparses_to_same_meaning(expr in arb_bool_expr(3), record in arb_record()) {
        let built = Rule::from_expr(expr).unwrap();
        let reparsed = Rule::compile(built.source()).unwrap();
        prop_assert_eq!(outcome(&built, &record), outcome(&reparsed, &record));
    }

    #[test]
    fn display_is_a_fixed_point(expr in arb_numeric_expr(4)) {
        let text = expr.to_string();
        let reparsed = parse::parse(&text).unwrap();
        prop_assert_eq!(reparsed.to_string(), text);
    }

    /// A tree whose rendering would not parse back is never turned into a rule.
    #[test]
    fn unspellable_literals_are_rejected(expr in arb_numeric_expr_with_unspellable()) {
        let rejected = matches!(
            Rule::from_expr(expr.gt(0_i64)),
            Err(CompileError::UnspellableLiteral { .. })
        );
        prop_assert!(rejected);
    }
}
