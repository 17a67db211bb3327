use ruleval::{
    compile, eval_bool, eval_float, eval_int, impl_record, CompileError, EvalError, Rule,
    RulevalError,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

struct Abc {
    a_value: i64,
    b_value: i64,
    c_value: String,
}

impl_record!(Abc {
    "a" => a_value,
    "b" => b_value,
    "c" => c_value,
});

struct Xy {
    x: f64,
    abc: Abc,
    y: Vec<i64>,
    z: Vec<String>,
    none: Vec<i64>,
}

impl_record!(Xy {
    "x" => x,
    "abc" => abc,
    "y" => y,
    "z" => z,
    "empty" => none,
});

struct More {
    xy: Xy,
}

impl_record!(More { "xy" => xy });

fn abc(a: i64, b: i64) -> Abc {
    Abc {
        a_value: a,
        b_value: b,
        c_value: "xxxxx".to_owned(),
    }
}

fn more() -> More {
    More {
        xy: Xy {
            x: 10.0,
            abc: abc(8, 20),
            y: vec![3, 6, 9],
            z: vec!["abc".to_owned(), "bcd".to_owned()],
            none: vec![],
        },
    }
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

#[test]
fn integer_addition_yields_float() {
    let rule = Rule::compile("a+b").unwrap();
    assert_eq!(rule.as_float(&abc(10, 8)).unwrap(), 18.0);
    assert_eq!(rule.as_int(&abc(10, 8)).unwrap(), 18);
    assert!(matches!(
        rule.as_bool(&abc(10, 8)),
        Err(EvalError::ResultType {
            expected: "bool",
            found: "float"
        })
    ));
}

#[test]
fn compound_arithmetic() {
    let rule = Rule::compile("a+b*b-a*b+(a+b)/(a-b)").unwrap();
    assert_eq!(rule.as_float(&abc(10, 8)).unwrap(), 3.0);
}

#[test]
fn as_int_truncates_division() {
    assert_eq!(eval_int(&abc(10, 4), "a / b").unwrap(), 2);
    assert_eq!(eval_float(&abc(10, 4), "a / b").unwrap(), 2.5);
}

// ---------------------------------------------------------------------------
// Logic and comparison
// ---------------------------------------------------------------------------

#[test]
fn logical_composition() {
    let rule = Rule::compile("a>b && b<5 || a>8 && b<9").unwrap();
    assert!(rule.as_bool(&abc(10, 8)).unwrap());
    assert!(!rule.as_bool(&abc(5, 8)).unwrap());
}

#[test]
fn string_equality() {
    assert!(eval_bool(&abc(0, 0), r#"c=="xxxxx""#).unwrap());
    assert!(!eval_bool(&abc(0, 0), r#"c=="yyyyy""#).unwrap());
    assert!(eval_bool(&abc(0, 0), r#"c!="yyyyy""#).unwrap());
}

#[test]
fn the_headline_rule() {
    let rule = Rule::compile("a + b < c2 * 2").unwrap();
    let record: std::collections::HashMap<String, i64> = [
        ("a".to_owned(), 8),
        ("b".to_owned(), 12),
        ("c2".to_owned(), 16),
    ]
    .into();
    assert!(rule.as_bool(&record).unwrap());
}

// ---------------------------------------------------------------------------
// Nested records and sequences
// ---------------------------------------------------------------------------

#[test]
fn nested_field_paths() {
    let rule = Rule::compile("xy.abc.a-xy.abc.b+xy.x").unwrap();
    assert_eq!(rule.as_float(&more()).unwrap(), -2.0);
}

#[test]
fn computed_index() {
    let rule = Rule::compile("xy.y[1]-xy.y[xy.abc.b/xy.x]").unwrap();
    assert_eq!(rule.as_float(&more()).unwrap(), -3.0);
}

#[test]
fn plain_index_keeps_element_type() {
    let rule = Rule::compile("xy.y[0]").unwrap();
    assert_eq!(rule.as_int(&more()).unwrap(), 3);
    assert_eq!(rule.as_float(&more()).unwrap(), 3.0);
}

#[test]
fn membership() {
    let record = more();
    assert!(eval_bool(&record, "in(xy.y, 6)").unwrap());
    assert!(!eval_bool(&record, "in(xy.y, 5)").unwrap());
    assert!(eval_bool(&record, r#"in(xy.z, "abc")"#).unwrap());
    assert!(!eval_bool(&record, r#"in(xy.z, "xyz")"#).unwrap());
    assert!(!eval_bool(&record, "in(xy.empty, xy.x)").unwrap());
}

#[test]
fn membership_name_is_case_insensitive() {
    let record = more();
    assert!(eval_bool(&record, "IN(xy.y, 9)").unwrap());
    assert!(eval_bool(&record, "In(xy.y, 9)").unwrap());
}

#[test]
fn membership_combines_with_logic() {
    let rule = Rule::compile(r#"in(xy.z, "bcd") && xy.abc.a < xy.x"#).unwrap();
    assert!(rule.as_bool(&more()).unwrap());
}

#[test]
fn records_behind_pointers() {
    let rule = Rule::compile("xy.abc.a == 8").unwrap();
    let boxed = Box::new(more());
    assert!(rule.as_bool(&boxed).unwrap());
    let shared = std::sync::Arc::new(more());
    assert!(rule.as_bool(&shared).unwrap());
    assert!(rule.as_bool(&&*shared).unwrap());
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn empty_rule() {
    assert!(matches!(compile(""), Err(CompileError::EmptyRule)));
    assert!(matches!(
        eval_bool(&abc(0, 0), ""),
        Err(RulevalError::Compile(CompileError::EmptyRule))
    ));
}

#[test]
fn malformed_rule() {
    assert!(matches!(compile("a +"), Err(CompileError::Parse(_))));
    assert!(matches!(compile("a ++ b"), Err(CompileError::Parse(_))));
}

#[test]
fn missing_alias() {
    let err = Rule::compile("xy.nope > 1")
        .unwrap()
        .as_bool(&more())
        .unwrap_err();
    assert_eq!(
        err,
        EvalError::FieldNotFound {
            alias: "nope".into()
        }
    );
}

#[test]
fn internal_field_name_is_not_addressable() {
    let err = eval_int(&abc(1, 2), "a_value").unwrap_err();
    assert!(matches!(
        err,
        RulevalError::Eval(EvalError::FieldNotFound { .. })
    ));
}

#[test]
fn index_past_end() {
    let err = Rule::compile("xy.y[3]").unwrap().as_int(&more()).unwrap_err();
    assert_eq!(err, EvalError::IndexOutOfRange { index: 3, len: 3 });
}

#[test]
fn bool_result_is_not_numeric() {
    let rule = Rule::compile("a > b").unwrap();
    assert!(matches!(
        rule.as_int(&abc(2, 1)),
        Err(EvalError::ResultType {
            expected: "int",
            found: "bool"
        })
    ));
    assert!(matches!(
        rule.as_float(&abc(2, 1)),
        Err(EvalError::ResultType {
            expected: "float",
            found: "bool"
        })
    ));
}

// ---------------------------------------------------------------------------
// Compile once, evaluate many
// ---------------------------------------------------------------------------

#[test]
fn compiled_rule_matches_one_shot() {
    let text = "a+b*b-a*b+(a+b)/(a-b)";
    let rule = Rule::compile(text).unwrap();
    for (a, b) in [(10, 8), (3, 1), (100, -7), (0, 5)] {
        let record = abc(a, b);
        let compiled = rule.as_float(&record).unwrap();
        let one_shot = eval_float(&record, text).unwrap();
        assert_eq!(compiled.to_bits(), one_shot.to_bits());
        assert_eq!(rule.as_float(&record).unwrap().to_bits(), compiled.to_bits());
    }
}

#[test]
fn one_rule_many_records_and_one_record_many_rules() {
    let rule = Rule::compile("a < b").unwrap();
    let records: Vec<Abc> = (0..10).map(|i| abc(i, 5)).collect();
    let hits = records
        .iter()
        .filter(|r| rule.as_bool(*r).unwrap())
        .count();
    assert_eq!(hits, 5);

    let record = more();
    let rules: Vec<Rule> = ["xy.x > 5", "in(xy.y, 3)", r#"xy.abc.c == "xxxxx""#]
        .iter()
        .map(|t| t.parse().unwrap())
        .collect();
    assert!(rules.iter().all(|r| r.as_bool(&record).unwrap()));
}

#[test]
fn rule_from_file() {
    let path = std::env::temp_dir().join(format!("ruleval_rule_{}.txt", std::process::id()));
    std::fs::write(&path, "xy.x * 2 >= 20\n").unwrap();
    let rule = Rule::from_file(&path).unwrap();
    assert_eq!(rule.source(), "xy.x * 2 >= 20");
    assert!(rule.as_bool(&more()).unwrap());
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(
        Rule::from_file(&path),
        Err(RulevalError::Io(_))
    ));
}
