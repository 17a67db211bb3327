use std::collections::HashMap;

use ruleval::{call, field, lit, Rule, Value};

fn main() {
    // Build the tree directly instead of parsing text.
    let expr = field("score")
        .mul(2_i64)
        .gt(field("threshold"))
        .and(call("in", vec![field("levels"), lit("gold")]));

    let rule = Rule::from_expr(expr).expect("rule too deep");
    println!("Source: {}", rule.source());

    let mut record: HashMap<String, Value<'static>> = HashMap::new();
    record.insert("score".to_owned(), Value::Int(40));
    record.insert("threshold".to_owned(), Value::Float(75.0));
    record.insert(
        "levels".to_owned(),
        Value::Sequence(vec!["silver".into(), "gold".into()]),
    );

    println!("Result: {:?}", rule.as_bool(&record));

    // The rendering parses back to an equivalent rule.
    let reparsed = Rule::compile(rule.source()).expect("rendered text should parse");
    println!("Reparsed: {:?}", reparsed.as_bool(&record));
}
