use std::sync::Arc;
use std::thread;

use ruleval::{impl_record, Rule};

struct Request {
    age: i64,
    region: String,
}

impl_record!(Request {
    "age" => age,
    "region" => region,
});

fn main() {
    let rule = Arc::new(
        Rule::compile(r#"age >= 18 && region != "restricted""#).expect("failed to compile rule"),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let rule = Arc::clone(&rule);
            thread::spawn(move || {
                let request = Request {
                    age: 16 + i,
                    region: if i == 3 { "restricted" } else { "us-east" }.to_owned(),
                };
                (i, rule.as_bool(&request))
            })
        })
        .collect();

    for handle in handles {
        let (i, result) = handle.join().expect("thread panicked");
        println!("Thread {i}: {result:?}");
    }
}
