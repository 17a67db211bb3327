use ruleval::{eval_bool, impl_record, Rule};

struct Customer {
    age: i64,
    status: String,
    tags: Vec<String>,
}

impl_record!(Customer {
    "age" => age,
    "status" => status,
    "tags" => tags,
});

struct Order {
    total: f64,
    items: Vec<i64>,
    customer: Customer,
}

impl_record!(Order {
    "total" => total,
    "items" => items,
    "customer" => customer,
});

fn main() {
    let order = Order {
        total: 129.5,
        items: vec![3, 1, 4],
        customer: Customer {
            age: 34,
            status: "active".to_owned(),
            tags: vec!["vip".to_owned(), "eu".to_owned()],
        },
    };

    // Compile once, evaluate many times.
    let rule = Rule::compile(
        r#"customer.age >= 18 && customer.status == "active" && in(customer.tags, "vip")"#,
    )
    .expect("failed to compile rule");

    println!("{rule}");
    match rule.as_bool(&order) {
        Ok(hit) => println!("Result: {hit}"),
        Err(err) => println!("Evaluation failed: {err}"),
    }

    let discount = Rule::compile("total * 0.1 + items[0]").expect("failed to compile rule");
    println!("Discount: {:?}", discount.as_float(&order));

    // One-shot evaluation compiles on every call.
    println!("Big order: {:?}", eval_bool(&order, "total > 100"));

    // Errors are values, not panics.
    println!("Typo: {:?}", eval_bool(&order, "customer.agee > 1"));
}
