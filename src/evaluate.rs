use crate::resolve::{index, resolve};
use crate::{BinaryOp, EvalError, Expr, Record, Value};

/// Reduce `expr` against `root`.
///
/// Recursion depth equals tree depth, which compilation bounds.
pub(crate) fn evaluate<'a>(expr: &'a Expr, root: &'a dyn Record) -> Result<Value<'a>, EvalError> {
    match expr {
        Expr::Literal(lit) => Ok(lit.to_value()),
        Expr::Field(alias) => root.field(alias).ok_or_else(|| EvalError::FieldNotFound {
            alias: alias.clone(),
        }),
        Expr::Selector { base, name } => {
            let target = evaluate(base, root)?;
            resolve(&target, name)
        }
        Expr::Index { base, index: idx } => {
            let offset = evaluate(idx, root)?;
            let collection = evaluate(base, root)?;
            index(collection, &offset)
        }
        Expr::Binary { op, left, right } => {
            // Both sides always run, so an error on the right surfaces even
            // when the left side already decides a logical operator.
            let left = evaluate(left, root)?;
            let right = evaluate(right, root)?;
            apply_binary(*op, &left, &right)
        }
        Expr::Call { name, args } => call(name, args, root),
        Expr::Paren(inner) => evaluate(inner, root),
        Expr::Unary { .. } => Err(EvalError::UnsupportedExpr {
            expr: expr.to_string(),
        }),
    }
}

fn apply_binary(op: BinaryOp, left: &Value<'_>, right: &Value<'_>) -> Result<Value<'static>, EvalError> {
    match op {
        BinaryOp::Add => arithmetic(op, left, right, |l, r| l + r),
        BinaryOp::Sub => arithmetic(op, left, right, |l, r| l - r),
        BinaryOp::Mul => arithmetic(op, left, right, |l, r| l * r),
        BinaryOp::Div => arithmetic(op, left, right, |l, r| l / r),
        BinaryOp::Lt => ordering(op, left, right, |l, r| l < r),
        BinaryOp::Lte => ordering(op, left, right, |l, r| l <= r),
        BinaryOp::Gt => ordering(op, left, right, |l, r| l > r),
        BinaryOp::Gte => ordering(op, left, right, |l, r| l >= r),
        BinaryOp::Eq => equality(op, left, right).map(Value::Bool),
        BinaryOp::Neq => equality(op, left, right).map(|equal| Value::Bool(!equal)),
        BinaryOp::And => logical(op, left, right, |l, r| l && r),
        BinaryOp::Or => logical(op, left, right, |l, r| l || r),
    }
}

fn numbers(op: BinaryOp, left: &Value<'_>, right: &Value<'_>) -> Result<(f64, f64), EvalError> {
    let coerce = |value: &Value<'_>| {
        value.as_f64().ok_or(EvalError::NotNumber {
            op: op.symbol(),
            found: value.type_name(),
        })
    };
    Ok((coerce(left)?, coerce(right)?))
}

fn arithmetic(
    op: BinaryOp,
    left: &Value<'_>,
    right: &Value<'_>,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Value<'static>, EvalError> {
    let (l, r) = numbers(op, left, right)?;
    Ok(Value::Float(f(l, r)))
}

fn ordering(
    op: BinaryOp,
    left: &Value<'_>,
    right: &Value<'_>,
    f: impl Fn(f64, f64) -> bool,
) -> Result<Value<'static>, EvalError> {
    let (l, r) = numbers(op, left, right)?;
    Ok(Value::Bool(f(l, r)))
}

#[allow(clippy::float_cmp)]
fn equality(op: BinaryOp, left: &Value<'_>, right: &Value<'_>) -> Result<bool, EvalError> {
    if let (Value::String(l), Value::String(r)) = (left, right) {
        return Ok(l == r);
    }
    let (l, r) = numbers(op, left, right)?;
    Ok(l == r)
}

fn logical(
    op: BinaryOp,
    left: &Value<'_>,
    right: &Value<'_>,
    f: impl Fn(bool, bool) -> bool,
) -> Result<Value<'static>, EvalError> {
    let coerce = |value: &Value<'_>| {
        value.as_bool().ok_or(EvalError::NotBool {
            op: op.symbol(),
            found: value.type_name(),
        })
    };
    Ok(Value::Bool(f(coerce(left)?, coerce(right)?)))
}

// -- Built-in functions -----------------------------------------------------

fn call<'a>(name: &str, args: &'a [Expr], root: &'a dyn Record) -> Result<Value<'a>, EvalError> {
    if !name.eq_ignore_ascii_case("in") {
        return Err(EvalError::UnsupportedFunction {
            name: name.to_owned(),
        });
    }
    let [collection, key] = args else {
        return Err(EvalError::Arity {
            function: name.to_owned(),
            expected: 2,
            found: args.len(),
        });
    };

    let collection = evaluate(collection, root)?;
    let key = evaluate(key, root)?;
    let items = match collection {
        Value::Sequence(items) => items,
        other => {
            return Err(EvalError::NotSequence {
                found: other.type_name(),
            })
        }
    };
    contains(&items, &key).map(Value::Bool)
}

/// Membership test. The first element's type picks the comparison; elements
/// of any other type never match.
#[allow(clippy::float_cmp, clippy::cast_precision_loss)]
fn contains(items: &[Value<'_>], key: &Value<'_>) -> Result<bool, EvalError> {
    let Some(first) = items.first() else {
        return Ok(false);
    };
    let not_number = || EvalError::NotNumber {
        op: "in",
        found: key.type_name(),
    };

    match first {
        Value::String(_) => {
            let Some(key) = key.to_text() else {
                return Ok(false);
            };
            Ok(items
                .iter()
                .any(|item| matches!(item, Value::String(s) if **s == *key)))
        }
        Value::Int(_) => match *key {
            Value::Int(k) => Ok(items.iter().any(|item| matches!(item, Value::Int(i) if *i == k))),
            Value::Float(k) => Ok(items
                .iter()
                .any(|item| matches!(item, Value::Int(i) if *i as f64 == k))),
            _ => Err(not_number()),
        },
        Value::Float(_) => {
            let k = key.as_f64().ok_or_else(not_number)?;
            Ok(items
                .iter()
                .any(|item| matches!(item, Value::Float(f) if *f == k)))
        }
        other => Err(EvalError::UnsupportedElementType {
            found: other.type_name(),
        }),
    }
}
