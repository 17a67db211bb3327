use crate::{EvalError, Value};

/// Look up `alias` on a record value.
///
/// # Errors
///
/// Returns [`EvalError::NotStruct`] if `target` is not a record, and
/// [`EvalError::FieldNotFound`] if no field carries the alias.
pub fn resolve<'a>(target: &Value<'a>, alias: &str) -> Result<Value<'a>, EvalError> {
    match target {
        Value::Record(record) => {
            let record: &'a dyn crate::Record = *record;
            record.field(alias).ok_or_else(|| EvalError::FieldNotFound {
                alias: alias.to_owned(),
            })
        }
        other => Err(EvalError::NotStruct {
            alias: alias.to_owned(),
            found: other.type_name(),
        }),
    }
}

/// Element `idx` of a sequence. Float offsets are truncated toward zero.
///
/// # Errors
///
/// Returns [`EvalError::NotNumber`] for a non-numeric (or NaN) offset,
/// [`EvalError::NotSequence`] if `collection` is not a sequence, and
/// [`EvalError::IndexOutOfRange`] for offsets outside `0..len`.
#[allow(clippy::cast_possible_truncation)]
pub fn index<'a>(collection: Value<'a>, idx: &Value<'_>) -> Result<Value<'a>, EvalError> {
    let offset = match *idx {
        Value::Int(i) => i,
        Value::Float(f) if f.is_nan() => {
            return Err(EvalError::NotNumber {
                op: "[]",
                found: "NaN",
            })
        }
        // `as` saturates, so infinities land out of range below.
        Value::Float(f) => f.trunc() as i64,
        ref other => {
            return Err(EvalError::NotNumber {
                op: "[]",
                found: other.type_name(),
            })
        }
    };

    let items = match collection {
        Value::Sequence(items) => items,
        other => {
            return Err(EvalError::NotSequence {
                found: other.type_name(),
            })
        }
    };

    let len = items.len();
    usize::try_from(offset)
        .ok()
        .and_then(|i| items.into_iter().nth(i))
        .ok_or(EvalError::IndexOutOfRange { index: offset, len })
}
