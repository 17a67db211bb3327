//! Compile-once rule expressions evaluated against aliased records.
//!
//! A rule such as `a + b < c * 2` or `in(xy.z, "abc")` is parsed once into a
//! [`Rule`] and then evaluated any number of times, from any number of
//! threads, against values implementing [`Record`]. Record fields are
//! addressed by alias, declared with [`impl_record!`].
//!
//! ```
//! use ruleval::{impl_record, Rule};
//!
//! struct Abc {
//!     a: i64,
//!     b: i64,
//!     c: i64,
//! }
//!
//! impl_record!(Abc { "a" => a, "b" => b, "c" => c });
//!
//! let rule = Rule::compile("a + b < c * 2").unwrap();
//! assert!(rule.as_bool(&Abc { a: 8, b: 12, c: 16 }).unwrap());
//! assert_eq!(rule.to_string(), "a + b < c * 2");
//! ```

mod compile;
mod error;
mod evaluate;
pub mod parse;
mod resolve;
mod types;

pub use error::RulevalError;
pub use resolve::{index, resolve};
pub use types::{
    BinaryOp, CompileError, EvalError, Expr, Limits, Literal, Record, Rule, ToValue, UnaryOp, Value,
    call, field, lit,
};

/// Compile rule text with the default [`Limits`].
///
/// # Errors
///
/// See [`Rule::compile`].
pub fn compile(text: &str) -> Result<Rule, CompileError> {
    Rule::compile(text)
}

/// Compile `text` and evaluate it once against `record`, requiring a boolean.
///
/// # Errors
///
/// Returns [`RulevalError::Compile`] or [`RulevalError::Eval`].
pub fn eval_bool(record: &dyn Record, text: &str) -> Result<bool, RulevalError> {
    Ok(Rule::compile(text)?.as_bool(record)?)
}

/// One-shot form of [`Rule::as_int`].
///
/// # Errors
///
/// Returns [`RulevalError::Compile`] or [`RulevalError::Eval`].
pub fn eval_int(record: &dyn Record, text: &str) -> Result<i64, RulevalError> {
    Ok(Rule::compile(text)?.as_int(record)?)
}

/// One-shot form of [`Rule::as_float`].
///
/// # Errors
///
/// Returns [`RulevalError::Compile`] or [`RulevalError::Eval`].
pub fn eval_float(record: &dyn Record, text: &str) -> Result<f64, RulevalError> {
    Ok(Rule::compile(text)?.as_float(record)?)
}
