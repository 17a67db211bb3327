use thiserror::Error;

use crate::parse::ParseError;

/// Failures while turning rule text into a [`Rule`](crate::Rule).
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("rule is empty")]
    EmptyRule,

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("expression nesting depth {depth} exceeds limit of {limit}")]
    TooDeep { depth: usize, limit: usize },

    #[error("rule text is {length} bytes, limit is {limit}")]
    TooLong { length: usize, limit: usize },

    /// A built expression holds a literal that rule text cannot spell, such
    /// as a negative or non-finite number.
    #[error("literal {literal} has no rule text form")]
    UnspellableLiteral { literal: String },
}

/// Failures while evaluating a compiled rule against a record.
///
/// Every variant aborts the whole evaluation; there are no partial results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("cannot select '{alias}' from {found} value: not a record")]
    NotStruct { alias: String, found: &'static str },

    #[error("no field with alias '{alias}'")]
    FieldNotFound { alias: String },

    #[error("expected a sequence, found {found}")]
    NotSequence { found: &'static str },

    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("operator '{op}' requires numbers, found {found}")]
    NotNumber { op: &'static str, found: &'static str },

    #[error("operator '{op}' requires booleans, found {found}")]
    NotBool { op: &'static str, found: &'static str },

    #[error("function '{function}' takes {expected} arguments, got {found}")]
    Arity {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("unsupported function '{name}'")]
    UnsupportedFunction { name: String },

    #[error("membership test does not support {found} elements")]
    UnsupportedElementType { found: &'static str },

    #[error("unsupported expression '{expr}'")]
    UnsupportedExpr { expr: String },

    #[error("rule result is {found}, expected {expected}")]
    ResultType {
        expected: &'static str,
        found: &'static str,
    },
}
