use std::fmt;
use std::str::FromStr;

use tracing::trace;

use super::error::{CompileError, EvalError};
use super::expr::Expr;
use super::limits::Limits;
use super::record::Record;
use super::value::Value;

/// A compiled rule: parsed once, evaluated any number of times.
///
/// A `Rule` holds no mutable state, so a single instance can be shared behind
/// an `Arc` and evaluated from many threads at once.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use ruleval::Rule;
///
/// let rule = Rule::compile("a + b < c * 2").unwrap();
///
/// let record: HashMap<String, i64> =
///     [("a".to_owned(), 8), ("b".to_owned(), 12), ("c".to_owned(), 16)].into();
/// assert!(rule.as_bool(&record).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub(crate) source: String,
    pub(crate) expr: Expr,
    pub(crate) depth: usize,
}

impl Rule {
    /// Compile rule text with the default [`Limits`].
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::EmptyRule`] for zero-length text and
    /// [`CompileError::Parse`] for malformed text.
    pub fn compile(text: &str) -> Result<Self, CompileError> {
        crate::compile::compile(text, Limits::default())
    }

    /// Compile rule text under explicit limits.
    ///
    /// # Errors
    ///
    /// As [`compile`](Self::compile), plus [`CompileError::TooDeep`] and
    /// [`CompileError::TooLong`] when a limit is exceeded.
    pub fn compile_with(text: &str, limits: Limits) -> Result<Self, CompileError> {
        crate::compile::compile(text, limits)
    }

    /// Wrap a programmatically built expression. The rule's source text is
    /// the expression's rendering.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::TooDeep`] if the tree exceeds the default depth
    /// limit, and [`CompileError::UnspellableLiteral`] if the tree holds a
    /// negative or non-finite number, which rule text cannot express.
    pub fn from_expr(expr: Expr) -> Result<Self, CompileError> {
        crate::compile::from_expr(expr, Limits::default())
    }

    /// Read rule text from a file and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`RulevalError`](crate::RulevalError) on I/O or compile failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::RulevalError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::compile(text.trim_end())?)
    }

    /// The text this rule was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Depth of the compiled expression tree.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Evaluate against `record` and return the raw result value.
    ///
    /// # Errors
    ///
    /// Returns the first [`EvalError`] raised anywhere in the tree.
    pub fn evaluate<'a>(&'a self, record: &'a dyn Record) -> Result<Value<'a>, EvalError> {
        crate::evaluate::evaluate(&self.expr, record).inspect_err(|err| {
            trace!(rule = %self.source, error = %err, "rule evaluation failed");
        })
    }

    /// Evaluate and require a boolean result.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::ResultType`] if the result is not a boolean.
    pub fn as_bool(&self, record: &dyn Record) -> Result<bool, EvalError> {
        match self.evaluate(record)? {
            Value::Bool(v) => Ok(v),
            other => Err(result_type("bool", &other)),
        }
    }

    /// Evaluate and require a numeric result. Floats are truncated toward zero.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::ResultType`] if the result is not a number.
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_int(&self, record: &dyn Record) -> Result<i64, EvalError> {
        match self.evaluate(record)? {
            Value::Float(v) => Ok(v as i64),
            Value::Int(v) => Ok(v),
            other => Err(result_type("int", &other)),
        }
    }

    /// Evaluate and require a numeric result. Integers are promoted.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::ResultType`] if the result is not a number.
    pub fn as_float(&self, record: &dyn Record) -> Result<f64, EvalError> {
        let value = self.evaluate(record)?;
        value.as_f64().ok_or_else(|| result_type("float", &value))
    }
}

fn result_type(expected: &'static str, found: &Value<'_>) -> EvalError {
    EvalError::ResultType {
        expected,
        found: found.type_name(),
    }
}

impl FromStr for Rule {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
