use thiserror::Error;

use crate::{CompileError, EvalError};

/// Unified error type for the one-shot helpers and file loading.
///
/// Returned by [`eval_bool()`](crate::eval_bool) and friends, and by
/// [`Rule::from_file()`](crate::Rule::from_file).
#[derive(Debug, Error)]
pub enum RulevalError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
