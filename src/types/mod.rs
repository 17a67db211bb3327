mod error;
mod expr;
mod limits;
mod record;
mod rule;
mod value;

pub use error::{CompileError, EvalError};
pub use expr::{BinaryOp, Expr, Literal, UnaryOp, call, field, lit};
pub use limits::Limits;
pub use record::Record;
pub use rule::Rule;
pub use value::{ToValue, Value};
