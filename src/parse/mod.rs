mod error;
mod grammar;

pub use error::ParseError;

use crate::{Expr, Limits};

/// Parse rule text into an expression tree under the default [`Limits`].
///
/// Parsing is a pure function of the text: it performs no evaluation and
/// touches no record.
///
/// # Errors
///
/// Returns [`ParseError`] if the text is not a valid expression, or if its
/// brackets nest deeper than the default depth limit.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    parse_with(input, Limits::default())
}

/// As [`parse`], with the bracket nesting bounded by `limits`.
///
/// # Errors
///
/// Returns [`ParseError`] if the text is not a valid expression, or if its
/// brackets nest deeper than `limits` allows.
pub fn parse_with(input: &str, limits: Limits) -> Result<Expr, ParseError> {
    use winnow::Parser;

    let nesting = bracket_depth(input);
    if nesting > limits.depth_limit() {
        return Err(ParseError::new(format!(
            "brackets nested {nesting} deep, limit is {}",
            limits.depth_limit()
        )));
    }
    grammar::rule
        .parse(input)
        .map_err(|e| ParseError::new(e.to_string()))
}

/// Deepest bracket nesting in `input`, ignoring brackets inside string literals.
///
/// The parser recurses once per `(` or `[`, so this is checked against the
/// depth limit before parsing starts.
pub(crate) fn bracket_depth(input: &str) -> usize {
    let mut depth = 0_usize;
    let mut deepest = 0;
    let mut in_string = false;
    let mut escaped = false;
    for ch in input.chars() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '(' | '[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            ')' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}
