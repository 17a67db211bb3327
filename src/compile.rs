use tracing::debug;

use crate::parse::{bracket_depth, parse_with};
use crate::{CompileError, Expr, Limits, Rule};

pub(crate) fn compile(text: &str, limits: Limits) -> Result<Rule, CompileError> {
    let result = compile_checked(text, limits);
    match &result {
        Ok(rule) => debug!(rule = %rule.source, depth = rule.depth, "compiled rule"),
        Err(err) => debug!(error = %err, "rule compilation failed"),
    }
    result
}

fn compile_checked(text: &str, limits: Limits) -> Result<Rule, CompileError> {
    if text.is_empty() {
        return Err(CompileError::EmptyRule);
    }
    check_length(text, limits)?;

    // Bracket nesting drives the parser's recursion, so it is bounded before parsing.
    let nesting = bracket_depth(text);
    if nesting > limits.depth_limit() {
        return Err(CompileError::TooDeep {
            depth: nesting,
            limit: limits.depth_limit(),
        });
    }

    let expr = parse_with(text, limits)?;
    let depth = check_depth(&expr, limits)?;

    Ok(Rule {
        source: text.to_owned(),
        expr,
        depth,
    })
}

pub(crate) fn from_expr(expr: Expr, limits: Limits) -> Result<Rule, CompileError> {
    let depth = check_depth(&expr, limits)?;
    // The rendering becomes the rule's source, so it has to parse back.
    if let Some(lit) = expr.unspellable_literal() {
        return Err(CompileError::UnspellableLiteral {
            literal: lit.to_string(),
        });
    }
    let source = expr.to_string();
    debug!(rule = %source, depth, "built rule from expression");
    Ok(Rule {
        source,
        expr,
        depth,
    })
}

fn check_length(text: &str, limits: Limits) -> Result<(), CompileError> {
    match limits.length_limit() {
        Some(limit) if text.len() > limit => Err(CompileError::TooLong {
            length: text.len(),
            limit,
        }),
        _ => Ok(()),
    }
}

fn check_depth(expr: &Expr, limits: Limits) -> Result<usize, CompileError> {
    let depth = expr.depth();
    if depth > limits.depth_limit() {
        return Err(CompileError::TooDeep {
            depth,
            limit: limits.depth_limit(),
        });
    }
    Ok(depth)
}
