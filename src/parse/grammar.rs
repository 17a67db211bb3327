use winnow::combinator::{alt, cut_err, delimited, opt, preceded, repeat, separated};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use crate::{BinaryOp, Expr, Literal, UnaryOp};

// -- Whitespace & identifiers -----------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

// -- Literals ---------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = cut_err(any)
            .context(StrContext::Expected(StrContextValue::CharLiteral('"')))
            .parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = cut_err(any).parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn digits<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)
}

/// `12` is an integer; `1.5`, `2.` and `3e4` are floats.
fn number(input: &mut &str) -> ModalResult<Literal> {
    let text = (
        digits,
        opt(('.', take_while(0.., |c: char| c.is_ascii_digit()))),
        opt((alt(('e', 'E')), opt(alt(('+', '-'))), digits)),
    )
        .take()
        .parse_next(input)?;

    if text.contains(|c: char| matches!(c, '.' | 'e' | 'E')) {
        text.parse::<f64>()
            .map(Literal::Float)
            .map_err(|_| ErrMode::from_input(input).cut())
    } else {
        text.parse::<i64>()
            .map(Literal::Int)
            .map_err(|_| ErrMode::from_input(input).cut())
    }
}

// -- Operands (precedence: || < && < comparison < + - < * / < unary < postfix)

fn group(input: &mut &str) -> ModalResult<Expr> {
    delimited('(', cut_err(expr), (ws, cut_err(')')))
        .map(|inner| Expr::Paren(Box::new(inner)))
        .parse_next(input)
}

fn call_or_field(input: &mut &str) -> ModalResult<Expr> {
    let name = ident.parse_next(input)?;
    let checkpoint = input.checkpoint();
    ws.parse_next(input)?;
    if opt('(').parse_next(input)?.is_none() {
        input.reset(&checkpoint);
        return Ok(Expr::Field(name.to_owned()));
    }

    let args: Vec<Expr> = separated(0.., expr, (ws, ',')).parse_next(input)?;
    (ws, cut_err(')'))
        .context(StrContext::Expected(StrContextValue::CharLiteral(')')))
        .parse_next(input)?;
    Ok(Expr::Call {
        name: name.to_owned(),
        args,
    })
}

fn primary(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    alt((
        group,
        string_literal.map(|s| Expr::Literal(Literal::String(s))),
        number.map(Expr::Literal),
        call_or_field,
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "operand",
    )))
    .parse_next(input)
}

fn postfix(input: &mut &str) -> ModalResult<Expr> {
    let mut base = primary(input)?;
    loop {
        let checkpoint = input.checkpoint();
        ws.parse_next(input)?;
        match opt(alt(('.', '['))).parse_next(input)? {
            Some('.') => {
                ws.parse_next(input)?;
                let name = cut_err(ident)
                    .context(StrContext::Expected(StrContextValue::Description(
                        "field name",
                    )))
                    .parse_next(input)?;
                base = Expr::Selector {
                    base: Box::new(base),
                    name: name.to_owned(),
                };
            }
            Some(_) => {
                let index = cut_err(expr).parse_next(input)?;
                (ws, cut_err(']'))
                    .context(StrContext::Expected(StrContextValue::CharLiteral(']')))
                    .parse_next(input)?;
                base = Expr::Index {
                    base: Box::new(base),
                    index: Box::new(index),
                };
            }
            None => {
                input.reset(&checkpoint);
                return Ok(base);
            }
        }
    }
}

fn unary(input: &mut &str) -> ModalResult<Expr> {
    let ops: Vec<UnaryOp> = repeat(
        0..,
        preceded(
            ws,
            alt(('-'.value(UnaryOp::Neg), '!'.value(UnaryOp::Not))),
        ),
    )
    .parse_next(input)?;

    let operand = if ops.is_empty() {
        postfix(input)?
    } else {
        cut_err(postfix).parse_next(input)?
    };
    Ok(ops.into_iter().rev().fold(operand, |acc, op| Expr::Unary {
        op,
        operand: Box::new(acc),
    }))
}

// -- Binary operators -------------------------------------------------------

fn fold_left(first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Expr {
    rest.into_iter()
        .fold(first, |acc, (op, right)| Expr::binary(op, acc, right))
}

fn multiplicative(input: &mut &str) -> ModalResult<Expr> {
    let first = unary(input)?;
    let rest: Vec<(BinaryOp, Expr)> = repeat(
        0..,
        (
            preceded(
                ws,
                alt(('*'.value(BinaryOp::Mul), '/'.value(BinaryOp::Div))),
            ),
            cut_err(unary),
        ),
    )
    .parse_next(input)?;
    Ok(fold_left(first, rest))
}

fn additive(input: &mut &str) -> ModalResult<Expr> {
    let first = multiplicative(input)?;
    let rest: Vec<(BinaryOp, Expr)> = repeat(
        0..,
        (
            preceded(
                ws,
                alt(('+'.value(BinaryOp::Add), '-'.value(BinaryOp::Sub))),
            ),
            cut_err(multiplicative),
        ),
    )
    .parse_next(input)?;
    Ok(fold_left(first, rest))
}

fn comparison_op(input: &mut &str) -> ModalResult<BinaryOp> {
    ws.parse_next(input)?;
    alt((
        "<=".value(BinaryOp::Lte),
        "<".value(BinaryOp::Lt),
        ">=".value(BinaryOp::Gte),
        ">".value(BinaryOp::Gt),
        "==".value(BinaryOp::Eq),
        "!=".value(BinaryOp::Neq),
    ))
    .parse_next(input)
}

/// Comparisons do not chain: `a < b < c` leaves `< c` unparsed.
fn comparison(input: &mut &str) -> ModalResult<Expr> {
    let left = additive(input)?;
    match opt((comparison_op, cut_err(additive))).parse_next(input)? {
        Some((op, right)) => Ok(Expr::binary(op, left, right)),
        None => Ok(left),
    }
}

fn logical_and(input: &mut &str) -> ModalResult<Expr> {
    let first = comparison(input)?;
    let rest: Vec<(BinaryOp, Expr)> = repeat(
        0..,
        (
            preceded(ws, "&&".value(BinaryOp::And)),
            cut_err(comparison),
        ),
    )
    .parse_next(input)?;
    Ok(fold_left(first, rest))
}

fn logical_or(input: &mut &str) -> ModalResult<Expr> {
    let first = logical_and(input)?;
    let rest: Vec<(BinaryOp, Expr)> = repeat(
        0..,
        (
            preceded(ws, "||".value(BinaryOp::Or)),
            cut_err(logical_and),
        ),
    )
    .parse_next(input)?;
    Ok(fold_left(first, rest))
}

fn expr(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    logical_or(input)
}

// -- Top-level parser -------------------------------------------------------

pub fn rule(input: &mut &str) -> ModalResult<Expr> {
    let parsed = expr(input)?;
    ws.parse_next(input)?;
    Ok(parsed)
}
