use std::borrow::Cow;
use std::fmt;
use std::mem;

use super::Value;

/// Literal operands written directly in rule text.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
}

impl Literal {
    /// Whether the grammar can spell this literal. Numbers are written without
    /// a sign, and infinities and NaN have no written form at all.
    #[must_use]
    pub fn is_spellable(&self) -> bool {
        match self {
            Literal::Int(v) => *v >= 0,
            Literal::Float(v) => v.is_finite() && v.is_sign_positive(),
            Literal::String(_) => true,
        }
    }

    pub(crate) fn to_value(&self) -> Value<'_> {
        match self {
            Literal::Int(v) => Value::Int(*v),
            Literal::Float(v) => Value::Float(*v),
            Literal::String(v) => Value::String(Cow::Borrowed(v.as_str())),
        }
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Int(v)
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::String(v.to_owned())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::String(v)
    }
}

/// Binary operators, in C-style precedence groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    Neq,
    And,
    Or,
}

impl BinaryOp {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// Binding strength; higher binds tighter.
    pub(crate) fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Lt
            | BinaryOp::Lte
            | BinaryOp::Gt
            | BinaryOp::Gte
            | BinaryOp::Eq
            | BinaryOp::Neq => 3,
            BinaryOp::Add | BinaryOp::Sub => 4,
            BinaryOp::Mul | BinaryOp::Div => 5,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Prefix operators. They parse, but no evaluation semantics exist for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => f.write_str("-"),
            UnaryOp::Not => f.write_str("!"),
        }
    }
}

/// Rule expression tree.
///
/// Built once by the parser (or the builder functions below) and never
/// mutated afterwards. Field names are public aliases, resolved against the
/// record only at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// Bare identifier: a root-level alias.
    Field(String),
    /// `base.name`
    Selector { base: Box<Expr>, name: String },
    /// `base[index]`
    Index { base: Box<Expr>, index: Box<Expr> },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// `name(args...)`
    Call { name: String, args: Vec<Expr> },
    Paren(Box<Expr>),
}

#[allow(clippy::should_implement_trait)]
impl Expr {
    #[must_use]
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `self.name`
    #[must_use]
    pub fn dot(self, name: &str) -> Expr {
        Expr::Selector {
            base: Box::new(self),
            name: name.to_owned(),
        }
    }

    /// `self[index]`
    #[must_use]
    pub fn at(self, index: impl Into<Expr>) -> Expr {
        Expr::Index {
            base: Box::new(self),
            index: Box::new(index.into()),
        }
    }

    #[must_use]
    pub fn paren(self) -> Expr {
        Expr::Paren(Box::new(self))
    }

    #[must_use]
    pub fn add(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Add, self, other.into())
    }

    #[must_use]
    pub fn sub(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Sub, self, other.into())
    }

    #[must_use]
    pub fn mul(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Mul, self, other.into())
    }

    #[must_use]
    pub fn div(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Div, self, other.into())
    }

    #[must_use]
    pub fn lt(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Lt, self, other.into())
    }

    #[must_use]
    pub fn lte(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Lte, self, other.into())
    }

    #[must_use]
    pub fn gt(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Gt, self, other.into())
    }

    #[must_use]
    pub fn gte(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Gte, self, other.into())
    }

    #[must_use]
    pub fn eq(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Eq, self, other.into())
    }

    #[must_use]
    pub fn neq(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Neq, self, other.into())
    }

    #[must_use]
    pub fn and(self, other: Expr) -> Expr {
        Expr::binary(BinaryOp::And, self, other)
    }

    #[must_use]
    pub fn or(self, other: Expr) -> Expr {
        Expr::binary(BinaryOp::Or, self, other)
    }

    /// Number of nodes on the longest root-to-leaf path.
    ///
    /// Computed without recursion so it is safe on trees of any shape.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&Expr, usize)> = vec![(self, 1)];
        let mut children = Vec::new();
        while let Some((expr, level)) = stack.pop() {
            deepest = deepest.max(level);
            expr.push_children(&mut children);
            stack.extend(children.drain(..).map(|child| (child, level + 1)));
        }
        deepest
    }

    /// First literal in the tree that rule text cannot spell, if any.
    #[must_use]
    pub fn unspellable_literal(&self) -> Option<&Literal> {
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            if let Expr::Literal(lit) = expr {
                if !lit.is_spellable() {
                    return Some(lit);
                }
            }
            expr.push_children(&mut stack);
        }
        None
    }

    fn push_children<'e>(&'e self, out: &mut Vec<&'e Expr>) {
        match self {
            Expr::Literal(_) | Expr::Field(_) => {}
            Expr::Selector { base, .. } => out.push(base),
            Expr::Index { base, index } => {
                out.push(base);
                out.push(index);
            }
            Expr::Binary { left, right, .. } => {
                out.push(left);
                out.push(right);
            }
            Expr::Unary { operand, .. } => out.push(operand),
            Expr::Call { args, .. } => out.extend(args.iter()),
            Expr::Paren(inner) => out.push(inner),
        }
    }

    /// Move every child out of `self`, leaving cheap placeholders behind.
    fn detach_children(&mut self, out: &mut Vec<Expr>) {
        match self {
            Expr::Literal(_) | Expr::Field(_) => {}
            Expr::Selector { base, .. } => detach(base, out),
            Expr::Index { base, index } => {
                detach(base, out);
                detach(index, out);
            }
            Expr::Binary { left, right, .. } => {
                detach(left, out);
                detach(right, out);
            }
            Expr::Unary { operand, .. } => detach(operand, out),
            Expr::Call { args, .. } => out.append(args),
            Expr::Paren(inner) => detach(inner, out),
        }
    }
}

fn detach(slot: &mut Box<Expr>, out: &mut Vec<Expr>) {
    out.push(mem::replace(&mut **slot, Expr::Field(String::new())));
}

// Long left-folded operator chains produce trees far deeper than the default
// recursive drop can handle, so children are released from an explicit stack.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.detach_children(&mut pending);
        }
    }
}

macro_rules! literal_into_expr {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Expr {
                fn from(v: $ty) -> Self {
                    Expr::Literal(v.into())
                }
            }
        )*
    };
}

literal_into_expr!(i64, f64, &str, String, Literal);

/// Reference a root-level field by alias.
#[must_use]
pub fn field(alias: &str) -> Expr {
    Expr::Field(alias.to_owned())
}

/// A literal operand.
#[must_use]
pub fn lit(value: impl Into<Literal>) -> Expr {
    Expr::Literal(value.into())
}

/// A function call, e.g. `call("in", vec![field("tags"), lit("vip")])`.
#[must_use]
pub fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Call {
        name: name.to_owned(),
        args,
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{v}"),
            // Debug formatting keeps the decimal point (`2.0`), so the text re-parses as a float.
            Literal::Float(v) => write!(f, "{v:?}"),
            Literal::String(v) => {
                f.write_str("\"")?;
                for ch in v.chars() {
                    match ch {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
        }
    }
}

/// Renders rule text. Parentheses are inserted where the tree's shape would
/// otherwise be lost to operator precedence.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{lit}"),
            Expr::Field(name) => f.write_str(name),
            Expr::Selector { base, name } => {
                write_operand(f, base, needs_parens_as_postfix_base(base))?;
                write!(f, ".{name}")
            }
            Expr::Index { base, index } => {
                write_operand(f, base, needs_parens_as_postfix_base(base))?;
                write!(f, "[{index}]")
            }
            Expr::Binary { op, left, right } => {
                let prec = op.precedence();
                let left_parens = matches!(left.as_ref(), Expr::Binary { op: l, .. }
                    if l.precedence() < prec || (prec == 3 && l.precedence() == 3));
                let right_parens = matches!(right.as_ref(), Expr::Binary { op: r, .. }
                    if r.precedence() <= prec);
                write_operand(f, left, left_parens)?;
                write!(f, " {op} ")?;
                write_operand(f, right, right_parens)
            }
            Expr::Unary { op, operand } => {
                write!(f, "{op}")?;
                write_operand(f, operand, matches!(operand.as_ref(), Expr::Binary { .. }))
            }
            Expr::Call { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expr::Paren(inner) => write!(f, "({inner})"),
        }
    }
}

fn needs_parens_as_postfix_base(base: &Expr) -> bool {
    matches!(base, Expr::Binary { .. } | Expr::Unary { .. })
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}
