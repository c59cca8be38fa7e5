//! Expression tree handed from the parser to the transpiler

use std::{fmt, mem};

/// An expression node and the byte offset of the token that introduced it.
///
/// For operators that is the operator token, for literals and groups the
/// first token of the node.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub offset: usize,
}

/// The closed set of node forms the compiler knows about.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ExprKind {
    IntLiteral(i64),
    BoolLiteral(bool),
    Negate(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    /// Well-formed source outside the accepted grammar. Its children are not kept.
    Unsupported(Construct),
}

/// Constructs the parser recognizes only to reject them by name.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Construct {
    Name(String),
    Call,
    Attribute(String),
    Subscript,
    Tuple,
    List,
    FloatLiteral(String),
    StringLiteral,
    Comparison(&'static str),
    BoolOp(&'static str),
    BinaryOp(&'static str),
    UnaryOp(&'static str),
}

impl Expr {
    pub fn new(kind: ExprKind, offset: usize) -> Self {
        Expr { kind, offset }
    }

    /// Number of literal and operator nodes, ie. the instructions a
    /// successful compile emits before `HALT`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut expr = self;
        // `+` chains lean left, follow them in a loop
        while let ExprKind::Add(lhs, rhs) = &expr.kind {
            count += 1 + rhs.node_count();
            expr = lhs;
        }

        count
            + match &expr.kind {
                ExprKind::Negate(operand) => 1 + operand.node_count(),
                _ => 1,
            }
    }
}

impl Drop for Expr {
    fn drop(&mut self) {
        // Unlink left-leaning `+` chains one node at a time so that long sums
        // do not recurse once per term
        let mut kind = mem::replace(&mut self.kind, ExprKind::IntLiteral(0));
        while let ExprKind::Add(mut lhs, rhs) = kind {
            drop(rhs);
            kind = mem::replace(&mut lhs.kind, ExprKind::IntLiteral(0));
        }
    }
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Construct::Name(name) => write!(f, "names are not supported: `{}`", name),
            Construct::Call => f.write_str("function calls are not supported"),
            Construct::Attribute(attr) => {
                write!(f, "attribute access is not supported: `.{}`", attr)
            }
            Construct::Subscript => f.write_str("subscripts are not supported"),
            Construct::Tuple => f.write_str("tuples are not supported"),
            Construct::List => f.write_str("lists are not supported"),
            Construct::FloatLiteral(raw) => {
                write!(f, "only integer literals are supported, found `{}`", raw)
            }
            Construct::StringLiteral => {
                f.write_str("only integer literals are supported, found a string")
            }
            Construct::Comparison(op) => write!(f, "comparisons are not supported: `{}`", op),
            Construct::BoolOp(op) => write!(f, "boolean operators are not supported: `{}`", op),
            Construct::BinaryOp(op) => write!(
                f,
                "only `+` is supported as a binary operator, found `{}`",
                op
            ),
            Construct::UnaryOp(op) => {
                write!(f, "only unary `-` is supported, found `{}`", op)
            }
        }
    }
}
