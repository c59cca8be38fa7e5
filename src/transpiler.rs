//! Compiler from expressions to bytecode with static type checking

use std::fmt;

use log::{debug, trace};

use crate::{
    ast::{Expr, ExprKind},
    bytecode::Bytecode,
    error::{CompileError, Result},
    operation::Operation,
    parser::{Parser, DEFAULT_MAX_DEPTH},
};

/// Compile-time type of a subexpression. Never emitted.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Kind {
    Int,
    Bool,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Int => f.write_str("int"),
            Kind::Bool => f.write_str("bool"),
        }
    }
}

/// Compiles one expression per call into a fresh [`Bytecode`].
///
/// The transpiler only holds settings, every call builds and returns its
/// own bytecode. An instance can be reused and shared between threads, and
/// a failed call leaves nothing behind for the next one.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Transpiler {
    boolean_literals: bool,
    max_depth: usize,
}

impl Default for Transpiler {
    fn default() -> Self {
        Transpiler {
            boolean_literals: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Transpiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `true`/`false` literals. When disabled they are a syntax error.
    pub fn with_boolean_literals(mut self, enabled: bool) -> Self {
        self.boolean_literals = enabled;
        self
    }

    /// Nesting limit of the expression tree
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Compile `source`, which must be exactly one expression.
    ///
    /// The returned bytecode always ends with `HALT`.
    pub fn compile(&self, source: &str) -> Result<Bytecode> {
        debug!("compiling {:?}", source);
        let tree = Parser::new(source).with_max_depth(self.max_depth).parse()?;

        let mut emitter = Emitter {
            code: Bytecode::new(),
            boolean_literals: self.boolean_literals,
        };
        emitter.visit(&tree)?;
        emitter.emit(Operation::Halt);

        debug!("compiled {:?} into {} operations", source, emitter.code.len());
        Ok(emitter.code)
    }
}

/// Compile `source` with the default settings
pub fn compile(source: &str) -> Result<Bytecode> {
    Transpiler::new().compile(source)
}

/// State of a single compile call
struct Emitter {
    code: Bytecode,
    boolean_literals: bool,
}

impl Emitter {
    fn emit(&mut self, operation: Operation) {
        trace!("emit {}", operation);
        self.code.append(operation);
    }

    /// Emit `expr` in post-order and return its kind
    fn visit(&mut self, expr: &Expr) -> Result<Kind> {
        // Walk down the left spine of a `+` chain without recursing, then
        // emit it bottom-up: leftmost operand first, each `+` after its right operand
        let mut spine = Vec::new();
        let mut leftmost = expr;
        while let ExprKind::Add(lhs, rhs) = &leftmost.kind {
            spine.push((rhs.as_ref(), leftmost.offset));
            leftmost = lhs;
        }

        let mut kind = self.visit_operand(leftmost)?;
        for (rhs, offset) in spine.into_iter().rev() {
            let rhs = self.visit(rhs)?;
            expect_int("+", kind, offset)?;
            expect_int("+", rhs, offset)?;
            self.emit(Operation::Add);
            kind = Kind::Int;
        }

        Ok(kind)
    }

    /// Emit anything but an addition
    fn visit_operand(&mut self, expr: &Expr) -> Result<Kind> {
        match &expr.kind {
            ExprKind::IntLiteral(value) => {
                self.emit(Operation::Push(*value));
                Ok(Kind::Int)
            }
            ExprKind::BoolLiteral(value) => {
                if !self.boolean_literals {
                    return Err(CompileError::syntax(
                        "bool literals not supported",
                        expr.offset,
                    ));
                }
                self.emit(Operation::PushBool(*value));
                Ok(Kind::Bool)
            }
            ExprKind::Negate(operand) => {
                let kind = self.visit(operand)?;
                expect_int("-", kind, expr.offset)?;
                self.emit(Operation::Neg);
                Ok(Kind::Int)
            }
            ExprKind::Add(..) => self.visit(expr),
            ExprKind::Unsupported(construct) => {
                Err(CompileError::syntax(construct.to_string(), expr.offset))
            }
        }
    }
}

fn expect_int(operator: &'static str, found: Kind, offset: usize) -> Result<()> {
    if found == Kind::Int {
        Ok(())
    } else {
        Err(CompileError::Type {
            operator,
            expected: Kind::Int,
            found,
            offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn encode(source: &str) -> String {
        compile(source).unwrap().encode()
    }

    #[test]
    fn literals() {
        assert_eq!(encode("5"), "PUSH 5\nHALT\n");
        assert_eq!(encode("true"), "PUSH_BOOL true\nHALT\n");
        assert_eq!(encode("false"), "PUSH_BOOL false\nHALT\n");
    }

    #[test]
    fn addition() {
        assert_eq!(
            encode("1 + 2 + 3"),
            "PUSH 1\nPUSH 2\nADD\nPUSH 3\nADD\nHALT\n"
        );
        assert_eq!(
            encode("1 + (2 + 3)"),
            "PUSH 1\nPUSH 2\nPUSH 3\nADD\nADD\nHALT\n"
        );
    }

    #[test]
    fn negation() {
        assert_eq!(encode("-7"), "PUSH 7\nNEG\nHALT\n");
        assert_eq!(encode("-(1 + 2)"), "PUSH 1\nPUSH 2\nADD\nNEG\nHALT\n");
        assert_eq!(encode("--7"), "PUSH 7\nNEG\nNEG\nHALT\n");
    }

    #[test]
    fn demo_expression() {
        assert_eq!(
            encode("1 + 2 + (40 + -3)"),
            "PUSH 1\nPUSH 2\nADD\nPUSH 40\nPUSH 3\nNEG\nADD\nADD\nHALT\n"
        );
    }

    #[test]
    fn bool_operands_are_type_errors() {
        let err = compile("true + 1").unwrap_err();
        assert_eq!(
            err,
            CompileError::Type {
                operator: "+",
                expected: Kind::Int,
                found: Kind::Bool,
                offset: 5,
            }
        );

        assert_eq!(compile("1 + false").unwrap_err().kind(), ErrorKind::Type);
        assert_eq!(
            compile("-true").unwrap_err().to_string(),
            "type error at offset 0: `-` expects an int operand, found bool"
        );
        assert_eq!(compile("-(1 + true)").unwrap_err().kind(), ErrorKind::Type);
    }

    #[test]
    fn unsupported_is_a_syntax_error() {
        let err = compile("x").unwrap_err();
        assert_eq!(
            err,
            CompileError::syntax("names are not supported: `x`", 0)
        );
        assert_eq!(
            compile("f(1)").unwrap_err(),
            CompileError::syntax("function calls are not supported", 1)
        );
        assert_eq!(
            compile("1 == 1").unwrap_err(),
            CompileError::syntax("comparisons are not supported: `==`", 2)
        );
    }

    #[test]
    fn left_operand_fails_first() {
        // The unsupported name on the right is reached before the type check of `+`
        assert_eq!(compile("true + x").unwrap_err().kind(), ErrorKind::Syntax);
        assert_eq!(compile("x + true").unwrap_err().kind(), ErrorKind::Syntax);
    }

    #[test]
    fn long_sums() {
        let sum = vec!["1"; 500].join(" + ");
        let code = compile(&sum).unwrap();
        assert_eq!(code.len(), 1000);
        assert_eq!(
            &code.operations()[..4],
            &[
                Operation::Push(1),
                Operation::Push(1),
                Operation::Add,
                Operation::Push(1),
            ]
        );

        let sum = format!("-({})", vec!["2"; 50_000].join(" + "));
        assert_eq!(compile(&sum).unwrap().len(), 100_001);
    }

    #[test]
    fn type_error_deep_in_a_sum() {
        let sum = format!("{} + true + 1", vec!["1"; 300].join(" + "));
        let err = compile(&sum).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert_eq!(err.offset(), 300 * 4 - 2);
    }

    #[test]
    fn boolean_literals_disabled() {
        let transpiler = Transpiler::new().with_boolean_literals(false);
        assert_eq!(
            transpiler.compile("1 + true").unwrap_err(),
            CompileError::syntax("bool literals not supported", 4)
        );
        assert_eq!(transpiler.compile("1 + 2").unwrap().len(), 4);
    }

    #[test]
    fn reusable_after_failure() {
        let transpiler = Transpiler::new();
        let first = transpiler.compile("1 + 2").unwrap();
        assert!(transpiler.compile("true + 1").is_err());
        let second = transpiler.compile("1 + 2").unwrap();
        assert_eq!(first.encode(), second.encode());
    }
}
