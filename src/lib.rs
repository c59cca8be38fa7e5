//! Langton compiles small arithmetic expressions into bytecode for a stack machine.
//!
//! # Example
//!
//! ```
//! let code = langton::compile("1 + 2 + (40 + -3)").unwrap();
//! assert_eq!(
//!     code.encode(),
//!     "PUSH 1\nPUSH 2\nADD\nPUSH 40\nPUSH 3\nNEG\nADD\nADD\nHALT\n"
//! );
//! ```
//!
//! # Grammar
//!
//! - decimal integer literals, `_` separators allowed (`1_000`)
//! - `true` and `false`
//! - binary `+`, left associative
//! - unary `-`
//! - parentheses for grouping
//!
//! Anything else (names, calls, comparisons, other operators, several
//! statements) is a syntax error that names the rejected construct.
//!
//! # Instructions
//!
//! | Instruction | Usage           | Brief   |
//! |-------------|-----------------|---------|
//! | Push        | PUSH _number_   | Push `number` on top of the stack. |
//! | PushBool    | PUSH_BOOL _b_   | Push the boolean `b` (`true` or `false`) on top of the stack. |
//! | Add         | ADD             | Pop two integers from stack and add them. Push the result on stack. |
//! | Neg         | NEG             | Pop an integer from stack and negate it. Push the result on stack. |
//! | Halt        | HALT            | End of the program. Always the last instruction. |
//!
//! # Types
//!
//! Every subexpression is either `int` or `bool`. `ADD` and `NEG` only take
//! `int` operands, which is checked while compiling, so the emitted bytecode
//! never needs a type check when run.
//!
//! # Text format
//!
//! One instruction per line, the argument separated by a single space, and a
//! newline after the last instruction.

pub mod ast;
pub mod bytecode;
pub mod error;
mod lexer;
pub mod operation;
pub mod parser;
pub mod token;
pub mod transpiler;

pub use bytecode::Bytecode;
pub use error::{CompileError, ErrorKind};
pub use operation::{Argument, Operation};
pub use transpiler::{compile, Kind, Transpiler};
