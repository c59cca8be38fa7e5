//! Errors reported by a compile call

use thiserror::Error;

use crate::transpiler::Kind;

/// Fatal error of a compile call. No bytecode is produced alongside it.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum CompileError {
    /// Malformed source text or a construct outside the grammar
    #[error("syntax error at offset {offset}: {message}")]
    Syntax { message: String, offset: usize },

    /// Operand of `+` or unary `-` is not an integer
    #[error(
        "type error at offset {offset}: `{operator}` expects {}, found {found}",
        expected_operands(.operator, .expected)
    )]
    Type {
        operator: &'static str,
        expected: Kind,
        found: Kind,
        offset: usize,
    },
}

/// Category of a [`CompileError`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    Syntax,
    Type,
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;

/// Unary `-` has a single operand, `+` has two
fn expected_operands(operator: &str, expected: &Kind) -> String {
    if operator == "-" {
        format!("an {} operand", expected)
    } else {
        format!("{} operands", expected)
    }
}

impl CompileError {
    pub(crate) fn syntax(message: impl Into<String>, offset: usize) -> Self {
        CompileError::Syntax {
            message: message.into(),
            offset,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::Syntax { .. } => ErrorKind::Syntax,
            CompileError::Type { .. } => ErrorKind::Type,
        }
    }

    /// Byte offset in the source the error points at.
    pub fn offset(&self) -> usize {
        match *self {
            CompileError::Syntax { offset, .. } | CompileError::Type { offset, .. } => offset,
        }
    }
}
