//! Single instructions of the bytecode

use std::fmt;

/// Supported instructions of the bytecode.
///
/// Every variant carries exactly the argument its opcode needs, so an
/// operation with a mismatched argument cannot be built.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Operation {
    /// Push an integer on the stack
    Push(i64),
    /// Push a boolean on the stack
    PushBool(bool),
    /// Pop two integers and push their sum
    Add,
    /// Pop an integer and push its negation
    Neg,
    /// End of the program
    Halt,
}

/// Argument of an [`Operation`], as seen from the outside.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Argument {
    Int(i64),
    Bool(bool),
}

impl Operation {
    /// Mnemonic of the opcode, eg. `PUSH_BOOL`.
    pub const fn name(&self) -> &'static str {
        match self {
            Operation::Push(_) => "PUSH",
            Operation::PushBool(_) => "PUSH_BOOL",
            Operation::Add => "ADD",
            Operation::Neg => "NEG",
            Operation::Halt => "HALT",
        }
    }

    pub const fn argument(&self) -> Option<Argument> {
        match *self {
            Operation::Push(value) => Some(Argument::Int(value)),
            Operation::PushBool(value) => Some(Argument::Bool(value)),
            Operation::Add | Operation::Neg | Operation::Halt => None,
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Int(value) => write!(f, "{}", value),
            Argument::Bool(value) => write!(f, "{}", value),
        }
    }
}

/// Renders `<MNEMONIC>` or `<MNEMONIC> <argument>`.
impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.argument() {
            Some(argument) => write!(f, "{} {}", self.name(), argument),
            None => f.write_str(self.name()),
        }
    }
}
