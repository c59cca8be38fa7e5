//! Bytecode representation

use std::{fmt, slice};

use crate::operation::Operation;

/// Representation of bytecode
///
/// Operations are only ever appended by the transpiler. A `Bytecode` handed
/// out to a caller has no public mutators.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Bytecode {
    /// Array of operations from top to bottom
    operations: Vec<Operation>,
}

impl Bytecode {
    pub(crate) fn new() -> Self {
        Bytecode {
            operations: Vec::new(),
        }
    }

    /// Append an operation to the end of the bytecode. No validation is done.
    pub(crate) fn append(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    /// Encode the bytecode into a simple text format with a single instruction per line.
    ///
    /// The output always ends with a newline.
    pub fn encode(&self) -> String {
        let mut out = self
            .operations
            .iter()
            .map(Operation::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        out.push('\n');
        out
    }
}

impl fmt::Display for Bytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl<'a> IntoIterator for &'a Bytecode {
    type Item = &'a Operation;
    type IntoIter = slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

impl IntoIterator for Bytecode {
    type Item = Operation;
    type IntoIter = std::vec::IntoIter<Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bytecode(operations: &[Operation]) -> Bytecode {
        let mut code = Bytecode::new();
        for &operation in operations {
            code.append(operation);
        }
        code
    }

    #[test]
    fn append_keeps_order() {
        let code = bytecode(&[Operation::Push(1), Operation::Push(2), Operation::Add]);
        assert_eq!(
            code.operations(),
            &[Operation::Push(1), Operation::Push(2), Operation::Add]
        );
        assert_eq!(code.len(), 3);
    }

    #[test]
    fn encode_one_per_line() {
        let code = bytecode(&[
            Operation::Push(7),
            Operation::Neg,
            Operation::PushBool(true),
            Operation::Halt,
        ]);
        assert_eq!(code.encode(), "PUSH 7\nNEG\nPUSH_BOOL true\nHALT\n");
    }

    #[test]
    fn encode_is_repeatable() {
        let code = bytecode(&[Operation::Push(5), Operation::Halt]);
        let first = code.encode();
        assert_eq!(first, code.encode());
        assert_eq!(first, code.to_string());
    }

    #[test]
    fn encode_empty() {
        let code = Bytecode::default();
        assert!(code.is_empty());
        assert_eq!(code.encode(), "\n");
    }
}
