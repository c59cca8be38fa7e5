//! Runs compiled bytecode on a small reference stack machine to check that
//! the emitted sequences mean what the expressions mean.

use anyhow::anyhow;
use langton::{compile, Bytecode, Operation};
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Value {
    Int(i64),
    Bool(bool),
}

struct StackMachine<'a> {
    bytecode: &'a Bytecode,
    ip: usize,
    stack: Vec<Value>,
    halted: bool,
}

impl<'a> StackMachine<'a> {
    fn load(bytecode: &'a Bytecode) -> Self {
        StackMachine {
            bytecode,
            ip: 0,
            stack: Vec::new(),
            halted: false,
        }
    }

    /// Run until `HALT` and return what is left on the stack
    fn run(mut self) -> anyhow::Result<Vec<Value>> {
        while !self.halted {
            self.next_instruction()?;
        }
        if self.ip != self.bytecode.len() {
            return Err(anyhow!("instructions after HALT"));
        }
        Ok(self.stack)
    }

    fn next_instruction(&mut self) -> anyhow::Result<()> {
        let operation = *self
            .bytecode
            .operations()
            .get(self.ip)
            .ok_or_else(|| anyhow!("ran past the end without HALT"))?;
        self.ip += 1;

        match operation {
            Operation::Push(value) => self.stack.push(Value::Int(value)),
            Operation::PushBool(value) => self.stack.push(Value::Bool(value)),
            Operation::Add => {
                let rhs = self.pop_int()?;
                let lhs = self.pop_int()?;
                let sum = lhs.checked_add(rhs).ok_or_else(|| anyhow!("overflow"))?;
                self.stack.push(Value::Int(sum));
            }
            Operation::Neg => {
                let value = self.pop_int()?;
                let negated = value.checked_neg().ok_or_else(|| anyhow!("overflow"))?;
                self.stack.push(Value::Int(negated));
            }
            Operation::Halt => self.halted = true,
        }

        Ok(())
    }

    fn pop_int(&mut self) -> anyhow::Result<i64> {
        match self.stack.pop() {
            Some(Value::Int(value)) => Ok(value),
            Some(value) => Err(anyhow!("expected an int, found {:?}", value)),
            None => Err(anyhow!("stack is empty")),
        }
    }
}

fn eval(source: &str) -> Vec<Value> {
    let code = compile(source).unwrap();
    StackMachine::load(&code).run().unwrap()
}

#[test]
fn literals() {
    assert_eq!(eval("5"), vec![Value::Int(5)]);
    assert_eq!(eval("true"), vec![Value::Bool(true)]);
    assert_eq!(eval("false"), vec![Value::Bool(false)]);
}

#[test]
fn arithmetic() {
    assert_eq!(eval("1 + 2 + 3"), vec![Value::Int(6)]);
    assert_eq!(eval("-7"), vec![Value::Int(-7)]);
    assert_eq!(eval("1 + 2 + (40 + -3)"), vec![Value::Int(40)]);
    assert_eq!(eval("-(10 + -(3 + 4))"), vec![Value::Int(-3)]);
    assert_eq!(eval("--5"), vec![Value::Int(5)]);
}

#[test]
fn leaves_exactly_one_value() {
    for source in ["0", "1 + 1", "-(1 + (2 + (3 + 4)))", "((true))"] {
        assert_eq!(eval(source).len(), 1, "{}", source);
    }
}

#[test]
fn accepted_code_never_fails_at_runtime() {
    // Compile-time checks already rule out bool operands
    for source in ["1 + -2", "-(-(1))", "100 + 200 + -300"] {
        let code = compile(source).unwrap();
        assert!(StackMachine::load(&code).run().is_ok(), "{}", source);
    }
}
