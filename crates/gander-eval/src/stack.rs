//! Operand stack.
//!
//! Stack data structure only; no execution semantics.

use crate::error::{EvalError, EvalResult};
use gander_types::Value;

/// Unbounded LIFO stack of values.
#[derive(Debug, Clone, Default)]
pub struct OperandStack {
    values: Vec<Value>,
}

impl OperandStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    pub fn pop(&mut self) -> EvalResult<Value> {
        self.values.pop().ok_or(EvalError::StackUnderflow)
    }

    /// Top of stack without removing it.
    pub fn peek(&self) -> EvalResult<&Value> {
        self.values.last().ok_or(EvalError::StackUnderflow)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bottom-to-top view of the stack.
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }
}
