use crate::instruction::Instruction;
use std::collections::HashMap;

/// A resolved script: the instruction sequence plus its jump tables.
///
/// Built once by the resolver and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub instructions: Vec<Instruction>,
    /// Label name → index of the `lbl` instruction.
    pub labels: HashMap<String, usize>,
    /// Function name → index of the first body instruction after `fn`.
    pub functions: HashMap<String, usize>,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            ..Self::default()
        }
    }

    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    pub fn function(&self, name: &str) -> Option<usize> {
        self.functions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
