//! Preprocessing pass: classify lines, count instruction slots, build the
//! label and function tables.
//!
//! Every instruction line (including `lbl`, `fn` and `fne`) occupies exactly
//! one slot. Nothing is executed here.

use gander_lexer::{Line, Tokenizer};
use gander_types::{ErrorCode, GanderError, Instruction, OpCode, Program, SourceFile, TypeTag};
use std::collections::HashMap;
use tracing::{debug, warn};

/// The Gander resolver.
pub struct Resolver<'src> {
    source_file: &'src SourceFile,
    instructions: Vec<Instruction>,
    labels: HashMap<String, usize>,
    functions: HashMap<String, usize>,
}

/// Resolve a source file in one call.
pub fn resolve(source_file: &SourceFile) -> gander_types::Result<Program> {
    Resolver::new(source_file).resolve()
}

impl<'src> Resolver<'src> {
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source_file,
            instructions: Vec::new(),
            labels: HashMap::new(),
            functions: HashMap::new(),
        }
    }

    /// Resolve the whole file. Stops at the first error.
    pub fn resolve(mut self) -> gander_types::Result<Program> {
        for line in Tokenizer::new(self.source_file).lines() {
            let instruction = self.classify(&line)?;
            self.record(&instruction);
            self.instructions.push(instruction);
        }

        debug!(
            file = %self.source_file.name,
            instructions = self.instructions.len(),
            labels = self.labels.len(),
            functions = self.functions.len(),
            "program resolved"
        );

        Ok(Program {
            instructions: self.instructions,
            labels: self.labels,
            functions: self.functions,
        })
    }

    // ─────────────────────────────────────────────────────────────
    // Classification
    // ─────────────────────────────────────────────────────────────

    fn classify(&self, line: &Line<'_>) -> gander_types::Result<Instruction> {
        let opcode = OpCode::from_mnemonic(&line.mnemonic).ok_or_else(|| {
            self.error(
                ErrorCode::UNRECOGNIZED_OPCODE,
                format!("unrecognized opcode '{}'", line.mnemonic),
                line.number,
            )
        })?;

        if !opcode.takes_operand() {
            if !line.operands.is_empty() {
                warn!(line = line.number, %opcode, "ignoring operand on opcode that takes none");
            }
            return Ok(Instruction::new(opcode, line.number));
        }

        let operand = match opcode {
            OpCode::Ld(TypeTag::String) => line.string_literal(),
            _ => {
                if !line.extra_operands().is_empty() {
                    warn!(
                        line = line.number,
                        %opcode,
                        extra = line.extra_operands().len(),
                        "ignoring trailing operand tokens"
                    );
                }
                line.operand().map(str::to_string)
            }
        };

        let operand = operand.ok_or_else(|| {
            self.error(
                ErrorCode::MISSING_OPERAND,
                format!("'{opcode}' requires an operand"),
                line.number,
            )
        })?;

        Ok(Instruction::with_operand(opcode, operand, line.number))
    }

    // ─────────────────────────────────────────────────────────────
    // Jump tables
    // ─────────────────────────────────────────────────────────────

    /// Record label/function targets for the instruction about to be
    /// appended. Later definitions replace earlier ones.
    fn record(&mut self, instruction: &Instruction) {
        let index = self.instructions.len();
        let (table, kind, target) = match instruction.opcode {
            OpCode::Lbl => (&mut self.labels, "label", index),
            OpCode::Fn => (&mut self.functions, "function", index + 1),
            _ => return,
        };
        let Some(name) = instruction.operand() else {
            return;
        };
        if let Some(previous) = table.insert(name.to_string(), target) {
            warn!(
                line = instruction.line,
                kind,
                name,
                previous,
                target,
                "redefinition replaces earlier target"
            );
        }
    }

    fn error(&self, code: ErrorCode, message: String, line: u32) -> GanderError {
        let source_line = self.source_file.line(line).unwrap_or("").trim();
        GanderError::new(&self.source_file.name, code, message, line, source_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_str(source: &str) -> gander_types::Result<Program> {
        resolve(&SourceFile::new("test.gdr", source))
    }

    #[test]
    fn test_every_line_takes_one_slot() {
        let program = resolve_str("lbl top\nld.i32 1\nfn f\nfne\nbr top").unwrap();
        assert_eq!(program.len(), 5);
        assert_eq!(program.instructions[2].opcode, OpCode::Fn);
    }

    #[test]
    fn test_label_points_at_lbl_function_at_body() {
        let program = resolve_str("ld.i8 1\nlbl here\nfn body\ndbg\nfne").unwrap();
        assert_eq!(program.label("here"), Some(1));
        assert_eq!(program.function("body"), Some(3));
    }

    #[test]
    fn test_redefinition_last_writer_wins() {
        let program = resolve_str("lbl a\nlbl a\nlbl a").unwrap();
        assert_eq!(program.label("a"), Some(2));
    }

    #[test]
    fn test_error_message_carries_source_line() {
        let err = resolve_str("add\n   jmp nowhere  ").unwrap_err();
        assert_eq!(err.code, ErrorCode::UNRECOGNIZED_OPCODE);
        assert_eq!(err.line, 2);
        assert_eq!(err.source_line, "jmp nowhere");
        assert_eq!(err.file, "test.gdr");
    }
}
