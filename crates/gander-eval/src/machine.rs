//! The execution engine.
//!
//! A [`Machine`] owns the operand stack, the global variables and the call
//! stack, and walks a resolved [`Program`] one instruction at a time.
//!
//! # Function bodies
//!
//! Reaching `fn` by linear execution skips the body up to the next `fne`, so
//! a body only runs when entered through `call`. Any `fne`, whether it runs
//! or closes a skipped definition, returns to the instruction after the most
//! recent outstanding `call`; with no call outstanding it is a no-op.

use crate::arith::{self, ArithOp};
use crate::builtins::{self, Builtin};
use crate::config::EngineConfig;
use crate::env::Environment;
use crate::error::{EvalError, EvalResult, Fault};
use crate::stack::OperandStack;
use gander_types::{Instruction, OpCode, Program, Value};
use std::io::{self, BufRead, BufReader, Write};
use tracing::{debug, trace};

/// What the instruction pointer does after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    Jump(usize),
    SkipDefinition,
}

/// The Gander stack machine.
pub struct Machine<'io> {
    config: EngineConfig,
    stack: OperandStack,
    env: Environment,
    /// Index of every `call` instruction still waiting for its `fne`.
    call_stack: Vec<usize>,
    input: Box<dyn BufRead + 'io>,
    output: Box<dyn Write + 'io>,
    steps: u64,
}

impl Machine<'static> {
    /// A machine reading the process's stdin and writing its stdout.
    pub fn with_stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<'io> Machine<'io> {
    /// Create a machine over the given input source and output sink.
    pub fn new(input: impl BufRead + 'io, output: impl Write + 'io) -> Self {
        Self {
            config: EngineConfig::default(),
            stack: OperandStack::new(),
            env: Environment::new(),
            call_stack: Vec::new(),
            input: Box::new(input),
            output: Box::new(output),
            steps: 0,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Bottom-to-top view of the operand stack.
    pub fn stack(&self) -> &[Value] {
        self.stack.as_slice()
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Number of user-defined calls still outstanding.
    pub fn call_depth(&self) -> usize {
        self.call_stack.len()
    }

    /// Instructions executed by the last [`Machine::execute`].
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Run `program` from its first instruction until the pointer runs off
    /// the end or an instruction fails.
    ///
    /// Stack and variables persist across calls; the call stack and step
    /// counter are reset.
    pub fn execute(&mut self, program: &Program) -> Result<(), Fault> {
        self.call_stack.clear();
        self.steps = 0;
        debug!(instructions = program.len(), "execution started");

        let mut ip = 0;
        let mut skipping = false;
        while let Some(instruction) = program.instructions.get(ip) {
            if skipping {
                ip = match instruction.opcode {
                    OpCode::Fne => {
                        skipping = false;
                        match self.ret() {
                            Flow::Jump(target) => target,
                            _ => ip + 1,
                        }
                    }
                    _ => ip + 1,
                };
                continue;
            }

            let flow = self
                .advance(program, instruction, ip)
                .map_err(|error| Fault::new(instruction.line, error))?;
            ip = match flow {
                Flow::Next => ip + 1,
                Flow::Jump(target) => target,
                Flow::SkipDefinition => {
                    skipping = true;
                    ip + 1
                }
            };
        }

        debug!(steps = self.steps, stack = self.stack.len(), "execution finished");
        Ok(())
    }

    fn advance(&mut self, program: &Program, instruction: &Instruction, ip: usize) -> EvalResult<Flow> {
        self.steps += 1;
        if let Some(limit) = self.config.step_limit {
            if self.steps > limit {
                return Err(EvalError::StepLimitExceeded(limit));
            }
        }
        trace!(ip, line = instruction.line, opcode = %instruction.opcode, "dispatch");
        self.step(program, instruction, ip)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Dispatch
    // ══════════════════════════════════════════════════════════════════════

    fn step(&mut self, program: &Program, instruction: &Instruction, ip: usize) -> EvalResult<Flow> {
        match instruction.opcode {
            OpCode::Lbl => Ok(Flow::Next),
            OpCode::Fn => Ok(Flow::SkipDefinition),
            OpCode::Fne => Ok(self.ret()),

            // ── Stack ─────────────────────────────────────────────────────
            OpCode::Ld(tag) => {
                let value = Value::parse_literal(tag, operand(instruction)?)?;
                self.stack.push(value);
                Ok(Flow::Next)
            }
            OpCode::Conv(tag) => {
                let value = self.stack.pop()?.cast_to(tag)?;
                self.stack.push(value);
                Ok(Flow::Next)
            }

            // ── Variables ─────────────────────────────────────────────────
            OpCode::StVar => {
                let name = operand(instruction)?;
                let value = self.stack.pop()?;
                self.env.define(name, value);
                Ok(Flow::Next)
            }
            OpCode::StVarPeek => {
                let name = operand(instruction)?;
                let value = self.stack.peek()?.clone();
                self.env.define(name, value);
                Ok(Flow::Next)
            }
            OpCode::LdVar => {
                let name = operand(instruction)?;
                let value = self
                    .env
                    .get(name)
                    .cloned()
                    .ok_or_else(|| EvalError::UndefinedVariable(name.to_string()))?;
                self.stack.push(value);
                Ok(Flow::Next)
            }

            // ── Arithmetic ────────────────────────────────────────────────
            OpCode::Add => self.arith(ArithOp::Add),
            OpCode::Sub => self.arith(ArithOp::Sub),
            OpCode::Mul => self.arith(ArithOp::Mul),
            OpCode::Div => self.arith(ArithOp::Div),

            // ── Debug ─────────────────────────────────────────────────────
            OpCode::Dbg => {
                let value = self.stack.peek()?.clone();
                self.debug_print(&value)?;
                Ok(Flow::Next)
            }
            OpCode::DbgPop => {
                let value = self.stack.pop()?;
                self.debug_print(&value)?;
                Ok(Flow::Next)
            }

            // ── Control flow ──────────────────────────────────────────────
            OpCode::Call => self.call(program, operand(instruction)?, ip),
            OpCode::Br => Ok(Flow::Jump(label(program, operand(instruction)?)?)),
            OpCode::BrNe => {
                let target = label(program, operand(instruction)?)?;
                let item1 = self.stack.pop()?;
                let item2 = self.stack.pop()?;
                if item1 != item2 {
                    Ok(Flow::Jump(target))
                } else {
                    Ok(Flow::Next)
                }
            }
        }
    }

    fn arith(&mut self, op: ArithOp) -> EvalResult<Flow> {
        let item1 = self.stack.pop()?;
        let item2 = self.stack.pop()?;
        let result = arith::apply(op, &item1, &item2)?;
        self.stack.push(result);
        Ok(Flow::Next)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Calls
    // ══════════════════════════════════════════════════════════════════════

    fn call(&mut self, program: &Program, name: &str, ip: usize) -> EvalResult<Flow> {
        if let Some(builtin) = Builtin::from_name(name) {
            self.call_builtin(builtin)?;
            return Ok(Flow::Next);
        }

        let target = program
            .function(name)
            .ok_or_else(|| EvalError::UndefinedFunction(name.to_string()))?;
        if self.call_stack.len() >= self.config.max_call_depth {
            return Err(EvalError::CallDepthExceeded(self.config.max_call_depth));
        }
        self.call_stack.push(ip);
        trace!(function = name, target, depth = self.call_stack.len(), "call");
        Ok(Flow::Jump(target))
    }

    fn ret(&mut self) -> Flow {
        match self.call_stack.pop() {
            Some(call_site) => {
                trace!(call_site, depth = self.call_stack.len(), "return");
                Flow::Jump(call_site + 1)
            }
            None => Flow::Next,
        }
    }

    fn call_builtin(&mut self, builtin: Builtin) -> EvalResult<()> {
        match builtin {
            Builtin::Concat => {
                let joined = builtins::concat(&mut self.stack)?;
                self.stack.push(joined);
            }
            Builtin::Stdout => {
                let value = self.stack.pop()?;
                self.write(&value.to_string())?;
            }
            Builtin::Endl => self.write("\n")?,
            Builtin::Stdin => {
                let line = builtins::read_line(self.input.as_mut())?;
                self.stack.push(line);
            }
        }
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Output
    // ══════════════════════════════════════════════════════════════════════

    fn debug_print(&mut self, value: &Value) -> EvalResult<()> {
        self.write(&format!("Type: {}, Contents: {}\n", value.tag(), value))
    }

    /// Write and flush so output interleaves with `stdin` in program order.
    fn write(&mut self, text: &str) -> EvalResult<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }
}

fn operand(instruction: &Instruction) -> EvalResult<&str> {
    instruction
        .operand()
        .ok_or(EvalError::MissingOperand(instruction.opcode))
}

fn label(program: &Program, name: &str) -> EvalResult<usize> {
    program
        .label(name)
        .ok_or_else(|| EvalError::UndefinedLabel(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gander_types::TypeTag;
    use std::io::Cursor;

    fn run(instructions: Vec<Instruction>) -> (Result<(), Fault>, Vec<Value>, String) {
        let program = Program::new(instructions);
        let mut out = Vec::new();
        let (result, stack) = {
            let mut machine = Machine::new(Cursor::new(""), &mut out);
            let result = machine.execute(&program);
            (result, machine.stack().to_vec())
        };
        (result, stack, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_empty_program_halts() {
        let (result, stack, out) = run(vec![]);
        assert_eq!(result, Ok(()));
        assert!(stack.is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_operand_on_hand_built_instruction() {
        let (result, _, _) = run(vec![Instruction::new(OpCode::Ld(TypeTag::I32), 9)]);
        assert_eq!(
            result,
            Err(Fault::new(9, EvalError::MissingOperand(OpCode::Ld(TypeTag::I32))))
        );
    }

    #[test]
    fn test_dbg_keeps_value_dbg_p_consumes_it() {
        let (result, stack, out) = run(vec![
            Instruction::with_operand(OpCode::Ld(TypeTag::U16), "7", 1),
            Instruction::new(OpCode::Dbg, 2),
            Instruction::new(OpCode::Dbg, 3),
            Instruction::new(OpCode::DbgPop, 4),
        ]);
        assert_eq!(result, Ok(()));
        assert!(stack.is_empty());
        assert_eq!(out, "Type: U16, Contents: 7\n".repeat(3));
    }

    #[test]
    fn test_fne_without_call_falls_through() {
        let (result, stack, _) = run(vec![
            Instruction::new(OpCode::Fne, 1),
            Instruction::with_operand(OpCode::Ld(TypeTag::I8), "1", 2),
        ]);
        assert_eq!(result, Ok(()));
        assert_eq!(stack, vec![Value::I8(1)]);
    }

    #[test]
    fn test_step_limit_counts_executed_instructions() {
        let program = Program {
            instructions: vec![
                Instruction::with_operand(OpCode::Lbl, "top", 1),
                Instruction::with_operand(OpCode::Br, "top", 2),
            ],
            labels: [("top".to_string(), 0)].into_iter().collect(),
            functions: Default::default(),
        };
        let mut out = Vec::new();
        let mut machine = Machine::new(Cursor::new(""), &mut out)
            .with_config(EngineConfig::new().with_step_limit(10));
        let err = machine.execute(&program).unwrap_err();
        assert_eq!(err.error, EvalError::StepLimitExceeded(10));
        assert_eq!(machine.steps(), 11);
    }
}
