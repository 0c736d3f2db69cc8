//! Gander interpreter: orchestrates the full pipeline.
//!
//! ```text
//! Source → Tokenizer → Resolver → Machine
//! ```
//!
//! Every error, whether found while loading or while running, is reported as
//! a structured [`GanderError`] carrying the offending source line.

use gander_eval::{EvalError, Fault};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use tracing::{debug, info};

pub use gander_eval::{EngineConfig, Environment, Machine};
pub use gander_types::{
    ErrorCategory, ErrorCode, GanderError, Instruction, OpCode, Program, SourceFile, TypeTag,
    Value,
};

/// Tokenize and resolve a source file into a runnable [`Program`].
pub fn load(source_file: &SourceFile) -> Result<Program, GanderError> {
    let program = gander_resolver::resolve(source_file)?;
    debug!(
        file = %source_file.name,
        instructions = program.len(),
        "script loaded"
    );
    Ok(program)
}

/// Load `source_file` and run it to completion on `machine`.
pub fn run(source_file: &SourceFile, machine: &mut Machine<'_>) -> Result<(), GanderError> {
    let program = load(source_file)?;
    info!(file = %source_file.name, "running script");
    machine
        .execute(&program)
        .map_err(|fault| fault_to_error(source_file, &fault))
}

/// Load `source_file` and run it against the process's stdin and stdout.
pub fn run_stdio(source_file: &SourceFile, config: EngineConfig) -> Result<(), GanderError> {
    let mut machine = Machine::with_stdio().with_config(config);
    run(source_file, &mut machine)
}

/// Convert an engine fault into a structured error for `source_file`.
pub fn fault_to_error(source_file: &SourceFile, fault: &Fault) -> GanderError {
    let source_line = source_file.line(fault.line).unwrap_or("").trim();
    let err = GanderError::new(
        &source_file.name,
        fault.error.code(),
        fault.error.to_string(),
        fault.line,
        source_line,
    );
    match suggestion(&fault.error) {
        Some(hint) => err.with_suggestion(hint),
        None => err,
    }
}

fn suggestion(error: &EvalError) -> Option<String> {
    match error {
        EvalError::UndefinedVariable(name) => {
            Some(format!("store a value first with `stvar {name}`"))
        }
        EvalError::UndefinedLabel(name) => Some(format!("declare the target with `lbl {name}`")),
        EvalError::UndefinedFunction(name) => Some(format!(
            "declare it with `fn {name}` ... `fne`, or call one of: concat, stdout, endl, stdin"
        )),
        EvalError::UnsupportedConversion { .. } => {
            Some("strings cannot be converted to numbers".to_string())
        }
        _ => None,
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Captured runs
// ══════════════════════════════════════════════════════════════════════════════

/// The outcome of a run with captured output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Whether the script ran to completion.
    pub success: bool,
    /// Everything written to the output sink, up to the point of failure.
    pub output: String,
    /// Final operand stack, bottom to top.
    pub stack: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<GanderError>,
}

/// Run `source` with `input` as the line source, capturing all output.
pub fn run_to_result(
    name: &str,
    source: &str,
    input: &str,
    config: EngineConfig,
) -> RunResult {
    let source_file = SourceFile::new(name, source);
    let mut output = Vec::new();
    let (outcome, stack) = {
        let mut machine =
            Machine::new(Cursor::new(input.to_string()), &mut output).with_config(config);
        let outcome = run(&source_file, &mut machine);
        (outcome, machine.stack().to_vec())
    };
    let output = String::from_utf8_lossy(&output).into_owned();
    match outcome {
        Ok(()) => RunResult {
            success: true,
            output,
            stack,
            error: None,
        },
        Err(err) => RunResult {
            success: false,
            output,
            stack,
            error: Some(err),
        },
    }
}
