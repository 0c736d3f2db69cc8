//! Shared types for the Gander interpreter.
//!
//! This crate defines the tagged runtime values, the resolved instruction
//! format, the program tables produced by the resolver, source files and the
//! structured error type used across all pipeline stages.

mod error;
mod instruction;
mod program;
mod source;
mod value;

pub use error::{ErrorCategory, ErrorCode, GanderError};
pub use instruction::{Instruction, OpCode};
pub use program::Program;
pub use source::SourceFile;
pub use value::{TypeTag, Value, ValueError};

/// Result type used throughout the Gander pipeline.
pub type Result<T> = std::result::Result<T, GanderError>;
