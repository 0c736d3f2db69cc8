//! Runtime error types for the Gander execution engine.

use gander_types::{ErrorCode, OpCode, TypeTag, ValueError};
use thiserror::Error;

/// Execution error. Every variant aborts the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A literal does not fit its declared type.
    #[error("cannot parse '{text}' as {tag}")]
    ParseError { tag: TypeTag, text: String },

    /// Arithmetic or count operand has the wrong type.
    #[error("type error: {0}")]
    TypeError(String),

    /// `conv.<type>` has no conversion from the popped value.
    #[error("cannot convert {from} to {to}")]
    UnsupportedConversion { from: TypeTag, to: TypeTag },

    #[error("undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("undefined label: {0}")]
    UndefinedLabel(String),

    #[error("undefined function: {0}")]
    UndefinedFunction(String),

    /// Pop or peek on an empty operand stack.
    #[error("stack underflow")]
    StackUnderflow,

    /// An instruction that needs an operand was built without one.
    #[error("'{0}' requires an operand")]
    MissingOperand(OpCode),

    /// Integer division with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    #[error("call depth exceeded (max {0})")]
    CallDepthExceeded(usize),

    #[error("step limit exceeded (max {0})")]
    StepLimitExceeded(u64),

    /// `stdin` reached the end of the input source.
    #[error("end of input")]
    EndOfInput,

    #[error("io error: {0}")]
    Io(String),
}

impl EvalError {
    /// The structured error code this kind is reported under.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ParseError { .. } => ErrorCode::PARSE_ERROR,
            Self::TypeError(_) => ErrorCode::TYPE_ERROR,
            Self::UnsupportedConversion { .. } => ErrorCode::UNSUPPORTED_CONVERSION,
            Self::UndefinedVariable(_) => ErrorCode::UNDEFINED_VARIABLE,
            Self::UndefinedLabel(_) => ErrorCode::UNDEFINED_LABEL,
            Self::UndefinedFunction(_) => ErrorCode::UNDEFINED_FUNCTION,
            Self::StackUnderflow => ErrorCode::STACK_UNDERFLOW,
            Self::MissingOperand(_) => ErrorCode::MISSING_OPERAND,
            Self::DivisionByZero => ErrorCode::DIVISION_BY_ZERO,
            Self::CallDepthExceeded(_) => ErrorCode::CALL_DEPTH_EXCEEDED,
            Self::StepLimitExceeded(_) => ErrorCode::STEP_LIMIT_EXCEEDED,
            Self::EndOfInput => ErrorCode::END_OF_INPUT,
            Self::Io(_) => ErrorCode::IO_ERROR,
        }
    }
}

impl From<ValueError> for EvalError {
    fn from(err: ValueError) -> Self {
        match err {
            ValueError::Parse { tag, text } => Self::ParseError { tag, text },
            ValueError::UnsupportedConversion { from, to } => {
                Self::UnsupportedConversion { from, to }
            }
        }
    }
}

impl From<std::io::Error> for EvalError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// An [`EvalError`] pinned to the source line of the failing instruction.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {error}")]
pub struct Fault {
    /// 1-based source line.
    pub line: u32,
    #[source]
    pub error: EvalError,
}

impl Fault {
    pub fn new(line: u32, error: EvalError) -> Self {
        Self { line, error }
    }
}

/// Result alias for engine operations.
pub type EvalResult<T> = Result<T, EvalError>;
