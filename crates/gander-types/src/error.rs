use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Type,
    Name,
    Stack,
    Runtime,
}

/// Numeric error code (E100–E599).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Syntax errors (E100–E199) ──
    pub const UNRECOGNIZED_OPCODE: Self = Self(100);
    pub const MISSING_OPERAND: Self = Self(101);

    // ── Type errors (E200–E299) ──
    pub const PARSE_ERROR: Self = Self(200);
    pub const TYPE_ERROR: Self = Self(201);
    pub const UNSUPPORTED_CONVERSION: Self = Self(202);
    pub const DIVISION_BY_ZERO: Self = Self(203);

    // ── Name errors (E300–E399) ──
    pub const UNDEFINED_VARIABLE: Self = Self(300);
    pub const UNDEFINED_LABEL: Self = Self(301);
    pub const UNDEFINED_FUNCTION: Self = Self(302);

    // ── Stack errors (E400–E499) ──
    pub const STACK_UNDERFLOW: Self = Self(400);
    pub const CALL_DEPTH_EXCEEDED: Self = Self(401);

    // ── Runtime errors (E500–E599) ──
    pub const STEP_LIMIT_EXCEEDED: Self = Self(500);
    pub const END_OF_INPUT: Self = Self(501);
    pub const IO_ERROR: Self = Self(502);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Syntax,
            200..=299 => ErrorCategory::Type,
            300..=399 => ErrorCategory::Name,
            400..=499 => ErrorCategory::Stack,
            _ => ErrorCategory::Runtime,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Type => write!(f, "type"),
            Self::Name => write!(f, "name"),
            Self::Stack => write!(f, "stack"),
            Self::Runtime => write!(f, "runtime"),
        }
    }
}

/// A structured Gander error, from either loading or running a script.
///
/// Every error is fatal: a run stops at the first one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{file}:{line}: {code} [{category}] {message}")]
pub struct GanderError {
    /// Source file name.
    pub file: String,
    pub code: ErrorCode,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// 1-based source line of the offending instruction.
    pub line: u32,
    /// The exact source line for context.
    pub source_line: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub suggestion: Option<String>,
}

impl GanderError {
    /// Create a new error.
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        line: u32,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            category: code.category(),
            message: message.into(),
            line,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_category() {
        assert_eq!(
            ErrorCode::UNRECOGNIZED_OPCODE.category(),
            ErrorCategory::Syntax
        );
        assert_eq!(ErrorCode::PARSE_ERROR.category(), ErrorCategory::Type);
        assert_eq!(
            ErrorCode::UNDEFINED_FUNCTION.category(),
            ErrorCategory::Name
        );
        assert_eq!(ErrorCode::STACK_UNDERFLOW.category(), ErrorCategory::Stack);
        assert_eq!(ErrorCode::END_OF_INPUT.category(), ErrorCategory::Runtime);
    }

    #[test]
    fn test_error_display() {
        let err = GanderError::new(
            "demo.gdr",
            ErrorCode::UNDEFINED_VARIABLE,
            "undefined variable: x",
            4,
            "ldvar x",
        );
        assert_eq!(
            err.to_string(),
            "demo.gdr:4: E300 [name] undefined variable: x"
        );
    }

    #[test]
    fn test_error_with_suggestion() {
        let err = GanderError::new(
            "demo.gdr",
            ErrorCode::UNDEFINED_FUNCTION,
            "undefined function: greet",
            2,
            "call greet",
        )
        .with_suggestion("declare it with `fn greet` ... `fne`");
        assert_eq!(
            err.suggestion.as_deref(),
            Some("declare it with `fn greet` ... `fne`")
        );
    }

    #[test]
    fn test_error_json_serialization() {
        let err = GanderError::new(
            "demo.gdr",
            ErrorCode::UNRECOGNIZED_OPCODE,
            "unrecognized opcode 'jmp'",
            7,
            "jmp start",
        );
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"code\":100"));
        assert!(json.contains("\"category\":\"syntax\""));
        assert!(json.contains("\"line\":7"));
        assert!(!json.contains("suggestion"));

        let back: GanderError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
