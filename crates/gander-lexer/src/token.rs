//! Token types for the Gander tokenizer.
//!
//! A [`Line`] is one instruction-bearing source line split into its
//! mnemonic and whitespace-delimited operand tokens.

/// A line whose trimmed text starts with this character is a comment.
pub const COMMENT_PREFIX: char = '#';

/// One non-blank, non-comment source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'src> {
    /// 1-based physical line number.
    pub number: u32,
    /// First token, lower-cased for opcode matching.
    pub mnemonic: String,
    /// Remaining tokens, verbatim.
    pub operands: Vec<&'src str>,
}

impl<'src> Line<'src> {
    /// The first operand token, if any.
    pub fn operand(&self) -> Option<&'src str> {
        self.operands.first().copied()
    }

    /// Operand tokens beyond the first.
    pub fn extra_operands(&self) -> &[&'src str] {
        self.operands.get(1..).unwrap_or(&[])
    }

    /// Rebuild a string literal from every operand token.
    ///
    /// Tokens are re-joined with single spaces and one enclosing pair of
    /// double quotes is removed. Returns `None` when the line has no operands.
    pub fn string_literal(&self) -> Option<String> {
        if self.operands.is_empty() {
            return None;
        }
        let joined = self.operands.join(" ");
        Some(dequote(&joined).to_string())
    }
}

/// Strip one leading and one trailing `"`, each only if present.
///
/// There is no escaping; unbalanced quotes are stripped independently.
pub fn dequote(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}
