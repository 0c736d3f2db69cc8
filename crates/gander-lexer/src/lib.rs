//! Gander tokenizer: converts source text into instruction lines.

pub mod lexer;
pub mod token;

pub use lexer::{Lines, Tokenizer};
pub use token::{dequote, Line, COMMENT_PREFIX};
