//! Core Gander tokenizer.
//!
//! - One instruction per physical line
//! - Blank lines and lines starting with `#` are skipped
//! - Tokens are whitespace-delimited; the first token is lower-cased
//! - Lines are produced lazily

use gander_types::SourceFile;

use crate::token::{Line, COMMENT_PREFIX};

/// The Gander tokenizer.
pub struct Tokenizer<'src> {
    source: &'src str,
}

impl<'src> Tokenizer<'src> {
    /// Create a tokenizer over the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: &source_file.source,
        }
    }

    /// Create a tokenizer over raw text.
    pub fn from_text(source: &'src str) -> Self {
        Self { source }
    }

    /// Iterate the instruction lines of the source.
    pub fn lines(&self) -> Lines<'src> {
        Lines {
            inner: self.source.lines().enumerate(),
        }
    }
}

/// Lazy iterator over instruction lines.
pub struct Lines<'src> {
    inner: std::iter::Enumerate<std::str::Lines<'src>>,
}

impl<'src> Iterator for Lines<'src> {
    type Item = Line<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, raw) in self.inner.by_ref() {
            let text = raw.trim();
            if text.is_empty() || text.starts_with(COMMENT_PREFIX) {
                continue;
            }
            let mut tokens = text.split_whitespace();
            let Some(first) = tokens.next() else {
                continue;
            };
            return Some(Line {
                number: idx as u32 + 1,
                mnemonic: first.to_ascii_lowercase(),
                operands: tokens.collect(),
            });
        }
        None
    }
}
