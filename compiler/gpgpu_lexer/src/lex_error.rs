//! Lexer errors.

use gpgpu_ir::Span;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character `{text}`")]
    UnexpectedCharacter { text: String, span: Span },

    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("invalid numeric literal `{text}`")]
    InvalidNumber { text: String, span: Span },

    #[error("source of {0} bytes exceeds the 4 GiB limit")]
    SourceTooLarge(usize),
}

impl LexError {
    /// Build the error for a slice logos could not match.
    pub(crate) fn classify(slice: &str, span: Span) -> Self {
        match slice.chars().next() {
            Some('"' | '\'') => LexError::UnterminatedString { span },
            Some(c) if c.is_ascii_digit() => LexError::InvalidNumber {
                text: slice.to_owned(),
                span,
            },
            _ => LexError::UnexpectedCharacter {
                text: slice.to_owned(),
                span,
            },
        }
    }

    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::InvalidNumber { span, .. } => *span,
            LexError::SourceTooLarge(_) => Span::DUMMY,
        }
    }
}
