//! Parse error type.

use gpgpu_ir::{LineIndex, Loc, Span};
use gpgpu_lexer::LexError;
use thiserror::Error;

/// A syntax error with its resolved source position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {loc}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub loc: Loc,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span, lines: &LineIndex) -> Self {
        ParseError {
            message: message.into(),
            span,
            loc: lines.span_loc(span),
        }
    }

    pub fn from_lex(err: &LexError, lines: &LineIndex) -> Self {
        ParseError::new(err.to_string(), err.span(), lines)
    }
}
