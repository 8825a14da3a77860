//! Recursive descent parser for the JavaScript kernel subset.
//!
//! The grammar accepted here is wider than what code generation supports
//! (`while`, `?:`, array literals, `new`, ...). Rejecting those constructs is
//! the code generator's job, where the error can name the construct.

mod cursor;
mod error;
mod grammar;

use gpgpu_ir::{AstArena, LineIndex, Program, Span, TokenKind};

use cursor::Cursor;
pub use error::ParseError;

/// Result of parsing one source text.
#[derive(Debug)]
pub struct ParseOutput {
    pub arena: AstArena,
    pub program: Program,
    pub lines: LineIndex,
}

/// Parse a complete source text.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse_program(source: &str) -> Result<ParseOutput, ParseError> {
    let lines = LineIndex::new(source);
    let tokens = gpgpu_lexer::lex(source).map_err(|e| ParseError::from_lex(&e, &lines))?;

    let mut parser = Parser::new(tokens, lines);
    let mut body = Vec::new();
    while !parser.cursor.is_at_end() {
        body.push(parser.parse_statement()?);
    }
    tracing::debug!(
        statements = body.len(),
        exprs = parser.arena.expr_count(),
        "parsed program"
    );

    Ok(ParseOutput {
        arena: parser.arena,
        program: Program { body },
        lines: parser.lines,
    })
}

/// Parser state.
pub(crate) struct Parser {
    cursor: Cursor,
    arena: AstArena,
    lines: LineIndex,
}

impl Parser {
    fn new(tokens: Vec<gpgpu_ir::Token>, lines: LineIndex) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            arena: AstArena::new(),
            lines,
        }
    }

    fn error(&self, message: impl Into<String>, span: Span) -> ParseError {
        ParseError::new(message, span, &self.lines)
    }

    /// Error for an unexpected current token.
    fn unexpected(&self, expected: &str) -> ParseError {
        let found = self.cursor.current();
        self.error(
            format!(
                "expected {expected}, found `{}`",
                found.kind.display_name()
            ),
            found.span,
        )
    }

    /// Consume `kind` or fail naming it.
    fn expect(&mut self, kind: &TokenKind) -> Result<Span, ParseError> {
        if self.cursor.check(kind) {
            Ok(self.cursor.advance().span)
        } else {
            Err(self.unexpected(&format!("`{}`", kind.display_name())))
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Span), ParseError> {
        if let TokenKind::Ident(name) = self.cursor.current_kind() {
            let name = name.clone();
            let span = self.cursor.advance().span;
            Ok((name, span))
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    /// Statement terminator with automatic semicolon insertion.
    fn consume_semicolon(&mut self) -> Result<(), ParseError> {
        if self.cursor.eat(&TokenKind::Semicolon) {
            return Ok(());
        }
        let current = self.cursor.current();
        if current.newline_before || matches!(current.kind, TokenKind::RBrace | TokenKind::Eof) {
            Ok(())
        } else {
            Err(self.unexpected("`;`"))
        }
    }
}
