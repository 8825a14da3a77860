//! Token cursor for navigating the token stream.

use std::mem;

use gpgpu_ir::{Span, Token, TokenKind};

/// Cursor over a token list whose last entry is always `Eof`.
pub struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        Cursor { tokens, pos: 0 }
    }

    #[inline]
    pub fn current(&self) -> &Token {
        // The lexer always appends `Eof`, and `advance` never steps past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    #[inline]
    pub fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Kind of the token `n` positions ahead (0 is the current token).
    pub fn peek_kind(&self, n: usize) -> &TokenKind {
        let index = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        if self.pos == 0 {
            Span::DUMMY
        } else {
            self.tokens[self.pos - 1].span
        }
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Whether the current token has the same kind as `kind`, ignoring payloads.
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        mem::discriminant(self.current_kind()) == mem::discriminant(kind)
    }

    /// Consume and return the current token.
    pub fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it matches `kind`.
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(source: &str) -> Cursor {
        match gpgpu_lexer::lex(source) {
            Ok(tokens) => Cursor::new(tokens),
            Err(e) => panic!("lex failed: {e}"),
        }
    }

    #[test]
    fn advance_stops_at_eof() {
        let mut c = cursor("a");
        assert!(c.check(&TokenKind::Ident(String::new())));
        c.advance();
        assert!(c.is_at_end());
        c.advance();
        assert!(c.is_at_end());
    }

    #[test]
    fn eat_ignores_payload() {
        let mut c = cursor("x ;");
        assert!(c.eat(&TokenKind::Ident(String::new())));
        assert!(!c.eat(&TokenKind::Comma));
        assert!(c.eat(&TokenKind::Semicolon));
        assert_eq!(c.previous_span(), Span::new(2, 3));
    }

    #[test]
    fn peek_past_end_is_eof() {
        let c = cursor("a b");
        assert_eq!(c.peek_kind(1), &TokenKind::Ident("b".into()));
        assert_eq!(c.peek_kind(10), &TokenKind::Eof);
    }
}
