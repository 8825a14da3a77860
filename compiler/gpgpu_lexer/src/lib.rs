//! Lexer for the JavaScript kernel subset, built on logos.
//!
//! Produces a `Vec<Token>` terminated by an `Eof` token. Whitespace and
//! comments are dropped; line breaks are recorded on the following token
//! as `newline_before` so the parser can apply semicolon insertion.

mod lex_error;

use gpgpu_ir::{Span, Token, TokenKind};
use logos::Logos;

pub use lex_error::LexError;

/// Raw token from logos, before payload conversion.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
enum RawToken {
    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    // Keywords
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("this")]
    This,
    #[token("function")]
    Function,
    #[token("const")]
    Const,
    #[token("let")]
    Let,
    #[token("var")]
    Var,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("return")]
    Return,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("new")]
    New,
    #[token("typeof")]
    Typeof,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("=>")]
    Arrow,

    // Operators
    #[token("===")]
    EqEqEq,
    #[token("==")]
    EqEq,
    #[token("!==")]
    NotEqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,
    #[token(">>>=")]
    UShrEq,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token(">>>")]
    UShr,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("**=")]
    StarStarEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("**")]
    StarStar,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("=")]
    Eq,

    // Hex integer
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| {
        let s = lex.slice();
        u64::from_str_radix(&s[2..], 16).ok().map(|v| v as f64)
    })]
    HexNumber(f64),

    // Decimal, fraction and exponent forms
    #[regex(r"([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?", |lex| {
        lex.slice().parse::<f64>().ok()
    })]
    Number(f64),

    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    #[regex(r"'([^'\\\n\r]|\\.)*'")]
    String,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,
}

/// Lex kernel source into tokens.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let eof_pos =
        u32::try_from(source.len()).map_err(|_| LexError::SourceTooLarge(source.len()))?;

    let mut result = Vec::new();
    let mut logos = RawToken::lexer(source);
    let mut newline_before = false;

    while let Some(token_result) = logos.next() {
        let range = logos.span();
        let span = Span::try_from_range(range.clone())
            .map_err(|_| LexError::SourceTooLarge(source.len()))?;
        let slice = logos.slice();

        let raw = match token_result {
            Ok(raw) => raw,
            Err(()) => return Err(LexError::classify(slice, span)),
        };

        let kind = match raw {
            RawToken::Newline => {
                newline_before = true;
                continue;
            }
            RawToken::LineComment => continue,
            RawToken::BlockComment => {
                newline_before |= slice.contains('\n');
                continue;
            }
            other => convert_token(other, slice),
        };

        result.push(Token {
            kind,
            span,
            newline_before,
        });
        newline_before = false;
    }

    result.push(Token {
        kind: TokenKind::Eof,
        span: Span::point(eof_pos),
        newline_before,
    });

    tracing::trace!(tokens = result.len(), "lexed source");
    Ok(result)
}

fn convert_token(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::Number(n) | RawToken::HexNumber(n) => TokenKind::Number(n),
        RawToken::String => TokenKind::Str(unescape(&slice[1..slice.len() - 1])),
        RawToken::Ident => TokenKind::Ident(slice.to_owned()),

        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,
        RawToken::This => TokenKind::This,
        RawToken::Function => TokenKind::Function,
        RawToken::Const => TokenKind::Const,
        RawToken::Let => TokenKind::Let,
        RawToken::Var => TokenKind::Var,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::For => TokenKind::For,
        RawToken::While => TokenKind::While,
        RawToken::Do => TokenKind::Do,
        RawToken::Return => TokenKind::Return,
        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,
        RawToken::New => TokenKind::New,
        RawToken::Typeof => TokenKind::Typeof,

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Ellipsis => TokenKind::Ellipsis,
        RawToken::Question => TokenKind::Question,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Arrow => TokenKind::Arrow,

        RawToken::EqEqEq => TokenKind::EqEqEq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEqEq => TokenKind::NotEqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::ShlEq => TokenKind::ShlEq,
        RawToken::ShrEq => TokenKind::ShrEq,
        RawToken::UShrEq => TokenKind::UShrEq,
        RawToken::Shl => TokenKind::Shl,
        RawToken::Shr => TokenKind::Shr,
        RawToken::UShr => TokenKind::UShr,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::StarStarEq => TokenKind::StarStarEq,
        RawToken::StarEq => TokenKind::StarEq,
        RawToken::SlashEq => TokenKind::SlashEq,
        RawToken::PercentEq => TokenKind::PercentEq,
        RawToken::AmpEq => TokenKind::AmpEq,
        RawToken::PipeEq => TokenKind::PipeEq,
        RawToken::CaretEq => TokenKind::CaretEq,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::StarStar => TokenKind::StarStar,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Amp => TokenKind::Amp,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::Eq => TokenKind::Eq,

        // Trivia never reaches conversion.
        RawToken::Newline | RawToken::LineComment | RawToken::BlockComment => TokenKind::Eof,
    }
}

/// Resolve escape sequences in a string literal body.
fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('0') => result.push('\0'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        match lex(source) {
            Ok(tokens) => tokens.into_iter().map(|t| t.kind).collect(),
            Err(e) => panic!("lex failed: {e}"),
        }
    }

    #[test]
    fn unescape_sequences() {
        assert_eq!(unescape(r"a\nb"), "a\nb");
        assert_eq!(unescape(r#"\"q\""#), "\"q\"");
        assert_eq!(unescape(r"\\"), "\\");
        assert_eq!(unescape(r"\x"), "x");
    }

    #[test]
    fn keywords_win_over_identifiers() {
        assert_eq!(
            kinds("this thisValue"),
            vec![
                TokenKind::This,
                TokenKind::Ident("thisValue".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn longest_operator_match() {
        assert_eq!(
            kinds("a !== b >>>= c ** d"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::NotEqEq,
                TokenKind::Ident("b".into()),
                TokenKind::UShrEq,
                TokenKind::Ident("c".into()),
                TokenKind::StarStar,
                TokenKind::Ident("d".into()),
                TokenKind::Eof,
            ]
        );
    }
}
