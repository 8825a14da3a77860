//! Statement parsing.

use gpgpu_ir::stack::ensure_sufficient_stack;
use gpgpu_ir::{Declarator, ForInit, Function, Param, Stmt, StmtId, StmtKind, TokenKind, VarKind};

use crate::{ParseError, Parser};

impl Parser {
    pub(crate) fn parse_statement(&mut self) -> Result<StmtId, ParseError> {
        ensure_sufficient_stack(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.current_span();
        tracing::trace!(token = ?self.cursor.current_kind(), "statement");

        let kind = match self.cursor.current_kind() {
            TokenKind::LBrace => return self.parse_block(),
            TokenKind::Const | TokenKind::Let | TokenKind::Var => {
                let kind = self.parse_var_decl()?;
                self.consume_semicolon()?;
                kind
            }
            TokenKind::If => self.parse_if()?,
            TokenKind::For => self.parse_for()?,
            TokenKind::While => {
                self.cursor.advance();
                self.expect(&TokenKind::LParen)?;
                let test = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                let body = self.parse_statement()?;
                StmtKind::While { test, body }
            }
            TokenKind::Do => {
                self.cursor.advance();
                let body = self.parse_statement()?;
                self.expect(&TokenKind::While)?;
                self.expect(&TokenKind::LParen)?;
                let test = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                self.cursor.eat(&TokenKind::Semicolon);
                StmtKind::DoWhile { body, test }
            }
            TokenKind::Return => {
                self.cursor.advance();
                let current = self.cursor.current();
                let argument = if current.newline_before
                    || matches!(
                        current.kind,
                        TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
                    ) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.consume_semicolon()?;
                StmtKind::Return(argument)
            }
            TokenKind::Break => {
                self.cursor.advance();
                self.consume_semicolon()?;
                StmtKind::Break
            }
            TokenKind::Continue => {
                self.cursor.advance();
                self.consume_semicolon()?;
                StmtKind::Continue
            }
            TokenKind::Semicolon => {
                self.cursor.advance();
                StmtKind::Empty
            }
            TokenKind::Function if matches!(self.cursor.peek_kind(1), TokenKind::Ident(_)) => {
                let function = self.parse_function()?;
                StmtKind::FunctionDecl(function)
            }
            _ => {
                let expr = self.parse_expression()?;
                self.consume_semicolon()?;
                StmtKind::Expr(expr)
            }
        };

        let span = start.merge(self.cursor.previous_span());
        Ok(self.arena.alloc_stmt(Stmt { kind, span }))
    }

    pub(crate) fn parse_block(&mut self) -> Result<StmtId, ParseError> {
        let start = self.expect(&TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.cursor.check(&TokenKind::RBrace) {
            if self.cursor.is_at_end() {
                return Err(self.unexpected("`}`"));
            }
            body.push(self.parse_statement()?);
        }
        let end = self.expect(&TokenKind::RBrace)?;
        Ok(self.arena.alloc_stmt(Stmt {
            kind: StmtKind::Block(body),
            span: start.merge(end),
        }))
    }

    /// `const|let|var` declarators, without the terminator.
    fn parse_var_decl(&mut self) -> Result<StmtKind, ParseError> {
        let kind = match self.cursor.advance().kind {
            TokenKind::Const => VarKind::Const,
            TokenKind::Let => VarKind::Let,
            _ => VarKind::Var,
        };

        let mut declarators = Vec::new();
        loop {
            let (name, name_span) = self.expect_ident()?;
            let init = if self.cursor.eat(&TokenKind::Eq) {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            declarators.push(Declarator {
                name,
                init,
                span: name_span.merge(self.cursor.previous_span()),
            });
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }

        Ok(StmtKind::VarDecl { kind, declarators })
    }

    fn parse_if(&mut self) -> Result<StmtKind, ParseError> {
        self.cursor.advance();
        self.expect(&TokenKind::LParen)?;
        let test = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        let consequent = self.parse_statement()?;
        let alternate = if self.cursor.eat(&TokenKind::Else) {
            Some(self.parse_statement()?)
        } else {
            None
        };
        Ok(StmtKind::If {
            test,
            consequent,
            alternate,
        })
    }

    fn parse_for(&mut self) -> Result<StmtKind, ParseError> {
        self.cursor.advance();
        self.expect(&TokenKind::LParen)?;

        let init = match self.cursor.current_kind() {
            TokenKind::Semicolon => None,
            TokenKind::Const | TokenKind::Let | TokenKind::Var => {
                let start = self.cursor.current_span();
                let kind = self.parse_var_decl()?;
                let span = start.merge(self.cursor.previous_span());
                Some(ForInit::Decl(self.arena.alloc_stmt(Stmt { kind, span })))
            }
            _ => Some(ForInit::Expr(self.parse_expression()?)),
        };
        self.expect(&TokenKind::Semicolon)?;

        let test = if self.cursor.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semicolon)?;

        let update = if self.cursor.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::RParen)?;

        let body = self.parse_statement()?;
        Ok(StmtKind::For {
            init,
            test,
            update,
            body,
        })
    }

    /// `function name?(params) { body }`
    pub(crate) fn parse_function(&mut self) -> Result<gpgpu_ir::FunctionId, ParseError> {
        let start = self.expect(&TokenKind::Function)?;
        let name = match self.cursor.current_kind() {
            TokenKind::Ident(_) => Some(self.expect_ident()?.0),
            _ => None,
        };

        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.cursor.check(&TokenKind::RParen) {
            params.push(self.parse_param()?);
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;

        let body = self.parse_block()?;
        let span = start.merge(self.cursor.previous_span());
        Ok(self.arena.alloc_function(Function {
            name,
            params,
            body,
            span,
        }))
    }

    fn parse_param(&mut self) -> Result<Param, ParseError> {
        if self.cursor.check(&TokenKind::Ellipsis) {
            let start = self.cursor.advance().span;
            let (name, end) = self.expect_ident()?;
            return Ok(Param::Rest(name, start.merge(end)));
        }
        let (name, span) = self.expect_ident()?;
        if self.cursor.eat(&TokenKind::Eq) {
            let default = self.parse_assignment()?;
            return Ok(Param::Default {
                name,
                default,
                span: span.merge(self.cursor.previous_span()),
            });
        }
        Ok(Param::Ident(name, span))
    }
}
